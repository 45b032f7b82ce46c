use hmm_localizer::simulation::agent::Agent;
use hmm_localizer::simulation::environment::{Coordinate, Direction, GridTopology};
use hmm_localizer::simulation::error::LocalizationError;

fn maze_agent(error_rate: f64) -> Agent {
    Agent::seeded(error_rate, GridTopology::reference_maze().unwrap(), 99).unwrap()
}

#[test]
fn test_agent_initialization() {
    let agent = maze_agent(0.2);
    assert_eq!(agent.true_position(), Coordinate::new(0, 0));
    assert_eq!(agent.time(), 0);
    assert_eq!(agent.last_percept(), None);

    let belief = agent.belief_state();
    assert_eq!(belief.len(), 42);
    for (_, p) in belief {
        assert!((p - 1.0 / 42.0).abs() < 1e-12);
    }
}

#[test]
fn test_rejects_invalid_error_rate() {
    let maze = GridTopology::reference_maze().unwrap();
    assert_eq!(
        Agent::seeded(1.2, maze, 0).unwrap_err(),
        LocalizationError::InvalidErrorRate(1.2)
    );
}

#[test]
fn test_start_must_be_occupiable() {
    let agent = maze_agent(0.2);
    let err = agent.with_start(Coordinate::new(0, 1)).unwrap_err();
    assert_eq!(err, LocalizationError::StartNotOccupiable(Coordinate::new(0, 1)));

    let err = maze_agent(0.2).with_start(Coordinate::new(16, 0)).unwrap_err();
    assert_eq!(err, LocalizationError::StartNotOccupiable(Coordinate::new(16, 0)));

    let agent = maze_agent(0.2).with_start(Coordinate::new(5, 3)).unwrap();
    assert_eq!(agent.true_position(), Coordinate::new(5, 3));
}

#[test]
fn test_blocked_moves_are_no_ops() {
    let mut agent = maze_agent(0.2);

    // Obstacle at (0,1).
    assert!(!agent.move_to(Some(Direction::South)));
    // Off the grid.
    assert!(!agent.move_to(Some(Direction::North)));
    assert!(!agent.move_to(Some(Direction::West)));
    // Standing still.
    assert!(!agent.move_to(None));

    assert_eq!(agent.true_position(), Coordinate::new(0, 0));
    assert_eq!(agent.time(), 4);
}

#[test]
fn test_open_move() {
    let mut agent = maze_agent(0.2);
    assert!(agent.move_to(Some(Direction::East)));
    assert_eq!(agent.true_position(), Coordinate::new(1, 0));
    assert!(agent.move_to(Some(Direction::East)));
    // (3,0) is open, (4,0) is not.
    assert!(agent.move_to(Some(Direction::East)));
    assert!(!agent.move_to(Some(Direction::East)));
    assert_eq!(agent.true_position(), Coordinate::new(3, 0));
}

#[test]
fn test_noise_free_sense_matches_ground_truth() {
    let mut agent = maze_agent(0.0).with_start(Coordinate::new(8, 2)).unwrap();
    let truth = agent.topology().ground_truth_reading(Coordinate::new(8, 2));
    assert_eq!(agent.sense(), truth);
    assert_eq!(agent.last_percept(), Some(truth));
}

#[test]
fn test_seeded_agents_are_reproducible() {
    let moves = [
        Direction::East,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
        Direction::East,
    ];
    let mut a = maze_agent(0.25);
    let mut b = maze_agent(0.25);
    for direction in moves {
        let pa = a.step(Some(direction)).unwrap().clone();
        let pb = b.step(Some(direction)).unwrap().clone();
        assert_eq!(pa, pb);
        assert_eq!(a.last_percept(), b.last_percept());
    }
}

#[test]
fn test_step_order_is_move_sense_update() {
    let mut agent = maze_agent(0.0);
    agent.step(Some(Direction::East)).unwrap();
    assert_eq!(agent.true_position(), Coordinate::new(1, 0));
    assert_eq!(
        agent.last_percept(),
        Some(agent.topology().ground_truth_reading(Coordinate::new(1, 0)))
    );
    assert_eq!(agent.tracker().time(), 1);
}

#[test]
fn test_os_seeded_agent() {
    let agent = Agent::new(0.2, GridTopology::reference_maze().unwrap()).unwrap();
    assert!((agent.error_rate() - 0.2).abs() < 1e-12);
    assert_eq!(agent.most_likely_position(), Some(Coordinate::new(0, 0)));
}
