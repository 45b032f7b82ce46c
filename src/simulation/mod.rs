pub mod agent;
pub mod environment;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod params;
pub mod sensor;

pub use agent::Agent;
pub use environment::{Coordinate, Direction, GridTopology};
pub use error::{LocalizationError, Result};
pub use sensor::{SensorModel, SensorReading};
