//! Station aggregate

pub mod model;
pub mod repository;

pub use model::{ChargerSpec, ChargerType, Location, PriceUnit, Rating, Station, StationStatus};
pub use repository::StationRepository;
