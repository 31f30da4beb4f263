//! Review aggregate

pub mod model;
pub mod repository;

pub use model::{rating_distribution, CategoryRatings, Review};
pub use repository::ReviewRepository;
