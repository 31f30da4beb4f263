//! Account aggregate

pub mod model;
pub mod repository;

pub use model::{Account, AccountRole};
pub use repository::AccountRepository;
