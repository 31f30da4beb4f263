//! Database entities

pub mod account;
pub mod booking;
pub mod review;
pub mod station;
pub mod wallet;
pub mod wallet_transaction;
