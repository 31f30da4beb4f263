//! Health check endpoint

pub mod handlers;
