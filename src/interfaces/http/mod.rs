//! HTTP REST API
//!
//! - `common`: response envelope, pagination, validated JSON extractor
//! - `middleware`: JWT authentication middleware
//! - `modules`: request handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiContext};
