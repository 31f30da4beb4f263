//! Station repository interface

use async_trait::async_trait;

use super::model::Station;
use crate::domain::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Save a new station
    async fn save(&self, station: Station) -> DomainResult<()>;

    /// Find station by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>>;

    /// Update an existing station
    async fn update(&self, station: Station) -> DomainResult<()>;

    /// Write the derived rating aggregate
    async fn update_rating(&self, id: &str, average: f64, count: u32) -> DomainResult<()>;

    /// All stations (any status)
    async fn find_all(&self) -> DomainResult<Vec<Station>>;

    /// Stations owned by a provider
    async fn find_by_provider(&self, provider_id: &str) -> DomainResult<Vec<Station>>;

    /// Total number of stations
    async fn count(&self) -> DomainResult<u64>;
}
