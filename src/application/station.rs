//! Provider station management
//!
//! Thin CRUD around the station catalog: enough for providers to list and
//! maintain stations and for the booking core to resolve them. Discovery
//! extras (geo radius search, amenity filters) stay out of the core.

use std::sync::Arc;

use tracing::info;

use crate::domain::access::can_manage_station;
use crate::domain::account::AccountRole;
use crate::domain::station::{
    ChargerSpec, Location, PriceUnit, Rating, Station, StationStatus,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

use super::{paginate, Requester};

/// Parameters for a new station
#[derive(Debug, Clone)]
pub struct NewStation {
    pub name: String,
    pub description: String,
    pub location: Location,
    pub charger_types: Vec<ChargerSpec>,
    pub price: i64,
    pub price_unit: PriceUnit,
}

/// Partial station update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct StationUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub charger_types: Option<Vec<ChargerSpec>>,
    pub price: Option<i64>,
    pub price_unit: Option<PriceUnit>,
    pub status: Option<StationStatus>,
}

/// Service for station operations
pub struct StationService {
    repos: Arc<dyn RepositoryProvider>,
}

impl StationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// List a new station owned by the requesting provider.
    pub async fn create(&self, requester: &Requester, new: NewStation) -> DomainResult<Station> {
        if !matches!(requester.role, AccountRole::Provider | AccountRole::Admin) {
            return Err(DomainError::Forbidden(
                "only providers can list stations".to_string(),
            ));
        }
        validate_station_shape(&new.charger_types, new.price)?;

        let now = chrono::Utc::now();
        let station = Station {
            id: uuid::Uuid::new_v4().to_string(),
            provider_id: requester.id.clone(),
            name: new.name,
            description: new.description,
            location: new.location,
            charger_types: new.charger_types,
            price: new.price,
            price_unit: new.price_unit,
            status: StationStatus::Active,
            rating: Rating::default(),
            created_at: now,
            updated_at: now,
        };
        self.repos.stations().save(station.clone()).await?;

        info!(station_id = %station.id, provider_id = %station.provider_id, "Station listed");
        Ok(station)
    }

    /// Public station lookup.
    pub async fn get(&self, station_id: &str) -> DomainResult<Station> {
        self.repos
            .stations()
            .find_by_id(station_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.to_string(),
            })
    }

    /// Public catalog listing, newest-first, optionally filtered by status
    /// and city.
    pub async fn list(
        &self,
        status: Option<StationStatus>,
        city: Option<&str>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Station>, u64)> {
        let mut stations = self.repos.stations().find_all().await?;
        if let Some(status) = status {
            stations.retain(|s| s.status == status);
        }
        if let Some(city) = city {
            stations.retain(|s| s.location.city.eq_ignore_ascii_case(city));
        }
        stations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(stations, page, limit))
    }

    /// Stations owned by the requesting provider.
    pub async fn list_for_provider(&self, provider_id: &str) -> DomainResult<Vec<Station>> {
        let mut stations = self.repos.stations().find_by_provider(provider_id).await?;
        stations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stations)
    }

    /// Update station details; owner or admin only.
    pub async fn update(
        &self,
        requester: &Requester,
        station_id: &str,
        update: StationUpdate,
    ) -> DomainResult<Station> {
        let mut station = self.get(station_id).await?;
        if !can_manage_station(&requester.id, &requester.role, &station) {
            return Err(DomainError::Forbidden(
                "not allowed to manage this station".to_string(),
            ));
        }

        if let Some(name) = update.name {
            station.name = name;
        }
        if let Some(description) = update.description {
            station.description = description;
        }
        if let Some(charger_types) = update.charger_types {
            station.charger_types = charger_types;
        }
        if let Some(price) = update.price {
            station.price = price;
        }
        if let Some(price_unit) = update.price_unit {
            station.price_unit = price_unit;
        }
        if let Some(status) = update.status {
            station.status = status;
        }
        validate_station_shape(&station.charger_types, station.price)?;

        station.updated_at = chrono::Utc::now();
        self.repos.stations().update(station.clone()).await?;
        Ok(station)
    }

    /// Shorthand for status-only changes (maintenance windows etc.).
    pub async fn set_status(
        &self,
        requester: &Requester,
        station_id: &str,
        status: StationStatus,
    ) -> DomainResult<Station> {
        self.update(
            requester,
            station_id,
            StationUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }
}

fn validate_station_shape(charger_types: &[ChargerSpec], price: i64) -> DomainResult<()> {
    if charger_types.is_empty() {
        return Err(DomainError::Validation(
            "station must offer at least one charger type".to_string(),
        ));
    }
    if charger_types.iter().any(|c| c.port_count == 0) {
        return Err(DomainError::Validation(
            "charger port_count must be at least 1".to_string(),
        ));
    }
    if price < 0 {
        return Err(DomainError::Validation("price must not be negative".to_string()));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::ChargerType;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn service() -> StationService {
        StationService::new(Arc::new(InMemoryRepositoryProvider::new()))
    }

    fn new_station(name: &str, city: &str) -> NewStation {
        NewStation {
            name: name.into(),
            description: "test".into(),
            location: Location {
                address: "street".into(),
                city: city.into(),
                state: "state".into(),
                pincode: "000".into(),
                latitude: 0.0,
                longitude: 0.0,
            },
            charger_types: vec![ChargerSpec {
                charger_type: ChargerType::Ac,
                power_kw: 11.0,
                port_count: 2,
            }],
            price: 2000,
            price_unit: PriceUnit::PerKwh,
        }
    }

    #[tokio::test]
    async fn providers_create_stations_users_do_not() {
        let svc = service();
        let provider = Requester::new("prov-1", AccountRole::Provider);
        let station = svc.create(&provider, new_station("A", "Tashkent")).await.unwrap();
        assert_eq!(station.provider_id, "prov-1");
        assert_eq!(station.status, StationStatus::Active);

        let user = Requester::new("user-1", AccountRole::User);
        let err = svc.create(&user, new_station("B", "Tashkent")).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn station_shape_is_validated() {
        let svc = service();
        let provider = Requester::new("prov-1", AccountRole::Provider);

        let mut bad = new_station("A", "Tashkent");
        bad.charger_types.clear();
        assert!(svc.create(&provider, bad).await.is_err());

        let mut bad = new_station("A", "Tashkent");
        bad.charger_types[0].port_count = 0;
        assert!(svc.create(&provider, bad).await.is_err());

        let mut bad = new_station("A", "Tashkent");
        bad.price = -1;
        assert!(svc.create(&provider, bad).await.is_err());
    }

    #[tokio::test]
    async fn listing_filters_by_status_and_city() {
        let svc = service();
        let provider = Requester::new("prov-1", AccountRole::Provider);
        let a = svc.create(&provider, new_station("A", "Tashkent")).await.unwrap();
        svc.create(&provider, new_station("B", "Samarkand")).await.unwrap();
        svc.set_status(&provider, &a.id, StationStatus::Maintenance).await.unwrap();

        let (active, total) = svc
            .list(Some(StationStatus::Active), None, 1, 50)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(active[0].name, "B");

        let (in_city, total) = svc.list(None, Some("tashkent"), 1, 50).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(in_city[0].name, "A");
    }

    #[tokio::test]
    async fn update_is_guarded_by_ownership() {
        let svc = service();
        let provider = Requester::new("prov-1", AccountRole::Provider);
        let station = svc.create(&provider, new_station("A", "Tashkent")).await.unwrap();

        let stranger = Requester::new("prov-2", AccountRole::Provider);
        let err = svc
            .update(
                &stranger,
                &station.id,
                StationUpdate {
                    price: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let admin = Requester::new("adm", AccountRole::Admin);
        let updated = svc
            .update(
                &admin,
                &station.id,
                StationUpdate {
                    price: Some(1800),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 1800);
    }
}
