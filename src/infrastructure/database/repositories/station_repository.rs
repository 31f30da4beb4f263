//! SeaORM implementation of StationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::station::{
    ChargerSpec, Location, PriceUnit, Rating, Station, StationRepository, StationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::station;

use super::db_err;

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: station::Model) -> DomainResult<Station> {
    let charger_types: Vec<ChargerSpec> = serde_json::from_str(&m.charger_types)
        .map_err(|e| DomainError::Storage(format!("corrupt charger_types for {}: {}", m.id, e)))?;

    Ok(Station {
        id: m.id,
        provider_id: m.provider_id,
        name: m.name,
        description: m.description,
        location: Location {
            address: m.address,
            city: m.city,
            state: m.state,
            pincode: m.pincode,
            latitude: m.latitude,
            longitude: m.longitude,
        },
        charger_types,
        price: m.price,
        price_unit: PriceUnit::from_str(&m.price_unit),
        status: StationStatus::from_str(&m.status),
        rating: Rating {
            average: m.rating_average,
            count: m.rating_count.max(0) as u32,
        },
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn to_active_model(s: Station) -> DomainResult<station::ActiveModel> {
    let charger_types = serde_json::to_string(&s.charger_types)
        .map_err(|e| DomainError::Storage(format!("cannot encode charger_types: {}", e)))?;

    Ok(station::ActiveModel {
        id: Set(s.id),
        provider_id: Set(s.provider_id),
        name: Set(s.name),
        description: Set(s.description),
        address: Set(s.location.address),
        city: Set(s.location.city),
        state: Set(s.location.state),
        pincode: Set(s.location.pincode),
        latitude: Set(s.location.latitude),
        longitude: Set(s.location.longitude),
        charger_types: Set(charger_types),
        price: Set(s.price),
        price_unit: Set(s.price_unit.as_str().to_string()),
        status: Set(s.status.as_str().to_string()),
        rating_average: Set(s.rating.average),
        rating_count: Set(s.rating.count as i32),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    })
}

// ── StationRepository impl ──────────────────────────────────────

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn save(&self, s: Station) -> DomainResult<()> {
        to_active_model(s)?.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn update(&self, s: Station) -> DomainResult<()> {
        let existing = station::Entity::find_by_id(&s.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: s.id,
            });
        }

        to_active_model(s)?.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update_rating(&self, id: &str, average: f64, count: u32) -> DomainResult<()> {
        let existing = station::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: station::ActiveModel = existing.into();
        active.rating_average = Set(average);
        active.rating_count = Set(count as i32);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .order_by_desc(station::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_by_provider(&self, provider_id: &str) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .filter(station::Column::ProviderId.eq(provider_id))
            .order_by_desc(station::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn count(&self) -> DomainResult<u64> {
        station::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
