//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::booking::{
    Booking, BookingRepository, BookingStatus, Payment, PaymentMethod, PaymentStatus, TimeSlot,
    VehicleInfo,
};
use crate::domain::station::ChargerType;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

use super::db_err;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Status strings that occupy a slot (pending/confirmed/active)
const BLOCKING_STATUSES: [&str; 3] = ["pending", "confirmed", "active"];

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    let charger_type = ChargerType::parse(&m.charger_type).ok_or_else(|| {
        DomainError::Storage(format!(
            "corrupt charger_type '{}' for booking {}",
            m.charger_type, m.id
        ))
    })?;
    let status = BookingStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Storage(format!("corrupt status '{}' for booking {}", m.status, m.id))
    })?;

    Ok(Booking {
        id: m.id,
        user_id: m.user_id,
        station_id: m.station_id,
        charger_type,
        time_slot: TimeSlot {
            start: m.start_time,
            end: m.end_time,
            duration_minutes: m.duration_minutes,
        },
        vehicle: VehicleInfo {
            make: m.vehicle_make,
            model: m.vehicle_model,
            battery_capacity_kwh: m.battery_capacity_kwh,
            current_charge_pct: m.current_charge_pct,
            target_charge_pct: m.target_charge_pct,
        },
        estimated_cost: m.estimated_cost,
        actual_cost: m.actual_cost,
        payment: Payment {
            amount: m.payment_amount,
            method: PaymentMethod::from_str(&m.payment_method),
            status: PaymentStatus::from_str(&m.payment_status),
        },
        status,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn to_active_model(b: Booking) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(b.id),
        user_id: Set(b.user_id),
        station_id: Set(b.station_id),
        charger_type: Set(b.charger_type.as_str().to_string()),
        start_time: Set(b.time_slot.start),
        end_time: Set(b.time_slot.end),
        duration_minutes: Set(b.time_slot.duration_minutes),
        vehicle_make: Set(b.vehicle.make),
        vehicle_model: Set(b.vehicle.model),
        battery_capacity_kwh: Set(b.vehicle.battery_capacity_kwh),
        current_charge_pct: Set(b.vehicle.current_charge_pct),
        target_charge_pct: Set(b.vehicle.target_charge_pct),
        estimated_cost: Set(b.estimated_cost),
        actual_cost: Set(b.actual_cost),
        payment_amount: Set(b.payment.amount),
        payment_method: Set(b.payment.method.as_str().to_string()),
        payment_status: Set(b.payment.status.as_str().to_string()),
        status: Set(b.status.as_str().to_string()),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn save(&self, b: Booking) -> DomainResult<()> {
        to_active_model(b).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn update(&self, b: Booking) -> DomainResult<()> {
        let existing = booking::Entity::find_by_id(&b.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: b.id,
            });
        }

        to_active_model(b).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_blocking_for_station(&self, station_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::StationId.eq(station_id))
            .filter(booking::Column::Status.is_in(BLOCKING_STATUSES))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_for_station(&self, station_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::StationId.eq(station_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn count(&self) -> DomainResult<u64> {
        booking::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_by_status(&self, status: BookingStatus) -> DomainResult<u64> {
        booking::Entity::find()
            .filter(booking::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
