//! Booking entity
//!
//! Time slot, vehicle info and payment are embedded columns: they have no
//! lifecycle of their own outside the booking.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,
    pub station_id: String,

    /// Requested charger category: AC, DC, Fast DC
    pub charger_type: String,

    // Time slot (half-open interval)
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub duration_minutes: i64,

    // Vehicle charge parameters
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub battery_capacity_kwh: f64,
    pub current_charge_pct: i32,
    pub target_charge_pct: i32,

    /// Quoted cost in minor currency units
    pub estimated_cost: i64,
    /// Metered cost; 0 until session completion
    pub actual_cost: i64,

    // Payment sub-record
    pub payment_amount: i64,
    /// wallet, card
    pub payment_method: String,
    /// pending, completed, failed, refunded
    pub payment_status: String,

    /// pending, confirmed, active, completed, cancelled
    pub status: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::UserId",
        to = "super::account::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
