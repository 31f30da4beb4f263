//! Create bookings table
//!
//! Time slot, vehicle info and payment are embedded columns.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_accounts::Accounts;
use super::m20250301_000002_create_stations::Stations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::UserId).string().not_null())
                    .col(ColumnDef::new(Bookings::StationId).string().not_null())
                    .col(ColumnDef::new(Bookings::ChargerType).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::DurationMinutes)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::VehicleMake).string().not_null())
                    .col(ColumnDef::new(Bookings::VehicleModel).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::BatteryCapacityKwh)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::CurrentChargePct)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::TargetChargePct)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EstimatedCost)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::ActualCost)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentMethod)
                            .string()
                            .not_null()
                            .default("wallet"),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_station")
                            .from(Bookings::Table, Bookings::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The availability checker scans a station's non-terminal bookings.
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_station_status")
                    .table(Bookings::Table)
                    .col(Bookings::StationId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_start_time")
                    .table(Bookings::Table)
                    .col(Bookings::StartTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    UserId,
    StationId,
    ChargerType,
    StartTime,
    EndTime,
    DurationMinutes,
    VehicleMake,
    VehicleModel,
    BatteryCapacityKwh,
    CurrentChargePct,
    TargetChargePct,
    EstimatedCost,
    ActualCost,
    PaymentAmount,
    PaymentMethod,
    PaymentStatus,
    Status,
    CreatedAt,
    UpdatedAt,
}
