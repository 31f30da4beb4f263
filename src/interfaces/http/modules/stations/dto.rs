//! Station DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::station::{ChargerSpec, ChargerType, Location, PriceUnit, Station};

/// Charger-type descriptor in requests and responses
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct ChargerSpecDto {
    /// "AC", "DC" or "Fast DC"
    #[serde(rename = "type")]
    pub charger_type: String,
    #[validate(range(min = 0.1))]
    pub power_kw: f64,
    #[validate(range(min = 1))]
    pub port_count: u32,
}

impl ChargerSpecDto {
    pub fn to_domain(&self) -> Option<ChargerSpec> {
        Some(ChargerSpec {
            charger_type: ChargerType::parse(&self.charger_type)?,
            power_kw: self.power_kw,
            port_count: self.port_count,
        })
    }

    pub fn from_domain(spec: &ChargerSpec) -> Self {
        Self {
            charger_type: spec.charger_type.as_str().to_string(),
            power_kw: spec.power_kw,
            port_count: spec.port_count,
        }
    }
}

/// Display-only station location
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct LocationDto {
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub pincode: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl LocationDto {
    pub fn to_domain(self) -> Location {
        Location {
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn from_domain(l: &Location) -> Self {
        Self {
            address: l.address.clone(),
            city: l.city.clone(),
            state: l.state.clone(),
            pincode: l.pincode.clone(),
            latitude: l.latitude,
            longitude: l.longitude,
        }
    }
}

/// Request to list a new station
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(nested)]
    pub location: LocationDto,
    #[validate(length(min = 1, message = "at least one charger type is required"), nested)]
    pub charger_types: Vec<ChargerSpecDto>,
    /// Price in minor currency units
    #[validate(range(min = 0))]
    pub price: i64,
    /// "per_kWh" (default) or "per_hour"
    pub price_unit: Option<String>,
}

/// Partial station update; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(nested)]
    pub charger_types: Option<Vec<ChargerSpecDto>>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    pub price_unit: Option<String>,
    /// "active", "inactive" or "maintenance"
    pub status: Option<String>,
}

/// Request to change only the station status
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStationStatusRequest {
    /// "active", "inactive" or "maintenance"
    #[validate(length(min = 1))]
    pub status: String,
}

/// Query params for the public catalog listing
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct StationFilter {
    /// Lifecycle status; defaults to "active" for the public catalog
    pub status: Option<String>,
    pub city: Option<String>,
}

/// Rating aggregate in responses
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingDto {
    pub average: f64,
    pub count: u32,
}

/// Station details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct StationDto {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub description: String,
    pub location: LocationDto,
    pub charger_types: Vec<ChargerSpecDto>,
    pub price: i64,
    pub price_unit: String,
    pub status: String,
    pub rating: RatingDto,
    pub created_at: String,
}

impl StationDto {
    pub fn from_domain(s: Station) -> Self {
        Self {
            id: s.id,
            provider_id: s.provider_id,
            name: s.name,
            description: s.description,
            location: LocationDto::from_domain(&s.location),
            charger_types: s.charger_types.iter().map(ChargerSpecDto::from_domain).collect(),
            price: s.price,
            price_unit: s.price_unit.as_str().to_string(),
            status: s.status.as_str().to_string(),
            rating: RatingDto {
                average: s.rating.average,
                count: s.rating.count,
            },
            created_at: s.created_at.to_rfc3339(),
        }
    }
}
