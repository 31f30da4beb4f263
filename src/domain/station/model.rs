//! Station domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Charging hardware category offered by a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargerType {
    #[serde(rename = "AC")]
    Ac,
    #[serde(rename = "DC")]
    Dc,
    #[serde(rename = "Fast DC")]
    FastDc,
}

impl ChargerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ac => "AC",
            Self::Dc => "DC",
            Self::FastDc => "Fast DC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AC" => Some(Self::Ac),
            "DC" => Some(Self::Dc),
            "Fast DC" => Some(Self::FastDc),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChargerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pricing unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceUnit {
    PerKwh,
    PerHour,
}

impl Default for PriceUnit {
    fn default() -> Self {
        Self::PerKwh
    }
}

impl PriceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerKwh => "per_kWh",
            Self::PerHour => "per_hour",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "per_hour" => Self::PerHour,
            _ => Self::PerKwh,
        }
    }
}

/// Station lifecycle status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationStatus {
    Active,
    Inactive,
    Maintenance,
}

impl Default for StationStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "inactive" => Self::Inactive,
            "maintenance" => Self::Maintenance,
            _ => Self::Active,
        }
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One charger-type descriptor: hardware category, power rating, port count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargerSpec {
    #[serde(rename = "type")]
    pub charger_type: ChargerType,
    /// Rated power in kW
    pub power_kw: f64,
    /// Number of physical ports of this type
    pub port_count: u32,
}

/// Display-only location data (no geo-queries in the core)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Derived rating aggregate: a cache of the review set, recomputed on
/// every review write, never incremented in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rating {
    /// Mean rating rounded half-up to one decimal; 0.0 when unreviewed
    pub average: f64,
    pub count: u32,
}

impl Rating {
    /// Recompute the aggregate from the full set of ratings.
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }
        let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
        let mean = sum as f64 / ratings.len() as f64;
        Self {
            // f64::round is half-away-from-zero, i.e. half-up for the
            // non-negative ratings we hold.
            average: (mean * 10.0).round() / 10.0,
            count: ratings.len() as u32,
        }
    }
}

/// Charging station listed by a provider
#[derive(Debug, Clone)]
pub struct Station {
    pub id: String,
    /// Owning provider account ID
    pub provider_id: String,
    pub name: String,
    pub description: String,
    pub location: Location,
    pub charger_types: Vec<ChargerSpec>,
    /// Price in minor currency units
    pub price: i64,
    pub price_unit: PriceUnit,
    pub status: StationStatus,
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    pub fn is_active(&self) -> bool {
        self.status == StationStatus::Active
    }

    /// Whether the station offers the given charger category at all
    pub fn supports_charger(&self, charger_type: &ChargerType) -> bool {
        self.charger_types
            .iter()
            .any(|spec| &spec.charger_type == charger_type)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_station() -> Station {
        Station {
            id: "st-1".into(),
            provider_id: "prov-1".into(),
            name: "GreenVolt Plaza".into(),
            description: "Four-bay charging plaza".into(),
            location: Location {
                address: "1 Ring Road".into(),
                city: "Tashkent".into(),
                state: "Tashkent".into(),
                pincode: "100000".into(),
                latitude: 41.31,
                longitude: 69.25,
            },
            charger_types: vec![
                ChargerSpec {
                    charger_type: ChargerType::Ac,
                    power_kw: 7.4,
                    port_count: 2,
                },
                ChargerSpec {
                    charger_type: ChargerType::FastDc,
                    power_kw: 60.0,
                    port_count: 1,
                },
            ],
            price: 2500,
            price_unit: PriceUnit::PerKwh,
            status: StationStatus::Active,
            rating: Rating::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn supports_only_listed_charger_types() {
        let s = sample_station();
        assert!(s.supports_charger(&ChargerType::Ac));
        assert!(s.supports_charger(&ChargerType::FastDc));
        assert!(!s.supports_charger(&ChargerType::Dc));
    }

    #[test]
    fn inactive_station_is_not_active() {
        let mut s = sample_station();
        assert!(s.is_active());
        s.status = StationStatus::Maintenance;
        assert!(!s.is_active());
    }

    #[test]
    fn rating_from_empty_set_is_zero() {
        assert_eq!(Rating::from_ratings(&[]), Rating { average: 0.0, count: 0 });
    }

    #[test]
    fn rating_mean_rounds_half_up_to_one_decimal() {
        // 4 + 5 + 5 = 14 / 3 = 4.666… → 4.7
        let r = Rating::from_ratings(&[4, 5, 5]);
        assert_eq!(r.average, 4.7);
        assert_eq!(r.count, 3);

        // 4.25 → 4.3 (half-up)
        let r = Rating::from_ratings(&[4, 4, 4, 5]);
        assert_eq!(r.average, 4.3);
    }

    #[test]
    fn charger_type_parse_roundtrip() {
        for t in &[ChargerType::Ac, ChargerType::Dc, ChargerType::FastDc] {
            assert_eq!(ChargerType::parse(t.as_str()).as_ref(), Some(t));
        }
        assert!(ChargerType::parse("Tesla").is_none());
    }

    #[test]
    fn status_roundtrip() {
        for s in &[
            StationStatus::Active,
            StationStatus::Inactive,
            StationStatus::Maintenance,
        ] {
            assert_eq!(&StationStatus::from_str(s.as_str()), s);
        }
    }
}
