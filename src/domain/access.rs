//! Access rules
//!
//! Single home for the ownership/role checks that used to be duplicated
//! across every operation. Pure predicates, no state.

use crate::domain::account::AccountRole;
use crate::domain::booking::Booking;
use crate::domain::station::Station;

/// Providers manage their own stations; admins manage all of them.
pub fn can_manage_station(account_id: &str, role: &AccountRole, station: &Station) -> bool {
    station.provider_id == account_id || role.is_admin()
}

/// A booking is visible to its owner and to whoever manages its station.
pub fn can_view_booking(
    account_id: &str,
    role: &AccountRole,
    booking: &Booking,
    station: &Station,
) -> bool {
    booking.user_id == account_id || can_manage_station(account_id, role, station)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::booking::{TimeSlot, VehicleInfo};
    use crate::domain::station::{ChargerType, Location, PriceUnit, Rating, StationStatus};

    fn sample_station(provider_id: &str) -> Station {
        Station {
            id: "st-1".into(),
            provider_id: provider_id.into(),
            name: "Plaza".into(),
            description: String::new(),
            location: Location {
                address: String::new(),
                city: String::new(),
                state: String::new(),
                pincode: String::new(),
                latitude: 0.0,
                longitude: 0.0,
            },
            charger_types: Vec::new(),
            price: 0,
            price_unit: PriceUnit::PerKwh,
            status: StationStatus::Active,
            rating: Rating::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_booking(user_id: &str) -> Booking {
        let now = Utc::now();
        Booking::new(
            user_id,
            "st-1",
            ChargerType::Ac,
            TimeSlot::new(now, now + chrono::Duration::hours(1)),
            VehicleInfo {
                make: "BYD".into(),
                model: "Seal".into(),
                battery_capacity_kwh: 61.4,
                current_charge_pct: 30,
                target_charge_pct: 90,
            },
            100,
        )
    }

    #[test]
    fn provider_manages_own_station_only() {
        let station = sample_station("prov-1");
        assert!(can_manage_station("prov-1", &AccountRole::Provider, &station));
        assert!(!can_manage_station("prov-2", &AccountRole::Provider, &station));
    }

    #[test]
    fn admin_manages_any_station() {
        let station = sample_station("prov-1");
        assert!(can_manage_station("someone-else", &AccountRole::Admin, &station));
    }

    #[test]
    fn plain_user_cannot_manage() {
        let station = sample_station("prov-1");
        assert!(!can_manage_station("user-1", &AccountRole::User, &station));
    }

    #[test]
    fn booking_visible_to_owner_provider_and_admin() {
        let station = sample_station("prov-1");
        let booking = sample_booking("user-1");

        assert!(can_view_booking("user-1", &AccountRole::User, &booking, &station));
        assert!(can_view_booking("prov-1", &AccountRole::Provider, &booking, &station));
        assert!(can_view_booking("adm", &AccountRole::Admin, &booking, &station));
        assert!(!can_view_booking("user-2", &AccountRole::User, &booking, &station));
    }
}
