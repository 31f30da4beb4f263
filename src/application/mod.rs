//! Application layer: the marketplace use cases
//!
//! - `wallet`: stored-value ledger (credit/debit/top-up)
//! - `availability`: slot conflict detection
//! - `booking`: booking state machine driving wallet + availability
//! - `review`: review creation and station rating aggregation
//! - `station`: provider station management
//! - `admin`: aggregate platform metrics

pub mod admin;
pub mod availability;
pub mod booking;
pub mod review;
pub mod station;
pub mod wallet;

pub use admin::{AdminService, DashboardStats};
pub use availability::AvailabilityService;
pub use booking::{BookingPolicy, BookingService, NewBooking};
pub use review::{NewReview, ReviewListing, ReviewService};
pub use station::{NewStation, StationService, StationUpdate};
pub use wallet::{TopupReceipt, WalletService};

use crate::domain::account::AccountRole;

/// Authenticated caller identity, resolved by the HTTP layer before any
/// core operation runs.
#[derive(Debug, Clone)]
pub struct Requester {
    pub id: String,
    pub role: AccountRole,
}

impl Requester {
    pub fn new(id: impl Into<String>, role: AccountRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Slice a sorted collection into a 1-based page, returning the slice and
/// the pre-slice total.
pub(crate) fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let page = page.max(1);
    let start = ((page - 1) * limit) as usize;
    let items = items
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();
    (items, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_and_counts() {
        let (items, total) = paginate((1..=10).collect(), 2, 3);
        assert_eq!(items, vec![4, 5, 6]);
        assert_eq!(total, 10);
    }

    #[test]
    fn paginate_page_zero_behaves_like_first() {
        let (items, total) = paginate((1..=4).collect(), 0, 10);
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(total, 4);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let (items, total) = paginate((1..=4).collect(), 9, 10);
        assert!(items.is_empty());
        assert_eq!(total, 4);
    }
}
