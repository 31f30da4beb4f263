//! Booking aggregate

pub mod model;
pub mod repository;

pub use model::{
    Booking, BookingStatus, Payment, PaymentMethod, PaymentStatus, TimeSlot, VehicleInfo,
};
pub use repository::BookingRepository;
