//! One system per event kind. Each reads [`crate::clock::CurrentEvent`],
//! mutates rider/driver/dispatcher state and schedules its follow-up events.

pub mod cancellation;
pub mod driver_request;
pub mod dropoff;
pub mod pickup;
pub mod rider_request;

pub use cancellation::cancellation_system;
pub use driver_request::driver_request_system;
pub use dropoff::dropoff_system;
pub use pickup::pickup_system;
pub use rider_request::rider_request_system;
