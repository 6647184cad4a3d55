pub mod availability;
pub mod booking;
pub mod calendar;
pub mod codes;
pub mod locks;
pub mod scheduler;
pub mod slots;
pub mod validation;

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use locks::DateLocks;
pub use scheduler::Scheduler;
