pub mod booking;
pub mod lifecycle;
pub mod reminders;
pub mod replies;
pub mod reports;
pub mod templates;
