pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::booking::BookingService;
pub use services::lifecycle::LifecycleService;
pub use services::reminders::ReminderService;
pub use services::replies::ReplyService;
pub use services::reports::ReportService;
