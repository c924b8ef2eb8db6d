pub mod gateway;
pub mod outbox;
pub mod sink;
