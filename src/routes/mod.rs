pub mod health;
pub mod lunar;
pub mod notifications;
pub mod recurrence;
