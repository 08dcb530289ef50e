//! Records owned by the event store. The core only reads them.

pub mod event;
pub mod notification_settings;

pub use self::event::*;
pub use self::notification_settings::*;
