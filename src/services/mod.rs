pub mod recurrence;
pub mod yearly_batch;

pub use recurrence::RecurrenceResolver;
pub use yearly_batch::{BatchReport, ScheduledNotification, YearlyBatch};
