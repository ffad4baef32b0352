mod schedule;

pub use schedule::{Schedule, ScheduleStatus, ScheduleWithProject, SCHEDULE_COLUMNS};
