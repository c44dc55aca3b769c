pub mod range;
pub mod summary;
pub mod trip;

pub use range::DateRange;
pub use summary::PeriodSummary;
pub use trip::{format_date, format_time, TripDraft, TripRecord, DATE_FORMAT, TIME_FORMAT};
