mod aggregate;
mod dashboard;
mod period;
mod projection;

pub use aggregate::{
    bucket_index, bucket_label, distance_vs_duration, speed_efficiency, time_of_day_counts,
    DistanceDurationPoint, SpeedBucket, SpeedEfficiencyChart, TimeOfDay, TimeOfDayCount,
    SPEED_BUCKET_COUNT, SPEED_BUCKET_WIDTH_KMH,
};
pub use dashboard::Dashboard;
pub use period::Period;
pub use projection::{project, Projection};
