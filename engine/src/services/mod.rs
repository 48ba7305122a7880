pub mod dashboard;
pub mod report;

pub use dashboard::{DashboardRequest, TrendPipeline};
