pub mod health;
pub mod metrics;

pub use health::{AppStartTime, HealthService, health_routes};
pub use metrics::{ApiResponse, ErrorCode, api_v1_routes};
