pub mod application;
pub mod rate_limit;

pub use application::{Application, ApplicationStatus, NewApplication, StatusCounts};
pub use rate_limit::RateLimitWindow;
