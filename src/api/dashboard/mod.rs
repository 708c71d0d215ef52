pub mod dto;
pub mod handlers;
pub mod service;

pub use dto::ClientJob;
pub use service::DashboardService;
