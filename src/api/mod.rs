pub mod application;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod job;
pub mod state;
pub mod validation;

use actix_web::web::ServiceConfig;

/// Mount every route of the marketplace API
pub fn routes(config: &mut ServiceConfig) {
    config
        .configure(health::health_config)
        .configure(auth::handlers::auth_config)
        .configure(job::handlers::job_config)
        .configure(application::handlers::application_config)
        .configure(dashboard::handlers::dashboard_config);
}
