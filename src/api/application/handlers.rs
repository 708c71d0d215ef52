use actix_web::{
    patch,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::api::auth::extractor::Authenticated;
use crate::api::error::MarketError;
use crate::api::state::AppState;
use super::dto::{ApplicationResponse, StatusUpdateRequest};

#[patch("/{application_id}/status")]
async fn update_status(
    state: Data<AppState>,
    auth: Authenticated,
    path: Path<String>,
    body: Json<StatusUpdateRequest>,
) -> Result<HttpResponse, MarketError> {
    let application = state
        .applications
        .decide(&auth.user, &path.into_inner(), body.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse {
        message: format!("Postulación {}", application.status),
        application,
    }))
}

pub fn application_config(config: &mut ServiceConfig) {
    config.service(scope("applications").service(update_status));
}
