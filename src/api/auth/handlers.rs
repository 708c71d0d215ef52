use actix_web::{
    get, post,
    web::{scope, Data, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::api::error::MarketError;
use crate::api::state::AppState;
use super::dto::{CurrentSessionResponse, LoginRequest, RegisterRequest, SessionResponse};
use super::extractor::Authenticated;

#[post("/register")]
async fn register(
    state: Data<AppState>,
    body: Json<RegisterRequest>,
) -> Result<HttpResponse, MarketError> {
    let session = state.identity.register(body.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(SessionResponse::new(
        "Usuario registrado exitosamente",
        session,
    )))
}

#[post("/login")]
async fn login(
    state: Data<AppState>,
    body: Json<LoginRequest>,
) -> Result<HttpResponse, MarketError> {
    let session = state.identity.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(SessionResponse::new("Sesión iniciada", session)))
}

#[get("/session")]
async fn current_session(auth: Authenticated) -> HttpResponse {
    HttpResponse::Ok().json(CurrentSessionResponse { user: auth.user })
}

#[post("/logout")]
async fn logout(state: Data<AppState>, auth: Authenticated) -> HttpResponse {
    state.identity.logout(&auth.token).await;
    HttpResponse::NoContent().finish()
}

pub fn auth_config(config: &mut ServiceConfig) {
    config.service(
        scope("auth")
            .service(register)
            .service(login)
            .service(current_session)
            .service(logout),
    );
}
