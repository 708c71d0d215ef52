use actix_web::{dev::Payload, http::header, web::Data, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::api::error::MarketError;
use crate::api::state::AppState;
use super::models::{PublicUser, Role};

/// The caller's open session, resolved from `Authorization: Bearer <token>`
///
/// Rejects the request with 401 when the header is missing or the token
/// does not name an open session.
pub struct Authenticated {
    pub token: String,
    pub user: PublicUser,
}

impl Authenticated {
    /// Fail with `Forbidden` unless the caller has `role`
    pub fn require_role(&self, role: Role) -> Result<&PublicUser, MarketError> {
        if self.user.role() == role {
            Ok(&self.user)
        } else {
            Err(MarketError::forbidden(format!("se requiere el rol {role}")))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for Authenticated {
    type Error = MarketError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let (Some(state), Some(token)) = (state, token) else {
                return Err(MarketError::Unauthenticated);
            };
            let user = state
                .identity
                .current_session(&token)
                .await
                .ok_or(MarketError::Unauthenticated)?;
            Ok(Authenticated { token, user })
        })
    }
}
