// staffing-backend/src/middleware/auth.rs

use crate::domain::identity::CallerIdentity;
use crate::error::AppError;
use crate::logging::RequestContext;
use crate::service::identity_service::IdentityProvider;
use crate::utils::jwt::{JwtError, JwtManager};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// JWT マネージャーを提供するトレイト
pub trait HasJwtManager {
    fn jwt_manager(&self) -> &Arc<JwtManager>;
}

/// 識別情報の解決手段を提供するトレイト
pub trait HasIdentityProvider {
    fn identity_provider(&self) -> &Arc<dyn IdentityProvider>;
}

/// 認証済みの呼び出し元
///
/// ロールはトークンではなくディレクトリから毎回解決する。
#[derive(Debug, Clone)]
pub struct Caller(pub CallerIdentity);

impl Caller {
    pub fn identity(&self) -> &CallerIdentity {
        &self.0
    }
}

/// Authorization ヘッダーから Bearer トークンを取り出す
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for Caller
where
    S: HasJwtManager + HasIdentityProvider + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            warn!("Authentication attempt without token");
            AppError::Unauthorized("Missing authentication token".to_string())
        })?;

        let claims = state
            .jwt_manager()
            .verify_access_token(token)
            .map_err(|e| {
                warn!(error = %e, "JWT verification failed");
                match e {
                    JwtError::TokenExpired => {
                        AppError::Unauthorized("Access token has expired".to_string())
                    }
                    _ => AppError::Unauthorized("Invalid access token".to_string()),
                }
            })?;

        let user_id = claims
            .user_id()
            .map_err(|_| AppError::Unauthorized("Invalid access token".to_string()))?;

        let identity = state.identity_provider().resolve(user_id).await?;

        if let Some(context) = parts.extensions.get::<RequestContext>() {
            context.record_user(user_id);
        }

        debug!(user_id = %user_id, "Caller authenticated");

        Ok(Caller(identity))
    }
}
