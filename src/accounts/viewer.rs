// region:    --- Imports
use crate::auction::model::User;
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

// endregion: --- Imports

/// 요청한 사용자 (익명 가능)
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub user: Option<User>,
    /// 요청에 포함된 세션 토큰 (만료/무효 토큰 포함)
    pub token: Option<String>,
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Viewer::default());
        };
        let user = state.store.session_user(&token).await?;
        Ok(Viewer {
            user,
            token: Some(token),
        })
    }
}
