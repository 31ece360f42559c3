//! 요청 추출기 래퍼
//!
//! axum 기본 추출기의 거부 응답은 평문이므로, `AppError::Validation`으로 바꿔
//! 모든 오류가 `{"error": ...}` JSON 본문을 갖게 한다.

// region:    --- Imports
use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::warn;

// endregion: --- Imports

// region:    --- Rejections
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("{:<12} --> 잘못된 JSON 본문: {}", "Extract", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        warn!("{:<12} --> 잘못된 경로: {}", "Extract", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("{:<12} --> 잘못된 쿼리: {}", "Extract", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}

// endregion: --- Rejections

// region:    --- Extractors
/// JSON 본문
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// 경로 파라미터
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// 쿼리 문자열
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

// endregion: --- Extractors
