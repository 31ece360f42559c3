// region:    --- Imports
use super::markdown;
use super::store::{Entry, EntryStore};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

// endregion: --- Imports

// region:    --- State & Pages
/// 위키 서비스 공유 상태
#[derive(Clone)]
pub struct WikiState {
    pub entries: Arc<EntryStore>,
}

impl WikiState {
    pub fn new(entries: EntryStore) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }
}

/// 문서 화면
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPage {
    pub title: String,
    pub content: String,
    pub html: String,
}

impl From<Entry> for EntryPage {
    fn from(entry: Entry) -> Self {
        Self {
            html: markdown::render(&entry.content),
            title: entry.title,
            content: entry.content,
        }
    }
}

/// 문서 목록 화면
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexPage {
    pub title: String,
    pub entries: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub q: Option<String>,
    pub random: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditParams {
    pub title: String,
}

/// 문서 작성/수정 요청
#[derive(Debug, Deserialize)]
pub struct EntryForm {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

fn page_not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}

/// 경로 세그먼트용 퍼센트 인코딩 (RFC 3986 unreserved 외 모두 인코딩)
fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(char::from(byte))
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

// endregion: --- State & Pages

// region:    --- Router
/// 위키 서비스 라우터
pub fn routes(state: WikiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/wiki/:title", get(handle_get_entry))
        .route("/new", post(handle_new_entry))
        .route("/edit", get(handle_get_edit).post(handle_edit_entry))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// endregion: --- Router

// region:    --- Handlers

/// 문서 목록, 검색, 임의 문서
pub async fn handle_index(
    State(state): State<WikiState>,
    ApiQuery(params): ApiQuery<IndexParams>,
) -> Result<Response, AppError> {
    if params.random.is_some() {
        info!("{:<12} --> 임의 문서 요청", "Wiki");
        let title = state
            .entries
            .random_title()
            .await?
            .ok_or_else(page_not_found)?;
        return Ok(Redirect::to(&format!("/wiki/{}", encode_path_segment(&title))).into_response());
    }

    if let Some(query) = params.q.filter(|q| !q.trim().is_empty()) {
        info!("{:<12} --> 문서 검색: {}", "Wiki", query);
        if let Some(entry) = state.entries.get_entry(&query).await? {
            return Ok(Json(EntryPage::from(entry)).into_response());
        }
        let page = IndexPage {
            title: "Search Results".to_string(),
            entries: state.entries.search(&query).await?,
        };
        return Ok(Json(page).into_response());
    }

    info!("{:<12} --> 전체 문서 목록", "Wiki");
    let page = IndexPage {
        title: "All Pages".to_string(),
        entries: state.entries.list_entries().await?,
    };
    Ok(Json(page).into_response())
}

/// 문서 조회
pub async fn handle_get_entry(
    State(state): State<WikiState>,
    ApiPath(title): ApiPath<String>,
) -> Result<Json<EntryPage>, AppError> {
    info!("{:<12} --> 문서 조회: {}", "Wiki", title);
    let entry = state
        .entries
        .get_entry(&title)
        .await?
        .ok_or_else(page_not_found)?;
    Ok(Json(entry.into()))
}

/// 새 문서 작성 (같은 제목이 있으면 거부)
pub async fn handle_new_entry(
    State(state): State<WikiState>,
    ApiJson(form): ApiJson<EntryForm>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 새 문서 작성: {}", "Wiki", form.title);
    if state.entries.find_title(&form.title).await?.is_some() {
        return Err(AppError::Conflict("Page already exists".to_string()));
    }
    let entry = state.entries.save_entry(&form.title, &form.content).await?;
    Ok((StatusCode::CREATED, Json(EntryPage::from(entry))).into_response())
}

/// 수정할 문서 원문 조회
pub async fn handle_get_edit(
    State(state): State<WikiState>,
    ApiQuery(params): ApiQuery<EditParams>,
) -> Result<Json<Entry>, AppError> {
    info!("{:<12} --> 수정할 문서 조회: {}", "Wiki", params.title);
    let entry = state
        .entries
        .get_entry(&params.title)
        .await?
        .ok_or_else(page_not_found)?;
    Ok(Json(entry))
}

/// 문서 수정
pub async fn handle_edit_entry(
    State(state): State<WikiState>,
    ApiJson(form): ApiJson<EntryForm>,
) -> Result<Json<EntryPage>, AppError> {
    info!("{:<12} --> 문서 수정: {}", "Wiki", form.title);
    if form.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }
    let entry = state.entries.save_entry(&form.title, &form.content).await?;
    Ok(Json(entry.into()))
}

// endregion: --- Handlers
