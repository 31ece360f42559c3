// region:    --- Imports
use crate::accounts::{self, LoginForm, RegisterForm, Viewer};
use crate::auction::model::NewListing;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::listing::commands::{self, ActionOutcome, ListingAction};
use crate::listing::view::{self, ListingCard};
use crate::state::AppState;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

// endregion: --- Imports

// region:    --- Router
/// 경매 서비스 라우터
pub fn routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route(
            "/listing/:id",
            get(handle_get_listing).post(handle_listing_action),
        )
        .route("/categories", get(handle_get_categories))
        .route("/category/:name", get(handle_get_category))
        .route("/watchlist", get(handle_get_watchlist))
        .route("/create", post(handle_create_listing))
        .route("/login", post(handle_login))
        .route("/register", post(handle_register))
        .route("/logout", get(handle_logout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

fn login_redirect() -> Response {
    Redirect::to("/login").into_response()
}

// endregion: --- Router

// region:    --- Command Handlers

/// 리스팅 액션 처리 (관심 목록, 입찰, 댓글, 마감)
pub async fn handle_listing_action(
    State(state): State<AppState>,
    viewer: Viewer,
    ApiPath(listing_id): ApiPath<i64>,
    ApiJson(action): ApiJson<ListingAction>,
) -> Result<Response, AppError> {
    info!(
        "{:<12} --> 리스팅 액션 요청 id: {}, action: {:?}",
        "Handler", listing_id, action
    );
    let store = &*state.store;
    let user = viewer.user.as_ref();

    match commands::handle_listing_action(store, listing_id, user, action).await? {
        ActionOutcome::LoginRequired => Ok(login_redirect()),
        ActionOutcome::Applied => {
            let view = view::get_listing_view(store, listing_id, user, None).await?;
            Ok(Json(view).into_response())
        }
        ActionOutcome::Rejected(message) => {
            let view = view::get_listing_view(store, listing_id, user, Some(message)).await?;
            Ok((StatusCode::BAD_REQUEST, Json(view)).into_response())
        }
    }
}

/// 리스팅 생성
pub async fn handle_create_listing(
    State(state): State<AppState>,
    viewer: Viewer,
    ApiJson(form): ApiJson<NewListing>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 리스팅 생성 요청", "Handler");
    let Some(owner) = viewer.user else {
        return Ok(login_redirect());
    };
    let listing = commands::handle_create_listing(&*state.store, &owner, form).await?;
    Ok((StatusCode::CREATED, Json(ListingCard::new(listing, None))).into_response())
}

/// 회원 가입
pub async fn handle_register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RegisterForm>,
) -> Result<Response, AppError> {
    let session = accounts::register(&*state.store, form).await?;
    Ok((StatusCode::CREATED, Json(session)).into_response())
}

/// 로그인
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginForm>,
) -> Result<Response, AppError> {
    let session = accounts::login(&*state.store, form).await?;
    Ok(Json(session).into_response())
}

/// 로그아웃 후 첫 화면으로
pub async fn handle_logout(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Redirect, AppError> {
    if let Some(token) = viewer.token.as_deref() {
        accounts::logout(&*state.store, token).await?;
    }
    Ok(Redirect::to("/"))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 진행 중인 리스팅 조회
pub async fn handle_index(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("{:<12} --> 진행 중인 리스팅 조회", "HandlerQuery");
    let listings = view::get_active_listings(&*state.store).await?;
    Ok(Json(listings).into_response())
}

/// 리스팅 상세 조회
pub async fn handle_get_listing(
    State(state): State<AppState>,
    viewer: Viewer,
    ApiPath(listing_id): ApiPath<i64>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 리스팅 상세 조회 id: {}", "HandlerQuery", listing_id);
    let view = view::get_listing_view(&*state.store, listing_id, viewer.user.as_ref(), None).await?;
    Ok(Json(view).into_response())
}

/// 카테고리 목록 조회
pub async fn handle_get_categories(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("{:<12} --> 카테고리 목록 조회", "HandlerQuery");
    let categories = view::get_categories(&*state.store).await?;
    Ok(Json(categories).into_response())
}

/// 카테고리별 리스팅 조회
pub async fn handle_get_category(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 카테고리 조회: {}", "HandlerQuery", name);
    let category = view::get_category(&*state.store, &name).await?;
    Ok(Json(category).into_response())
}

/// 관심 목록 조회
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    info!("{:<12} --> 관심 목록 조회", "HandlerQuery");
    let Some(user) = viewer.user else {
        return Ok(login_redirect());
    };
    let listings = view::get_watchlist(&*state.store, &user).await?;
    Ok(Json(listings).into_response())
}

// endregion: --- Query Handlers
