/// 계정 관련 커맨드 처리
/// 1. 회원 가입
/// 2. 로그인
/// 3. 로그아웃
// region:    --- Imports
use crate::auction::model::User;
use crate::error::AppError;
use crate::store::AuctionStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Modules
pub mod password;
pub mod viewer;

pub use viewer::Viewer;

// endregion: --- Modules

pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 254;

// region:    --- Forms
/// 회원 가입 요청
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

/// 로그인 요청
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// 발급된 세션
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

// endregion: --- Forms

// region:    --- Commands
/// 1. 회원 가입 (성공 시 바로 로그인)
pub async fn register(store: &dyn AuctionStore, form: RegisterForm) -> Result<Session, AppError> {
    info!("{:<12} --> 회원 가입 요청: {}", "Accounts", form.username);
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required.".to_string(),
        ));
    }
    if form.password != form.confirmation {
        return Err(AppError::Validation("Passwords must match.".to_string()));
    }
    let email = form.email.trim();
    check_length("Username", username, MAX_USERNAME_LEN)?;
    check_length("Email", email, MAX_EMAIL_LEN)?;

    let password_hash = password::hash_password(&form.password)?;
    let user = store
        .create_user(username, email, &password_hash)
        .await?;
    start_session(store, user).await
}

/// 2. 로그인
pub async fn login(store: &dyn AuctionStore, form: LoginForm) -> Result<Session, AppError> {
    info!("{:<12} --> 로그인 요청: {}", "Accounts", form.username);
    let user = store
        .find_user_by_username(form.username.trim())
        .await?
        .filter(|user| password::verify_password(&form.password, &user.password_hash));

    match user {
        Some(user) => start_session(store, user).await,
        None => {
            warn!("{:<12} --> 로그인 실패: {}", "Accounts", form.username);
            Err(AppError::Unauthorized(
                "Invalid username and/or password.".to_string(),
            ))
        }
    }
}

/// 3. 로그아웃
pub async fn logout(store: &dyn AuctionStore, token: &str) -> Result<(), AppError> {
    info!("{:<12} --> 로그아웃", "Accounts");
    store.delete_session(token).await
}

/// 컬럼 길이 초과 검사
fn check_length(name: &str, value: &str, max_len: usize) -> Result<(), AppError> {
    if value.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{name} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// 세션 토큰 발급 (32바이트 난수, hex)
async fn start_session(store: &dyn AuctionStore, user: User) -> Result<Session, AppError> {
    let token = hex::encode(rand::random::<[u8; 32]>());
    store.create_session(&token, user.id).await?;
    Ok(Session { token, user })
}

// endregion: --- Commands
