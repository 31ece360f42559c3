//! 경매 데이터 저장소
//!
//! 핸들러와 컨트롤러는 `AuctionStore` 트레이트만 사용한다.
//! 운영 환경은 PostgreSQL, 테스트와 로컬 개발은 인메모리 구현을 사용한다.

// region:    --- Imports
use crate::auction::model::{Bid, Comment, Listing, NewListing, User};
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Modules
pub mod in_memory;
pub mod postgres;
mod queries;

pub use in_memory::InMemoryAuctionStore;
pub use postgres::PostgresAuctionStore;

// endregion: --- Modules

// region:    --- Bid Outcome
/// 입찰 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome {
    /// 입찰 저장 완료
    Placed(Bid),
    /// 현재 가격보다 낮거나 같은 입찰
    TooLow { current_price: Decimal },
    /// 이미 마감된 리스팅
    Closed,
}

// endregion: --- Bid Outcome

// region:    --- Auction Store Trait
/// 경매 저장소 트레이트
#[async_trait]
pub trait AuctionStore: Send + Sync {
    // -- 사용자 / 세션

    /// 사용자 생성 (중복 사용자명은 `AppError::Conflict`)
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn create_session(&self, token: &str, user_id: i64) -> Result<(), AppError>;

    async fn session_user(&self, token: &str) -> Result<Option<User>, AppError>;

    async fn delete_session(&self, token: &str) -> Result<(), AppError>;

    // -- 리스팅

    async fn create_listing(&self, owner_id: i64, listing: NewListing)
        -> Result<Listing, AppError>;

    async fn listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError>;

    /// 진행 중인 리스팅 (생성 순)
    async fn active_listings(&self) -> Result<Vec<Listing>, AppError>;

    /// 카테고리가 정확히 일치하는 진행 중인 리스팅
    async fn active_listings_in_category(&self, category: &str)
        -> Result<Vec<Listing>, AppError>;

    /// 비어 있지 않은 카테고리 목록 (중복 제거, 정렬)
    async fn categories(&self) -> Result<Vec<String>, AppError>;

    /// 리스팅 마감 (이미 마감된 경우에도 성공)
    async fn close_listing(&self, listing_id: i64) -> Result<(), AppError>;

    // -- 입찰

    /// 입찰 기록 (입찰 순)
    async fn bids(&self, listing_id: i64) -> Result<Vec<Bid>, AppError>;

    async fn highest_bid_amount(&self, listing_id: i64) -> Result<Option<Decimal>, AppError>;

    /// 입찰 처리
    ///
    /// 가격 검증과 저장은 리스팅 단위로 원자적으로 수행된다.
    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<BidOutcome, AppError>;

    // -- 댓글

    /// 댓글 목록 (작성 순)
    async fn comments(&self, listing_id: i64) -> Result<Vec<Comment>, AppError>;

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, AppError>;

    // -- 관심 목록

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError>;

    /// 관심 목록 추가 (이미 있으면 무시)
    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> Result<(), AppError>;

    /// 관심 목록 제거 (없으면 무시)
    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64)
        -> Result<(), AppError>;

    /// 관심 목록의 모든 리스팅 (마감 포함)
    async fn watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AppError>;
}
// endregion: --- Auction Store Trait
