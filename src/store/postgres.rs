// region:    --- Imports
use super::queries;
use super::{AuctionStore, BidOutcome};
use crate::auction::model::{Bid, Comment, Listing, NewListing, User};
use crate::auction::pricing;
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Postgres Auction Store
/// PostgreSQL 경매 저장소
pub struct PostgresAuctionStore {
    pool: Arc<PgPool>,
}

impl PostgresAuctionStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// 중복 사용자명 오류 변환
fn map_user_insert_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Username already taken.".to_string())
        }
        other => AppError::Database(other),
    }
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        info!("{:<12} --> 사용자 생성: {}", "Store", username);
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&*self.pool)
            .await
            .map_err(map_user_insert_error)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(&*self.pool)
            .await?)
    }

    async fn create_session(&self, token: &str, user_id: i64) -> Result<(), AppError> {
        sqlx::query(queries::INSERT_SESSION)
            .bind(token)
            .bind(user_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn session_user(&self, token: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_SESSION_USER)
            .bind(token)
            .fetch_optional(&*self.pool)
            .await?)
    }

    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query(queries::DELETE_SESSION)
            .bind(token)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn create_listing(
        &self,
        owner_id: i64,
        listing: NewListing,
    ) -> Result<Listing, AppError> {
        info!("{:<12} --> 리스팅 생성: {}", "Store", listing.title);
        Ok(sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.image.unwrap_or_default())
            .bind(listing.price)
            .bind(&listing.category)
            .bind(owner_id)
            .fetch_one(&*self.pool)
            .await?)
    }

    async fn listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(&*self.pool)
            .await?)
    }

    async fn active_listings(&self) -> Result<Vec<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS)
            .fetch_all(&*self.pool)
            .await?)
    }

    async fn active_listings_in_category(
        &self,
        category: &str,
    ) -> Result<Vec<Listing>, AppError> {
        Ok(
            sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS_IN_CATEGORY)
                .bind(category)
                .fetch_all(&*self.pool)
                .await?,
        )
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(queries::GET_CATEGORIES)
            .fetch_all(&*self.pool)
            .await?)
    }

    async fn close_listing(&self, listing_id: i64) -> Result<(), AppError> {
        info!("{:<12} --> 리스팅 마감 id: {}", "Store", listing_id);
        sqlx::query(queries::CLOSE_LISTING)
            .bind(listing_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn bids(&self, listing_id: i64) -> Result<Vec<Bid>, AppError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_BIDS)
            .bind(listing_id)
            .fetch_all(&*self.pool)
            .await?)
    }

    async fn highest_bid_amount(&self, listing_id: i64) -> Result<Option<Decimal>, AppError> {
        Ok(
            sqlx::query_scalar::<_, Option<Decimal>>(queries::GET_HIGHEST_BID)
                .bind(listing_id)
                .fetch_one(&*self.pool)
                .await?,
        )
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<BidOutcome, AppError> {
        info!(
            "{:<12} --> 입찰 처리 listing: {}, bidder: {}, amount: {}",
            "Store", listing_id, bidder_id, amount
        );

        // 트랜잭션 시작 (리스팅 행 잠금으로 동시 입찰 직렬화)
        let mut tx = self.pool.begin().await?;

        let Some(row) = sqlx::query(queries::LOCK_LISTING)
            .bind(listing_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Err(AppError::NotFound("Listing not found".to_string()));
        };
        let starting_price: Decimal = row.try_get("price")?;
        let active: bool = row.try_get("active")?;

        if !active {
            tx.rollback().await?;
            return Ok(BidOutcome::Closed);
        }

        let highest = sqlx::query_scalar::<_, Option<Decimal>>(queries::GET_HIGHEST_BID)
            .bind(listing_id)
            .fetch_one(&mut *tx)
            .await?;

        if !pricing::accepts_bid(starting_price, highest, amount) {
            tx.rollback().await?;
            return Ok(BidOutcome::TooLow {
                current_price: pricing::current_price(starting_price, highest),
            });
        }

        let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
            .bind(listing_id)
            .bind(bidder_id)
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?;

        // 트랜잭션 커밋
        tx.commit().await?;
        Ok(BidOutcome::Placed(bid))
    }

    async fn comments(&self, listing_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_COMMENTS)
            .bind(listing_id)
            .fetch_all(&*self.pool)
            .await?)
    }

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, AppError> {
        Ok(sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(listing_id)
            .bind(author_id)
            .bind(text)
            .fetch_one(&*self.pool)
            .await?)
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(queries::IS_WATCHING)
            .bind(user_id)
            .bind(listing_id)
            .fetch_one(&*self.pool)
            .await?)
    }

    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> Result<(), AppError> {
        sqlx::query(queries::INSERT_WATCHLIST)
            .bind(user_id)
            .bind(listing_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn remove_from_watchlist(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> Result<(), AppError> {
        sqlx::query(queries::DELETE_WATCHLIST)
            .bind(user_id)
            .bind(listing_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_WATCHLIST)
            .bind(user_id)
            .fetch_all(&*self.pool)
            .await?)
    }
}
// endregion: --- Postgres Auction Store
