// region:    --- Imports
use super::{AuctionStore, BidOutcome};
use crate::auction::model::{Bid, Comment, Listing, NewListing, User};
use crate::auction::pricing;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::Mutex;

// endregion: --- Imports

// region:    --- In-Memory Auction Store
/// 인메모리 경매 저장소
///
/// 단위 테스트와 DATABASE_URL 없는 로컬 실행용.
/// 모든 연산이 하나의 뮤텍스 아래에서 수행되므로 입찰도 원자적이다.
#[derive(Debug, Default)]
pub struct InMemoryAuctionStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: Vec<User>,
    sessions: HashMap<String, i64>,
    listings: Vec<Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    /// (user_id, listing_id), 추가 순서 유지
    watchlists: Vec<(i64, i64)>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn user(&self, user_id: i64) -> Result<&User, AppError> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn listing_mut(&mut self, listing_id: i64) -> Result<&mut Listing, AppError> {
        self.listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))
    }

    fn highest_bid_amount(&self, listing_id: i64) -> Option<Decimal> {
        self.bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .map(|b| b.amount)
            .max()
    }
}

impl InMemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuctionStore for InMemoryAuctionStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.username == username) {
            return Err(AppError::Conflict("Username already taken.".to_string()));
        }
        let user = User {
            id: state.next_id(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_session(&self, token: &str, user_id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        state.user(user_id)?;
        state.sessions.insert(token.to_string(), user_id);
        Ok(())
    }

    async fn session_user(&self, token: &str) -> Result<Option<User>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .get(token)
            .and_then(|user_id| state.users.iter().find(|u| u.id == *user_id))
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        self.state.lock().await.sessions.remove(token);
        Ok(())
    }

    async fn create_listing(
        &self,
        owner_id: i64,
        listing: NewListing,
    ) -> Result<Listing, AppError> {
        let mut state = self.state.lock().await;
        let owner = state.user(owner_id)?.username.clone();
        let listing = Listing {
            id: state.next_id(),
            title: listing.title,
            description: listing.description,
            image: listing.image.unwrap_or_default(),
            price: listing.price,
            category: listing.category,
            active: true,
            owner_id,
            owner,
            created_at: Utc::now(),
        };
        state.listings.push(listing.clone());
        Ok(listing)
    }

    async fn listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError> {
        let state = self.state.lock().await;
        Ok(state.listings.iter().find(|l| l.id == listing_id).cloned())
    }

    async fn active_listings(&self) -> Result<Vec<Listing>, AppError> {
        let state = self.state.lock().await;
        Ok(state.listings.iter().filter(|l| l.active).cloned().collect())
    }

    async fn active_listings_in_category(
        &self,
        category: &str,
    ) -> Result<Vec<Listing>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .listings
            .iter()
            .filter(|l| l.active && l.category == category)
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        let state = self.state.lock().await;
        let categories: BTreeSet<&str> = state
            .listings
            .iter()
            .map(|l| l.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        Ok(categories.into_iter().map(str::to_string).collect())
    }

    async fn close_listing(&self, listing_id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        state.listing_mut(listing_id)?.active = false;
        Ok(())
    }

    async fn bids(&self, listing_id: i64) -> Result<Vec<Bid>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn highest_bid_amount(&self, listing_id: i64) -> Result<Option<Decimal>, AppError> {
        Ok(self.state.lock().await.highest_bid_amount(listing_id))
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<BidOutcome, AppError> {
        let mut state = self.state.lock().await;
        let bidder = state.user(bidder_id)?.username.clone();
        let listing = state.listing_mut(listing_id)?;
        if !listing.active {
            return Ok(BidOutcome::Closed);
        }
        let starting_price = listing.price;

        let highest = state.highest_bid_amount(listing_id);
        if !pricing::accepts_bid(starting_price, highest, amount) {
            return Ok(BidOutcome::TooLow {
                current_price: pricing::current_price(starting_price, highest),
            });
        }

        let bid = Bid {
            id: state.next_id(),
            listing_id,
            bidder_id,
            bidder,
            amount,
            created_at: Utc::now(),
        };
        state.bids.push(bid.clone());
        Ok(BidOutcome::Placed(bid))
    }

    async fn comments(&self, listing_id: i64) -> Result<Vec<Comment>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, AppError> {
        let mut state = self.state.lock().await;
        let author = state.user(author_id)?.username.clone();
        state.listing_mut(listing_id)?;
        let comment = Comment {
            id: state.next_id(),
            listing_id,
            author_id,
            author,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError> {
        let state = self.state.lock().await;
        Ok(state.watchlists.contains(&(user_id, listing_id)))
    }

    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        state.listing_mut(listing_id)?;
        if !state.watchlists.contains(&(user_id, listing_id)) {
            state.watchlists.push((user_id, listing_id));
        }
        Ok(())
    }

    async fn remove_from_watchlist(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        state.watchlists.retain(|entry| *entry != (user_id, listing_id));
        Ok(())
    }

    async fn watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .watchlists
            .iter()
            .filter(|(watcher, _)| *watcher == user_id)
            .filter_map(|(_, listing_id)| state.listings.iter().find(|l| l.id == *listing_id))
            .cloned()
            .collect())
    }
}
// endregion: --- In-Memory Auction Store
