//! 리스팅 조회 모델
//!
//! 조회마다 새로 계산되며 저장되지 않는다.

// region:    --- Imports
use crate::auction::model::{Comment, Listing, User};
use crate::auction::pricing;
use crate::error::AppError;
use crate::store::AuctionStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Listing View
/// 최고 입찰 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestBid {
    pub amount: Decimal,
    pub bidder: String,
}

/// 리스팅 상세 화면 상태
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingView {
    pub listing: Listing,
    pub current_price: Decimal,
    pub highest_bid: Option<HighestBid>,
    pub bid_count: usize,
    pub comments: Vec<Comment>,
    pub watchlisted: bool,
    pub owner: bool,
    pub error: Option<String>,
}

/// 리스팅 상세 조회
pub async fn get_listing_view(
    store: &dyn AuctionStore,
    listing_id: i64,
    viewer: Option<&User>,
    error: Option<String>,
) -> Result<ListingView, AppError> {
    info!("{:<12} --> 리스팅 상세 조회 id: {}", "Query", listing_id);
    let mut listing = store
        .listing(listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    let bids = store.bids(listing_id).await?;
    let highest_bid = pricing::highest_bid(&bids).map(|bid| HighestBid {
        amount: bid.amount,
        bidder: bid.bidder.clone(),
    });
    let current_price =
        pricing::current_price(listing.price, highest_bid.as_ref().map(|bid| bid.amount));

    let watchlisted = match viewer {
        Some(user) => store.is_watching(user.id, listing_id).await?,
        None => false,
    };
    let owner = viewer.is_some_and(|user| user.id == listing.owner_id);

    listing.image = pricing::display_image(&listing.image);

    Ok(ListingView {
        listing,
        current_price,
        highest_bid,
        bid_count: bids.len(),
        comments: store.comments(listing_id).await?,
        watchlisted,
        owner,
        error,
    })
}

// endregion: --- Listing View

// region:    --- Listing Cards
/// 목록 화면용 리스팅 카드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub current_price: Decimal,
    pub active: bool,
    pub owner: String,
}

impl ListingCard {
    pub fn new(listing: Listing, highest_bid: Option<Decimal>) -> Self {
        Self {
            id: listing.id,
            image: pricing::display_image(&listing.image),
            current_price: pricing::current_price(listing.price, highest_bid),
            title: listing.title,
            description: listing.description,
            category: listing.category,
            active: listing.active,
            owner: listing.owner,
        }
    }
}

/// 카테고리 항목 (원래 이름, 표시 이름)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub slug: String,
    pub name: String,
}

/// 카테고리 화면
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub category: String,
    pub listings: Vec<ListingCard>,
}

/// 리스팅마다 현재 가격 계산 후 카드로 변환
async fn to_cards(
    store: &dyn AuctionStore,
    listings: Vec<Listing>,
) -> Result<Vec<ListingCard>, AppError> {
    let mut cards = Vec::with_capacity(listings.len());
    for listing in listings {
        let highest = store.highest_bid_amount(listing.id).await?;
        cards.push(ListingCard::new(listing, highest));
    }
    Ok(cards)
}

/// 진행 중인 모든 리스팅
pub async fn get_active_listings(store: &dyn AuctionStore) -> Result<Vec<ListingCard>, AppError> {
    info!("{:<12} --> 진행 중인 리스팅 조회", "Query");
    to_cards(store, store.active_listings().await?).await
}

/// 카테고리 목록
pub async fn get_categories(store: &dyn AuctionStore) -> Result<Vec<CategoryEntry>, AppError> {
    info!("{:<12} --> 카테고리 목록 조회", "Query");
    Ok(store
        .categories()
        .await?
        .into_iter()
        .map(|slug| CategoryEntry {
            name: capitalize(&slug),
            slug,
        })
        .collect())
}

/// 카테고리별 진행 중인 리스팅
pub async fn get_category(
    store: &dyn AuctionStore,
    category: &str,
) -> Result<CategoryView, AppError> {
    info!("{:<12} --> 카테고리 조회: {}", "Query", category);
    let listings = store.active_listings_in_category(category).await?;
    Ok(CategoryView {
        category: capitalize(category),
        listings: to_cards(store, listings).await?,
    })
}

/// 관심 목록 (마감된 리스팅 포함)
pub async fn get_watchlist(
    store: &dyn AuctionStore,
    user: &User,
) -> Result<Vec<ListingCard>, AppError> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "Query", user.username);
    to_cards(store, store.watchlist(user.id).await?).await
}

/// 첫 글자만 대문자, 나머지는 소문자
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// endregion: --- Listing Cards
