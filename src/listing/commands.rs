/// 리스팅 관련 커맨드 처리
/// 1. 리스팅 생성
/// 2. 리스팅 액션 (관심 목록, 입찰, 댓글, 마감)
// region:    --- Imports
use crate::auction::model::{Listing, NewListing, User};
use crate::auction::pricing;
use crate::error::AppError;
use crate::store::{AuctionStore, BidOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
pub const MAX_TITLE_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 256;
pub const MAX_IMAGE_LEN: usize = 1024;
pub const MAX_CATEGORY_LEN: usize = 64;
pub const MAX_COMMENT_LEN: usize = 256;

pub const BID_TOO_LOW: &str = "Bid must be higher than current bid";
pub const LISTING_CLOSED: &str = "Listing is closed";
pub const NOT_OWNER: &str = "Only the owner can close this listing";

/// 리스팅 액션 (요청당 하나)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ListingAction {
    AddWatchlist,
    RemoveWatchlist,
    Bid { amount: Decimal },
    Comment { text: String },
    Close,
}

/// 액션 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Applied,
    /// 상태 변경 없이 사용자에게 보여줄 메시지
    Rejected(String),
    /// 익명 사용자는 로그인 페이지로
    LoginRequired,
}

/// 1. 리스팅 생성
pub async fn handle_create_listing(
    store: &dyn AuctionStore,
    owner: &User,
    form: NewListing,
) -> Result<Listing, AppError> {
    info!(
        "{:<12} --> 리스팅 생성 요청 owner: {}, title: {}",
        "Command", owner.username, form.title
    );
    let form = validate_new_listing(form)?;
    store.create_listing(owner.id, form).await
}

fn validate_new_listing(form: NewListing) -> Result<NewListing, AppError> {
    let title = required_field("Title", &form.title, MAX_TITLE_LEN)?;
    let description = required_field("Description", &form.description, MAX_DESCRIPTION_LEN)?;
    let category = required_field("Category", &form.category, MAX_CATEGORY_LEN)?;
    let price = pricing::validate_amount(form.price).map_err(AppError::Validation)?;

    let image = form
        .image
        .map(|image| image.trim().to_string())
        .filter(|image| !image.is_empty());
    if image
        .as_ref()
        .is_some_and(|image| image.chars().count() > MAX_IMAGE_LEN)
    {
        return Err(AppError::Validation(format!(
            "Image URL must be at most {MAX_IMAGE_LEN} characters"
        )));
    }

    Ok(NewListing {
        title,
        description,
        price,
        image,
        category,
    })
}

fn required_field(name: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{name} is required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{name} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

/// 2. 리스팅 액션 처리
pub async fn handle_listing_action(
    store: &dyn AuctionStore,
    listing_id: i64,
    viewer: Option<&User>,
    action: ListingAction,
) -> Result<ActionOutcome, AppError> {
    info!(
        "{:<12} --> 리스팅 액션 처리 id: {}, action: {:?}",
        "Command", listing_id, action
    );

    let listing = store
        .listing(listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    let Some(user) = viewer else {
        return Ok(ActionOutcome::LoginRequired);
    };

    match action {
        ListingAction::AddWatchlist => {
            store.add_to_watchlist(user.id, listing.id).await?;
            Ok(ActionOutcome::Applied)
        }
        ListingAction::RemoveWatchlist => {
            store.remove_from_watchlist(user.id, listing.id).await?;
            Ok(ActionOutcome::Applied)
        }
        ListingAction::Bid { amount } => place_bid(store, &listing, user, amount).await,
        ListingAction::Comment { text } => add_comment(store, &listing, user, &text).await,
        ListingAction::Close => close_listing(store, &listing, user).await,
    }
}

/// 입찰: 현재 최고가(입찰이 없으면 시작가 - 0.01)보다 높아야 한다
async fn place_bid(
    store: &dyn AuctionStore,
    listing: &Listing,
    bidder: &User,
    amount: Decimal,
) -> Result<ActionOutcome, AppError> {
    if let Err(message) = pricing::validate_amount(amount) {
        return Ok(ActionOutcome::Rejected(message));
    }

    match store.place_bid(listing.id, bidder.id, amount).await? {
        BidOutcome::Placed(bid) => {
            info!(
                "{:<12} --> 입찰 성공 listing: {}, amount: {}",
                "Command", listing.id, bid.amount
            );
            Ok(ActionOutcome::Applied)
        }
        BidOutcome::TooLow { current_price } => {
            warn!(
                "{:<12} --> 입찰 금액이 현재 가격보다 낮음: {} <= {}",
                "Command", amount, current_price
            );
            Ok(ActionOutcome::Rejected(BID_TOO_LOW.to_string()))
        }
        BidOutcome::Closed => Ok(ActionOutcome::Rejected(LISTING_CLOSED.to_string())),
    }
}

async fn add_comment(
    store: &dyn AuctionStore,
    listing: &Listing,
    author: &User,
    text: &str,
) -> Result<ActionOutcome, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(ActionOutcome::Rejected("Comment cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_COMMENT_LEN {
        return Ok(ActionOutcome::Rejected(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    store.add_comment(listing.id, author.id, text).await?;
    Ok(ActionOutcome::Applied)
}

/// 마감은 소유자만 가능, 재오픈 없음
async fn close_listing(
    store: &dyn AuctionStore,
    listing: &Listing,
    user: &User,
) -> Result<ActionOutcome, AppError> {
    if listing.owner_id != user.id {
        return Ok(ActionOutcome::Rejected(NOT_OWNER.to_string()));
    }
    if listing.active {
        store.close_listing(listing.id).await?;
    }
    Ok(ActionOutcome::Applied)
}

// endregion: --- Commands
