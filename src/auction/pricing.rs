//! 가격 규칙
//!
//! 현재 가격은 저장하지 않고 매 조회마다 입찰 기록에서 다시 계산한다.

use super::model::Bid;
use rust_decimal::Decimal;

/// 이미지가 없는 상품에 표시할 기본 이미지
pub const NO_IMAGE: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/a/ac/No_image_available.svg/2048px-No_image_available.svg.png";

/// 최소 입찰 단위 (0.01)
pub const BID_INCREMENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// NUMERIC(8, 2) 최대값 (999999.99)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// 현재 가격: 입찰이 있으면 최고 입찰가, 없으면 시작 가격
pub fn current_price(starting_price: Decimal, highest_bid: Option<Decimal>) -> Decimal {
    highest_bid.unwrap_or(starting_price)
}

/// 최고 입찰 (동일 금액이면 먼저 들어온 입찰)
pub fn highest_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter()
        .reduce(|best, bid| if bid.amount > best.amount { bid } else { best })
}

/// 새 입찰이 넘어야 하는 금액
///
/// 입찰이 없으면 시작 가격 - 0.01 이므로 시작 가격과 같은 첫 입찰은 허용된다.
pub fn bid_floor(starting_price: Decimal, highest_bid: Option<Decimal>) -> Decimal {
    highest_bid.unwrap_or(starting_price - BID_INCREMENT)
}

/// 입찰 허용 여부
pub fn accepts_bid(starting_price: Decimal, highest_bid: Option<Decimal>, amount: Decimal) -> bool {
    amount > bid_floor(starting_price, highest_bid)
}

/// 금액 검증 (음수, 소수점 셋째 자리 이상, 최대값 초과 금지)
pub fn validate_amount(amount: Decimal) -> Result<Decimal, String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err("Amount must not be negative".to_string());
    }
    if amount.normalize().scale() > 2 {
        return Err("Amount must have at most two decimal places".to_string());
    }
    if amount > MAX_AMOUNT {
        return Err(format!("Amount must not exceed {MAX_AMOUNT}"));
    }
    Ok(amount)
}

/// 비어 있는 이미지는 기본 이미지로 대체
pub fn display_image(image: &str) -> String {
    if image.trim().is_empty() {
        NO_IMAGE.to_string()
    } else {
        image.to_string()
    }
}
