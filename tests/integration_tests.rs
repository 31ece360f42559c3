use commerce_service::handlers;
use commerce_service::listing::view::{CategoryEntry, CategoryView, ListingCard, ListingView};
use commerce_service::state::AppState;
use commerce_service::store::InMemoryAuctionStore;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;

// region:    --- Helpers

/// 인메모리 저장소로 서버를 띄우고 주소 반환
async fn spawn_app() -> String {
    let state = AppState::new(Arc::new(InMemoryAuctionStore::new()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, handlers::routes(state).into_make_service())
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

/// 리다이렉트를 따라가지 않는 클라이언트
fn client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// 회원 가입 후 세션 토큰 반환
async fn register(client: &Client, base: &str, username: &str) -> String {
    let response = client
        .post(format!("{base}/register"))
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "secret",
            "confirmation": "secret"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["username"], username);
    assert!(body["user"].get("password_hash").is_none());
    body["token"].as_str().unwrap().to_string()
}

/// 리스팅 생성 후 id 반환
async fn create_listing(client: &Client, base: &str, token: &str, category: &str, price: &str) -> i64 {
    let response = client
        .post(format!("{base}/create"))
        .bearer_auth(token)
        .json(&json!({
            "title": format!("{category} listing"),
            "description": "A fine thing",
            "price": price,
            "category": category
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let card: ListingCard = response.json().await.unwrap();
    card.id
}

async fn act(
    client: &Client,
    base: &str,
    token: &str,
    listing_id: i64,
    action: Value,
) -> (StatusCode, ListingView) {
    let response = client
        .post(format!("{base}/listing/{listing_id}"))
        .bearer_auth(token)
        .json(&action)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

// endregion: --- Helpers

/// 입찰 테스트
#[tokio::test]
async fn test_place_bid() {
    let base = spawn_app().await;
    let client = client();
    let owner = register(&client, &base, "owner").await;
    let bidder = register(&client, &base, "bidder").await;
    let listing_id = create_listing(&client, &base, &owner, "toys", "10.00").await;

    // 시작가보다 낮은 입찰
    let (status, view) = act(&client, &base, &bidder, listing_id, json!({"action": "bid", "amount": "9.99"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(view.error.as_deref(), Some("Bid must be higher than current bid"));
    assert_eq!(view.bid_count, 0);
    assert_eq!(view.current_price, dec("10.00"));

    // 시작가와 같은 첫 입찰은 허용
    let (status, view) = act(&client, &base, &bidder, listing_id, json!({"action": "bid", "amount": "10.00"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(view.error.is_none());
    assert_eq!(view.current_price, dec("10.00"));
    let highest = view.highest_bid.unwrap();
    assert_eq!(highest.bidder, "bidder");

    // 같은 금액은 거부
    let (status, view) = act(&client, &base, &owner, listing_id, json!({"action": "bid", "amount": "10.00"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(view.bid_count, 1);

    let (status, view) = act(&client, &base, &owner, listing_id, json!({"action": "bid", "amount": 12.5})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view.current_price, dec("12.5"));
    assert_eq!(view.highest_bid.unwrap().bidder, "owner");

    // 목록 화면에도 현재 가격 반영
    let cards: Vec<ListingCard> = client.get(format!("{base}/")).send().await.unwrap().json().await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].current_price, dec("12.5"));
}

/// 익명 사용자 리다이렉트 테스트
#[tokio::test]
async fn test_anonymous_viewer_is_sent_to_login() {
    let base = spawn_app().await;
    let client = client();
    let owner = register(&client, &base, "owner").await;
    let listing_id = create_listing(&client, &base, &owner, "books", "3").await;

    let response = client
        .post(format!("{base}/listing/{listing_id}"))
        .json(&json!({"action": "add_watchlist"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/login");

    let response = client.get(format!("{base}/watchlist")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .post(format!("{base}/create"))
        .json(&json!({"title": "t", "description": "d", "price": "1", "category": "c"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // 조회는 익명으로도 가능
    let view: ListingView = client
        .get(format!("{base}/listing/{listing_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!view.owner);
    assert!(!view.watchlisted);
}

/// 관심 목록 테스트
#[tokio::test]
async fn test_watchlist_toggle() {
    let base = spawn_app().await;
    let client = client();
    let owner = register(&client, &base, "owner").await;
    let watcher = register(&client, &base, "watcher").await;
    let listing_id = create_listing(&client, &base, &owner, "garden", "20").await;

    for _ in 0..2 {
        let (status, view) = act(&client, &base, &watcher, listing_id, json!({"action": "add_watchlist"})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(view.watchlisted);
    }

    let cards: Vec<ListingCard> = client
        .get(format!("{base}/watchlist"))
        .bearer_auth(&watcher)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, listing_id);

    let (status, view) = act(&client, &base, &watcher, listing_id, json!({"action": "remove_watchlist"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!view.watchlisted);
}

/// 리스팅 마감 테스트
#[tokio::test]
async fn test_close_listing() {
    let base = spawn_app().await;
    let client = client();
    let owner = register(&client, &base, "owner").await;
    let other = register(&client, &base, "other").await;
    let listing_id = create_listing(&client, &base, &owner, "art", "50").await;
    act(&client, &base, &other, listing_id, json!({"action": "add_watchlist"})).await;

    let (status, view) = act(&client, &base, &other, listing_id, json!({"action": "close"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(view.listing.active);

    for _ in 0..2 {
        let (status, view) = act(&client, &base, &owner, listing_id, json!({"action": "close"})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!view.listing.active);
        assert!(view.owner);
    }

    let (status, view) = act(&client, &base, &other, listing_id, json!({"action": "bid", "amount": "100"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(view.error.as_deref(), Some("Listing is closed"));

    // 댓글은 마감 후에도 가능
    let (status, view) = act(&client, &base, &other, listing_id, json!({"action": "comment", "text": "Congrats"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view.comments.len(), 1);
    assert_eq!(view.comments[0].author, "other");

    let index: Vec<ListingCard> = client.get(format!("{base}/")).send().await.unwrap().json().await.unwrap();
    assert!(index.is_empty());

    let watchlist: Vec<ListingCard> = client
        .get(format!("{base}/watchlist"))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(watchlist.len(), 1);
    assert!(!watchlist[0].active);
}

/// 카테고리 테스트
#[tokio::test]
async fn test_categories() {
    let base = spawn_app().await;
    let client = client();
    let owner = register(&client, &base, "owner").await;
    create_listing(&client, &base, &owner, "fashion", "5").await;
    create_listing(&client, &base, &owner, "fashion", "6").await;
    create_listing(&client, &base, &owner, "electronics", "7").await;

    let categories: Vec<CategoryEntry> = client
        .get(format!("{base}/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Electronics", "Fashion"]);

    let fashion: CategoryView = client
        .get(format!("{base}/category/fashion"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fashion.category, "Fashion");
    assert_eq!(fashion.listings.len(), 2);
}

/// 존재하지 않는 리스팅 테스트
#[tokio::test]
async fn test_unknown_listing_is_404() {
    let base = spawn_app().await;
    let client = client();
    let token = register(&client, &base, "someone").await;

    let response = client.get(format!("{base}/listing/42")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .post(format!("{base}/listing/42"))
        .bearer_auth(&token)
        .json(&json!({"action": "close"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Listing not found");
}

/// 계정 테스트
#[tokio::test]
async fn test_accounts() {
    let base = spawn_app().await;
    let client = client();
    register(&client, &base, "carol").await;

    let response = client
        .post(format!("{base}/register"))
        .json(&json!({"username": "dave", "password": "a", "confirmation": "b"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Passwords must match.");

    let response = client
        .post(format!("{base}/register"))
        .json(&json!({"username": "carol", "password": "a", "confirmation": "a"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{base}/login"))
        .json(&json!({"username": "carol", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid username and/or password.");

    let response = client
        .post(format!("{base}/login"))
        .json(&json!({"username": "carol", "password": "secret"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{base}/watchlist"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{base}/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");

    // 로그아웃 후 토큰은 익명 취급
    let response = client
        .get(format!("{base}/watchlist"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

/// 잘못된 요청 형식 테스트
#[tokio::test]
async fn test_malformed_requests_return_json_errors() {
    let base = spawn_app().await;
    let client = client();
    let token = register(&client, &base, "erin").await;

    let response = client
        .post(format!("{base}/register"))
        .json(&json!({"username": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client.get(format!("{base}/listing/abc")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .post(format!("{base}/listing/1"))
        .bearer_auth(&token)
        .json(&json!({"action": "teleport"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .post(format!("{base}/register"))
        .json(&json!({
            "username": "x".repeat(151),
            "password": "a",
            "confirmation": "a"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Username must be at most 150 characters");
}
