/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash)
    VALUES ($1, $2, $3)
    RETURNING id, username, email, password_hash, created_at
"#;

/// 사용자명으로 사용자 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";

/// 세션 생성
pub const INSERT_SESSION: &str = "INSERT INTO sessions (token, user_id) VALUES ($1, $2)";

/// 세션 사용자 조회
pub const GET_SESSION_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.password_hash, u.created_at
    FROM sessions s
    JOIN users u ON u.id = s.user_id
    WHERE s.token = $1
"#;

/// 세션 삭제
pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = $1";

/// 리스팅 생성
pub const INSERT_LISTING: &str = r#"
    WITH inserted AS (
        INSERT INTO listings (title, description, image, price, category, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
    )
    SELECT l.id, l.title, l.description, l.image, l.price, l.category, l.active,
           l.owner_id, u.username AS owner, l.created_at
    FROM inserted l
    JOIN users u ON u.id = l.owner_id
"#;

/// 리스팅 조회
pub const GET_LISTING: &str = r#"
    SELECT l.id, l.title, l.description, l.image, l.price, l.category, l.active,
           l.owner_id, u.username AS owner, l.created_at
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    WHERE l.id = $1
"#;

/// 입찰 처리 중 리스팅 잠금
pub const LOCK_LISTING: &str = "SELECT price, active FROM listings WHERE id = $1 FOR UPDATE";

/// 진행 중인 리스팅 조회
pub const GET_ACTIVE_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.image, l.price, l.category, l.active,
           l.owner_id, u.username AS owner, l.created_at
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    WHERE l.active
    ORDER BY l.id
"#;

/// 카테고리별 진행 중인 리스팅 조회
pub const GET_ACTIVE_LISTINGS_IN_CATEGORY: &str = r#"
    SELECT l.id, l.title, l.description, l.image, l.price, l.category, l.active,
           l.owner_id, u.username AS owner, l.created_at
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    WHERE l.active AND l.category = $1
    ORDER BY l.id
"#;

/// 카테고리 목록 조회
pub const GET_CATEGORIES: &str =
    r#"SELECT DISTINCT category FROM listings WHERE category <> '' ORDER BY category COLLATE "C""#;

/// 리스팅 마감
pub const CLOSE_LISTING: &str = "UPDATE listings SET active = FALSE WHERE id = $1";

/// 입찰 이력 조회
pub const GET_BIDS: &str = r#"
    SELECT b.id, b.listing_id, b.bidder_id, u.username AS bidder, b.amount, b.created_at
    FROM bids b
    JOIN users u ON u.id = b.bidder_id
    WHERE b.listing_id = $1
    ORDER BY b.id
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) AS highest_bid FROM bids WHERE listing_id = $1";

/// 입찰 추가
pub const INSERT_BID: &str = r#"
    WITH inserted AS (
        INSERT INTO bids (listing_id, bidder_id, amount)
        VALUES ($1, $2, $3)
        RETURNING *
    )
    SELECT b.id, b.listing_id, b.bidder_id, u.username AS bidder, b.amount, b.created_at
    FROM inserted b
    JOIN users u ON u.id = b.bidder_id
"#;

/// 댓글 조회
pub const GET_COMMENTS: &str = r#"
    SELECT c.id, c.listing_id, c.author_id, u.username AS author, c.text, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
    WHERE c.listing_id = $1
    ORDER BY c.id
"#;

/// 댓글 추가
pub const INSERT_COMMENT: &str = r#"
    WITH inserted AS (
        INSERT INTO comments (listing_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING *
    )
    SELECT c.id, c.listing_id, c.author_id, u.username AS author, c.text, c.created_at
    FROM inserted c
    JOIN users u ON u.id = c.author_id
"#;

/// 관심 목록 포함 여부
pub const IS_WATCHING: &str =
    "SELECT EXISTS (SELECT 1 FROM watchlists WHERE user_id = $1 AND listing_id = $2)";

/// 관심 목록 추가
pub const INSERT_WATCHLIST: &str = r#"
    INSERT INTO watchlists (user_id, listing_id)
    VALUES ($1, $2)
    ON CONFLICT (user_id, listing_id) DO NOTHING
"#;

/// 관심 목록 제거
pub const DELETE_WATCHLIST: &str = "DELETE FROM watchlists WHERE user_id = $1 AND listing_id = $2";

/// 관심 목록 리스팅 조회
pub const GET_WATCHLIST: &str = r#"
    SELECT l.id, l.title, l.description, l.image, l.price, l.category, l.active,
           l.owner_id, u.username AS owner, l.created_at
    FROM watchlists w
    JOIN listings l ON l.id = w.listing_id
    JOIN users u ON u.id = l.owner_id
    WHERE w.user_id = $1
    ORDER BY w.created_at, l.id
"#;
