// region:    --- Imports
use commerce_service::config::Config;
use commerce_service::database::DatabaseManager;
use commerce_service::state::AppState;
use commerce_service::store::{AuctionStore, InMemoryAuctionStore, PostgresAuctionStore};
use commerce_service::{handlers, logging};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일이 있으면 로드
    dotenvy::dotenv().ok();

    // logging 초기화
    logging::init();

    let config = Config::from_env();
    info!(
        "{:<12} --> 설정 로드 (http_addr={}, database={})",
        "Main",
        config.http_addr,
        if config.database_url.is_some() { "postgres" } else { "memory" }
    );

    // 저장소 선택 (DATABASE_URL 없으면 인메모리)
    let store: Arc<dyn AuctionStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            let db_manager = DatabaseManager::connect(database_url, config.max_connections).await?;

            // 데이터베이스 초기화
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresAuctionStore::new(db_manager.get_pool()))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정: 인메모리 저장소 사용 (재시작 시 데이터 유실)",
                "Main"
            );
            Arc::new(InMemoryAuctionStore::new())
        }
    };

    // 라우터 설정
    let routes_all = handlers::routes(AppState::new(store));

    // 리스너 생성
    let listener = TcpListener::bind(config.http_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
