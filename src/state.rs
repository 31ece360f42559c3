use crate::store::AuctionStore;
use std::sync::Arc;

/// 경매 서비스 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuctionStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn AuctionStore>) -> Self {
        Self { store }
    }
}
