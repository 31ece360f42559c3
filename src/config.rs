//! 환경 변수 기반 서비스 설정
//!
//! 모든 값에 기본값이 있으므로 로컬 개발 시 별도 설정 없이 실행할 수 있다.

// region:    --- Imports
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

// endregion: --- Imports

// region:    --- Config
/// 서비스 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 경매(commerce) 서비스 주소
    /// Env: `HTTP_ADDR`, 기본값 `0.0.0.0:3000`
    pub http_addr: SocketAddr,

    /// 위키 서비스 주소
    /// Env: `WIKI_HTTP_ADDR`, 기본값 `0.0.0.0:3001`
    pub wiki_http_addr: SocketAddr,

    /// PostgreSQL 접속 URL. 없으면 인메모리 저장소를 사용한다.
    /// Env: `DATABASE_URL`
    pub database_url: Option<String>,

    /// 커넥션 풀 최대 크기
    /// Env: `DATABASE_MAX_CONNECTIONS`, 기본값 `5`
    pub max_connections: u32,

    /// 위키 문서(`<title>.md`) 디렉터리
    /// Env: `WIKI_ENTRIES_DIR`, 기본값 `./entries`
    pub wiki_entries_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 3000).into(),
            wiki_http_addr: ([0, 0, 0, 0], 3001).into(),
            database_url: None,
            max_connections: 5,
            wiki_entries_dir: PathBuf::from("./entries"),
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Self {
            http_addr: parse_or("HTTP_ADDR", lookup("HTTP_ADDR"), defaults.http_addr),
            wiki_http_addr: parse_or(
                "WIKI_HTTP_ADDR",
                lookup("WIKI_HTTP_ADDR"),
                defaults.wiki_http_addr,
            ),
            database_url,
            max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                lookup("DATABASE_MAX_CONNECTIONS"),
                defaults.max_connections,
            ),
            wiki_entries_dir: lookup("WIKI_ENTRIES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.wiki_entries_dir),
        }
    }
}

/// 값이 없거나 잘못된 경우 기본값 사용
fn parse_or<T: FromStr + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "{:<12} --> 잘못된 설정값 {}={:?}, 기본값 {} 사용",
                    "Config", key, raw, default
                );
                default
            }
        },
    }
}
// endregion: --- Config
