//! 위키 문서 저장소
//!
//! 문서 하나가 `<title>.md` 파일 하나이다. 제목 조회는 대소문자를 구분하지 않는다.

// region:    --- Imports
use crate::error::AppError;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

// endregion: --- Imports

// region:    --- Entry Store
const EXTENSION: &str = "md";

/// 위키 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub content: String,
}

/// 파일 기반 위키 문서 저장소
#[derive(Debug, Clone)]
pub struct EntryStore {
    dir: PathBuf,
}

impl EntryStore {
    /// 저장소 디렉터리가 없으면 생성
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!("{:<12} --> 문서 디렉터리: {}", "Wiki", dir.display());
        Ok(Self { dir })
    }

    /// 모든 문서 제목 (정렬)
    pub async fn list_entries(&self) -> Result<Vec<String>, AppError> {
        let mut titles = Vec::new();
        let mut dir = fs::read_dir(&self.dir).await?;
        while let Some(file) = dir.next_entry().await? {
            let path = file.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(title) = path.file_stem().and_then(|stem| stem.to_str()) {
                titles.push(title.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }

    /// 저장된 제목 중 대소문자 무시 일치 항목
    pub async fn find_title(&self, title: &str) -> Result<Option<String>, AppError> {
        let wanted = title.trim().to_lowercase();
        Ok(self
            .list_entries()
            .await?
            .into_iter()
            .find(|stored| stored.to_lowercase() == wanted))
    }

    /// 문서 조회
    pub async fn get_entry(&self, title: &str) -> Result<Option<Entry>, AppError> {
        let Some(title) = self.find_title(title).await? else {
            return Ok(None);
        };
        let content = fs::read_to_string(self.path_for(&title)).await?;
        Ok(Some(Entry { title, content }))
    }

    /// 제목에 검색어가 포함된 문서 (대소문자 무시)
    pub async fn search(&self, query: &str) -> Result<Vec<String>, AppError> {
        let query = query.trim().to_lowercase();
        Ok(self
            .list_entries()
            .await?
            .into_iter()
            .filter(|title| title.to_lowercase().contains(&query))
            .collect())
    }

    /// 임의의 문서 제목
    pub async fn random_title(&self) -> Result<Option<String>, AppError> {
        let titles = self.list_entries().await?;
        Ok(titles.choose(&mut rand::thread_rng()).cloned())
    }

    /// 문서 저장 (같은 제목이 있으면 기존 파일을 덮어쓴다)
    pub async fn save_entry(&self, title: &str, content: &str) -> Result<Entry, AppError> {
        let title = validate_title(title)?;
        let title = self
            .find_title(title)
            .await?
            .unwrap_or_else(|| title.to_string());
        info!("{:<12} --> 문서 저장: {}", "Wiki", title);
        fs::write(self.path_for(&title), content).await?;
        Ok(Entry {
            title,
            content: content.to_string(),
        })
    }

    fn path_for(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{title}.{EXTENSION}"))
    }
}

/// 파일명으로 쓸 수 없는 제목 거부
pub fn validate_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if title.contains(['/', '\\']) || title.contains("..") || title.chars().any(char::is_control)
    {
        return Err(AppError::Validation(format!("Invalid title: {title:?}")));
    }
    Ok(title)
}
// endregion: --- Entry Store
