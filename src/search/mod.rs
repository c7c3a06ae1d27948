//! 搜索服务协作接口

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

pub mod clean;
pub mod tavily;

pub use clean::{DROP_PHRASES, clean_text};
pub use tavily::TavilyClient;

/// 单条搜索结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl SearchResultItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: None,
        }
    }

    /// 标题与正文拼接后的文本
    pub fn render(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

/// 搜索服务：接收查询，返回按排名排序的结果
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, CollaboratorError>;
}
