//! 单元测试用的协作服务替身

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::CollaboratorError;
use crate::llm::Generator;
use crate::search::{SearchResultItem, Searcher};

/// 固定回复并记录收到的提示词
pub struct RecordingGenerator {
    response: Result<String, CollaboratorError>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            response: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.clone()
    }
}

/// 固定返回一组结果
pub struct StaticSearcher(pub Result<Vec<SearchResultItem>, CollaboratorError>);

#[async_trait]
impl Searcher for StaticSearcher {
    async fn search(&self, _query: &str) -> Result<Vec<SearchResultItem>, CollaboratorError> {
        self.0.clone()
    }
}
