//! 生成服务协作接口

use async_trait::async_trait;

use crate::error::CollaboratorError;

pub mod client;

pub use client::LLMClient;

/// 生成服务：接收提示词，返回生成文本
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError>;
}
