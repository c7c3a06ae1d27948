//! LLM客户端 - 生成服务的 rig 实现

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LLMConfig;
use crate::error::{CollaboratorError, PipelineError};
use crate::llm::Generator;

mod providers;

use providers::ProviderClient;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    ///
    /// 缺少凭据属于构建失败，在任何流水线节点执行之前报告。
    pub fn new(config: LLMConfig) -> Result<Self, PipelineError> {
        if config.provider.requires_api_key() && config.api_key.trim().is_empty() {
            return Err(PipelineError::Construction(format!(
                "missing API key for LLM provider `{}` (set DEEPRESEARCH_LLM_API_KEY or GROQ_API_KEY)",
                config.provider
            )));
        }
        let client = ProviderClient::new(&config)
            .map_err(|e| PipelineError::Construction(format!("LLM client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// 有界重试，`retry_attempts` 为 1 时只调用一次
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T, CollaboratorError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CollaboratorError>>,
    {
        let max_attempts = self.config.retry_attempts.max(1);
        let mut attempts = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        return Err(err);
                    }
                    warn!(
                        attempt = attempts,
                        max_attempts, "调用模型服务出错，重试中: {}", err
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
            }
        }
    }

    /// 单轮对话，整个调用受 `timeout_seconds` 约束
    pub async fn prompt(&self, user_prompt: &str) -> Result<String, CollaboratorError> {
        let agent = self.client.create_agent(&self.config);
        let seconds = self.config.timeout_seconds;

        debug!(model = %self.config.model, prompt_chars = user_prompt.len(), "调用生成服务");

        self.retry_with_backoff(|| async {
            match tokio::time::timeout(Duration::from_secs(seconds), agent.prompt(user_prompt))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(CollaboratorError::Timeout { seconds }),
            }
        })
        .await
    }
}

#[async_trait]
impl Generator for LLMClient {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        self.prompt(prompt).await
    }
}
