use crate::config::{Config, LLMProvider};
use crate::logging::LogFormat;
use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

/// DeepResearch-RS - 多步骤深度研究助手
#[derive(Parser, Debug)]
#[command(name = "deepresearch-rs")]
#[command(
    about = "Multi-step research assistant: gathers web research for a query, drafts an answer with an LLM, refines or fact-checks it based on content heuristics, then polishes the result."
)]
#[command(version)]
pub struct Args {
    /// 研究问题，省略时进入交互模式
    pub query: Vec<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 日志格式
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// 以JSON输出最终状态
    #[arg(long)]
    pub json: bool,

    /// LLM Provider (openai, deepseek, openrouter, anthropic, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 模型标识
    #[arg(long)]
    pub model: Option<String>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 单次调用生成服务的超时时间（秒）
    #[arg(long)]
    pub llm_timeout: Option<u64>,

    /// 搜索 API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 搜索 API基地址
    #[arg(long)]
    pub search_api_base_url: Option<String>,

    /// 每次搜索返回的最大结果数
    #[arg(long)]
    pub max_results: Option<u32>,

    /// 起草时不参考会话历史
    #[arg(long)]
    pub no_history: bool,
}

impl Args {
    /// 研究问题文本，未提供时返回 `None`
    pub fn query_text(&self) -> Option<String> {
        let query = self.query.join(" ");
        if query.trim().is_empty() {
            None
        } else {
            Some(query)
        }
    }

    /// 将CLI参数转换为配置
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        // 覆盖LLM配置
        if let Some(provider_str) = &self.llm_provider {
            config.llm.provider = provider_str
                .parse::<LLMProvider>()
                .map_err(|e| anyhow!(e))?;
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(llm_timeout) = self.llm_timeout {
            config.llm.timeout_seconds = llm_timeout;
        }

        // 覆盖搜索配置
        if let Some(search_api_key) = &self.search_api_key {
            config.search.api_key = search_api_key.clone();
        }
        if let Some(search_api_base_url) = &self.search_api_base_url {
            config.search.api_base_url = search_api_base_url.clone();
        }
        if let Some(max_results) = self.max_results {
            config.search.max_results = max_results;
        }

        if self.no_history {
            config.pipeline.include_history = false;
        }
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
