#[cfg(test)]
mod tests {
    use crate::config::{
        Config, GROQ_API_BASE_URL, LLMConfig, LLMProvider, PipelineConfig, SearchConfig,
    };
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(!config.verbose);
        assert!(config.pipeline.include_history);
        assert_eq!(config.pipeline.history_turns, 3);
    }

    #[test]
    fn test_llm_config_default() {
        let llm = LLMConfig::default();

        assert_eq!(llm.provider, LLMProvider::OpenAI);
        assert!(llm.api_base_url.is_empty());
        assert_eq!(llm.base_url(), Some(GROQ_API_BASE_URL));
        assert_eq!(llm.model, "llama-3.3-70b-versatile");
        assert_eq!(llm.temperature, 0.7);
        assert_eq!(llm.retry_attempts, 1);
        assert!(llm.timeout_seconds > 0);
    }

    #[test]
    fn test_search_config_default() {
        let search = SearchConfig::default();

        assert_eq!(search.api_base_url, "https://api.tavily.com");
        assert_eq!(search.max_results, 5);
        assert!(search.timeout_seconds > 0);
    }

    #[test]
    fn test_llm_provider_default() {
        let provider = LLMProvider::default();
        assert_eq!(provider, LLMProvider::OpenAI);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!("openai".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!("GROQ".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!(
            "deepseek".parse::<LLMProvider>().unwrap(),
            LLMProvider::DeepSeek
        );
        assert_eq!(
            "openrouter".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenRouter
        );
        assert_eq!(
            "anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!("ollama".parse::<LLMProvider>().unwrap(), LLMProvider::Ollama);

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::OpenAI.to_string(), "openai");
        assert_eq!(LLMProvider::DeepSeek.to_string(), "deepseek");
        assert_eq!(LLMProvider::OpenRouter.to_string(), "openrouter");
        assert_eq!(LLMProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(LLMProvider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_llm_provider_requires_api_key() {
        assert!(LLMProvider::OpenAI.requires_api_key());
        assert!(LLMProvider::Anthropic.requires_api_key());
        assert!(!LLMProvider::Ollama.requires_api_key());
    }

    #[test]
    fn test_base_url_follows_provider() {
        let deepseek = LLMConfig {
            provider: LLMProvider::DeepSeek,
            ..Default::default()
        };
        assert_eq!(deepseek.base_url(), None);

        let ollama = LLMConfig {
            provider: LLMProvider::Ollama,
            ..Default::default()
        };
        assert_eq!(ollama.base_url(), None);

        let custom = LLMConfig {
            provider: LLMProvider::DeepSeek,
            api_base_url: " https://api.deepseek.com ".to_string(),
            ..Default::default()
        };
        assert_eq!(custom.base_url(), Some("https://api.deepseek.com"));
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("deepresearch.toml");
        let content = r#"
verbose = true

[llm]
provider = "deepseek"
api_key = "llm-key"
api_base_url = "https://api.deepseek.com"
model = "deepseek-chat"
temperature = 0.2

[search]
api_key = "search-key"
max_results = 8

[pipeline]
include_history = false
"#;
        fs::write(&config_path, content).unwrap();

        let config = Config::from_file(&config_path).unwrap();

        assert!(config.verbose);
        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.api_key, "llm-key");
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.llm.temperature, 0.2);
        // 未在文件中出现的字段使用默认值
        assert_eq!(config.llm.retry_attempts, 1);
        assert_eq!(config.search.api_key, "search-key");
        assert_eq!(config.search.max_results, 8);
        assert_eq!(config.search.api_base_url, "https://api.tavily.com");
        assert!(!config.pipeline.include_history);
        assert_eq!(config.pipeline.history_turns, PipelineConfig::default().history_turns);
    }

    #[test]
    fn test_config_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::from_file(&temp_dir.path().join("missing.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[llm\nmodel = ").unwrap();

        let result = Config::from_file(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, "[llm]\nmodel = \"custom-model\"\n").unwrap();

        let config = Config::load(Some(config_path.as_path())).unwrap();
        assert_eq!(config.llm.model, "custom-model");
    }

    #[test]
    fn test_config_roundtrip_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.llm.model, config.llm.model);
        assert_eq!(parsed.search.max_results, config.search.max_results);
        assert_eq!(parsed.pipeline.history_turns, config.pipeline.history_turns);
    }
}
