use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StageError;
use crate::llm::Generator;
use crate::pipeline::stages::prompts::FACT_CHECK_PROMPT;
use crate::pipeline::stages::{Sentinel, Stage, generate_text, require_input};
use crate::pipeline::state::{OutputField, StateField};

/// 事实核查员 - 纠正草稿中的错误信息
pub struct FactChecker {
    generator: Arc<dyn Generator>,
}

impl FactChecker {
    pub const NAME: &'static str = "FactChecker";

    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Stage for FactChecker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input(&self) -> StateField {
        StateField::Answer
    }

    fn output(&self) -> OutputField {
        OutputField::Answer
    }

    fn sentinel(&self) -> &'static str {
        Sentinel::FACT_CHECKING_FAILED
    }

    async fn execute(&self, input: &str) -> Result<String, StageError> {
        let text = require_input(Self::NAME, self.input(), input)?;
        generate_text(
            Self::NAME,
            self.generator.as_ref(),
            &FACT_CHECK_PROMPT.render(text),
        )
        .await
    }
}
