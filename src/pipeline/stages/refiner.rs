use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StageError;
use crate::llm::Generator;
use crate::pipeline::stages::prompts::REFINE_PROMPT;
use crate::pipeline::stages::{Sentinel, Stage, generate_text, require_input};
use crate::pipeline::state::{OutputField, StateField};

/// 编辑 - 提升草稿的清晰度、简洁性与专业性
///
/// 同一实例也承担收尾的润色步骤。
pub struct Refiner {
    generator: Arc<dyn Generator>,
}

impl Refiner {
    pub const NAME: &'static str = "Refiner";

    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Stage for Refiner {
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
        Sentinel::REFINING_FAILED
    }

    async fn execute(&self, input: &str) -> Result<String, StageError> {
        let draft = require_input(Self::NAME, self.input(), input)?;
        generate_text(Self::NAME, self.generator.as_ref(), &REFINE_PROMPT.render(draft)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorError;
    use crate::pipeline::testing::RecordingGenerator;

    #[tokio::test]
    async fn test_refine_sends_editing_instruction() {
        let generator = Arc::new(RecordingGenerator::replying("Polished."));
        let stage = Refiner::new(generator.clone());

        assert_eq!(stage.execute("rough draft").await.unwrap(), "Polished.");
        let prompt = &generator.prompts()[0];
        assert!(prompt.starts_with("You are a professional editor."));
        assert!(prompt.contains("Draft:\nrough draft"));
    }

    #[tokio::test]
    async fn test_refine_failure() {
        let generator = Arc::new(RecordingGenerator::failing(CollaboratorError::Timeout {
            seconds: 5,
        }));
        let stage = Refiner::new(generator);

        let err = stage.execute("draft").await.unwrap_err();
        assert_eq!(err.stage(), "Refiner");
        assert_eq!(stage.sentinel(), "Error: Refining failed");
    }
}
