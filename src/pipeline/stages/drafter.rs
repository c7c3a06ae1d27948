use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::StageError;
use crate::llm::Generator;
use crate::memory::{ConversationMemory, format_turns};
use crate::pipeline::stages::prompts::DRAFT_PROMPT;
use crate::pipeline::stages::{Sentinel, Stage, generate_text, require_input};
use crate::pipeline::state::{OutputField, StateField};

/// 起草员 - 基于调研文本撰写结构化答案
///
/// 唯一会跨运行记忆的阶段：成功起草后把本轮调研与草稿追加到会话记忆中，
/// 后续运行可在提示词里参考最近几轮。
pub struct Drafter {
    generator: Arc<dyn Generator>,
    memory: ConversationMemory,
    config: PipelineConfig,
}

impl Drafter {
    pub const NAME: &'static str = "Drafter";

    pub fn new(
        generator: Arc<dyn Generator>,
        memory: ConversationMemory,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            memory,
            config,
        }
    }

    async fn build_prompt(&self, research: &str) -> String {
        if !self.config.include_history || self.config.history_turns == 0 {
            return DRAFT_PROMPT.render(research);
        }

        let turns = self.memory.recent(self.config.history_turns).await;
        debug!(turns = turns.len(), "注入会话历史");
        DRAFT_PROMPT.render_with_history(research, &format_turns(&turns))
    }
}

#[async_trait]
impl Stage for Drafter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input(&self) -> StateField {
        StateField::Research
    }

    fn output(&self) -> OutputField {
        OutputField::Answer
    }

    fn sentinel(&self) -> &'static str {
        Sentinel::DRAFTING_FAILED
    }

    async fn execute(&self, input: &str) -> Result<String, StageError> {
        let research = require_input(Self::NAME, self.input(), input)?;
        let prompt = self.build_prompt(research).await;

        let answer = generate_text(Self::NAME, self.generator.as_ref(), &prompt).await?;
        self.memory.append(research, &answer).await;
        Ok(answer)
    }
}
