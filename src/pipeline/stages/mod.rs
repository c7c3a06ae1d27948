//! 流水线阶段
//!
//! 每个阶段声明自己读取的字段与写入的字段，只通过协作服务完成实际的检索或生成。

use async_trait::async_trait;

use crate::error::StageError;
use crate::llm::Generator;
use crate::pipeline::state::{OutputField, StateField};

pub mod drafter;
pub mod fact_checker;
pub mod prompts;
pub mod refiner;
pub mod researcher;

pub use drafter::Drafter;
pub use fact_checker::FactChecker;
pub use refiner::Refiner;
pub use researcher::{Researcher, compose_research};

/// 阶段失败时写入输出字段的哨兵文本
pub struct Sentinel;

impl Sentinel {
    pub const RESEARCH_FAILED: &'static str = "Error: Research failed";
    pub const DRAFTING_FAILED: &'static str = "Error: Drafting failed";
    pub const REFINING_FAILED: &'static str = "Error: Refining failed";
    pub const FACT_CHECKING_FAILED: &'static str = "Error: Fact-checking failed";
}

/// 单个处理阶段
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// 阶段读取的状态字段
    fn input(&self) -> StateField;

    /// 阶段写入的状态字段
    fn output(&self) -> OutputField;

    /// 失败时对外暴露的文本
    fn sentinel(&self) -> &'static str;

    async fn execute(&self, input: &str) -> Result<String, StageError>;
}

/// 校验必需输入非空
pub(crate) fn require_input<'a>(
    stage: &'static str,
    field: StateField,
    input: &'a str,
) -> Result<&'a str, StageError> {
    if input.trim().is_empty() {
        return Err(StageError::EmptyInput {
            stage,
            field: field.as_str(),
        });
    }
    Ok(input)
}

/// 调用生成服务并校验输出非空
pub(crate) async fn generate_text(
    stage: &'static str,
    generator: &dyn Generator,
    prompt: &str,
) -> Result<String, StageError> {
    let text = generator
        .generate(prompt)
        .await
        .map_err(|e| StageError::collaborator(stage, e))?;

    if text.trim().is_empty() {
        return Err(StageError::EmptyOutput { stage });
    }
    Ok(text)
}
