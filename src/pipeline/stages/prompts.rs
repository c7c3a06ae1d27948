//! 各阶段的提示词模板

/// Prompt模板配置
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// 角色设定
    pub role: &'static str,
    /// 任务说明
    pub instruction: &'static str,
    /// 输入材料的标题
    pub input_label: &'static str,
}

impl PromptTemplate {
    /// 渲染完整提示词
    pub fn render(&self, input: &str) -> String {
        format!(
            "{}\n{}\n\n{}:\n{}\n",
            self.role, self.instruction, self.input_label, input
        )
    }

    /// 渲染时在输入材料之前附加会话历史
    pub fn render_with_history(&self, input: &str, history: &str) -> String {
        if history.trim().is_empty() {
            return self.render(input);
        }
        format!(
            "{}\n{}\nEarlier turns of this session are provided for reference only.\n\nPrevious conversation:\n{}\n\n{}:\n{}\n",
            self.role, self.instruction, history, self.input_label, input
        )
    }
}

pub const DRAFT_PROMPT: PromptTemplate = PromptTemplate {
    role: "You are an expert research assistant.",
    instruction: "Using the following research data, write a clear, comprehensive, and professional answer.\nDo not explain your process, just provide the final structured answer.",
    input_label: "Research",
};

pub const REFINE_PROMPT: PromptTemplate = PromptTemplate {
    role: "You are a professional editor.",
    instruction: "Refine the following draft to improve clarity, conciseness, and professionalism.\nOnly output the final improved version without any extra notes or explanations.",
    input_label: "Draft",
};

pub const FACT_CHECK_PROMPT: PromptTemplate = PromptTemplate {
    role: "You are a fact-checking expert.",
    instruction: "Carefully fact-check the following text. Correct any misinformation if necessary.\nOnly output the corrected, final version. Do not include commentary or explain changes.",
    input_label: "Text",
};
