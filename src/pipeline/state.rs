use serde::{Deserialize, Serialize};

/// 状态中可读取的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    Query,
    Research,
    Answer,
}

impl StateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateField::Query => "query",
            StateField::Research => "research",
            StateField::Answer => "answer",
        }
    }
}

/// 节点可写入的字段，`query` 不在其中，创建后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputField {
    Research,
    Answer,
}

impl OutputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputField::Research => "research",
            OutputField::Answer => "answer",
        }
    }

    /// 整个图中是否只允许一个节点写入该字段
    pub fn single_writer(&self) -> bool {
        matches!(self, OutputField::Research)
    }
}

impl From<OutputField> for StateField {
    fn from(field: OutputField) -> Self {
        match field {
            OutputField::Research => StateField::Research,
            OutputField::Answer => StateField::Answer,
        }
    }
}

/// 在图中逐节点传递的共享状态
///
/// 节点从不就地修改状态，而是通过 [`PipelineState::with`] 产出新值。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineState {
    query: String,
    research: Option<String>,
    answer: Option<String>,
}

impl PipelineState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            research: None,
            answer: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn research(&self) -> Option<&str> {
        self.research.as_deref()
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn read(&self, field: StateField) -> Option<&str> {
        match field {
            StateField::Query => Some(self.query()),
            StateField::Research => self.research(),
            StateField::Answer => self.answer(),
        }
    }

    /// 返回写入了 `field` 的新状态，原状态保持不变
    pub fn with(&self, field: OutputField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        match field {
            OutputField::Research => next.research = Some(value.into()),
            OutputField::Answer => next.answer = Some(value.into()),
        }
        next
    }

    /// 三个字段是否都已填充
    pub fn is_complete(&self) -> bool {
        self.research.is_some() && self.answer.is_some()
    }
}
