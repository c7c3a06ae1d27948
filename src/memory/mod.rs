use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// 一轮起草记录：输入的调研文本与产出的草稿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTurn {
    pub research: String,
    pub answer: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryLog {
    turns: Vec<MemoryTurn>,
}

/// 会话级对话记忆
///
/// 只追加不修改，由会话持有并注入起草阶段；克隆共享同一份日志，
/// 并发读写由内部的读写锁保证。
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    inner: Arc<RwLock<MemoryLog>>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一轮记录
    pub async fn append(&self, research: &str, answer: &str) {
        let mut log = self.inner.write().await;
        log.turns.push(MemoryTurn {
            research: research.to_string(),
            answer: answer.to_string(),
            recorded_at: Utc::now(),
        });
    }

    /// 最近的 `limit` 轮记录，按时间先后排列
    pub async fn recent(&self, limit: usize) -> Vec<MemoryTurn> {
        let log = self.inner.read().await;
        let skip = log.turns.len().saturating_sub(limit);
        log.turns[skip..].to_vec()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.turns.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.turns.is_empty()
    }
}

/// 将历史轮次格式化为提示词片段
pub fn format_turns(turns: &[MemoryTurn]) -> String {
    turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            format!(
                "[Turn {}]\nResearch:\n{}\nAnswer:\n{}",
                i + 1,
                turn.research,
                turn.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
