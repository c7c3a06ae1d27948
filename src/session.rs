use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PipelineError;
use crate::pipeline::ResearchPipeline;
use crate::pipeline::graph::RunTrace;

/// 会话历史中的一条问答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub answer: String,
}

/// 一个用户会话：持有流水线（及其会话记忆）与问答历史
pub struct Session {
    pipeline: ResearchPipeline,
    history: Vec<HistoryEntry>,
}

impl Session {
    pub fn new(pipeline: ResearchPipeline) -> Self {
        Self {
            pipeline,
            history: Vec::new(),
        }
    }

    /// 运行一次研究并记录问答，空白查询返回 `None`
    pub async fn ask(&mut self, query: &str) -> Result<Option<RunTrace>, PipelineError> {
        let query = query.trim();
        if query.is_empty() {
            warn!("忽略空白查询");
            return Ok(None);
        }

        let trace = self.pipeline.run(query).await?;
        self.history.push(HistoryEntry {
            query: query.to_string(),
            answer: trace.state.answer().unwrap_or_default().to_string(),
        });
        Ok(Some(trace))
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// 清空问答历史，会话记忆保持不变
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn pipeline(&self) -> &ResearchPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::pipeline::PipelineContext;
    use crate::pipeline::testing::{RecordingGenerator, StaticSearcher};
    use crate::search::SearchResultItem;
    use std::sync::Arc;

    fn session() -> Session {
        let context = PipelineContext::new(
            Arc::new(RecordingGenerator::replying("Answer text.")),
            Arc::new(StaticSearcher(Ok(vec![SearchResultItem::new("T", "body")]))),
            PipelineConfig::default(),
        );
        Session::new(ResearchPipeline::new(context).unwrap())
    }

    #[tokio::test]
    async fn test_ask_records_history() {
        let mut session = session();

        let trace = session.ask("  What is a leaf?  ").await.unwrap().unwrap();
        assert_eq!(trace.state.query(), "What is a leaf?");

        assert_eq!(
            session.history(),
            &[HistoryEntry {
                query: "What is a leaf?".to_string(),
                answer: "Answer text.".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_blank_query_is_ignored() {
        let mut session = session();
        assert!(session.ask("   ").await.unwrap().is_none());
        assert!(session.history().is_empty());
        assert!(session.pipeline().memory().is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_history_keeps_memory() {
        let mut session = session();
        session.ask("first").await.unwrap();
        session.ask("second").await.unwrap();
        assert_eq!(session.history().len(), 2);

        session.clear_history();

        assert!(session.history().is_empty());
        assert_eq!(session.pipeline().memory().len().await, 2);
    }
}
