use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::StageError;
use crate::pipeline::stages::{Sentinel, Stage, require_input};
use crate::pipeline::state::{OutputField, StateField};
use crate::search::{SearchResultItem, Searcher, clean_text};

/// 调研员 - 检索查询相关资料并清洗拼接为调研文本
pub struct Researcher {
    searcher: Arc<dyn Searcher>,
}

impl Researcher {
    pub const NAME: &'static str = "Researcher";

    pub fn new(searcher: Arc<dyn Searcher>) -> Self {
        Self { searcher }
    }
}

/// 逐条清洗搜索结果，按原始排名以空行拼接
///
/// 没有结果时返回空字符串，而不是失败哨兵。
pub fn compose_research(items: &[SearchResultItem]) -> String {
    items
        .iter()
        .map(|item| clean_text(&item.render()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Stage for Researcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input(&self) -> StateField {
        StateField::Query
    }

    fn output(&self) -> OutputField {
        OutputField::Research
    }

    fn sentinel(&self) -> &'static str {
        Sentinel::RESEARCH_FAILED
    }

    async fn execute(&self, input: &str) -> Result<String, StageError> {
        let query = require_input(Self::NAME, self.input(), input)?;

        let items = self
            .searcher
            .search(query)
            .await
            .map_err(|e| StageError::collaborator(Self::NAME, e))?;

        let research = compose_research(&items);
        if research.trim().is_empty() {
            warn!("搜索未返回可用内容，调研文本为空");
        }

        info!(results = items.len(), chars = research.len(), "调研完成");
        Ok(research)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorError;
    use crate::pipeline::testing::StaticSearcher;

    fn researcher(result: Result<Vec<SearchResultItem>, CollaboratorError>) -> Researcher {
        Researcher::new(Arc::new(StaticSearcher(result)))
    }

    #[test]
    fn test_compose_research_joins_in_rank_order() {
        let items = vec![
            SearchResultItem::new("First", "alpha"),
            SearchResultItem::new("Second", "beta"),
        ];
        assert_eq!(compose_research(&items), "First\nalpha\n\nSecond\nbeta");
    }

    #[test]
    fn test_compose_research_cleans_each_item() {
        let items = vec![SearchResultItem::new(
            "Leaves",
            "Leaves hold chlorophyll.\nSign up to read more\nStomata exchange gases.",
        )];
        assert_eq!(
            compose_research(&items),
            "Leaves\nLeaves hold chlorophyll.\nStomata exchange gases."
        );
    }

    #[tokio::test]
    async fn test_execute_success() {
        let stage = researcher(Ok(vec![SearchResultItem::new("T", "body")]));
        assert_eq!(stage.execute("query").await.unwrap(), "T\nbody");
    }

    #[tokio::test]
    async fn test_execute_collaborator_failure() {
        let stage = researcher(Err(CollaboratorError::Status {
            status: 500,
            body: "boom".to_string(),
        }));
        let err = stage.execute("query").await.unwrap_err();
        assert!(matches!(
            err,
            StageError::Collaborator {
                stage: "Researcher",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_execute_no_results_yields_empty_research() {
        let stage = researcher(Ok(vec![]));
        assert_eq!(stage.execute("query").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_execute_fully_cleaned_results_yield_blank_research() {
        let stage = researcher(Ok(vec![SearchResultItem::new("Sign up", "Subscribe today")]));
        assert_eq!(stage.execute("query").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_execute_blank_query() {
        let stage = researcher(Ok(vec![SearchResultItem::new("T", "body")]));
        let err = stage.execute("   ").await.unwrap_err();
        assert!(matches!(err, StageError::EmptyInput { field: "query", .. }));
    }
}
