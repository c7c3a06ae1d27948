// 研究流水线
// ResearchAgent: 检索并清洗资料 -> research
// AnswerDrafter: 基于 research 起草 -> answer
// 路由: 草稿含不确定表述 -> RefinerAgent；调研含争议内容 -> FactCheckerAgent；否则 -> Final
// FinalPolish: 所有分支汇合后统一润色，复用 Refiner

use std::sync::Arc;

use crate::config::{Config, PipelineConfig};
use crate::error::{GraphError, PipelineError};
use crate::llm::{Generator, LLMClient};
use crate::memory::ConversationMemory;
use crate::search::{Searcher, TavilyClient};

pub mod graph;
pub mod routing;
pub mod stages;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use graph::{CompiledGraph, GraphBuilder, PassThrough, RunTrace, StageNode};
use routing::{Route, route};
use stages::{Drafter, FactChecker, Refiner, Researcher};
use state::PipelineState;

/// 图中的节点名称
pub struct NodeNames;

impl NodeNames {
    pub const RESEARCH: &'static str = "ResearchAgent";
    pub const DRAFT: &'static str = "AnswerDrafter";
    pub const REFINE: &'static str = "RefinerAgent";
    pub const FACT_CHECK: &'static str = "FactCheckerAgent";
    pub const FINAL: &'static str = "Final";
    pub const POLISH: &'static str = "FinalPolish";
}

/// 流水线运行所需的协作服务与配置
#[derive(Clone)]
pub struct PipelineContext {
    /// 生成服务
    pub generator: Arc<dyn Generator>,
    /// 搜索服务
    pub searcher: Arc<dyn Searcher>,
    /// 会话记忆，仅起草阶段使用
    pub memory: ConversationMemory,
    /// 流水线配置
    pub config: PipelineConfig,
}

impl PipelineContext {
    pub fn new(
        generator: Arc<dyn Generator>,
        searcher: Arc<dyn Searcher>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            searcher,
            memory: ConversationMemory::new(),
            config,
        }
    }

    /// 使用外部持有的会话记忆
    pub fn with_memory(mut self, memory: ConversationMemory) -> Self {
        self.memory = memory;
        self
    }

    /// 根据配置构建真实的协作服务客户端
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let generator = LLMClient::new(config.llm.clone())?;
        let searcher = TavilyClient::new(config.search.clone())?;
        Ok(Self::new(
            Arc::new(generator),
            Arc::new(searcher),
            config.pipeline.clone(),
        ))
    }
}

fn route_state(state: &PipelineState) -> Route {
    route(
        state.answer().unwrap_or_default(),
        state.research().unwrap_or_default(),
    )
}

/// 构建固定拓扑的研究流水线图
pub fn build_graph(context: &PipelineContext) -> Result<CompiledGraph, GraphError> {
    let researcher = Arc::new(Researcher::new(context.searcher.clone()));
    let drafter = Arc::new(Drafter::new(
        context.generator.clone(),
        context.memory.clone(),
        context.config.clone(),
    ));
    let refiner = Arc::new(Refiner::new(context.generator.clone()));
    let fact_checker = Arc::new(FactChecker::new(context.generator.clone()));

    GraphBuilder::new()
        .add_node(NodeNames::RESEARCH, Arc::new(StageNode::new(researcher)))
        .add_node(NodeNames::DRAFT, Arc::new(StageNode::new(drafter)))
        .add_node(NodeNames::REFINE, Arc::new(StageNode::new(refiner.clone())))
        .add_node(NodeNames::FACT_CHECK, Arc::new(StageNode::new(fact_checker)))
        .add_node(NodeNames::FINAL, Arc::new(PassThrough))
        .add_node(NodeNames::POLISH, Arc::new(StageNode::new(refiner)))
        .set_entry_point(NodeNames::RESEARCH)
        .add_edge(NodeNames::RESEARCH, NodeNames::DRAFT)
        .add_conditional_edges(
            NodeNames::DRAFT,
            Arc::new(route_state),
            [
                (Route::Refine, NodeNames::REFINE),
                (Route::FactCheck, NodeNames::FACT_CHECK),
                (Route::Final, NodeNames::FINAL),
            ],
        )
        .add_edge(NodeNames::REFINE, NodeNames::POLISH)
        .add_edge(NodeNames::FACT_CHECK, NodeNames::POLISH)
        .add_edge(NodeNames::FINAL, NodeNames::POLISH)
        .set_finish_point(NodeNames::POLISH)
        .compile()
}

/// 研究流水线
///
/// 图只构建一次，之后每次运行各自创建独立的 [`PipelineState`]。
pub struct ResearchPipeline {
    graph: CompiledGraph,
    memory: ConversationMemory,
}

impl ResearchPipeline {
    pub fn new(context: PipelineContext) -> Result<Self, PipelineError> {
        let graph = build_graph(&context)?;
        Ok(Self {
            graph,
            memory: context.memory,
        })
    }

    /// 构建协作服务客户端并组装流水线，缺少凭据时在任何节点执行前失败
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        Self::new(PipelineContext::from_config(config)?)
    }

    pub fn graph(&self) -> &CompiledGraph {
        &self.graph
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// 执行一次完整运行并返回轨迹
    pub async fn run(&self, query: &str) -> Result<RunTrace, PipelineError> {
        Ok(self.graph.invoke(PipelineState::new(query)).await?)
    }

    /// 执行一次完整运行，只返回最终状态
    pub async fn run_pipeline(&self, query: &str) -> Result<PipelineState, PipelineError> {
        Ok(self.run(query).await?.state)
    }
}
