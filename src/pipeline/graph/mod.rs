//! 状态图：节点与边以数据形式声明，编译校验后按边逐节点执行
//!
//! 执行循环只负责节点分派与边解析，不包含任何业务语义。新增节点或边只需修改
//! 构建处的声明，不涉及 [`CompiledGraph::invoke`]。

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::error::{GraphError, StageError};
use crate::pipeline::routing::Route;
use crate::pipeline::stages::Stage;
use crate::pipeline::state::{OutputField, PipelineState};

pub type NodeName = &'static str;

/// 条件边的分支解析器，作用于刚产出的新状态
pub type Router = Arc<dyn Fn(&PipelineState) -> Route + Send + Sync>;

/// 节点执行结果
#[derive(Debug, Clone)]
pub struct NodeOutput {
    pub state: PipelineState,
    pub failure: Option<StageError>,
}

impl NodeOutput {
    pub fn ok(state: PipelineState) -> Self {
        Self {
            state,
            failure: None,
        }
    }
}

/// 节点行为：读取当前状态，产出新状态
#[async_trait]
pub trait NodeAction: Send + Sync {
    async fn apply(&self, state: &PipelineState) -> NodeOutput;

    /// 节点写入的字段，用于构建期校验
    fn writes(&self) -> Option<OutputField> {
        None
    }
}

/// 将阶段绑定到状态字段的节点
///
/// 阶段失败时以哨兵文本写回输出字段，失败本身随 [`NodeOutput`] 上报。
pub struct StageNode {
    stage: Arc<dyn Stage>,
}

impl StageNode {
    pub fn new(stage: Arc<dyn Stage>) -> Self {
        Self { stage }
    }
}

#[async_trait]
impl NodeAction for StageNode {
    async fn apply(&self, state: &PipelineState) -> NodeOutput {
        let input = state.read(self.stage.input()).unwrap_or_default();

        match self.stage.execute(input).await {
            Ok(text) => NodeOutput::ok(state.with(self.stage.output(), text)),
            Err(err) => {
                warn!(stage = self.stage.name(), error = %err, "阶段执行失败，写入哨兵文本");
                NodeOutput {
                    state: state.with(self.stage.output(), self.stage.sentinel()),
                    failure: Some(err),
                }
            }
        }
    }

    fn writes(&self) -> Option<OutputField> {
        Some(self.stage.output())
    }
}

/// 原样传递状态的节点
pub struct PassThrough;

#[async_trait]
impl NodeAction for PassThrough {
    async fn apply(&self, state: &PipelineState) -> NodeOutput {
        NodeOutput::ok(state.clone())
    }
}

/// 出边
#[derive(Clone)]
pub enum Edge {
    /// 无条件跳转
    Direct(NodeName),
    /// 由解析器在多个分支中选择
    Conditional {
        router: Router,
        branches: HashMap<Route, NodeName>,
    },
}

impl Edge {
    /// 该边可能到达的全部节点
    pub fn targets(&self) -> Vec<NodeName> {
        match self {
            Edge::Direct(to) => vec![*to],
            Edge::Conditional { branches, .. } => Route::ALL
                .iter()
                .filter_map(|route| branches.get(route).copied())
                .collect(),
        }
    }
}

impl std::fmt::Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edge::Direct(to) => f.debug_tuple("Direct").field(to).finish(),
            Edge::Conditional { branches, .. } => f
                .debug_struct("Conditional")
                .field("branches", branches)
                .finish_non_exhaustive(),
        }
    }
}

/// 图构建器，错误延迟到 [`GraphBuilder::compile`] 统一报告
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<(NodeName, Arc<dyn NodeAction>)>,
    edges: HashMap<NodeName, Edge>,
    entry: Option<NodeName>,
    finish: Option<NodeName>,
    pending_error: Option<GraphError>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, error: GraphError) {
        if self.pending_error.is_none() {
            self.pending_error = Some(error);
        }
    }

    pub fn add_node(mut self, name: NodeName, action: Arc<dyn NodeAction>) -> Self {
        if self.nodes.iter().any(|(existing, _)| *existing == name) {
            self.fail(GraphError::DuplicateNode(name));
        } else {
            self.nodes.push((name, action));
        }
        self
    }

    fn set_edge(mut self, from: NodeName, edge: Edge) -> Self {
        if self.edges.contains_key(from) {
            self.fail(GraphError::EdgeAlreadyDefined(from));
        } else {
            self.edges.insert(from, edge);
        }
        self
    }

    pub fn add_edge(self, from: NodeName, to: NodeName) -> Self {
        self.set_edge(from, Edge::Direct(to))
    }

    pub fn add_conditional_edges(
        self,
        from: NodeName,
        router: Router,
        branches: impl IntoIterator<Item = (Route, NodeName)>,
    ) -> Self {
        let branches = branches.into_iter().collect();
        self.set_edge(from, Edge::Conditional { router, branches })
    }

    pub fn set_entry_point(mut self, name: NodeName) -> Self {
        self.entry = Some(name);
        self
    }

    pub fn set_finish_point(mut self, name: NodeName) -> Self {
        self.finish = Some(name);
        self
    }

    /// 校验拓扑并生成可执行图
    pub fn compile(self) -> Result<CompiledGraph, GraphError> {
        if let Some(error) = self.pending_error {
            return Err(error);
        }

        let known: HashSet<NodeName> = self.nodes.iter().map(|(name, _)| *name).collect();
        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        let finish = self.finish.ok_or(GraphError::MissingFinish)?;

        for name in [entry, finish] {
            if !known.contains(name) {
                return Err(GraphError::UnknownNode(name));
            }
        }

        for (from, edge) in &self.edges {
            if !known.contains(from) {
                return Err(GraphError::UnknownNode(*from));
            }
            if *from == finish {
                return Err(GraphError::FinishHasEdge(finish));
            }
            if let Edge::Conditional { branches, .. } = edge {
                for route in Route::ALL {
                    if !branches.contains_key(&route) {
                        return Err(GraphError::UnmappedRoute {
                            node: *from,
                            route: route.to_string(),
                        });
                    }
                }
            }
            for target in edge.targets() {
                if !known.contains(target) {
                    return Err(GraphError::UnknownNode(target));
                }
            }
        }

        for (name, _) in &self.nodes {
            if *name != finish && !self.edges.contains_key(name) {
                return Err(GraphError::MissingEdge(*name));
            }
        }

        let mut writers: HashMap<OutputField, NodeName> = HashMap::new();
        for (name, action) in &self.nodes {
            if let Some(field) = action.writes().filter(OutputField::single_writer) {
                if let Some(first) = writers.insert(field, *name) {
                    return Err(GraphError::MultipleWriters {
                        field: field.as_str(),
                        first,
                        second: *name,
                    });
                }
            }
        }

        let mut edges = self.edges;
        let order = self.nodes.iter().map(|(name, _)| *name).collect();
        let nodes = self
            .nodes
            .into_iter()
            .map(|(name, action)| {
                let edge = edges.remove(name);
                (name, GraphNode { action, edge })
            })
            .collect();

        Ok(CompiledGraph {
            nodes,
            order,
            entry,
            finish,
        })
    }
}

struct GraphNode {
    action: Arc<dyn NodeAction>,
    edge: Option<Edge>,
}

/// 带标签的阶段失败记录
#[derive(Debug, Clone, PartialEq)]
pub struct StageFailure {
    pub node: NodeName,
    pub error: StageError,
}

/// 一次运行的完整轨迹
#[derive(Debug, Clone)]
pub struct RunTrace {
    pub run_id: Uuid,
    pub state: PipelineState,
    /// 按执行顺序访问过的节点
    pub visited: Vec<NodeName>,
    /// 条件边处做出的分支选择
    pub decisions: Vec<(NodeName, Route)>,
    pub failures: Vec<StageFailure>,
    pub durations: Vec<(NodeName, Duration)>,
}

impl RunTrace {
    /// 第一个条件分支的选择
    pub fn route(&self) -> Option<Route> {
        self.decisions.first().map(|(_, route)| *route)
    }

    pub fn total_duration(&self) -> Duration {
        self.durations.iter().map(|(_, d)| *d).sum()
    }

    /// 获取格式化的执行时间报告
    pub fn timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.total_duration().as_secs_f64()
        );
        report.push_str("\n各节点执行时间:\n");
        for (node, duration) in &self.durations {
            report.push_str(&format!("- {}: {:.3}秒\n", node, duration.as_secs_f64()));
        }
        report
    }
}

/// 编译后的只读状态图，可被多次、并发地执行
pub struct CompiledGraph {
    nodes: HashMap<NodeName, GraphNode>,
    order: Vec<NodeName>,
    entry: NodeName,
    finish: NodeName,
}

impl CompiledGraph {
    pub fn entry(&self) -> NodeName {
        self.entry
    }

    pub fn finish(&self) -> NodeName {
        self.finish
    }

    /// 按注册顺序列出节点
    pub fn node_names(&self) -> &[NodeName] {
        &self.order
    }

    pub fn edge(&self, node: NodeName) -> Option<&Edge> {
        self.nodes.get(node).and_then(|n| n.edge.as_ref())
    }

    /// 从入口节点开始执行，直到结束节点产出状态
    pub async fn invoke(&self, initial: PipelineState) -> Result<RunTrace, GraphError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id);
        self.execute(run_id, initial).instrument(span).await
    }

    async fn execute(&self, run_id: Uuid, initial: PipelineState) -> Result<RunTrace, GraphError> {
        let max_steps = self.nodes.len();
        let mut state = initial;
        let mut current = self.entry;
        let mut visited = Vec::new();
        let mut decisions = Vec::new();
        let mut failures = Vec::new();
        let mut durations = Vec::new();

        loop {
            if visited.len() >= max_steps {
                return Err(GraphError::StepLimitExceeded(max_steps));
            }

            let node = self
                .nodes
                .get(current)
                .ok_or(GraphError::UnknownNode(current))?;

            info!(node = current, "执行节点");
            let started = Instant::now();
            let output = node.action.apply(&state).await;
            let elapsed = started.elapsed();
            info!(node = current, elapsed_ms = elapsed.as_millis() as u64, "节点完成");

            durations.push((current, elapsed));
            visited.push(current);
            if let Some(error) = output.failure {
                failures.push(StageFailure {
                    node: current,
                    error,
                });
            }
            state = output.state;

            if current == self.finish {
                break;
            }

            current = match &node.edge {
                Some(Edge::Direct(next)) => *next,
                Some(Edge::Conditional { router, branches }) => {
                    let route = router(&state);
                    decisions.push((current, route));
                    branches
                        .get(&route)
                        .copied()
                        .ok_or_else(|| GraphError::UnmappedRoute {
                            node: current,
                            route: route.to_string(),
                        })?
                }
                None => return Err(GraphError::MissingEdge(current)),
            };
        }

        Ok(RunTrace {
            run_id,
            state,
            visited,
            decisions,
            failures,
            durations,
        })
    }
}
