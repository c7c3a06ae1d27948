//! 错误类型定义
//!
//! 流水线内部使用 `thiserror` 定义的类型化错误，应用入口层统一转换为 `anyhow::Error`。

/// 外部协作服务（生成服务、搜索服务）调用失败
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollaboratorError {
    /// 网络层错误（连接失败、DNS、TLS 等）
    #[error("transport error: {0}")]
    Transport(String),

    /// 服务返回了非成功状态码
    #[error("service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// 响应体无法解析
    #[error("malformed response: {0}")]
    Malformed(String),

    /// 调用超过截止时间
    #[error("call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// LLM Provider 返回的其他错误
    #[error("provider error: {0}")]
    Provider(String),
}

/// 单个阶段执行失败
///
/// 流水线是 fail-soft 的：阶段失败不会中断运行，而是在写回状态时被替换为哨兵文本。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StageError {
    #[error("{stage}: {source}")]
    Collaborator {
        stage: &'static str,
        #[source]
        source: CollaboratorError,
    },

    #[error("{stage}: required input `{field}` is empty")]
    EmptyInput {
        stage: &'static str,
        field: &'static str,
    },

    #[error("{stage}: collaborator returned empty text")]
    EmptyOutput { stage: &'static str },
}

impl StageError {
    pub fn collaborator(stage: &'static str, source: CollaboratorError) -> Self {
        Self::Collaborator { stage, source }
    }

    /// 底层的协作服务错误，策略类错误返回 `None`
    pub fn collaborator_error(&self) -> Option<&CollaboratorError> {
        match self {
            StageError::Collaborator { source, .. } => Some(source),
            _ => None,
        }
    }

    /// 出错的阶段名称
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Collaborator { stage, .. }
            | StageError::EmptyInput { stage, .. }
            | StageError::EmptyOutput { stage } => stage,
        }
    }
}

/// 图构建校验与执行期错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("graph has no entry node")]
    MissingEntry,

    #[error("graph has no finish node")]
    MissingFinish,

    #[error("node `{0}` is registered twice")]
    DuplicateNode(&'static str),

    #[error("edge references unknown node `{0}`")]
    UnknownNode(&'static str),

    #[error("node `{0}` has no outgoing edge")]
    MissingEdge(&'static str),

    #[error("node `{0}` already has an outgoing edge")]
    EdgeAlreadyDefined(&'static str),

    #[error("finish node `{0}` must not have outgoing edges")]
    FinishHasEdge(&'static str),

    #[error("conditional edge from `{node}` does not map route `{route}`")]
    UnmappedRoute { node: &'static str, route: String },

    #[error("field `{field}` is written by more than one node ({first}, {second})")]
    MultipleWriters {
        field: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("run exceeded {0} steps without reaching the finish node")]
    StepLimitExceeded(usize),
}

/// 流水线层错误
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 协作服务客户端构建失败（如缺少凭据），发生在任何节点执行之前
    #[error("failed to construct collaborator: {0}")]
    Construction(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
