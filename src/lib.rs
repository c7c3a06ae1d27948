pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod pipeline;
pub mod search;
pub mod session;
pub mod workflow;

// Re-export commonly used types
pub use config::Config;
pub use error::{CollaboratorError, GraphError, PipelineError, StageError};
pub use pipeline::state::PipelineState;
pub use pipeline::{PipelineContext, ResearchPipeline};
pub use session::Session;
pub use workflow::launch;
