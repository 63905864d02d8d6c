//! Shared vocabulary types for the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five working stages of a pipeline run, in execution order.
///
/// Serialized as lowercase strings (`"generating"`, `"persisting"`, ...) in
/// run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Generating,
    Persisting,
    Deploying,
    Starting,
    Reporting,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::Generating,
        Stage::Persisting,
        Stage::Deploying,
        Stage::Starting,
        Stage::Reporting,
    ];

    /// Stable string form used in logs and serialized summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Generating => "generating",
            Stage::Persisting => "persisting",
            Stage::Deploying => "deploying",
            Stage::Starting => "starting",
            Stage::Reporting => "reporting",
        }
    }

    /// The stage that follows this one, or `None` after `Reporting`.
    #[must_use]
    pub const fn next(self) -> Option<Stage> {
        match self {
            Stage::Generating => Some(Stage::Persisting),
            Stage::Persisting => Some(Stage::Deploying),
            Stage::Deploying => Some(Stage::Starting),
            Stage::Starting => Some(Stage::Reporting),
            Stage::Reporting => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observable pipeline state.
///
/// Transitions are strictly forward-only: `Idle` enters the first working
/// stage, each working stage advances to its successor, the last working
/// stage completes, and any working stage may drop into the absorbing
/// `Failed` state. There is no backtracking and no re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No run has started.
    Idle,
    /// A run is inside the given working stage.
    Working(Stage),
    /// The run finished all five stages.
    Completed,
    /// The run halted inside the given stage; absorbing.
    Failed(Stage),
}

impl PipelineState {
    /// Whether `next` is a legal successor of this state.
    #[must_use]
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        match (self, next) {
            (PipelineState::Idle, PipelineState::Working(Stage::Generating)) => true,
            (PipelineState::Working(from), PipelineState::Working(to)) => from.next() == Some(to),
            (PipelineState::Working(Stage::Reporting), PipelineState::Completed) => true,
            (PipelineState::Working(from), PipelineState::Failed(at)) => from == at,
            _ => false,
        }
    }

    /// Whether this state accepts no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Failed(_))
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Working(stage) => write!(f, "{stage}"),
            PipelineState::Completed => write!(f, "completed"),
            PipelineState::Failed(stage) => write!(f, "failed({stage})"),
        }
    }
}

/// Which engine endpoint a client error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    Deploy,
    Start,
}

impl EngineCall {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EngineCall::Deploy => "deploy",
            EngineCall::Start => "start",
        }
    }
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier of a deployed process definition.
///
/// Exists only with a non-empty value: extraction fails before an empty id
/// can be constructed into a pipeline result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessDefinitionId(String);

impl ProcessDefinitionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessDefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a running process instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessInstanceId(String);

impl ProcessInstanceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
