//! Workflow step names.

use serde::{Deserialize, Serialize};

/// Steps of the segment detection state machine.
///
/// The serialized names double as the keys under which each step writes its
/// output into the workflow state snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStep {
    RunMediainfo,
    StartMediaconvert,
    StartSegmentDetection,
    CollectDetectionResults,
    CreateTimeline,
}

impl WorkflowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::RunMediainfo => "run-mediainfo",
            WorkflowStep::StartMediaconvert => "start-mediaconvert",
            WorkflowStep::StartSegmentDetection => "start-segment-detection",
            WorkflowStep::CollectDetectionResults => "collect-detection-results",
            WorkflowStep::CreateTimeline => "create-timeline",
        }
    }
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
