//! Shared loop state — the record handed between planner, reviewer, router.
//!
//! Exactly one of three shapes holds at any inspection point: no proposal,
//! proposal without feedback, or proposal with feedback. Feedback without a
//! proposal is malformed and rejected at construction; mutation goes through
//! [`LoopState::apply_proposal`] / [`LoopState::apply_feedback`], which keep
//! the shape valid (applying a proposal clears feedback).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("malformed state: feedback present without a proposal")]
    FeedbackWithoutProposal,
}

/// Whether a proposal is the planner's first attempt or a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Draft,
    Revised,
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalStatus::Draft => write!(f, "draft"),
            ProposalStatus::Revised => write!(f, "revised"),
        }
    }
}

/// The planner's current candidate output for the task.
///
/// Serde derives double as the wire shape for backend-generated proposals;
/// `status` is always stamped by the planner, never trusted from a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub summary: String,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default = "default_status")]
    pub status: ProposalStatus,
}

fn default_status() -> ProposalStatus {
    ProposalStatus::Draft
}

/// The reviewer's structured verdict on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub approved: bool,
    /// Ordered list of problems; empty on approval.
    #[serde(default)]
    pub issues: Vec<String>,
}

impl Feedback {
    pub fn approval() -> Self {
        Self { approved: true, issues: Vec::new() }
    }
}

/// Mutable state owned by one run of the loop, discarded at termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopState {
    /// Task input, immutable for the run.
    pub task: String,
    /// Review policy flag, immutable for the run.
    pub strict: bool,
    /// Absent until the planner runs.
    pub proposal: Option<Proposal>,
    /// Absent until the reviewer runs; cleared whenever the planner runs.
    pub feedback: Option<Feedback>,
    /// Worker dispatches so far; never reset within a run.
    pub turn_count: u32,
}

impl LoopState {
    /// Fresh state for a new run: no proposal, no feedback, zero turns.
    pub fn new(task: impl Into<String>, strict: bool) -> Self {
        Self {
            task: task.into(),
            strict,
            proposal: None,
            feedback: None,
            turn_count: 0,
        }
    }

    /// Validating constructor for a state assembled from parts.
    ///
    /// Rejects the one shape the router's branching is not defined over:
    /// feedback without a proposal.
    pub fn from_parts(
        task: impl Into<String>,
        strict: bool,
        proposal: Option<Proposal>,
        feedback: Option<Feedback>,
        turn_count: u32,
    ) -> Result<Self, StateError> {
        if feedback.is_some() && proposal.is_none() {
            return Err(StateError::FeedbackWithoutProposal);
        }
        Ok(Self { task: task.into(), strict, proposal, feedback, turn_count })
    }

    /// Install the planner's output, clearing any pending feedback so the
    /// router never mistakes a stale verdict for a fresh review.
    pub fn apply_proposal(&mut self, proposal: Proposal) {
        self.proposal = Some(proposal);
        self.feedback = None;
    }

    /// Install the reviewer's verdict. Callers dispatch the reviewer only
    /// when a proposal exists.
    pub fn apply_feedback(&mut self, feedback: Feedback) {
        debug_assert!(self.proposal.is_some(), "feedback applied before any proposal");
        self.feedback = Some(feedback);
    }
}
