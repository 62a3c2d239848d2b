//! Turn-bounded revision loop — planner drafts, reviewer verdicts, router
//! decides, until approval or the turn bound.
//!
//! The loop is an explicit [`Workflow`] value owned by the caller; there is
//! no process-wide graph or ambient state. Each run owns its [`LoopState`]
//! exclusively and every step runs to completion before the router looks at
//! the state again.

mod planner;
mod reviewer;
pub mod router;
pub mod state;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::llm::LlmProvider;

pub use router::{Route, MAX_TURNS};
pub use state::{Feedback, LoopState, Proposal, ProposalStatus, StateError};

// ── Outcome ───────────────────────────────────────────────────────────────────

/// One worker dispatch, in order of occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Planner,
    Reviewer,
}

/// Terminal result of a run: the final state plus the ordered dispatch trace.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: LoopState,
    pub visits: Vec<Visit>,
}

impl RunOutcome {
    /// `true` when the run ended with an approved proposal (as opposed to
    /// being cut off by the turn bound).
    pub fn approved(&self) -> bool {
        self.state.feedback.as_ref().is_some_and(|f| f.approved)
    }
}

// ── Workflow ──────────────────────────────────────────────────────────────────

/// The revision loop, constructed once and reusable across runs.
///
/// Holds the optional generation backend and the turn bound. Without a
/// backend, planner and reviewer use their deterministic templated policies.
pub struct Workflow {
    provider: Option<LlmProvider>,
    max_turns: u32,
}

impl Workflow {
    pub fn new(provider: Option<LlmProvider>) -> Self {
        Self { provider, max_turns: MAX_TURNS }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Drive `state` to termination and return the final state.
    ///
    /// Infallible: generation problems are absorbed by the node fallbacks,
    /// and non-convergence is cut off by the turn bound.
    pub async fn run(&self, state: LoopState) -> RunOutcome {
        let span = info_span!(
            "revision_run",
            run_id = %Uuid::new_v4(),
            strict = state.strict,
        );
        self.drive(state).instrument(span).await
    }

    async fn drive(&self, mut state: LoopState) -> RunOutcome {
        let mut visits = Vec::new();

        loop {
            let route = router::decide(&state, self.max_turns);
            debug!(turn = state.turn_count, ?route, "router decision");

            match route {
                Route::Terminated => {
                    info!(
                        turn = state.turn_count,
                        approved = state.feedback.as_ref().map(|f| f.approved),
                        "run terminated"
                    );
                    return RunOutcome { state, visits };
                }
                Route::NeedPlanner | Route::LoopBack => {
                    state.turn_count += 1;
                    debug!(turn = state.turn_count, "dispatching planner");
                    let proposal = planner::run(&state, self.provider.as_ref()).await;
                    state.apply_proposal(proposal);
                    visits.push(Visit::Planner);
                }
                Route::NeedReviewer => {
                    state.turn_count += 1;
                    debug!(turn = state.turn_count, "dispatching reviewer");
                    let feedback = reviewer::run(&state, self.provider.as_ref()).await;
                    state.apply_feedback(feedback);
                    visits.push(Visit::Reviewer);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::fixed::FixedProvider;

    #[tokio::test]
    async fn first_turn_always_dispatches_planner() {
        let outcome = Workflow::new(None).run(LoopState::new("t", false)).await;
        assert_eq!(outcome.visits.first(), Some(&Visit::Planner));
    }

    #[tokio::test]
    async fn turn_count_equals_worker_visits() {
        let outcome = Workflow::new(None).run(LoopState::new("t", true)).await;
        assert_eq!(outcome.state.turn_count as usize, outcome.visits.len());
    }

    #[tokio::test]
    async fn custom_turn_bound_is_honored() {
        // A reviewer that never approves, cut off by a tighter bound.
        let reject = r#"{"approved": false, "issues": ["no"]}"#;
        let provider = Some(LlmProvider::Fixed(FixedProvider::new(reject)));
        let outcome = Workflow::new(provider)
            .with_max_turns(2)
            .run(LoopState::new("t", false))
            .await;
        assert_eq!(outcome.state.turn_count, 3);
        assert!(!outcome.approved());
    }
}
