//! Supervisor routing — decides the next step from the current state.

use super::state::LoopState;

/// Hard bound on worker dispatches per run. The loop terminates by
/// `max_turns + 1` even against a reviewer that never approves.
pub const MAX_TURNS: u32 = 5;

/// Next step for the loop driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No proposal yet — dispatch the planner.
    NeedPlanner,
    /// Proposal pending review — dispatch the reviewer.
    NeedReviewer,
    /// Reviewer rejected — dispatch the planner for a revision.
    LoopBack,
    /// Done: approved, or the turn bound was exceeded.
    Terminated,
}

/// Routing decision, in priority order:
///
/// 1. turn bound exceeded → terminate, whatever the proposal/feedback state;
/// 2. feedback present → loop back on rejection, terminate on approval;
/// 3. proposal without feedback → review it;
/// 4. nothing yet → plan.
pub fn decide(state: &LoopState, max_turns: u32) -> Route {
    if state.turn_count > max_turns {
        return Route::Terminated;
    }

    if let Some(feedback) = &state.feedback {
        return if feedback.approved {
            Route::Terminated
        } else {
            Route::LoopBack
        };
    }

    if state.proposal.is_some() {
        Route::NeedReviewer
    } else {
        Route::NeedPlanner
    }
}
