//! Reviewer node — inspects the current proposal and emits a verdict.
//!
//! Deterministic for a given proposal + strict flag: the templated policy is
//! pure, and backend-driven reviews run at the configured temperature
//! (0.0 by default). Never fails — a backend error or malformed reply falls
//! back to approval.

use tracing::{debug, warn};

use crate::llm::LlmProvider;

use super::state::{Feedback, LoopState, Proposal, ProposalStatus};

pub(super) async fn run(state: &LoopState, provider: Option<&LlmProvider>) -> Feedback {
    let Some(proposal) = &state.proposal else {
        // The router dispatches the reviewer only when a proposal exists.
        return Feedback::approval();
    };

    if let Some(provider) = provider {
        let prompt = build_prompt(proposal, state.strict);
        match provider.complete(&prompt).await {
            Ok(raw) => {
                if let Ok(feedback) = serde_json::from_str::<Feedback>(&raw) {
                    debug!(approved = feedback.approved, issues = feedback.issues.len(), "reviewer verdict");
                    return feedback;
                }
                warn!(reply_len = raw.len(), "reviewer reply was not a verdict, approving");
            }
            Err(e) => warn!(error = %e, "reviewer backend call failed, approving"),
        }
        return Feedback::approval();
    }

    // Templated policy: strict mode rejects anything not yet revised.
    if state.strict && proposal.status != ProposalStatus::Revised {
        Feedback {
            approved: false,
            issues: vec!["Proposal needs more detail for strict mode".to_string()],
        }
    } else {
        Feedback::approval()
    }
}

fn build_prompt(proposal: &Proposal, strict: bool) -> String {
    let rendered = serde_json::to_string(proposal).unwrap_or_else(|_| proposal.summary.clone());
    format!(
        "You are a Reviewer agent. Review the following proposal:\n\n\
         Proposal: {rendered}\nStrict mode: {strict}\n\n\
         Check for completeness, correctness, and quality.\n\
         Return JSON with keys: approved (bool), issues (list of strings)."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::{dummy::DummyProvider, fixed::FixedProvider};
    use crate::workflow::state::Proposal;

    fn state_with(status: ProposalStatus, strict: bool) -> LoopState {
        let proposal = Proposal {
            summary: "Proposal for: test".into(),
            action_items: vec!["Process: test".into()],
            status,
        };
        LoopState::from_parts("test", strict, Some(proposal), None, 2).unwrap()
    }

    #[tokio::test]
    async fn lenient_mode_approves_draft() {
        let fb = run(&state_with(ProposalStatus::Draft, false), None).await;
        assert!(fb.approved);
        assert!(fb.issues.is_empty());
    }

    #[tokio::test]
    async fn strict_mode_rejects_draft_with_issues() {
        let fb = run(&state_with(ProposalStatus::Draft, true), None).await;
        assert!(!fb.approved);
        assert!(!fb.issues.is_empty());
    }

    #[tokio::test]
    async fn strict_mode_approves_revision() {
        let fb = run(&state_with(ProposalStatus::Revised, true), None).await;
        assert!(fb.approved);
    }

    #[tokio::test]
    async fn same_proposal_same_verdict() {
        let state = state_with(ProposalStatus::Draft, true);
        let first = run(&state, None).await;
        let second = run(&state, None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn backend_verdict_is_parsed() {
        let reply = r#"{"approved": false, "issues": ["summary too vague"]}"#;
        let provider = LlmProvider::Fixed(FixedProvider::new(reply));
        let fb = run(&state_with(ProposalStatus::Revised, false), Some(&provider)).await;
        assert!(!fb.approved);
        assert_eq!(fb.issues, vec!["summary too vague".to_string()]);
    }

    #[tokio::test]
    async fn malformed_backend_reply_approves() {
        let provider = LlmProvider::Dummy(DummyProvider);
        let fb = run(&state_with(ProposalStatus::Draft, true), Some(&provider)).await;
        assert!(fb.approved);
        assert!(fb.issues.is_empty());
    }
}
