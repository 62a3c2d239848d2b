//! Planner node — drafts a proposal, or revises it after a rejection.
//!
//! Never fails: with no backend, or when the backend reply does not parse as
//! a proposal, a deterministic templated proposal is substituted. The node
//! returns the new [`Proposal`]; installing it (which also clears pending
//! feedback) is [`LoopState::apply_proposal`]'s job.

use tracing::{debug, warn};

use crate::llm::LlmProvider;

use super::state::{Feedback, LoopState, Proposal, ProposalStatus};

pub(super) async fn run(state: &LoopState, provider: Option<&LlmProvider>) -> Proposal {
    let rejection = state.feedback.as_ref().filter(|f| !f.approved);
    let status = match rejection {
        Some(_) => ProposalStatus::Revised,
        None => ProposalStatus::Draft,
    };

    if let Some(provider) = provider {
        let prompt = build_prompt(&state.task, rejection);
        match provider.complete(&prompt).await {
            Ok(raw) => {
                if let Ok(mut proposal) = serde_json::from_str::<Proposal>(&raw) {
                    // Draft/revised is decided here, not by the model.
                    proposal.status = status;
                    debug!(%status, summary = %proposal.summary, "planner produced proposal");
                    return proposal;
                }
                warn!(reply_len = raw.len(), "planner reply was not a proposal, using template");
            }
            Err(e) => warn!(error = %e, "planner backend call failed, using template"),
        }
    }

    template(&state.task, status)
}

fn build_prompt(task: &str, rejection: Option<&Feedback>) -> String {
    let mut prompt = format!(
        "You are a Planner agent. Your job is to create a proposal.\n\nTask: {task}\n"
    );

    if let Some(feedback) = rejection {
        let issues = serde_json::to_string(&feedback.issues).unwrap_or_default();
        prompt.push_str(&format!(
            "\nThe Reviewer found issues with your previous proposal:\nIssues: {issues}\n\
             Please revise your proposal to address these issues.\n"
        ));
    }

    prompt.push_str("\nReturn a JSON object with keys: summary, action_items (list of strings).");
    prompt
}

fn template(task: &str, status: ProposalStatus) -> Proposal {
    let summary = match status {
        ProposalStatus::Draft => format!("Proposal for: {task}"),
        ProposalStatus::Revised => format!("Proposal for: {task} (revised)"),
    };
    Proposal {
        summary,
        action_items: vec![format!("Process: {task}")],
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::fixed::FixedProvider;

    fn rejected_state() -> LoopState {
        LoopState::from_parts(
            "Write a chapter",
            true,
            Some(template("Write a chapter", ProposalStatus::Draft)),
            Some(Feedback { approved: false, issues: vec!["too thin".into()] }),
            2,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn no_backend_yields_templated_draft() {
        let state = LoopState::new("Write a chapter", false);
        let p = run(&state, None).await;
        assert_eq!(p.status, ProposalStatus::Draft);
        assert_eq!(p.summary, "Proposal for: Write a chapter");
        assert!(!p.action_items.is_empty());
    }

    #[tokio::test]
    async fn rejecting_feedback_yields_revision() {
        let p = run(&rejected_state(), None).await;
        assert_eq!(p.status, ProposalStatus::Revised);
        assert!(p.summary.contains("(revised)"));
    }

    #[tokio::test]
    async fn approved_feedback_does_not_trigger_revision() {
        let mut state = rejected_state();
        state.feedback = Some(Feedback::approval());
        let p = run(&state, None).await;
        assert_eq!(p.status, ProposalStatus::Draft);
    }

    #[tokio::test]
    async fn backend_proposal_is_parsed_and_stamped() {
        let reply = r#"{"summary": "A better plan", "action_items": ["do it"], "status": "draft"}"#;
        let provider = LlmProvider::Fixed(FixedProvider::new(reply));
        let p = run(&rejected_state(), Some(&provider)).await;
        assert_eq!(p.summary, "A better plan");
        // stamped from the rejection context, overriding the reply's "draft"
        assert_eq!(p.status, ProposalStatus::Revised);
    }

    #[tokio::test]
    async fn malformed_backend_reply_falls_back_to_template() {
        let provider = LlmProvider::Fixed(FixedProvider::new("not json at all"));
        let state = LoopState::new("Write a chapter", false);
        let p = run(&state, Some(&provider)).await;
        assert_eq!(p, template("Write a chapter", ProposalStatus::Draft));
    }

    #[test]
    fn prompt_includes_issues_only_on_rejection() {
        let plain = build_prompt("Write a chapter", None);
        assert!(!plain.contains("found issues"));

        let feedback = Feedback { approved: false, issues: vec!["too thin".into()] };
        let revised = build_prompt("Write a chapter", Some(&feedback));
        assert!(revised.contains("found issues"));
        assert!(revised.contains("too thin"));
    }
}
