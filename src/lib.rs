//! revisor — turn-bounded planner/reviewer revision loop.
//!
//! A [`workflow::Workflow`] drives a planner and a reviewer over a shared
//! [`workflow::LoopState`] until the reviewer approves or the turn bound is
//! hit. An optional [`llm::LlmProvider`] backend generates proposals and
//! verdicts; without one, deterministic templated policies apply.

pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod workflow;
