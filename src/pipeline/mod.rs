//! The plan-generation pipeline.
//!
//! Data flows one way: raw page text → structural sections (+ topics/terms)
//! → content chunks → dated sessions → persisted session records. Every
//! stage is synchronous and pure except the optional LLM enhancement call,
//! which is timeout-bounded and falls back to the heuristic path on any
//! failure.

pub mod analyzer;
pub mod enhance;
pub mod error;
pub mod partitioner;
pub mod patterns;
pub mod planner;
pub mod scheduler;
pub mod source;

pub use error::PlanError;
