// src/lib.rs
// Homework Copilot - LLM orchestration and adaptive tutoring policy

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod analysis;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod llm;
pub mod policy;
pub mod state;
pub mod tutor;

pub use error::{CopilotError, ErrorKind, Result};
