//! Integration tests for collision cards and generator sessions

mod batch_plan;
mod cli_commands;
mod session_flow;
mod test_utils;

pub use test_utils::{recording_session, RecordingRunner};
