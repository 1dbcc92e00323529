//! Shared test utilities for integration tests
//!
//! Provides a recording stand-in for the generator that behaves like it on
//! the filesystem: a process card creates the directory named by its
//! `output` line, a launch card creates `Events/<run>` inside the directory.

use evgen::environment::NoopEnvironment;
use evgen::error::SessionError;
use evgen::runner::{ToolInvocation, ToolOutcome, ToolRunner};
use evgen::session::GeneratorSession;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Fake generator recording every invocation.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<ToolInvocation>>>,
    failing_cards: Arc<Mutex<HashSet<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make launches with this card file name exit with status 1.
    pub fn fail_on(&self, card_name: &str) {
        self.failing_cards.lock().unwrap().insert(card_name.to_string());
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn cards(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.card.to_string_lossy().to_string())
            .collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutcome, SessionError> {
        self.calls.lock().unwrap().push(invocation.clone());

        let card_name = invocation.card.to_string_lossy().to_string();
        if self.failing_cards.lock().unwrap().contains(&card_name) {
            return Ok(ToolOutcome {
                status: Some(1),
                stdout: String::new(),
                stderr: format!("fake failure on {}", card_name),
            });
        }

        let card = std::fs::read_to_string(invocation.working_dir.join(&invocation.card))?;
        let mut lines = card.lines();
        if let Some(launch) = lines.next().filter(|l| l.starts_with("launch ")) {
            let parts: Vec<&str> = launch.split_whitespace().collect();
            let run_dir = invocation
                .working_dir
                .join(parts[1])
                .join("Events")
                .join(parts[3]);
            std::fs::create_dir_all(run_dir)?;
        } else if let Some(output) = card.lines().find(|l| l.starts_with("output ")) {
            let directory = output.split_whitespace().last().unwrap_or_default();
            std::fs::create_dir_all(invocation.working_dir.join(directory).join("Cards"))?;
        }

        Ok(ToolOutcome::succeeded())
    }
}

/// Session writing into `working_dir` and launching the recording runner.
pub fn recording_session(working_dir: &Path, runner: &RecordingRunner) -> GeneratorSession {
    GeneratorSession::new("/opt/MG5_aMC")
        .with_working_dir(working_dir)
        .with_runner(Box::new(runner.clone()))
        .with_environment(Box::new(NoopEnvironment))
}
