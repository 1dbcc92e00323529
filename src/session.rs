//! Generator session
//!
//! Binds an installation of the generator to a working directory and exposes
//! the two operations of the pipeline: materializing a process directory from
//! a process card, and generating events in it from a launch card. Every
//! operation is a blocking sequence of card write, generator launch and card
//! archival into the process directory.

use crate::cards::{initial_state_of, supports_ee_isr, LaunchCard, ParamSet, ProcessCard};
use crate::environment::{EnvironmentPreparer, NoopEnvironment};
use crate::error::SessionError;
use crate::runner::{SystemRunner, ToolInvocation, ToolOutcome, ToolRunner};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Executable name inside `<install>/bin`.
pub const DEFAULT_EXECUTABLE: &str = "mg5_aMC";

/// Options for one run of event generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub parameters: ParamSet,
    /// Enable Pythia8 showering.
    pub pythia: bool,
    /// Enable Delphes detector simulation.
    pub delphes: bool,
    pub analysis_off: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            parameters: ParamSet::new(),
            pythia: false,
            delphes: false,
            analysis_off: true,
        }
    }
}

impl LaunchOptions {
    pub fn with_parameters(parameters: ParamSet) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }
}

/// Result of [`GeneratorSession::materialize_process`].
#[derive(Debug, Clone)]
pub struct MaterializeReport {
    pub card_path: PathBuf,
    pub archived_card: PathBuf,
    pub process_dir: PathBuf,
    /// Whether EE_ISR ended up in the card.
    pub ee_isr: bool,
    pub outcome: ToolOutcome,
}

/// Result of [`GeneratorSession::generate_events`].
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub card_path: PathBuf,
    pub archived_card: PathBuf,
    pub run: String,
    pub outcome: ToolOutcome,
}

/// Handle on a generator installation.
pub struct GeneratorSession {
    install_path: PathBuf,
    executable_name: String,
    working_dir: PathBuf,
    check_exit_status: bool,
    runner: Box<dyn ToolRunner>,
    environment: Box<dyn EnvironmentPreparer>,
}

impl std::fmt::Debug for GeneratorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorSession")
            .field("install_path", &self.install_path)
            .field("executable_name", &self.executable_name)
            .field("working_dir", &self.working_dir)
            .field("check_exit_status", &self.check_exit_status)
            .finish_non_exhaustive()
    }
}

impl GeneratorSession {
    /// Session running the real executable from the current directory, with
    /// no environment preparation.
    pub fn new(install_path: impl Into<PathBuf>) -> Self {
        Self {
            install_path: install_path.into(),
            executable_name: DEFAULT_EXECUTABLE.to_string(),
            working_dir: PathBuf::from("."),
            check_exit_status: true,
            runner: Box::new(SystemRunner),
            environment: Box::new(NoopEnvironment),
        }
    }

    pub fn with_executable(mut self, name: impl Into<String>) -> Self {
        self.executable_name = name.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_runner(mut self, runner: Box<dyn ToolRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_environment(mut self, environment: Box<dyn EnvironmentPreparer>) -> Self {
        self.environment = environment;
        self
    }

    /// When off, a failing generator is logged but not reported as an error.
    pub fn with_exit_status_check(mut self, check: bool) -> Self {
        self.check_exit_status = check;
        self
    }

    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// `<install_path>/bin/<executable>`. A relative install path is taken
    /// from the working directory, the same way the setup script is.
    pub fn executable_path(&self) -> PathBuf {
        let root = if self.install_path.is_absolute() {
            self.install_path.clone()
        } else {
            self.working_dir.join(&self.install_path)
        };
        root.join("bin").join(&self.executable_name)
    }

    pub fn process_dir(&self, directory: &str) -> PathBuf {
        self.working_dir.join(directory)
    }

    /// Build the process card, downgrading EE_ISR when the initial state is
    /// not electron-positron. No side effects besides the warning.
    pub fn render_process_card(
        &self,
        process: &str,
        directory: &str,
        extra_radiation: bool,
    ) -> ProcessCard {
        let mut ee_isr = extra_radiation;
        if extra_radiation {
            let initial = initial_state_of(process);
            if !supports_ee_isr(&initial) {
                warn!(
                    initial_state = %initial,
                    directory,
                    "EE_ISR is only available for e+ e- collisions, disabling it"
                );
                ee_isr = false;
            }
        }
        ProcessCard::new(process, directory, ee_isr)
    }

    pub fn render_launch_card(&self, directory: &str, run: &str, options: &LaunchOptions) -> LaunchCard {
        let mut card = LaunchCard::new(directory, run);
        card.analysis_off = options.analysis_off;
        card.shower = options.pythia;
        card.detector = options.delphes;
        card.parameters = options.parameters.clone();
        card
    }

    /// Create the process directory for `process` under `directory`.
    pub fn materialize_process(
        &self,
        process: &str,
        directory: &str,
        extra_radiation: bool,
    ) -> Result<MaterializeReport, SessionError> {
        info!(process, directory, extra_radiation, "Materializing process directory");

        let card = self.render_process_card(process, directory, extra_radiation);
        let card_path = self.working_dir.join(card.file_name());
        std::fs::write(&card_path, card.render())?;
        debug!(card = %card_path.display(), "Wrote process card");

        let outcome = self.launch(&card_path)?;
        self.check_outcome(&card_path, &outcome)?;

        let process_dir = self.process_dir(directory);
        if !process_dir.is_dir() {
            return Err(SessionError::ProcessDirectoryNotCreated(process_dir));
        }

        let archived_card = process_dir.join(card.file_name());
        std::fs::copy(&card_path, &archived_card)?;
        debug!(archived = %archived_card.display(), "Archived process card");

        info!(directory, ee_isr = card.ee_isr, "Process directory ready");
        Ok(MaterializeReport {
            card_path,
            archived_card,
            process_dir,
            ee_isr: card.ee_isr,
            outcome,
        })
    }

    /// Generate a run of events in an existing process directory.
    pub fn generate_events(
        &self,
        directory: &str,
        run: &str,
        options: &LaunchOptions,
    ) -> Result<GenerateReport, SessionError> {
        let process_dir = self.process_dir(directory);
        if !process_dir.is_dir() {
            return Err(SessionError::MissingProcessDirectory(process_dir));
        }

        info!(
            directory,
            run,
            pythia = options.pythia,
            delphes = options.delphes,
            parameters = options.parameters.len(),
            "Generating events"
        );

        let card = self.render_launch_card(directory, run, options);
        let card_path = self.working_dir.join(card.file_name());
        std::fs::write(&card_path, card.render())?;
        debug!(card = %card_path.display(), "Wrote launch card");

        let outcome = self.launch(&card_path)?;

        let archived_card = process_dir.join(card.file_name());
        std::fs::copy(&card_path, &archived_card)?;
        debug!(archived = %archived_card.display(), "Archived launch card");

        self.check_outcome(&card_path, &outcome)?;

        info!(directory, run, "Event generation finished");
        Ok(GenerateReport {
            card_path,
            archived_card,
            run: run.to_string(),
            outcome,
        })
    }

    fn launch(&self, card_path: &Path) -> Result<ToolOutcome, SessionError> {
        let env = self.environment.prepare(&self.working_dir)?;
        let card = card_path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| card_path.to_path_buf());
        let invocation = ToolInvocation {
            executable: self.executable_path(),
            card,
            working_dir: self.working_dir.clone(),
            env,
        };
        self.runner.run(&invocation)
    }

    fn check_outcome(&self, card_path: &Path, outcome: &ToolOutcome) -> Result<(), SessionError> {
        if outcome.success() {
            return Ok(());
        }
        if self.check_exit_status {
            return Err(SessionError::ToolFailed {
                card: card_path.to_path_buf(),
                status: outcome.status,
                stderr: outcome.stderr.trim().to_string(),
            });
        }
        warn!(
            card = %card_path.display(),
            status = ?outcome.status,
            "Generator exited unsuccessfully, continuing"
        );
        Ok(())
    }
}
