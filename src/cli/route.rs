//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::batch::{BatchExecutor, BatchJob, FailurePolicy, RunPlan, ThresholdScan};
use crate::cards::ParamSet;
use crate::cli::parse::{CardCommands, CollisionArgs, Commands, LaunchArgs};
use crate::cli::presentation::{format_batch_report, format_collision, format_job_list};
use crate::collision::CollisionSpec;
use crate::config::{ConfigLoader, EvgenConfig};
use crate::error::EvgenError;
use crate::session::{GeneratorSession, LaunchOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    config: EvgenConfig,
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, EvgenError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(config, workspace_root, config_path)
    }

    /// Create run context from an already loaded configuration.
    pub fn from_config(
        config: EvgenConfig,
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
    ) -> Result<Self, EvgenError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            EvgenError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        Ok(Self {
            config,
            workspace_root,
            config_path,
        })
    }

    /// Point the session at another installation.
    pub fn with_install_path(mut self, install_path: Option<PathBuf>) -> Self {
        if let Some(path) = install_path {
            self.config.generator.install_path = path;
        }
        self
    }

    pub fn config(&self) -> &EvgenConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn session(&self) -> GeneratorSession {
        self.config.generator.build_session(&self.workspace_root)
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, EvgenError> {
        match command {
            Commands::Describe { collision, format } => {
                let spec = self.collision(collision)?;
                format_collision(&spec, format)
            }
            Commands::Card { command } => self.handle_card(command),
            Commands::Materialize {
                collision,
                directory,
                ee_isr,
            } => self.handle_materialize(collision, directory, *ee_isr),
            Commands::Generate {
                launch,
                beams,
                beam_energy,
            } => self.handle_generate(launch, beams.as_deref(), beam_energy),
            Commands::Run {
                plan,
                best_effort,
                dry_run,
                format,
            } => self.handle_run(plan, *best_effort, *dry_run, format),
            Commands::Scan {
                mass,
                points,
                start_offset,
                end_offset,
                best_effort,
                dry_run,
                format,
            } => {
                let mut scan = ThresholdScan::lepton_colliders()?;
                scan.top_mass = *mass;
                scan.points = *points;
                scan.start_offset = *start_offset;
                scan.end_offset = *end_offset;
                self.run_jobs(&scan.jobs(), *best_effort, *dry_run, format)
            }
        }
    }

    fn collision(&self, args: &CollisionArgs) -> Result<CollisionSpec, EvgenError> {
        let spec = CollisionSpec::builder(&args.initial_state, &args.final_state)
            .energies(&args.ebeam1, &args.ebeam2)
            .polarizations(&args.polbeam1, &args.polbeam2)
            .label(&args.label)
            .include_pdf_codes(args.pdf_codes || self.config.collisions.include_pdf_codes)
            .build()?;
        debug!(collision = %spec.process_expression(), "Collision parsed");
        Ok(spec)
    }

    fn launch_options(&self, args: &LaunchArgs, seed: ParamSet) -> Result<LaunchOptions, EvgenError> {
        let mut parameters = seed;
        for raw in &args.set {
            let (name, value) = ParamSet::parse_assignment(raw).ok_or_else(|| {
                EvgenError::ConfigError(format!(
                    "Invalid parameter override '{}' (expected NAME=VALUE)",
                    raw
                ))
            })?;
            parameters.insert(name, value);
        }
        Ok(LaunchOptions {
            parameters,
            pythia: args.pythia,
            delphes: args.delphes,
            analysis_off: !args.with_analysis,
        })
    }

    fn handle_card(&self, command: &CardCommands) -> Result<String, EvgenError> {
        let session = self.session();
        match command {
            CardCommands::Process {
                collision,
                directory,
                ee_isr,
            } => {
                let spec = self.collision(collision)?;
                let card = session.render_process_card(&spec.process_expression(), directory, *ee_isr);
                Ok(card.render())
            }
            CardCommands::Launch { launch } => {
                let options = self.launch_options(launch, ParamSet::new())?;
                let card = session.render_launch_card(&launch.directory, &launch.run, &options);
                Ok(card.render())
            }
        }
    }

    fn handle_materialize(
        &self,
        args: &CollisionArgs,
        directory: &str,
        ee_isr: bool,
    ) -> Result<String, EvgenError> {
        let spec = self.collision(args)?;
        info!(summary = %spec.describe(), "Materializing collision");
        let report = self
            .session()
            .materialize_process(&spec.process_expression(), directory, ee_isr)?;
        Ok(format!(
            "Created process directory {}{}\nProcess card archived at {}",
            report.process_dir.display(),
            if report.ee_isr { " (EE_ISR)" } else { "" },
            report.archived_card.display()
        ))
    }

    fn handle_generate(
        &self,
        args: &LaunchArgs,
        beams: Option<&str>,
        beam_energy: &str,
    ) -> Result<String, EvgenError> {
        let seed = match beams {
            Some(initial) => CollisionSpec::builder(initial, "")
                .energies(beam_energy, beam_energy)
                .include_pdf_codes(self.config.collisions.include_pdf_codes)
                .build()?
                .beam_parameters(),
            None => ParamSet::new(),
        };
        let options = self.launch_options(args, seed)?;
        let report = self
            .session()
            .generate_events(&args.directory, &args.run, &options)?;
        Ok(format!(
            "Run {} finished in {}\nLaunch card archived at {}",
            report.run,
            args.directory,
            report.archived_card.display()
        ))
    }

    fn handle_run(
        &self,
        plan_path: &Path,
        best_effort: bool,
        dry_run: bool,
        format: &str,
    ) -> Result<String, EvgenError> {
        let plan_path = if plan_path.is_absolute() {
            plan_path.to_path_buf()
        } else {
            self.workspace_root.join(plan_path)
        };
        let plan = RunPlan::load(&plan_path)?;
        let jobs = plan.jobs(self.config.collisions.include_pdf_codes)?;
        self.run_jobs(&jobs, best_effort, dry_run, format)
    }

    fn run_jobs(
        &self,
        jobs: &[BatchJob],
        best_effort: bool,
        dry_run: bool,
        format: &str,
    ) -> Result<String, EvgenError> {
        if dry_run {
            return format_job_list(jobs, format);
        }
        let policy = if best_effort {
            FailurePolicy::BestEffort
        } else {
            self.config.batch.failure_policy
        };
        let report = BatchExecutor::new(policy).execute(&self.session(), jobs)?;
        format_batch_report(&report, format)
    }
}
