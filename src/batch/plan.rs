//! Run plans: multi-collision driver sequences described in TOML.

use crate::cards::ParamSet;
use crate::collision::CollisionSpec;
use crate::error::EvgenError;
use crate::session::LaunchOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// What to do when one directory of a batch fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole sequence at the first failure.
    #[default]
    FailFast,
    /// Record the failure, skip the rest of that directory, keep going.
    BestEffort,
}

/// A single step of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchJob {
    Materialize {
        directory: String,
        process: String,
        extra_radiation: bool,
    },
    Generate {
        directory: String,
        run: String,
        options: LaunchOptions,
    },
}

impl BatchJob {
    pub fn directory(&self) -> &str {
        match self {
            BatchJob::Materialize { directory, .. } | BatchJob::Generate { directory, .. } => {
                directory
            }
        }
    }

    /// Short action label for reports.
    pub fn action(&self) -> String {
        match self {
            BatchJob::Materialize { extra_radiation: true, .. } => "materialize (EE_ISR)".to_string(),
            BatchJob::Materialize { .. } => "materialize".to_string(),
            BatchJob::Generate { run, .. } => format!("generate {}", run),
        }
    }
}

/// One generation run of a planned process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedRun {
    pub name: String,
    #[serde(default)]
    pub pythia: bool,
    #[serde(default)]
    pub delphes: bool,
    /// Seed the overrides with the collision's beam parameters.
    #[serde(default = "default_true")]
    pub beam_parameters: bool,
    #[serde(default = "default_true")]
    pub analysis_off: bool,
    #[serde(default)]
    pub parameters: ParamSet,
}

/// A collision, the directory it is materialized into and its runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedProcess {
    pub directory: String,
    pub initial_state: String,
    pub final_state: String,
    #[serde(default)]
    pub ebeam1: Option<String>,
    #[serde(default)]
    pub ebeam2: Option<String>,
    #[serde(default)]
    pub polbeam1: Option<String>,
    #[serde(default)]
    pub polbeam2: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub extra_radiation: bool,
    #[serde(default)]
    pub include_pdf_codes: Option<bool>,
    #[serde(default, rename = "run")]
    pub runs: Vec<PlannedRun>,
}

fn default_true() -> bool {
    true
}

impl PlannedProcess {
    /// Build the collision, falling back to `pdf_codes_default` when the plan
    /// does not say.
    pub fn collision(&self, pdf_codes_default: bool) -> Result<CollisionSpec, EvgenError> {
        let mut builder = CollisionSpec::builder(&self.initial_state, &self.final_state)
            .include_pdf_codes(self.include_pdf_codes.unwrap_or(pdf_codes_default));
        if let Some(ref e) = self.ebeam1 {
            builder = builder.beam1_energy(e.as_str());
        }
        if let Some(ref e) = self.ebeam2 {
            builder = builder.beam2_energy(e.as_str());
        }
        if self.polbeam1.is_some() || self.polbeam2.is_some() {
            builder = builder.polarizations(
                self.polbeam1.as_deref().unwrap_or("0"),
                self.polbeam2.as_deref().unwrap_or("0"),
            );
        }
        if let Some(ref label) = self.label {
            builder = builder.label(label.as_str());
        }
        Ok(builder.build()?)
    }
}

/// A full driver sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunPlan {
    #[serde(default, rename = "process")]
    pub processes: Vec<PlannedProcess>,
}

impl RunPlan {
    pub fn load(path: &Path) -> Result<Self, EvgenError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EvgenError::PlanError(format!("Failed to read plan {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, EvgenError> {
        toml::from_str(content)
            .map_err(|e| EvgenError::PlanError(format!("Failed to parse plan: {}", e)))
    }

    pub fn validate(&self, pdf_codes_default: bool) -> Result<(), EvgenError> {
        if self.processes.is_empty() {
            return Err(EvgenError::PlanError(
                "Run plan must contain at least one process".to_string(),
            ));
        }

        let mut directories = HashSet::new();
        for process in &self.processes {
            if process.directory.trim().is_empty() {
                return Err(EvgenError::PlanError(
                    "Process directory cannot be empty".to_string(),
                ));
            }
            if !directories.insert(process.directory.as_str()) {
                return Err(EvgenError::PlanError(format!(
                    "Duplicate process directory '{}'",
                    process.directory
                )));
            }
            if process.runs.iter().any(|r| r.name.trim().is_empty()) {
                return Err(EvgenError::PlanError(format!(
                    "Process '{}' has a run with an empty name",
                    process.directory
                )));
            }
            process.collision(pdf_codes_default)?;
        }
        Ok(())
    }

    /// Expand into jobs: every materialization first, then every run, in plan order.
    pub fn jobs(&self, pdf_codes_default: bool) -> Result<Vec<BatchJob>, EvgenError> {
        self.validate(pdf_codes_default)?;

        let mut materialize = Vec::new();
        let mut generate = Vec::new();
        for process in &self.processes {
            let collision = process.collision(pdf_codes_default)?;
            materialize.push(BatchJob::Materialize {
                directory: process.directory.clone(),
                process: collision.process_expression(),
                extra_radiation: process.extra_radiation,
            });

            for run in &process.runs {
                let mut parameters = if run.beam_parameters {
                    collision.beam_parameters()
                } else {
                    ParamSet::new()
                };
                parameters.merge(&run.parameters);
                generate.push(BatchJob::Generate {
                    directory: process.directory.clone(),
                    run: run.name.clone(),
                    options: LaunchOptions {
                        parameters,
                        pythia: run.pythia,
                        delphes: run.delphes,
                        analysis_off: run.analysis_off,
                    },
                });
            }
        }

        materialize.extend(generate);
        Ok(materialize)
    }
}
