//! Top-pair threshold scan: one process directory per collision type, then a
//! run per centre-of-mass energy just above twice the top mass.

use crate::batch::plan::BatchJob;
use crate::cards::ParamSet;
use crate::collision::CollisionSpec;
use crate::error::EvgenError;
use crate::session::LaunchOptions;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_MASS: f64 = 172.5;
pub const DEFAULT_POINTS: usize = 20;
pub const DEFAULT_START_OFFSET: f64 = 0.1;
pub const DEFAULT_END_OFFSET: f64 = 10.0;

/// A process directory taking part in the scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanProcess {
    pub directory: String,
    pub process: String,
    #[serde(default)]
    pub extra_radiation: bool,
}

impl ScanProcess {
    pub fn from_collision(collision: &CollisionSpec, directory: impl Into<String>, extra_radiation: bool) -> Self {
        Self {
            directory: directory.into(),
            process: collision.process_expression(),
            extra_radiation,
        }
    }
}

/// Energy sweep across the top-pair threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdScan {
    pub top_mass: f64,
    pub points: usize,
    pub start_offset: f64,
    pub end_offset: f64,
    pub processes: Vec<ScanProcess>,
}

impl ThresholdScan {
    pub fn new(processes: Vec<ScanProcess>) -> Self {
        Self {
            top_mass: DEFAULT_TOP_MASS,
            points: DEFAULT_POINTS,
            start_offset: DEFAULT_START_OFFSET,
            end_offset: DEFAULT_END_OFFSET,
            processes,
        }
    }

    /// Lepton-collider top-pair production: e+ e- with and without ISR,
    /// mu+ mu- and tau+ tau-.
    pub fn lepton_colliders() -> Result<Self, EvgenError> {
        let ee = CollisionSpec::builder("e+ e-", "t t~").label("ee_xsec").build()?;
        let mm = CollisionSpec::builder("mu+ mu-", "t t~").label("mm_xsec").build()?;
        let tt = CollisionSpec::builder("ta+ ta-", "t t~").label("tt_xsec").build()?;

        Ok(Self::new(vec![
            ScanProcess::from_collision(&ee, ee.label(), false),
            ScanProcess::from_collision(&ee, format!("{}ISR", ee.label()), true),
            ScanProcess::from_collision(&mm, mm.label(), false),
            ScanProcess::from_collision(&tt, tt.label(), false),
        ]))
    }

    /// Centre-of-mass energies, evenly spaced and inclusive of both ends.
    pub fn energies(&self) -> Vec<f64> {
        let start = 2.0 * self.top_mass + self.start_offset;
        let stop = 2.0 * self.top_mass + self.end_offset;
        match self.points {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (stop - start) / (n - 1) as f64;
                (0..n).map(|i| start + step * i as f64).collect()
            }
        }
    }

    pub fn run_name(energy: f64) -> String {
        format!("run_CME{:.1}", energy)
    }

    /// Beam settings for one energy point: symmetric beams at half the
    /// centre-of-mass energy, plus the top mass.
    pub fn parameters(&self, energy: f64) -> ParamSet {
        let beam = format!("{:.1}", energy / 2.0);
        ParamSet::new()
            .with("ebeam1", beam.clone())
            .with("ebeam2", beam)
            .with("mt", self.top_mass.to_string())
    }

    pub fn jobs(&self) -> Vec<BatchJob> {
        let mut jobs: Vec<BatchJob> = self
            .processes
            .iter()
            .map(|p| BatchJob::Materialize {
                directory: p.directory.clone(),
                process: p.process.clone(),
                extra_radiation: p.extra_radiation,
            })
            .collect();

        for energy in self.energies() {
            let run = Self::run_name(energy);
            let parameters = self.parameters(energy);
            for p in &self.processes {
                jobs.push(BatchJob::Generate {
                    directory: p.directory.clone(),
                    run: run.clone(),
                    options: LaunchOptions::with_parameters(parameters.clone()),
                });
            }
        }
        jobs
    }
}
