//! CLI parse: clap types for evgen. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// evgen CLI - Card generation and orchestration for MadGraph5_aMC@NLO
#[derive(Parser, Debug)]
#[command(name = "evgen")]
#[command(about = "Generate MadGraph cards and drive process creation and event generation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Working directory where cards are written and the generator runs
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generator installation root (overrides configuration)
    #[arg(long)]
    pub install_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Collision given on the command line.
#[derive(Args, Debug, Clone)]
pub struct CollisionArgs {
    /// Initial state, exactly two particles (e.g. "p p", "e+ e-")
    pub initial_state: String,

    /// Final state in generator syntax (e.g. "t t~")
    pub final_state: String,

    /// Energy of the first beam in GeV
    #[arg(long, default_value = "6500")]
    pub ebeam1: String,

    /// Energy of the second beam in GeV
    #[arg(long, default_value = "6500")]
    pub ebeam2: String,

    /// Polarization of the first beam
    #[arg(long, default_value = "0")]
    pub polbeam1: String,

    /// Polarization of the second beam
    #[arg(long, default_value = "0")]
    pub polbeam2: String,

    /// Descriptive collision name
    #[arg(long, default_value = "")]
    pub label: String,

    /// Include lpp1/lpp2 PDF codes in the beam parameters
    #[arg(long)]
    pub pdf_codes: bool,
}

/// Launch card options given on the command line.
#[derive(Args, Debug, Clone)]
pub struct LaunchArgs {
    /// Process directory created by `materialize`
    pub directory: String,

    /// Run name
    #[arg(long)]
    pub run: String,

    /// Enable Pythia8 showering
    #[arg(long)]
    pub pythia: bool,

    /// Enable Delphes detector simulation
    #[arg(long)]
    pub delphes: bool,

    /// Keep the generator's analysis step enabled
    #[arg(long)]
    pub with_analysis: bool,

    /// Parameter override, repeatable (e.g. --set nevents=5000)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a collision summary
    Describe {
        #[command(flatten)]
        collision: CollisionArgs,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Render cards without running anything
    Card {
        #[command(subcommand)]
        command: CardCommands,
    },
    /// Create a process directory
    Materialize {
        #[command(flatten)]
        collision: CollisionArgs,
        /// Process directory name
        #[arg(long)]
        directory: String,
        /// Request EE_ISR (honored only for e+ e- initial states)
        #[arg(long)]
        ee_isr: bool,
    },
    /// Generate events in an existing process directory
    Generate {
        #[command(flatten)]
        launch: LaunchArgs,
        /// Seed the overrides with beam parameters for this initial state
        #[arg(long, value_name = "INITIAL_STATE")]
        beams: Option<String>,
        /// Beam energy used with --beams
        #[arg(long, default_value = "6500")]
        beam_energy: String,
    },
    /// Execute a run plan (TOML)
    Run {
        /// Plan file
        plan: PathBuf,
        /// Continue with other directories after a failure
        #[arg(long)]
        best_effort: bool,
        /// List the jobs without running them
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Sweep the centre-of-mass energy across the top-pair threshold
    Scan {
        /// Top quark mass in GeV
        #[arg(long, default_value = "172.5")]
        mass: f64,
        /// Number of energy points
        #[arg(long, default_value = "20")]
        points: usize,
        /// Offset above 2*mass of the first point, in GeV
        #[arg(long, default_value = "0.1")]
        start_offset: f64,
        /// Offset above 2*mass of the last point, in GeV
        #[arg(long, default_value = "10.0")]
        end_offset: f64,
        /// Continue with other directories after a failure
        #[arg(long)]
        best_effort: bool,
        /// List the jobs without running them
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Render the process card for a collision
    Process {
        #[command(flatten)]
        collision: CollisionArgs,
        /// Process directory name
        #[arg(long)]
        directory: String,
        /// Request EE_ISR (honored only for e+ e- initial states)
        #[arg(long)]
        ee_isr: bool,
    },
    /// Render a launch card
    Launch {
        #[command(flatten)]
        launch: LaunchArgs,
    },
}
