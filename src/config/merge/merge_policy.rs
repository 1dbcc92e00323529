//! Merge rules: defaults, override order, conflict handling.

use crate::environment::DEFAULT_SETUP_SCRIPT;
use crate::session::DEFAULT_EXECUTABLE;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("generator.install_path", "../MG5_aMC")?
        .set_default("generator.executable", DEFAULT_EXECUTABLE)?
        .set_default("generator.setup_script", DEFAULT_SETUP_SCRIPT)?
        .set_default("generator.check_exit_status", true)?
        .set_default("collisions.include_pdf_codes", false)?
        .set_default("batch.failure_policy", "fail_fast")
}
