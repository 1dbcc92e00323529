//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{CardCommands, Cli, CollisionArgs, Commands, LaunchArgs};
pub use presentation::{format_batch_report, format_collision, format_job_list};
pub use route::RunContext;
