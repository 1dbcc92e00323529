//! Text cards understood by the generator: the process card that creates a
//! process directory and the launch card that runs event generation in it.

mod launch;
mod params;
mod process;

pub use launch::LaunchCard;
pub use params::ParamSet;
pub use process::{initial_state_of, supports_ee_isr, ProcessCard};
