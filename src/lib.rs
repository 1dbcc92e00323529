//! evgen: card generation and process orchestration for MadGraph5_aMC@NLO
//!
//! Turns a structured description of a collision into the generator's text
//! cards, runs the generator against them to create process directories and
//! produce events, and archives the cards next to the generator's output.

pub mod batch;
pub mod cards;
pub mod cli;
pub mod collision;
pub mod config;
pub mod environment;
pub mod error;
pub mod logging;
pub mod runner;
pub mod session;
