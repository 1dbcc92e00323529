//! Process card: model import, particle aliases, the `generate` line and the
//! `output` directive that names the process directory.

use serde::{Deserialize, Serialize};

/// Standard multi-particle aliases written at the top of every process card.
const ALIAS_PREAMBLE: &[&str] = &[
    "define p  = g u c d s u~ c~ d~ s~",
    "define p~ = g u c d s u~ c~ d~ s~",
    "define j = g u c d s u~ c~ d~ s~",
    "define l+ = e+ mu+",
    "define l- = e- mu-",
    "define vl = ve vm vt",
    "define vl~ = ve~ vm~ vt~",
];

const MODEL: &str = "sm";

/// Instructions for creating a process directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCard {
    pub process: String,
    pub directory: String,
    /// Tag the output with `EE_ISR`. Callers are expected to have checked
    /// [`supports_ee_isr`] already.
    pub ee_isr: bool,
}

impl ProcessCard {
    pub fn new(process: impl Into<String>, directory: impl Into<String>, ee_isr: bool) -> Self {
        Self {
            process: process.into(),
            directory: directory.into(),
            ee_isr,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.directory)
    }

    pub fn output_line(&self) -> String {
        if self.ee_isr {
            format!("output EE_ISR {}", self.directory)
        } else {
            format!("output {}", self.directory)
        }
    }

    pub fn render(&self) -> String {
        let mut card = format!("import model {}\n\n", MODEL);
        for alias in ALIAS_PREAMBLE {
            card.push_str(alias);
            card.push('\n');
        }
        card.push('\n');
        card.push_str(&format!("generate {}\n\n", self.process));
        card.push_str(&self.output_line());
        card.push('\n');
        card
    }
}

/// Initial state of a process expression: everything before the first `>`,
/// normalized to single spaces.
pub fn initial_state_of(process: &str) -> String {
    let head = process.split('>').next().unwrap_or_default();
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extra initial-state radiation is only available for electron-positron beams.
pub fn supports_ee_isr(initial_state: &str) -> bool {
    matches!(initial_state, "e+ e-" | "e- e+")
}
