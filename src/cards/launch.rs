//! Launch card: starts a run of event generation inside an existing process
//! directory, with optional shower and detector simulation.

use crate::cards::ParamSet;
use serde::{Deserialize, Serialize};

/// Instructions for producing one run of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchCard {
    pub directory: String,
    pub run: String,
    pub analysis_off: bool,
    pub shower: bool,
    pub detector: bool,
    #[serde(default)]
    pub parameters: ParamSet,
}

impl LaunchCard {
    pub fn new(directory: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            run: run.into(),
            analysis_off: true,
            shower: false,
            detector: false,
            parameters: ParamSet::new(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_gen.txt", self.directory)
    }

    pub fn render(&self) -> String {
        let mut card = format!("launch {} -n {}\n", self.directory, self.run);
        if self.analysis_off {
            card.push_str("analysis=OFF\n");
        }
        if self.shower {
            card.push_str("shower=Pythia8\n");
        }
        if self.detector {
            card.push_str("detector=Delphes\n");
        }
        for (name, value) in self.parameters.iter() {
            card.push_str(&format!("set {} {}\n", name, value));
        }
        card
    }
}
