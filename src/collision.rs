//! Collision description
//!
//! A two-particle initial state, an arbitrary final state in the generator's
//! grammar, and the beam settings that go into the run configuration.

use crate::cards::ParamSet;
use crate::error::CollisionError;
use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_BEAM_ENERGY: &str = "6500";
const DEFAULT_POLARIZATION: &str = "0";

/// PDF selection code of a beam, derived from its initial-state token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PdfCode {
    None,
    Proton,
    AntiProton,
}

impl PdfCode {
    pub fn from_token(token: &str) -> Self {
        match token {
            "p" => PdfCode::Proton,
            "p~" => PdfCode::AntiProton,
            _ => PdfCode::None,
        }
    }

    /// Value of `lpp1`/`lpp2` in the run configuration.
    pub fn code(&self) -> &'static str {
        match self {
            PdfCode::None => "0",
            PdfCode::Proton => "1",
            PdfCode::AntiProton => "-1",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PdfCode::None => "no PDF",
            PdfCode::Proton => "proton",
            PdfCode::AntiProton => "anti-proton",
        }
    }
}

/// Immutable description of a collision.
///
/// Deserialization goes through [`CollisionSpecBuilder::build`], so a
/// serialized spec with a malformed initial state is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CollisionFields")]
pub struct CollisionSpec {
    initial_state: String,
    final_state: String,
    beam1_energy: String,
    beam2_energy: String,
    beam1_polarization: String,
    beam2_polarization: String,
    label: String,
    include_pdf_codes: bool,
}

impl CollisionSpec {
    /// Collision with default beams (6500 GeV each, unpolarized).
    pub fn new(
        initial_state: impl Into<String>,
        final_state: impl Into<String>,
    ) -> Result<Self, CollisionError> {
        Self::builder(initial_state, final_state).build()
    }

    pub fn builder(
        initial_state: impl Into<String>,
        final_state: impl Into<String>,
    ) -> CollisionSpecBuilder {
        CollisionSpecBuilder {
            initial_state: initial_state.into(),
            final_state: final_state.into(),
            beam1_energy: DEFAULT_BEAM_ENERGY.to_string(),
            beam2_energy: DEFAULT_BEAM_ENERGY.to_string(),
            beam1_polarization: DEFAULT_POLARIZATION.to_string(),
            beam2_polarization: DEFAULT_POLARIZATION.to_string(),
            label: String::new(),
            include_pdf_codes: false,
        }
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn final_state(&self) -> &str {
        &self.final_state
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn beam_energies(&self) -> (&str, &str) {
        (&self.beam1_energy, &self.beam2_energy)
    }

    pub fn beam_polarizations(&self) -> (&str, &str) {
        (&self.beam1_polarization, &self.beam2_polarization)
    }

    pub fn includes_pdf_codes(&self) -> bool {
        self.include_pdf_codes
    }

    /// The two incoming particle tokens.
    pub fn initial_tokens(&self) -> (&str, &str) {
        let mut tokens = self.initial_state.split_whitespace();
        // Construction guarantees exactly two tokens.
        let first = tokens.next().unwrap_or_default();
        let second = tokens.next().unwrap_or_default();
        (first, second)
    }

    pub fn pdf_codes(&self) -> (PdfCode, PdfCode) {
        let (first, second) = self.initial_tokens();
        (PdfCode::from_token(first), PdfCode::from_token(second))
    }

    /// Process line for the `generate` directive.
    pub fn process_expression(&self) -> String {
        format!("{} > {}", self.initial_state, self.final_state)
    }

    /// Beam settings for the run configuration, values exactly as supplied.
    pub fn beam_parameters(&self) -> ParamSet {
        let mut params = ParamSet::new();
        if self.include_pdf_codes {
            let (pdf1, pdf2) = self.pdf_codes();
            params.insert("lpp1", pdf1.code());
            params.insert("lpp2", pdf2.code());
        }
        params.insert("ebeam1", self.beam1_energy.as_str());
        params.insert("ebeam2", self.beam2_energy.as_str());
        params.insert("polbeam1", self.beam1_polarization.as_str());
        params.insert("polbeam2", self.beam2_polarization.as_str());
        params
    }

    /// Human-readable summary, for logs and the `describe` command.
    pub fn describe(&self) -> String {
        let mut s = String::new();
        if !self.label.is_empty() {
            s.push_str(&format!("** {} **\n", self.label));
        }
        s.push_str(&format!("Process           : {}\n", self.process_expression()));
        s.push_str(&format!(
            "Beam energies     : {} + {} GeV\n",
            self.beam1_energy, self.beam2_energy
        ));
        s.push_str(&format!(
            "Beam polarizations: {}, {}",
            self.beam1_polarization, self.beam2_polarization
        ));
        if self.include_pdf_codes {
            let (pdf1, pdf2) = self.pdf_codes();
            s.push_str(&format!(
                "\nBeam PDFs         : {} ({}), {} ({})",
                pdf1.code(),
                pdf1.name(),
                pdf2.code(),
                pdf2.name()
            ));
        }
        s
    }
}

impl fmt::Display for CollisionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Builder for [`CollisionSpec`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct CollisionSpecBuilder {
    initial_state: String,
    final_state: String,
    beam1_energy: String,
    beam2_energy: String,
    beam1_polarization: String,
    beam2_polarization: String,
    label: String,
    include_pdf_codes: bool,
}

impl CollisionSpecBuilder {
    pub fn energies(mut self, ebeam1: impl Into<String>, ebeam2: impl Into<String>) -> Self {
        self.beam1_energy = ebeam1.into();
        self.beam2_energy = ebeam2.into();
        self
    }

    pub fn beam1_energy(mut self, energy: impl Into<String>) -> Self {
        self.beam1_energy = energy.into();
        self
    }

    pub fn beam2_energy(mut self, energy: impl Into<String>) -> Self {
        self.beam2_energy = energy.into();
        self
    }

    pub fn polarizations(mut self, polbeam1: impl Into<String>, polbeam2: impl Into<String>) -> Self {
        self.beam1_polarization = polbeam1.into();
        self.beam2_polarization = polbeam2.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn include_pdf_codes(mut self, include: bool) -> Self {
        self.include_pdf_codes = include;
        self
    }

    pub fn build(self) -> Result<CollisionSpec, CollisionError> {
        let count = self.initial_state.split_whitespace().count();
        if count != 2 {
            return Err(CollisionError::InvalidInitialState {
                count,
                initial_state: self.initial_state,
            });
        }

        Ok(CollisionSpec {
            initial_state: self.initial_state,
            final_state: self.final_state,
            beam1_energy: self.beam1_energy,
            beam2_energy: self.beam2_energy,
            beam1_polarization: self.beam1_polarization,
            beam2_polarization: self.beam2_polarization,
            label: self.label,
            include_pdf_codes: self.include_pdf_codes,
        })
    }
}

fn default_beam_energy() -> String {
    DEFAULT_BEAM_ENERGY.to_string()
}

fn default_polarization() -> String {
    DEFAULT_POLARIZATION.to_string()
}

#[derive(Deserialize)]
struct CollisionFields {
    initial_state: String,
    final_state: String,
    #[serde(default = "default_beam_energy")]
    beam1_energy: String,
    #[serde(default = "default_beam_energy")]
    beam2_energy: String,
    #[serde(default = "default_polarization")]
    beam1_polarization: String,
    #[serde(default = "default_polarization")]
    beam2_polarization: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    include_pdf_codes: bool,
}

impl TryFrom<CollisionFields> for CollisionSpec {
    type Error = CollisionError;

    fn try_from(fields: CollisionFields) -> Result<Self, Self::Error> {
        CollisionSpec::builder(fields.initial_state, fields.final_state)
            .energies(fields.beam1_energy, fields.beam2_energy)
            .polarizations(fields.beam1_polarization, fields.beam2_polarization)
            .label(fields.label)
            .include_pdf_codes(fields.include_pdf_codes)
            .build()
    }
}
