//! eLabFTW source configuration

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no eLabFTW API key is configured
pub const ELABFTW_API_KEY_ENV: &str = "ELABFTW_API_KEY";

/// eLabFTW plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElabFtwConfig {
    /// Base URL of the REST API (e.g., "https://elab.example.org/api/v2")
    pub api_url: String,
    /// API key sent verbatim in the `Authorization` header
    #[serde(default)]
    pub api_key: Option<String>,
    /// Verify the server's TLS certificate
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Table parameters that never end up in a record
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Candidate parameter names for the values the schema needs
    #[serde(default)]
    pub mapping: FieldMapping,
}

/// Which table parameters carry the schema fields, in lookup order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(default = "default_person")]
    pub person: Vec<String>,
    #[serde(default = "default_specimen_description")]
    pub specimen_description: Vec<String>,
    #[serde(default = "default_date")]
    pub date: Vec<String>,
    #[serde(default = "default_experiment")]
    pub experiment: Vec<String>,
}

/// Schema fields that are looked up through [`FieldMapping`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedField {
    Person,
    SpecimenDescription,
    Date,
    Experiment,
}

impl MappedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::SpecimenDescription => "specimen_description",
            Self::Date => "date",
            Self::Experiment => "experiment",
        }
    }
}

impl FieldMapping {
    /// Candidate parameter names for a field
    pub fn candidates(&self, field: MappedField) -> &[String] {
        match field {
            MappedField::Person => &self.person,
            MappedField::SpecimenDescription => &self.specimen_description,
            MappedField::Date => &self.date,
            MappedField::Experiment => &self.experiment,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn default_person() -> Vec<String> {
    strings(&["Person", "Experimenter", "Operator"])
}

fn default_specimen_description() -> Vec<String> {
    strings(&["Specimen", "Sample", "Specimen description"])
}

fn default_date() -> Vec<String> {
    strings(&["Date", "Datum"])
}

fn default_experiment() -> Vec<String> {
    strings(&["Experiment", "Protocol type"])
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            person: default_person(),
            specimen_description: default_specimen_description(),
            date: default_date(),
            experiment: default_experiment(),
        }
    }
}

impl ElabFtwConfig {
    /// API key from config or environment, empty when neither is set
    pub fn resolved_api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var(ELABFTW_API_KEY_ENV).ok())
            .unwrap_or_default()
    }
}

impl Default for ElabFtwConfig {
    fn default() -> Self {
        Self {
            api_url: "https://localhost/api/v2".to_string(),
            api_key: None,
            verify_tls: true,
            timeout_secs: default_timeout_secs(),
            exclude: Vec::new(),
            mapping: FieldMapping::default(),
        }
    }
}
