//! Core types for the eln2smw domain schema
//!
//! Every ELN source is normalised into three page kinds:
//! - **Specimen**: the physical sample an experiment was run on
//! - **Protocol**: one experiment step, typed and dated
//! - **Record**: the measured parameters of one protocol on one specimen

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered parameter → value pairs, in the order they appeared in the source
pub type Parameters = IndexMap<String, String>;

/// Protocol type used when a source does not name one
pub const DEFAULT_PROTOCOL_TYPE: &str = "INFELN";

// ============================================================================
// Page categories
// ============================================================================

/// Wiki category a created page belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Specimen,
    Protocol,
    Record,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Specimen => "Specimen",
            Self::Protocol => "Protocol",
            Self::Record => "Record",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Schema values
// ============================================================================

/// A specimen page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specimen {
    pub description: String,
    pub person: String,
    pub material: String,
}

impl Specimen {
    /// Ask condition selecting all existing specimens
    pub fn ask_condition() -> String {
        "[[Category:Specimen]]".to_string()
    }

    /// Page title for the `index`-th specimen
    pub fn title(index: u64) -> String {
        format!("S{:05}", index)
    }

    pub fn wikitext(&self) -> String {
        format!(
            "{{{{Specimen|Description={}|Person={}|Material={}}}}}",
            self.description, self.person, self.material
        )
    }
}

/// A protocol page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    pub protocol_type: String,
    /// Normalised `YYYY-MM-DD`, empty when no date could be determined
    pub date: String,
    pub person: String,
    /// Comma separated specimen page titles
    pub specimen_list: String,
    /// Name of the ELN the protocol came from
    pub origin: String,
    /// Identifier of the experiment inside the ELN
    pub origin_internal_identifier: String,
}

impl Protocol {
    /// Ask condition selecting existing protocols of the same type
    pub fn ask_condition(&self) -> String {
        format!(
            "[[Category:Protocol]][[ProtocolType::{}]]",
            self.protocol_type
        )
    }

    /// Page title for the `index`-th protocol of this type
    pub fn title(&self, index: u64) -> String {
        format!("P{}{:04}", self.protocol_type, index)
    }

    pub fn wikitext(&self) -> String {
        format!(
            "{{{{Protocol|ProtocolType={}|Date={}|Person={}|SpecimenList={}|Origin={}|OriginInternalIdentifier={}}}}}",
            self.protocol_type,
            self.date,
            self.person,
            self.specimen_list,
            self.origin,
            self.origin_internal_identifier
        )
    }
}

/// A record page linking one protocol to one specimen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Protocol page title
    pub protocol: String,
    /// Specimen page title
    pub specimen: String,
    pub data: Parameters,
}

impl Record {
    pub fn title(&self) -> String {
        format!("R_{}_{}", self.protocol, self.specimen)
    }

    /// Record template followed by a `Data` subobject holding the parameters
    pub fn wikitext(&self) -> String {
        let pairs: Vec<String> = self
            .data
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();

        format!(
            "{{{{Record|Protocol={}|Specimen={}}}}}{{{{#subobject:Data|{}}}}}",
            self.protocol,
            self.specimen,
            pairs.join("|")
        )
    }
}

/// Any page the adapter knows how to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageData {
    Specimen(Specimen),
    Protocol(Protocol),
    Record(Record),
}

impl PageData {
    pub fn category(&self) -> Category {
        match self {
            Self::Specimen(_) => Category::Specimen,
            Self::Protocol(_) => Category::Protocol,
            Self::Record(_) => Category::Record,
        }
    }

    /// Ask condition for numbered categories, `None` for records
    pub fn ask_condition(&self) -> Option<String> {
        match self {
            Self::Specimen(_) => Some(Specimen::ask_condition()),
            Self::Protocol(p) => Some(p.ask_condition()),
            Self::Record(_) => None,
        }
    }

    /// Title for this page given the next free index (ignored for records)
    pub fn title(&self, index: u64) -> String {
        match self {
            Self::Specimen(_) => Specimen::title(index),
            Self::Protocol(p) => p.title(index),
            Self::Record(r) => r.title(),
        }
    }

    pub fn wikitext(&self) -> String {
        match self {
            Self::Specimen(s) => s.wikitext(),
            Self::Protocol(p) => p.wikitext(),
            Self::Record(r) => r.wikitext(),
        }
    }
}

// ============================================================================
// Response messages
// ============================================================================

/// Severity of a response message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

/// Info, warning or error reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub text: String,
}

impl Message {
    pub fn new(kind: MessageType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Payload returned for one adapt call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptResponse {
    /// Adapter version from configuration
    pub version: String,
    /// Created pages: title → wikitext
    pub smw_pages: IndexMap<String, String>,
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protocol() -> Protocol {
        Protocol {
            protocol_type: "INFHTr".to_string(),
            date: "2023-12-11".to_string(),
            person: "Jane Doe".to_string(),
            specimen_list: "S00012".to_string(),
            origin: "eLabFTW".to_string(),
            origin_internal_identifier: "42".to_string(),
        }
    }

    #[test]
    fn specimen_titles_are_zero_padded() {
        assert_eq!(Specimen::title(1), "S00001");
        assert_eq!(Specimen::title(12345), "S12345");
        assert_eq!(Specimen::title(123456), "S123456");
    }

    #[test]
    fn specimen_wikitext() {
        let specimen = Specimen {
            description: "Steel bar".to_string(),
            person: "Jane Doe".to_string(),
            material: "?".to_string(),
        };
        assert_eq!(
            specimen.wikitext(),
            "{{Specimen|Description=Steel bar|Person=Jane Doe|Material=?}}"
        );
    }

    #[test]
    fn protocol_title_and_condition_use_type() {
        let p = protocol();
        assert_eq!(p.title(7), "PINFHTr0007");
        assert_eq!(
            p.ask_condition(),
            "[[Category:Protocol]][[ProtocolType::INFHTr]]"
        );
    }

    #[test]
    fn protocol_wikitext() {
        assert_eq!(
            protocol().wikitext(),
            "{{Protocol|ProtocolType=INFHTr|Date=2023-12-11|Person=Jane Doe|SpecimenList=S00012|Origin=eLabFTW|OriginInternalIdentifier=42}}"
        );
    }

    #[test]
    fn record_wikitext_keeps_parameter_order() {
        let mut data = Parameters::new();
        data.insert("Temperature".to_string(), "800 °C".to_string());
        data.insert("Duration".to_string(), "2 h".to_string());
        let record = Record {
            protocol: "PINFHTr0007".to_string(),
            specimen: "S00012".to_string(),
            data,
        };

        assert_eq!(record.title(), "R_PINFHTr0007_S00012");
        assert_eq!(
            record.wikitext(),
            "{{Record|Protocol=PINFHTr0007|Specimen=S00012}}{{#subobject:Data|Temperature=800 °C|Duration=2 h}}"
        );
    }

    #[test]
    fn record_without_data_has_empty_subobject() {
        let record = Record {
            protocol: "P".to_string(),
            specimen: "S".to_string(),
            data: Parameters::new(),
        };
        assert!(record.wikitext().ends_with("{{#subobject:Data|}}"));
    }

    #[test]
    fn page_data_records_are_not_numbered() {
        let page = PageData::Record(Record {
            protocol: "PX0001".to_string(),
            specimen: "S00001".to_string(),
            data: Parameters::new(),
        });
        assert_eq!(page.category(), Category::Record);
        assert!(page.ask_condition().is_none());
        assert_eq!(page.title(99), "R_PX0001_S00001");
    }

    #[test]
    fn message_serializes_type_field() {
        let json = serde_json::to_value(Message::new(MessageType::Warning, "careful")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "warning", "text": "careful"}));
    }
}
