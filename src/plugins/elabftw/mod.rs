//! eLabFTW source plugin
//!
//! One eLabFTW experiment yields one specimen plus one protocol and one
//! record per parameter table group:
//!
//! 1. Fetch the experiment over the REST API
//! 2. Extract parameter groups from the tables in its body
//! 3. Map well-known parameters (person, date, ...) onto schema fields
//! 4. Create the pages; remaining parameters become record data

mod client;
mod normalize;
mod tables;

pub use client::{ElabClient, ElabError, Experiment};
pub use normalize::{correct_unit, format_experiment_date};
pub use tables::{extract_protocol_tables, ProtocolTables, MIN_PARAMETERS};

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::Plugin;
use crate::adapter::{AdaptError, Adapter};
use crate::config::{ElabFtwConfig, MappedField};
use crate::types::{
    MessageType, PageData, Parameters, Protocol, Record, Specimen, DEFAULT_PROTOCOL_TYPE,
};

/// Origin name written into every protocol
pub const ORIGIN: &str = "eLabFTW";

/// Material placeholder; the eLabFTW template has no material field yet
const UNKNOWN_MATERIAL: &str = "?";

const NO_TABLE_MESSAGE: &str = "No table found on page. Protocols must be provided in a table format, with one column for parameters and another for their corresponding values.";

/// Plugin for eLabFTW experiments
pub struct ElabFtwPlugin {
    config: ElabFtwConfig,
}

impl ElabFtwPlugin {
    pub fn new(config: ElabFtwConfig) -> Self {
        Self { config }
    }

    /// Look up a schema field through its configured candidate parameters.
    ///
    /// The first candidate present in `group` wins and is removed when
    /// `remove` is set. Without a match a warning is reported and `default`
    /// returned.
    fn value_with_mapping(
        &self,
        group: &mut Parameters,
        field: MappedField,
        default: &str,
        remove: bool,
        adapter: &mut Adapter,
    ) -> String {
        let candidates = self.config.mapping.candidates(field);

        for candidate in candidates {
            let key = candidate.trim();
            if let Some(value) = group.get(key).cloned() {
                if remove {
                    group.shift_remove(key);
                }
                return value;
            }
        }

        warn!("No entry for {} in {:?}", field.as_str(), group.keys().collect::<Vec<_>>());
        adapter.add_message(
            MessageType::Warning,
            format!(
                "No entry for {}. Each table must contain one of the following parameters: {}",
                field.as_str(),
                candidates.join(",")
            ),
        );
        default.to_string()
    }

    /// Protocol date from the table, falling back to the experiment's creation time
    fn protocol_date(
        &self,
        group: &mut Parameters,
        experiment: &Experiment,
        adapter: &mut Adapter,
    ) -> String {
        let raw = self.value_with_mapping(group, MappedField::Date, "", true, adapter);
        if let Some(date) = format_experiment_date(&raw) {
            return date;
        }

        warn!("unable to format date: {}", raw);
        match format_experiment_date(&experiment.created_at) {
            Some(date) => date,
            None => {
                adapter.add_message(
                    MessageType::Warning,
                    format!(
                        "Unable to determine a date for experiment {}: neither '{}' nor '{}' is a known date format",
                        experiment.id, raw, experiment.created_at
                    ),
                );
                String::new()
            }
        }
    }
}

#[async_trait]
impl Plugin for ElabFtwPlugin {
    fn name(&self) -> &str {
        ORIGIN
    }

    async fn run(&self, id: &str, adapter: &mut Adapter) -> Result<(), AdaptError> {
        info!("Running plugin {} with identifier {}", ORIGIN, id);

        let experiment = match ElabClient::new(&self.config) {
            Ok(client) => client.experiment(id).await,
            Err(e) => Err(e),
        };
        let experiment = match experiment {
            Ok(experiment) => {
                info!("eLabFTW call for experiment with id {} successful", id);
                adapter.log_runtime();
                experiment
            }
            Err(e) => {
                error!("{}", e);
                adapter.add_message(MessageType::Error, e.to_string());
                return Ok(());
            }
        };

        let body = experiment.body.as_deref().unwrap_or_default();
        let ProtocolTables {
            tables_found,
            mut groups,
        } = extract_protocol_tables(body, &self.config.exclude);

        if tables_found == 0 {
            adapter.add_message(MessageType::Error, NO_TABLE_MESSAGE);
            return Ok(());
        }
        if groups.is_empty() {
            adapter.add_message(
                MessageType::Warning,
                format!(
                    "None of the {} tables describes a protocol with at least {} parameters",
                    tables_found, MIN_PARAMETERS
                ),
            );
            return Ok(());
        }

        // One specimen per experiment, described by the first table group
        let person = self.value_with_mapping(&mut groups[0], MappedField::Person, "", false, adapter);
        let description = self.value_with_mapping(
            &mut groups[0],
            MappedField::SpecimenDescription,
            "",
            true,
            adapter,
        );
        let specimen = Specimen {
            description,
            person,
            material: UNKNOWN_MATERIAL.to_string(),
        };
        let specimen_title = adapter.create_page(PageData::Specimen(specimen.clone())).await?;

        let mut protocols = Vec::with_capacity(groups.len());
        let mut records = Vec::with_capacity(groups.len());

        for mut group in groups {
            let date = self.protocol_date(&mut group, &experiment, adapter);
            let protocol_type = self.value_with_mapping(
                &mut group,
                MappedField::Experiment,
                DEFAULT_PROTOCOL_TYPE,
                true,
                adapter,
            );
            let person = self.value_with_mapping(&mut group, MappedField::Person, "", true, adapter);

            let protocol = Protocol {
                protocol_type,
                date,
                person,
                specimen_list: specimen_title.clone(),
                origin: ORIGIN.to_string(),
                origin_internal_identifier: id.to_string(),
            };
            let protocol_title = adapter.create_page(PageData::Protocol(protocol.clone())).await?;

            let record = Record {
                protocol: protocol_title,
                specimen: specimen_title.clone(),
                data: group
                    .iter()
                    .map(|(parameter, value)| correct_unit(parameter, value))
                    .collect(),
            };
            adapter.create_page(PageData::Record(record.clone())).await?;

            protocols.push(protocol);
            records.push(record);
        }

        debug!(
            "Specimen {}: {:?}\nProtocols: {:?}\nRecords: {:?}",
            specimen_title, specimen, protocols, records
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::testing::FakeWiki;
    use std::sync::Arc;

    fn plugin() -> ElabFtwPlugin {
        ElabFtwPlugin::new(ElabFtwConfig::default())
    }

    fn group(pairs: &[(&str, &str)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn mapping_takes_first_present_candidate_and_removes_it() {
        let mut adapter = Adapter::new(Arc::new(FakeWiki::default()), "1.0");
        let mut g = group(&[("Operator", "Max"), ("Experimenter", "Jane"), ("Load", "5 kN")]);

        let value = plugin().value_with_mapping(&mut g, MappedField::Person, "", true, &mut adapter);

        assert_eq!(value, "Jane");
        assert!(!g.contains_key("Experimenter"));
        assert!(g.contains_key("Operator"));
        assert!(adapter.messages().is_empty());
    }

    #[test]
    fn mapping_peek_keeps_parameter() {
        let mut adapter = Adapter::new(Arc::new(FakeWiki::default()), "1.0");
        let mut g = group(&[("Person", "Jane")]);

        let value = plugin().value_with_mapping(&mut g, MappedField::Person, "", false, &mut adapter);

        assert_eq!(value, "Jane");
        assert!(g.contains_key("Person"));
    }

    #[test]
    fn missing_mapping_warns_and_returns_default() {
        let mut adapter = Adapter::new(Arc::new(FakeWiki::default()), "1.0");
        let mut g = group(&[("Load", "5 kN")]);

        let value = plugin().value_with_mapping(
            &mut g,
            MappedField::Experiment,
            DEFAULT_PROTOCOL_TYPE,
            true,
            &mut adapter,
        );

        assert_eq!(value, "INFELN");
        assert_eq!(
            adapter.messages()[0].text,
            "No entry for experiment. Each table must contain one of the following parameters: Experiment,Protocol type"
        );
        assert_eq!(adapter.messages()[0].kind, MessageType::Warning);
    }

    #[test]
    fn date_falls_back_to_creation_time() {
        let mut adapter = Adapter::new(Arc::new(FakeWiki::default()), "1.0");
        let experiment = Experiment {
            created_at: "2024-06-13 15:04:03".to_string(),
            ..Experiment::default()
        };
        let mut g = group(&[("Date", "sometime in June")]);

        let date = plugin().protocol_date(&mut g, &experiment, &mut adapter);

        assert_eq!(date, "2024-06-13");
        assert!(g.is_empty());
        assert!(adapter.messages().is_empty());
    }

    #[test]
    fn unusable_dates_leave_date_empty_with_warning() {
        let mut adapter = Adapter::new(Arc::new(FakeWiki::default()), "1.0");
        let experiment = Experiment::default();
        let mut g = group(&[("Date", "soon")]);

        let date = plugin().protocol_date(&mut g, &experiment, &mut adapter);

        assert_eq!(date, "");
        assert_eq!(adapter.messages().len(), 1);
        assert!(adapter.messages()[0].text.starts_with("Unable to determine a date"));
    }
}
