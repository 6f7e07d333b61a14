use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::Result,
    identifier::{MessageIdentifier, identifier},
    message::{MetadataField, lineage},
};

/// Lineage and correlation metadata carried alongside every message.
///
/// The `source_*` pair, `global_position` and `time` are assigned by storage
/// when a message is read back. They are never part of the persisted
/// projection; see [`MetadataField::TRANSIENT`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_stream_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_position: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_stream_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_position: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_stream_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_stream_name: Option<String>,

    #[serde(
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub properties: BTreeMap<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
}

/// `"properties": null` reads as no properties, like the optional fields.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl MetadataRecord {
    pub const TRANSIENT_FIELD_NAMES: [&'static str; MetadataField::TRANSIENT.len()] =
        MetadataField::TRANSIENT_NAMES;

    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a record from a persisted projection. Transient keys in
    /// `projection` are ignored; storage supplies those separately.
    pub fn from_projection(projection: &Map<String, Value>) -> Result<Self> {
        let persisted: Map<String, Value> = projection
            .iter()
            .filter(|(name, _)| !Self::is_transient(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(serde_json::from_value(Value::Object(persisted))?)
    }

    pub fn source_event_identifier(&self) -> Option<String> {
        identifier(self.source_stream_name.as_deref(), self.source_position)
    }

    pub fn causation_event_identifier(&self) -> Option<String> {
        identifier(self.causation_stream_name.as_deref(), self.causation_position)
    }

    pub fn source_identifier(&self) -> Option<MessageIdentifier> {
        MessageIdentifier::from_parts(self.source_stream_name.as_deref(), self.source_position)
    }

    pub fn causation_identifier(&self) -> Option<MessageIdentifier> {
        MessageIdentifier::from_parts(
            self.causation_stream_name.as_deref(),
            self.causation_position,
        )
    }

    pub fn clear_reply_stream_name(&mut self) {
        self.reply_stream_name = None;
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Stamps this record as the causal continuation of `prior`.
    pub fn follow(&mut self, prior: &MetadataRecord) -> Result<()> {
        lineage::follow(self, prior)
    }

    pub fn follows(&self, prior: &MetadataRecord) -> bool {
        lineage::follows(self, prior)
    }

    pub fn correlated(&self, stream_name: &str) -> bool {
        lineage::correlated(self, stream_name)
    }

    pub fn transient_field_names() -> [&'static str; MetadataField::TRANSIENT.len()] {
        Self::TRANSIENT_FIELD_NAMES
    }

    pub fn is_transient(name: &str) -> bool {
        Self::TRANSIENT_FIELD_NAMES.contains(&name)
    }

    pub fn field_names() -> Vec<&'static str> {
        MetadataField::ALL.into_iter().map(MetadataField::name).collect()
    }

    pub fn persisted_field_names() -> Vec<&'static str> {
        MetadataField::persisted().map(MetadataField::name).collect()
    }

    /// Current value of `field`, or `None` when unset.
    pub fn value(&self, field: MetadataField) -> Option<Value> {
        match field {
            MetadataField::SourceStreamName => self.source_stream_name.clone().map(Value::from),
            MetadataField::SourcePosition => self.source_position.map(Value::from),
            MetadataField::CausationStreamName => {
                self.causation_stream_name.clone().map(Value::from)
            }
            MetadataField::CausationPosition => self.causation_position.map(Value::from),
            MetadataField::CorrelationStreamName => {
                self.correlation_stream_name.clone().map(Value::from)
            }
            MetadataField::ReplyStreamName => self.reply_stream_name.clone().map(Value::from),
            MetadataField::Properties => (!self.properties.is_empty()).then(|| {
                Value::Object(
                    self.properties
                        .iter()
                        .map(|(name, value)| (name.clone(), value.clone()))
                        .collect(),
                )
            }),
            MetadataField::GlobalPosition => self.global_position.map(Value::from),
            MetadataField::Time => self
                .time
                .map(|time| Value::from(time.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
            MetadataField::SchemaVersion => self.schema_version.clone().map(Value::from),
        }
    }

    /// Every set field, transient ones included.
    pub fn attributes(&self) -> Map<String, Value> {
        self.collect(MetadataField::ALL.into_iter())
    }

    /// Set fields minus the transient set; this is what gets written.
    pub fn persistable_projection(&self) -> Map<String, Value> {
        self.collect(MetadataField::persisted())
    }

    fn collect(&self, fields: impl Iterator<Item = MetadataField>) -> Map<String, Value> {
        fields
            .filter_map(|field| self.value(field).map(|value| (field.name().to_string(), value)))
            .collect()
    }
}
