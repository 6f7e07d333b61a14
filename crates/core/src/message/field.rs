/// Declared metadata fields, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    SourceStreamName,
    SourcePosition,
    CausationStreamName,
    CausationPosition,
    CorrelationStreamName,
    ReplyStreamName,
    Properties,
    GlobalPosition,
    Time,
    SchemaVersion,
}

impl MetadataField {
    pub const ALL: [MetadataField; 10] = [
        MetadataField::SourceStreamName,
        MetadataField::SourcePosition,
        MetadataField::CausationStreamName,
        MetadataField::CausationPosition,
        MetadataField::CorrelationStreamName,
        MetadataField::ReplyStreamName,
        MetadataField::Properties,
        MetadataField::GlobalPosition,
        MetadataField::Time,
        MetadataField::SchemaVersion,
    ];

    /// Assigned by storage when a message is read back; never written.
    pub const TRANSIENT: [MetadataField; 4] = [
        MetadataField::SourceStreamName,
        MetadataField::SourcePosition,
        MetadataField::GlobalPosition,
        MetadataField::Time,
    ];

    pub const TRANSIENT_NAMES: [&'static str; MetadataField::TRANSIENT.len()] = {
        let mut names = [""; MetadataField::TRANSIENT.len()];
        let mut i = 0;
        while i < names.len() {
            names[i] = Self::TRANSIENT[i].name();
            i += 1;
        }
        names
    };

    pub const fn name(self) -> &'static str {
        match self {
            MetadataField::SourceStreamName => "source_stream_name",
            MetadataField::SourcePosition => "source_position",
            MetadataField::CausationStreamName => "causation_stream_name",
            MetadataField::CausationPosition => "causation_position",
            MetadataField::CorrelationStreamName => "correlation_stream_name",
            MetadataField::ReplyStreamName => "reply_stream_name",
            MetadataField::Properties => "properties",
            MetadataField::GlobalPosition => "global_position",
            MetadataField::Time => "time",
            MetadataField::SchemaVersion => "schema_version",
        }
    }

    pub fn is_transient(self) -> bool {
        Self::TRANSIENT.contains(&self)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn persisted() -> impl Iterator<Item = MetadataField> {
        Self::ALL.into_iter().filter(|field| !field.is_transient())
    }
}
