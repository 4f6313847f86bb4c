use serde::{Deserialize, Serialize};

/// A vertical: one configurable project type with its own metadata schema,
/// event schema, title template, and compact display rules.
///
/// Persisted as flat snake_case JSON. Field order here is the serialized
/// order, so a save/load cycle reproduces the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertical {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub has_events: bool,
    #[serde(default)]
    pub include_in_finance_summary: bool,
    #[serde(default)]
    pub calendar_sync: bool,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
    /// Custom fields rendered on every event in addition to the core event fields.
    #[serde(default)]
    pub event_fields: Vec<SchemaField>,
    #[serde(default)]
    pub title_template: String,
    /// Field names shown as badges on project cards.
    #[serde(default)]
    pub card_fields: Vec<String>,
    /// Field names shown as columns in the project table.
    #[serde(default)]
    pub table_fields: Vec<String>,
}

impl Vertical {
    /// Look up a metadata field by name.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a custom event field by name.
    pub fn event_field(&self, name: &str) -> Option<&SchemaField> {
        self.event_fields.iter().find(|f| f.name == name)
    }
}

/// Declaration of one metadata attribute.
///
/// The JSON shape is `{name, label, type, options}`; in memory the type and
/// its options are a single `FieldType` so a select can never lose its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSchemaField", into = "RawSchemaField")]
pub struct SchemaField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.field_type.kind()
    }

    /// Declared options; empty for every type except select.
    pub fn options(&self) -> &[String] {
        match &self.field_type {
            FieldType::Select { options } => options,
            _ => &[],
        }
    }
}

/// The closed set of field types a schema can declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    Date,
    Tel,
    Select { options: Vec<String> },
}

impl FieldType {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldType::Text => FieldKind::Text,
            FieldType::Number => FieldKind::Number,
            FieldType::Date => FieldKind::Date,
            FieldType::Tel => FieldKind::Tel,
            FieldType::Select { .. } => FieldKind::Select,
        }
    }

    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldType::Select {
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Field type tag without payload, as it appears in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Tel,
    Select,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Tel => "tel",
            FieldKind::Select => "select",
        }
    }
}

/// Wire shape of a schema field.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSchemaField {
    name: String,
    label: String,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
}

impl TryFrom<RawSchemaField> for SchemaField {
    type Error = String;

    fn try_from(raw: RawSchemaField) -> Result<Self, Self::Error> {
        if raw.kind != FieldKind::Select {
            if let Some(first) = raw.options.first() {
                return Err(format!(
                    "field '{}' of type {} cannot declare options (found '{}')",
                    raw.name,
                    raw.kind.as_str(),
                    first
                ));
            }
        }
        let field_type = match raw.kind {
            FieldKind::Text => FieldType::Text,
            FieldKind::Number => FieldType::Number,
            FieldKind::Date => FieldType::Date,
            FieldKind::Tel => FieldType::Tel,
            // Empty options are representable here and rejected by validation,
            // so the error surfaces as a config error rather than a parse error.
            FieldKind::Select => FieldType::Select {
                options: raw.options,
            },
        };
        Ok(SchemaField {
            name: raw.name,
            label: raw.label,
            field_type,
        })
    }
}

impl From<SchemaField> for RawSchemaField {
    fn from(field: SchemaField) -> Self {
        let kind = field.field_type.kind();
        let options = match field.field_type {
            FieldType::Select { options } => options,
            _ => Vec::new(),
        };
        RawSchemaField {
            name: field.name,
            label: field.label,
            kind,
            options,
        }
    }
}
