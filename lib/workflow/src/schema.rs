//! Declarative config schemas for node types.
//!
//! A node type's config schema maps field keys to `FieldSpec`s. Declaration
//! order matters (fields are validated in that order), so both the schema
//! and `showIf` conditions are stored as ordered pair lists and decoded with
//! a map visitor rather than through a hash map.

use crate::node::NodeConfig;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;
use std::marker::PhantomData;

/// Value kind a config field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    Number,
    Object,
    Array,
    Code,
}

impl FieldType {
    /// Returns the wire name of this field type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Object => "object",
            Self::Array => "array",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conjunction of `field == value` conditions over sibling config fields.
///
/// A field carrying a `ShowIf` is only visible (and only validated) while
/// every condition holds against the current config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowIf {
    conditions: Vec<(String, JsonValue)>,
}

impl ShowIf {
    /// Creates an empty predicate, which always holds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition.
    #[must_use]
    pub fn when(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Returns the conditions in declaration order.
    #[must_use]
    pub fn conditions(&self) -> &[(String, JsonValue)] {
        &self.conditions
    }

    /// Returns true if every condition holds against `config`.
    ///
    /// A sibling that is absent from the config never equals the expected value.
    #[must_use]
    pub fn is_satisfied(&self, config: &NodeConfig) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| config.get(field) == Some(expected))
    }
}

impl Serialize for ShowIf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_pairs(&self.conditions, serializer)
    }
}

impl<'de> Deserialize<'de> for ShowIf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let conditions = deserializer.deserialize_map(OrderedMapVisitor::new("a showIf condition map"))?;
        Ok(Self { conditions })
    }
}

/// Declaration of one config field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// The kind of value the field holds.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Form label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Form help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether a visible field must carry a value.
    #[serde(default)]
    pub required: bool,
    /// Value assumed when the config does not set the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    /// Allowed values for string fields.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    /// Visibility predicate over sibling fields.
    #[serde(default, rename = "showIf", skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
    /// Editor language hint for code fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl FieldSpec {
    /// Creates an optional field of the given type.
    #[must_use]
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            title: None,
            description: None,
            required: false,
            default: None,
            allowed: None,
            show_if: None,
            language: None,
        }
    }

    /// Creates an optional string field.
    #[must_use]
    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    /// Creates an optional boolean field.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    /// Creates an optional number field.
    #[must_use]
    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    /// Creates an optional object field.
    #[must_use]
    pub fn object() -> Self {
        Self::new(FieldType::Object)
    }

    /// Creates an optional array field.
    #[must_use]
    pub fn array() -> Self {
        Self::new(FieldType::Array)
    }

    /// Creates an optional code field with a language hint.
    #[must_use]
    pub fn code(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::new(FieldType::Code)
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the form label.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<JsonValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restricts the field to the given string values.
    #[must_use]
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Shows the field only while `field` equals `value`.
    ///
    /// Calling this more than once adds conditions to the conjunction.
    #[must_use]
    pub fn show_if(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let show_if = self.show_if.take().unwrap_or_default();
        self.show_if = Some(show_if.when(field, value));
        self
    }

    /// Returns true if the field is visible for this config.
    #[must_use]
    pub fn is_visible(&self, config: &NodeConfig) -> bool {
        self.show_if
            .as_ref()
            .is_none_or(|show_if| show_if.is_satisfied(config))
    }

    /// Returns true if a code field holds structured (JSON) content.
    #[must_use]
    pub fn is_structured_code(&self) -> bool {
        self.field_type == FieldType::Code
            && self
                .language
                .as_deref()
                .is_some_and(|language| language.eq_ignore_ascii_case("json"))
    }
}

/// Ordered mapping of field key to `FieldSpec`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSchema {
    fields: Vec<(String, FieldSpec)>,
}

impl ConfigSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, builder style.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(key, spec);
        self
    }

    /// Inserts a field. A key that already exists keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, spec: FieldSpec) {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            slot.1 = spec;
        } else {
            self.fields.push((key, spec));
        }
    }

    /// Returns a field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, spec)| spec)
    }

    /// Iterates over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(key, spec)| (key.as_str(), spec))
    }

    /// Returns the field keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ConfigSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_pairs(&self.fields, serializer)
    }
}

impl<'de> Deserialize<'de> for ConfigSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields: Vec<(String, FieldSpec)> =
            deserializer.deserialize_map(OrderedMapVisitor::new("a config schema map"))?;
        let mut schema = Self::new();
        for (key, spec) in fields {
            schema.insert(key, spec);
        }
        Ok(schema)
    }
}

fn serialize_pairs<S, V>(pairs: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Decodes a JSON object into key/value pairs in document order.
struct OrderedMapVisitor<V> {
    expecting: &'static str,
    marker: PhantomData<V>,
}

impl<V> OrderedMapVisitor<V> {
    fn new(expecting: &'static str) -> Self {
        Self {
            expecting,
            marker: PhantomData,
        }
    }
}

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = Vec<(String, V)>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            pairs.push((key, value));
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: JsonValue) -> NodeConfig {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn schema_keeps_declaration_order() {
        let schema: ConfigSchema = serde_json::from_str(
            r#"{
                "zeta": { "type": "string" },
                "alpha": { "type": "number" },
                "mid": { "type": "boolean" }
            }"#,
        )
        .expect("deserialize");

        let keys: Vec<&str> = schema.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn schema_serializes_in_declaration_order() {
        let schema = ConfigSchema::new()
            .with_field("url", FieldSpec::string().required())
            .with_field("method", FieldSpec::string().with_default("GET"));
        let json = serde_json::to_string(&schema).expect("serialize");
        let url = json.find("\"url\"").expect("url present");
        let method = json.find("\"method\"").expect("method present");
        assert!(url < method);
    }

    #[test]
    fn field_spec_reads_wire_names() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "type": "string",
            "title": "Filter Condition",
            "enum": ["a", "b"],
            "showIf": { "operation": "filter" }
        }))
        .expect("deserialize");

        assert_eq!(spec.field_type, FieldType::String);
        assert!(!spec.required);
        assert_eq!(spec.allowed, Some(vec!["a".to_string(), "b".to_string()]));
        let show_if = spec.show_if.expect("showIf");
        assert_eq!(show_if.conditions()[0], ("operation".to_string(), json!("filter")));
    }

    #[test]
    fn show_if_is_a_conjunction() {
        let show_if = ShowIf::new().when("operation", "sort").when("advanced", true);

        assert!(show_if.is_satisfied(&config(json!({ "operation": "sort", "advanced": true }))));
        assert!(!show_if.is_satisfied(&config(json!({ "operation": "sort", "advanced": false }))));
        assert!(!show_if.is_satisfied(&config(json!({ "operation": "sort" }))));
    }

    #[test]
    fn field_without_show_if_is_visible() {
        let spec = FieldSpec::string();
        assert!(spec.is_visible(&NodeConfig::new()));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut schema = ConfigSchema::new()
            .with_field("a", FieldSpec::string())
            .with_field("b", FieldSpec::string());
        schema.insert("a", FieldSpec::number());

        let keys: Vec<&str> = schema.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(schema.get("a").map(|spec| spec.field_type), Some(FieldType::Number));
    }

    #[test]
    fn structured_code_needs_json_language() {
        assert!(FieldSpec::code("JSON").is_structured_code());
        assert!(!FieldSpec::code("javascript").is_structured_code());
        assert!(!FieldSpec::object().is_structured_code());
    }
}
