use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use serde_json::Value;
use crate::core::config::MapperConfig;
use crate::core::error::{Error, Result};
use crate::core::logging::targets;
use crate::core::types::SearchDocument;
use crate::schema::shape::{EntityShape, FieldType};

/// Converts entities to search documents and back.
///
/// Stateless apart from its switches, so one mapper can be shared freely.
/// Decoding is driven by an [`EntityShape`]: a bare scalar found where the
/// shape declares a sequence, at any depth of embedded mappings, is wrapped
/// into a one-element array. Fields neither the shape nor the entity know are
/// ignored. [`MapperConfig`] turns both rules into errors.
#[derive(Debug, Clone, Default)]
pub struct EntityMapper {
    config: MapperConfig,
}

impl EntityMapper {
    pub fn new(config: MapperConfig) -> Self {
        EntityMapper { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Wire form of any serializable value. Compact unless `indent_output`.
    pub fn map_to_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let encoded = if self.config.indent_output {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.map_err(Error::mapping)
    }

    /// Parses a wire document into `T` under `shape`.
    pub fn map_to_object<T: DeserializeOwned>(&self, source: &str, shape: &EntityShape) -> Result<T> {
        match serde_json::from_str::<Value>(source).map_err(Error::mapping)? {
            Value::Object(document) => self.decode(document, shape),
            other => Err(Error::mapping(serde_json::Error::custom(format!(
                "expected a JSON object for `{}`, found {}",
                shape.name,
                kind_of(&other)
            )))),
        }
    }

    /// Projects an entity into a string-keyed document.
    pub fn encode<T: Serialize>(&self, entity: &T) -> Result<SearchDocument> {
        match serde_json::to_value(entity).map_err(Error::mapping)? {
            Value::Object(document) => Ok(document),
            other => Err(Error::mapping(serde_json::Error::custom(format!(
                "entity encoded to {} instead of an object",
                kind_of(&other)
            )))),
        }
    }

    /// Rebuilds a typed entity from a document.
    pub fn decode<T: DeserializeOwned>(&self, mut document: SearchDocument, shape: &EntityShape) -> Result<T> {
        self.conform(&mut document, shape)?;
        serde_json::from_value(Value::Object(document)).map_err(Error::mapping)
    }

    /// Converts an already decoded generic mapping by passing it through the
    /// wire encoding once more.
    pub fn read_object<T: DeserializeOwned>(&self, source: &SearchDocument, shape: &EntityShape) -> Result<T> {
        let raw = self.map_to_string(source)?;
        self.map_to_object(&raw, shape)
    }

    fn conform(&self, document: &mut SearchDocument, shape: &EntityShape) -> Result<()> {
        if self.config.fail_on_unknown_properties {
            if let Some(path) = shape.undeclared_fields(document).first() {
                return Err(Error::mapping(serde_json::Error::custom(format!(
                    "unknown field `{}` for `{}`",
                    path, shape.name
                ))));
            }
        }
        self.conform_fields(document, shape)
    }

    /// Applies sequence coercion and type checks field by field, descending
    /// into embedded mappings. Keys the shape does not declare are left to
    /// the entity's own deserializer.
    fn conform_fields(&self, document: &mut SearchDocument, shape: &EntityShape) -> Result<()> {
        for field in &shape.fields {
            let Some(value) = document.get_mut(&field.name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            if field.multi_valued && !value.is_array() {
                if !self.config.accept_single_value_as_array {
                    return Err(Error::mapping(serde_json::Error::custom(format!(
                        "field `{}` of `{}` expects a sequence, found {}",
                        field.name,
                        shape.name,
                        kind_of(value)
                    ))));
                }
                tracing::trace!(
                    target: targets::CODEC,
                    shape = %shape.name,
                    field = %field.name,
                    "wrapping single value into a sequence"
                );
                let single = value.take();
                *value = Value::Array(vec![single]);
            }

            let elements: Vec<&mut Value> = match value {
                Value::Array(items) if field.multi_valued => items.iter_mut().collect(),
                other => vec![other],
            };
            for element in elements {
                if self.config.validate_field_types && !matches_type(field.field_type, element) {
                    return Err(Error::mapping(serde_json::Error::custom(format!(
                        "field `{}` of `{}` expects {:?}, found {}",
                        field.name,
                        shape.name,
                        field.field_type,
                        kind_of(element)
                    ))));
                }
                if let (Some(nested), Value::Object(inner)) = (&field.nested, element) {
                    self.conform_fields(inner, nested)?;
                }
            }
        }

        Ok(())
    }
}

fn matches_type(field_type: FieldType, value: &Value) -> bool {
    match (field_type, value) {
        (_, Value::Null) => true,
        (FieldType::Text, Value::String(_)) => true,
        (FieldType::Number, Value::Number(_)) => true,
        (FieldType::Timestamp, Value::Number(n)) => n.is_i64(),
        (FieldType::Boolean, Value::Bool(_)) => true,
        (FieldType::Object, Value::Object(_)) => true,
        _ => false,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use crate::schema::shape::FieldType;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Tagged {
        name: String,
        #[serde(default)]
        tags: Vec<String>,
    }

    fn shape() -> EntityShape {
        EntityShape::new("tagged")
            .text_field("name")
            .list_field("tags", FieldType::Text, true)
    }

    fn doc(value: Value) -> SearchDocument {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn output_is_compact_by_default() {
        let mapper = EntityMapper::default();
        let raw = mapper.map_to_string(&Tagged { name: "a".into(), tags: vec![] }).unwrap();
        assert_eq!(raw, r#"{"name":"a","tags":[]}"#);
    }

    #[test]
    fn indent_output_pretty_prints() {
        let mapper = EntityMapper::new(MapperConfig {
            indent_output: true,
            ..MapperConfig::default()
        });
        let raw = mapper.map_to_string(&Tagged { name: "a".into(), tags: vec![] }).unwrap();
        assert!(raw.contains('\n'));
    }

    #[test]
    fn null_sequence_is_left_to_the_entity() {
        let mapper = EntityMapper::default();
        let err = mapper
            .decode::<Tagged>(doc(json!({"name": "a", "tags": null})), &shape())
            .unwrap_err();
        assert!(err.is_mapping_failure());
    }

    #[test]
    fn strict_mode_rejects_scalar_for_sequence() {
        let mapper = EntityMapper::new(MapperConfig::strict());
        let err = mapper
            .decode::<Tagged>(doc(json!({"name": "a", "tags": "solo"})), &shape())
            .unwrap_err();
        assert!(err.is_mapping_failure());
        assert!(err.context.contains("expects a sequence"));
    }

    #[test]
    fn non_object_source_is_a_mapping_failure() {
        let mapper = EntityMapper::default();
        let err = mapper.map_to_object::<Tagged>("[1, 2]", &shape()).unwrap_err();
        assert!(err.is_mapping_failure());
        assert!(err.context.contains("an array"));
    }

    #[test]
    fn scalar_entities_cannot_be_documents() {
        let mapper = EntityMapper::default();
        assert!(mapper.encode(&42u32).unwrap_err().is_mapping_failure());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Slot {
        labels: Vec<String>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Schedule {
        id: u64,
        inner: Slot,
        #[serde(default)]
        slots: Vec<Slot>,
    }

    fn schedule_shape() -> EntityShape {
        let slot = EntityShape::new("slot").list_field("labels", FieldType::Text, true);
        EntityShape::new("schedule")
            .id_field()
            .object_field("inner", slot.clone())
            .object_list_field("slots", slot)
    }

    #[test]
    fn coercion_applies_inside_embedded_mappings() {
        let mapper = EntityMapper::default();
        let schedule: Schedule = mapper
            .map_to_object(
                r#"{"id":1,"inner":{"labels":"solo"},"slots":{"labels":"one"}}"#,
                &schedule_shape(),
            )
            .unwrap();

        assert_eq!(schedule.inner.labels, vec!["solo".to_string()]);
        assert_eq!(schedule.slots, vec![Slot { labels: vec!["one".into()] }]);
    }

    #[test]
    fn strict_mode_rejects_nested_scalars_and_unknown_keys() {
        let mapper = EntityMapper::new(MapperConfig::strict());
        let err = mapper
            .map_to_object::<Schedule>(r#"{"id":1,"inner":{"labels":"solo"}}"#, &schedule_shape())
            .unwrap_err();
        assert!(err.context.contains("expects a sequence"));

        let err = mapper
            .map_to_object::<Schedule>(r#"{"id":1,"inner":{"labels":[],"x":0}}"#, &schedule_shape())
            .unwrap_err();
        assert!(err.context.contains("inner.x"));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Reading {
        at: f64,
    }

    #[test]
    fn strict_mode_checks_declared_field_types() {
        let shape = EntityShape::new("reading").timestamp_field("at");
        let raw = r#"{"at":1.5}"#;

        let lenient: Reading = EntityMapper::default().map_to_object(raw, &shape).unwrap();
        assert_eq!(lenient.at, 1.5);

        let err = EntityMapper::new(MapperConfig::strict())
            .map_to_object::<Reading>(raw, &shape)
            .unwrap_err();
        assert!(err.is_mapping_failure());
        assert!(err.context.contains("expects Timestamp"));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Drift {
        name: String,
        #[serde(default)]
        note: Option<String>,
    }

    #[test]
    fn fields_missing_from_the_shape_still_reach_the_entity() {
        let mapper = EntityMapper::default();
        let shape = EntityShape::new("drift").text_field("name");
        let drift = Drift { name: "a".into(), note: Some("kept".into()) };

        let raw = mapper.map_to_string(&drift).unwrap();
        let back: Drift = mapper.map_to_object(&raw, &shape).unwrap();
        assert_eq!(back, drift);
    }
}
