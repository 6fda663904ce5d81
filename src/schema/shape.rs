use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::core::types::SearchDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Number,
    Timestamp,  // i64 nanoseconds since the Unix epoch
    Boolean,
    Object,     // described by FieldShape::nested
}

/// One field of an entity as seen by the codec and the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldShape {
    pub name: String,
    pub field_type: FieldType,
    pub multi_valued: bool,
    pub searchable: bool,
    pub analyzer: Option<String>,
    pub nested: Option<EntityShape>,
}

/// Field layout of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityShape {
    pub name: String,
    pub fields: Vec<FieldShape>,
}

impl EntityShape {
    pub fn new(name: &str) -> Self {
        EntityShape {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    fn push(self, name: &str, field_type: FieldType, multi_valued: bool, searchable: bool) -> Self {
        self.push_field(FieldShape {
            name: name.to_string(),
            field_type,
            multi_valued,
            searchable,
            analyzer: None,
            nested: None,
        })
    }

    fn push_field(mut self, field: FieldShape) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    pub fn id_field(self) -> Self {
        self.push("id", FieldType::Number, false, false)
    }

    /// Full-text field analyzed by the engine.
    pub fn text_field(self, name: &str) -> Self {
        self.push(name, FieldType::Text, false, true)
    }

    /// Text stored verbatim, not analyzed.
    pub fn keyword_field(self, name: &str) -> Self {
        self.push(name, FieldType::Text, false, false)
    }

    pub fn number_field(self, name: &str) -> Self {
        self.push(name, FieldType::Number, false, false)
    }

    pub fn timestamp_field(self, name: &str) -> Self {
        self.push(name, FieldType::Timestamp, false, false)
    }

    pub fn boolean_field(self, name: &str) -> Self {
        self.push(name, FieldType::Boolean, false, false)
    }

    /// Sequence field; `searchable` only matters for text elements.
    pub fn list_field(self, name: &str, field_type: FieldType, searchable: bool) -> Self {
        self.push(name, field_type, true, searchable && field_type == FieldType::Text)
    }

    /// Embedded mapping laid out by `shape`. Not analyzed.
    pub fn object_field(self, name: &str, shape: EntityShape) -> Self {
        self.push_field(FieldShape {
            name: name.to_string(),
            field_type: FieldType::Object,
            multi_valued: false,
            searchable: false,
            analyzer: None,
            nested: Some(shape),
        })
    }

    /// Sequence of embedded mappings, each laid out by `shape`.
    pub fn object_list_field(self, name: &str, shape: EntityShape) -> Self {
        self.push_field(FieldShape {
            name: name.to_string(),
            field_type: FieldType::Object,
            multi_valued: true,
            searchable: false,
            analyzer: None,
            nested: Some(shape),
        })
    }

    /// Overrides the analyzer of an already declared field.
    pub fn with_analyzer(mut self, field: &str, analyzer: &str) -> Self {
        if let Some(f) = self.fields.iter_mut().find(|f| f.name == field) {
            f.analyzer = Some(analyzer.to_string());
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldShape> {
        self.fields.iter().filter(|f| f.searchable)
    }

    pub fn get_analyzer_for_field(&self, field_name: &str) -> Option<&String> {
        self.field(field_name).and_then(|f| f.analyzer.as_ref())
    }

    /// Dotted paths of document keys this shape does not declare, including
    /// keys inside embedded mappings.
    pub fn undeclared_fields(&self, document: &SearchDocument) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_undeclared(document, "", &mut paths);
        paths
    }

    fn collect_undeclared(&self, document: &SearchDocument, prefix: &str, out: &mut Vec<String>) {
        for (key, value) in document {
            let path = format!("{prefix}{key}");
            let Some(field) = self.field(key) else {
                out.push(path);
                continue;
            };
            let Some(nested) = &field.nested else {
                continue;
            };
            let prefix = format!("{path}.");
            match value {
                Value::Object(inner) => nested.collect_undeclared(inner, &prefix, out),
                Value::Array(items) => {
                    for inner in items.iter().filter_map(Value::as_object) {
                        nested.collect_undeclared(inner, &prefix, out);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaring_a_field_replaces_it() {
        let shape = EntityShape::new("region")
            .keyword_field("regionName")
            .text_field("regionName");

        assert_eq!(shape.fields.len(), 1);
        assert!(shape.field("regionName").unwrap().searchable);
    }

    #[test]
    fn only_text_lists_are_searchable() {
        let shape = EntityShape::new("t")
            .list_field("tags", FieldType::Text, true)
            .list_field("scores", FieldType::Number, true);

        let names: Vec<_> = shape.searchable_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["tags"]);
        assert!(shape.field("scores").unwrap().multi_valued);
    }

    #[test]
    fn analyzer_override_applies_to_declared_field() {
        let shape = EntityShape::new("t")
            .text_field("title")
            .with_analyzer("title", "simple")
            .with_analyzer("missing", "simple");

        assert_eq!(shape.get_analyzer_for_field("title").map(String::as_str), Some("simple"));
        assert!(!shape.contains("missing"));
    }

    #[test]
    fn undeclared_fields_reach_into_embedded_mappings() {
        let shape = EntityShape::new("outer")
            .id_field()
            .object_list_field("slots", EntityShape::new("slot").number_field("hours"));

        let document = match serde_json::json!({
            "id": 1,
            "extra": true,
            "slots": [{"hours": 2}, {"hours": 3, "note": "x"}]
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        assert_eq!(shape.undeclared_fields(&document), vec!["extra", "slots.note"]);
    }
}
