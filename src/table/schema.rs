//! Column schema
//!
//! A [`TableSchema`] describes which fields of a batch become columns. It is
//! either supplied by the caller or derived once per batch from the first row
//! with [`TableSchema::infer`].

use super::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field holding the per-row visibility map (`{ field: bool }`).
pub const VISIBILITY_KEY: &str = "esColumna";

/// Key of the synthetic column carrying the CRUD buttons.
pub const ACTIONS_KEY: &str = "actions";

/// Header label of the synthetic actions column.
pub const ACTIONS_LABEL: &str = "Acciones";

/// How a cell value is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    /// Plain text
    #[default]
    Text,
    /// Short value rendered as a pill
    Badge,
}

/// Per-field metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub visible: bool,
    pub sortable: bool,
    #[serde(default)]
    pub format: CellFormat,
}

impl FieldSpec {
    /// Visible, sortable text field labelled after its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: capitalize(&name),
            name,
            visible: true,
            sortable: true,
            format: CellFormat::Text,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }
}

/// A rendered column
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub format: CellFormat,
}

impl ColumnDescriptor {
    /// The trailing CRUD column. Never sortable, never exported.
    pub fn actions() -> Self {
        Self {
            key: ACTIONS_KEY.to_string(),
            label: ACTIONS_LABEL.to_string(),
            sortable: false,
            format: CellFormat::Text,
        }
    }

    pub fn is_actions(&self) -> bool {
        self.key == ACTIONS_KEY
    }
}

impl From<&FieldSpec> for ColumnDescriptor {
    fn from(field: &FieldSpec) -> Self {
        Self {
            key: field.name.clone(),
            label: field.label.clone(),
            sortable: field.sortable,
            format: field.format,
        }
    }
}

/// Ordered field list for one batch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    fields: Vec<FieldSpec>,
}

impl TableSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Derive the schema from a sample row using [`VISIBILITY_KEY`].
    pub fn infer(first: &Row) -> Self {
        Self::infer_with(first, VISIBILITY_KEY)
    }

    /// Derive the schema from a sample row.
    ///
    /// Every field of `first` is kept in enumeration order. A field is visible
    /// unless the visibility map maps it to `false`; the visibility field
    /// itself is recorded but never visible.
    pub fn infer_with(first: &Row, visibility_key: &str) -> Self {
        let visibility = first.get(visibility_key).and_then(Value::as_object);

        let fields = first
            .keys()
            .map(|name| {
                let hidden_by_map = visibility
                    .and_then(|map| map.get(name))
                    .is_some_and(|flag| flag == &Value::Bool(false));
                let mut field = FieldSpec::new(name);
                field.visible = name != visibility_key && !hidden_by_map;
                field
            })
            .collect();

        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Visible data columns, in schema order.
    pub fn data_columns(&self) -> Vec<ColumnDescriptor> {
        self.fields
            .iter()
            .filter(|f| f.visible)
            .map(ColumnDescriptor::from)
            .collect()
    }

    /// Visible columns plus the actions column in CRUD mode.
    pub fn columns(&self, crud: bool) -> Vec<ColumnDescriptor> {
        let mut columns = self.data_columns();
        if crud {
            columns.push(ColumnDescriptor::actions());
        }
        columns
    }
}

/// Upper-cases the first character, leaves the rest unchanged.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(columns: &[ColumnDescriptor]) -> Vec<&str> {
        columns.iter().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn test_infer_without_visibility_map() {
        let row = Row::from_value(json!({"id": 1, "nombre": "A", "estado": "Pendiente"}))
            .expect("object");
        let schema = TableSchema::infer(&row);
        let columns = schema.columns(false);
        assert_eq!(keys(&columns), vec!["id", "nombre", "estado"]);
        assert_eq!(columns[1].label, "Nombre");
        assert!(columns.iter().all(|c| c.sortable));
    }

    #[test]
    fn test_infer_honours_visibility_map() {
        let row = Row::from_value(json!({
            "id": 1,
            "nombre": "A",
            "descripcion": "larga",
            "esColumna": {"descripcion": false, "nombre": true}
        }))
        .expect("object");
        let schema = TableSchema::infer(&row);
        assert_eq!(keys(&schema.data_columns()), vec!["id", "nombre"]);
        // hidden fields stay in the schema
        assert_eq!(schema.fields().len(), 4);
        assert!(!schema.field("descripcion").expect("field").visible);
    }

    #[test]
    fn test_visibility_key_is_never_a_column() {
        let row = Row::from_value(json!({"a": 1, "esColumna": "not a map"})).expect("object");
        assert_eq!(keys(&TableSchema::infer(&row).data_columns()), vec!["a"]);
    }

    #[test]
    fn test_only_false_hides() {
        let row = Row::from_value(json!({"a": 1, "b": 2, "esColumna": {"a": null, "b": 0}}))
            .expect("object");
        assert_eq!(keys(&TableSchema::infer(&row).data_columns()), vec!["a", "b"]);
    }

    #[test]
    fn test_crud_appends_actions_column() {
        let row = Row::new().with("nombre", "A");
        let columns = TableSchema::infer(&row).columns(true);
        let last = columns.last().expect("actions");
        assert!(last.is_actions());
        assert_eq!(last.label, "Acciones");
        assert!(!last.sortable);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("fechaLimite"), "FechaLimite");
        assert_eq!(capitalize("ñandú"), "Ñandú");
        assert_eq!(capitalize(""), "");
    }
}
