//! Tasks
//!
//! API records, their projection onto table rows, and the editable draft
//! behind the task form.

use crate::table::{CellFormat, FieldSpec, Row, TableSchema};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Date format shown in the table and typed in the form (DD/MM/AAAA)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Label for tasks without an assignee
pub const UNASSIGNED: &str = "Sin asignar";

/// Priority shown when the API does not send one
pub const DEFAULT_ROW_PRIORITY: Priority = Priority::Alta;

/// Row field names
pub mod fields {
    pub const ID: &str = "id";
    pub const NOMBRE: &str = "nombre";
    pub const PRIORIDAD: &str = "prioridad";
    pub const ESTADO: &str = "estado";
    pub const RESPONSABLE: &str = "responsable";
    pub const ASSIGNED_USER: &str = "assignedUser";
    pub const FECHA_LIMITE: &str = "fechaLimite";
    pub const DESCRIPCION: &str = "descripcion";
}

// ==================== Status ====================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendiente",
            TaskStatus::InProgress => "En progreso",
            TaskStatus::Completed => "Completado",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

/// API code to display label. Unknown codes pass through unchanged.
pub fn status_label(code: &str) -> String {
    TaskStatus::from_code(code)
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Display label to API code. Unknown labels pass through unchanged.
pub fn status_code(label: &str) -> String {
    TaskStatus::from_label(label)
        .map(|s| s.code().to_string())
        .unwrap_or_else(|| label.to_string())
}

// ==================== Priority ====================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Baja,
    #[default]
    Media,
    Alta,
    Critica,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Baja,
        Priority::Media,
        Priority::Alta,
        Priority::Critica,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Baja => "Baja",
            Priority::Media => "Media",
            Priority::Alta => "Alta",
            Priority::Critica => "Crítica",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

// ==================== API records ====================

/// Minimal user reference embedded in a task
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedUser {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// A task as returned by the API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assigned_user: Option<AssignedUser>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// `POST /tasks` and `PUT /tasks/{id}` body
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub status: String,
    pub assigned_user_id: Option<i64>,
}

/// Date part of an API timestamp, formatted with [`DATE_FORMAT`].
///
/// Accepts RFC 3339, zone-less ISO date-times and plain dates. Anything else
/// is returned unchanged.
pub fn format_api_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format(DATE_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date().format(DATE_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(DATE_FORMAT).to_string();
    }
    raw.to_string()
}

impl Task {
    /// Project onto a table row.
    pub fn to_row(&self) -> Row {
        let responsable = self
            .assigned_user
            .as_ref()
            .map(|u| u.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNASSIGNED);
        let assigned = self
            .assigned_user
            .as_ref()
            .and_then(|u| serde_json::to_value(u).ok())
            .unwrap_or(Value::Null);
        let priority = self
            .priority
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_ROW_PRIORITY.label().to_string());

        Row::new()
            .with(fields::ID, self.id)
            .with(fields::NOMBRE, self.title.as_str())
            .with(fields::PRIORIDAD, priority)
            .with(fields::ESTADO, status_label(&self.status))
            .with(fields::RESPONSABLE, responsable)
            .with(fields::ASSIGNED_USER, assigned)
            .with(
                fields::FECHA_LIMITE,
                self.last_modified
                    .as_deref()
                    .map(format_api_date)
                    .unwrap_or_default(),
            )
            .with(
                fields::DESCRIPCION,
                self.description.clone().unwrap_or_default(),
            )
    }
}

/// Columns of the task table
pub fn task_schema() -> TableSchema {
    TableSchema::new(vec![
        FieldSpec::new(fields::ID).label("ID"),
        FieldSpec::new(fields::NOMBRE),
        FieldSpec::new(fields::PRIORIDAD).format(CellFormat::Badge),
        FieldSpec::new(fields::ESTADO).format(CellFormat::Badge),
        FieldSpec::new(fields::RESPONSABLE),
        FieldSpec::new(fields::ASSIGNED_USER).hidden().unsortable(),
        FieldSpec::new(fields::FECHA_LIMITE).label("Fecha límite"),
        FieldSpec::new(fields::DESCRIPCION).hidden(),
    ])
}

/// Id of a task row
pub fn row_task_id(row: &Row) -> Option<i64> {
    row.id().and_then(Value::as_i64)
}

// ==================== Draft ====================

/// Draft fields that can fail validation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskField {
    Nombre,
    Responsable,
    FechaLimite,
    Descripcion,
}

/// Editable task behind the add/edit form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskDraft {
    pub id: Option<i64>,
    pub nombre: String,
    pub prioridad: Priority,
    pub estado: TaskStatus,
    pub responsable: Option<AssignedUser>,
    pub fecha_limite: String,
    pub descripcion: String,
}

impl TaskDraft {
    /// Blank draft for a new task due `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            id: None,
            nombre: String::new(),
            prioridad: Priority::Media,
            estado: TaskStatus::Pending,
            responsable: None,
            fecha_limite: today.format(DATE_FORMAT).to_string(),
            descripcion: String::new(),
        }
    }

    /// Draft prefilled from a task row. Unknown labels fall back to defaults.
    pub fn from_row(row: &Row) -> Self {
        let responsable = row
            .get(fields::ASSIGNED_USER)
            .cloned()
            .and_then(|v| serde_json::from_value::<AssignedUser>(v).ok());

        Self {
            id: row_task_id(row),
            nombre: row.display(fields::NOMBRE).into_owned(),
            prioridad: Priority::from_label(&row.display(fields::PRIORIDAD)).unwrap_or_default(),
            estado: TaskStatus::from_label(&row.display(fields::ESTADO)).unwrap_or_default(),
            responsable,
            fecha_limite: row.display(fields::FECHA_LIMITE).into_owned(),
            descripcion: row.display(fields::DESCRIPCION).into_owned(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Fields that fail validation. Every field is required and the due date
    /// must read DD/MM/AAAA.
    pub fn validate(&self) -> Vec<TaskField> {
        let mut invalid = Vec::new();
        if self.nombre.trim().is_empty() {
            invalid.push(TaskField::Nombre);
        }
        if self.responsable.is_none() {
            invalid.push(TaskField::Responsable);
        }
        if NaiveDate::parse_from_str(self.fecha_limite.trim(), DATE_FORMAT).is_err() {
            invalid.push(TaskField::FechaLimite);
        }
        if self.descripcion.trim().is_empty() {
            invalid.push(TaskField::Descripcion);
        }
        invalid
    }

    pub fn to_payload(&self) -> TaskPayload {
        TaskPayload {
            title: self.nombre.trim().to_string(),
            description: self.descripcion.trim().to_string(),
            status: self.estado.code().to_string(),
            assigned_user_id: self.responsable.as_ref().map(|u| u.id),
        }
    }

    /// Row for the local table after a successful update, keeping the
    /// draft's priority and due date.
    pub fn to_row(&self, id: i64) -> Row {
        let responsable = self
            .responsable
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| UNASSIGNED.to_string());
        let assigned = self
            .responsable
            .as_ref()
            .and_then(|u| serde_json::to_value(u).ok())
            .unwrap_or(Value::Null);

        Row::new()
            .with(fields::ID, id)
            .with(fields::NOMBRE, self.nombre.trim())
            .with(fields::PRIORIDAD, self.prioridad.label())
            .with(fields::ESTADO, self.estado.label())
            .with(fields::RESPONSABLE, responsable)
            .with(fields::ASSIGNED_USER, assigned)
            .with(fields::FECHA_LIMITE, self.fecha_limite.trim())
            .with(fields::DESCRIPCION, self.descripcion.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_task() -> Task {
        serde_json::from_str(
            r#"{
                "id": 42,
                "title": "Revisar UPS",
                "description": "Rack 3",
                "status": "IN_PROGRESS",
                "assignedUser": {"id": 7, "name": "Marta"},
                "lastModified": "2025-03-09T14:22:05.123"
            }"#,
        )
        .expect("task")
    }

    #[test]
    fn test_status_mapping_round_trip() {
        for status in TaskStatus::ALL {
            assert_eq!(status_code(&status_label(status.code())), status.code());
        }
        assert_eq!(status_label("ARCHIVED"), "ARCHIVED");
        assert_eq!(status_code("Archivada"), "Archivada");
    }

    #[test]
    fn test_task_row_projection() {
        let row = api_task().to_row();
        let keys: Vec<_> = row.keys().collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "nombre",
                "prioridad",
                "estado",
                "responsable",
                "assignedUser",
                "fechaLimite",
                "descripcion"
            ]
        );
        assert_eq!(row.display("estado"), "En progreso");
        assert_eq!(row.display("prioridad"), "Alta");
        assert_eq!(row.display("responsable"), "Marta");
        assert_eq!(row.display("fechaLimite"), "09/03/2025");
        assert_eq!(row_task_id(&row), Some(42));
    }

    #[test]
    fn test_unassigned_task() {
        let mut task = api_task();
        task.assigned_user = None;
        task.last_modified = None;
        let row = task.to_row();
        assert_eq!(row.display("responsable"), "Sin asignar");
        assert_eq!(row.get("assignedUser"), Some(&Value::Null));
        assert_eq!(row.display("fechaLimite"), "");
    }

    #[test]
    fn test_format_api_date_variants() {
        assert_eq!(format_api_date("2025-12-01T08:00:00Z"), "01/12/2025");
        assert_eq!(format_api_date("2025-12-01"), "01/12/2025");
        assert_eq!(format_api_date("mañana"), "mañana");
    }

    #[test]
    fn test_schema_hides_nested_and_long_fields() {
        let keys: Vec<_> = task_schema()
            .data_columns()
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(
            keys,
            vec!["id", "nombre", "prioridad", "estado", "responsable", "fechaLimite"]
        );
    }

    #[test]
    fn test_draft_from_row_and_payload() {
        let draft = TaskDraft::from_row(&api_task().to_row());
        assert_eq!(draft.id, Some(42));
        assert_eq!(draft.estado, TaskStatus::InProgress);
        assert_eq!(draft.prioridad, Priority::Alta);
        assert_eq!(draft.responsable.as_ref().map(|u| u.id), Some(7));
        assert!(draft.validate().is_empty());

        let payload = serde_json::to_value(draft.to_payload()).expect("json");
        assert_eq!(
            payload,
            serde_json::json!({
                "title": "Revisar UPS",
                "description": "Rack 3",
                "status": "IN_PROGRESS",
                "assignedUserId": 7
            })
        );
    }

    #[test]
    fn test_new_draft_validation() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
        let mut draft = TaskDraft::new(today);
        assert_eq!(draft.fecha_limite, "18/10/2026");
        assert_eq!(draft.prioridad, Priority::Media);
        assert_eq!(
            draft.validate(),
            vec![TaskField::Nombre, TaskField::Responsable, TaskField::Descripcion]
        );
        draft.fecha_limite = "2026-10-18".into();
        assert!(draft.validate().contains(&TaskField::FechaLimite));
    }
}
