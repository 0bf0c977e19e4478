use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::datalayer::CRUD::types::{NewTodo, Todo, TodoChanges};
use crate::errors::{FieldErrors, ServiceError, ServiceResult};

pub const DEFAULT_PRIORITY: i32 = 1;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";

/// Wire representation of a todo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub priority: i32,
    pub is_done: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Writable todo fields after type coercion, before rule validation
#[derive(Debug, Default, Validate)]
struct TodoInput {
    #[validate(length(min = 1, max = 255, message = "Ensure this field is between 1 and 255 characters."))]
    title: Option<String>,
    content: Option<String>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    priority: Option<i32>,
    is_done: Option<bool>,
}

/// Converts between JSON payloads and todo records.
///
/// `id`, `created_at` and `updated_at` are read-only and ignored on input, as
/// are unknown keys. `title` is required unless the update is partial.
pub struct TodoSerializer;

impl TodoSerializer {
    pub fn to_representation(todo: &Todo) -> TodoResponse {
        TodoResponse {
            id: todo.id,
            title: todo.title.clone(),
            content: todo.content.clone(),
            priority: todo.priority,
            is_done: todo.is_done,
            created_at: todo.created_at.to_rfc3339(),
            updated_at: todo.updated_at.to_rfc3339(),
        }
    }

    pub fn many(todos: &[Todo]) -> Vec<TodoResponse> {
        todos.iter().map(Self::to_representation).collect()
    }

    /// Validate a create payload, filling defaults for omitted optional fields
    pub fn validate_create(data: &Value) -> ServiceResult<NewTodo> {
        let input = Self::validate(data, false)?;
        let title = input
            .title
            .ok_or_else(|| ServiceError::field("title", REQUIRED))?;

        Ok(NewTodo {
            title,
            content: input.content.unwrap_or_default(),
            priority: input.priority.unwrap_or(DEFAULT_PRIORITY),
            is_done: input.is_done.unwrap_or(false),
        })
    }

    /// Validate an update payload; omitted fields stay untouched
    pub fn validate_update(data: &Value, partial: bool) -> ServiceResult<TodoChanges> {
        let input = Self::validate(data, partial)?;
        Ok(TodoChanges {
            title: input.title,
            content: input.content,
            priority: input.priority,
            is_done: input.is_done,
        })
    }

    fn validate(data: &Value, partial: bool) -> ServiceResult<TodoInput> {
        let object = data.as_object().ok_or_else(|| {
            ServiceError::field(
                "non_field_errors",
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(data)
                ),
            )
        })?;

        let mut errors = FieldErrors::new();
        let mut input = TodoInput {
            title: string_field(object, "title", &mut errors).map(|t| t.trim().to_string()),
            content: string_field(object, "content", &mut errors),
            priority: int_field(object, "priority", &mut errors),
            is_done: bool_field(object, "is_done", &mut errors),
        };

        if !partial && input.title.is_none() && !errors.contains_key("title") {
            errors.insert("title".to_string(), vec![REQUIRED.to_string()]);
        }

        if let Some(title) = &input.title {
            if title.is_empty() {
                errors
                    .entry("title".to_string())
                    .or_default()
                    .push("This field may not be blank.".to_string());
                input.title = None;
            }
        }

        if let Err(rule_errors) = input.validate() {
            if let ServiceError::ValidationError(fields) = ServiceError::from(rule_errors) {
                for (field, messages) in fields {
                    errors.entry(field).or_default().extend(messages);
                }
            }
        }

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(ServiceError::ValidationError(errors))
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn string_field(object: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match object.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => {
            push(errors, field, NOT_NULL);
            None
        }
        Value::Number(n) => Some(n.to_string()),
        _ => {
            push(errors, field, "Not a valid string.");
            None
        }
    }
}

fn int_field(object: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<i32> {
    let parsed = match object.get(field)? {
        Value::Null => {
            push(errors, field, NOT_NULL);
            return None;
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed.map(i32::try_from) {
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => {
            push(errors, field, "Ensure this value fits in a 32-bit integer.");
            None
        }
        None => {
            push(errors, field, "A valid integer is required.");
            None
        }
    }
}

fn bool_field(object: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<bool> {
    let parsed = match object.get(field)? {
        Value::Null => {
            push(errors, field, NOT_NULL);
            return None;
        }
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };

    if parsed.is_none() {
        push(errors, field, "Must be a valid boolean.");
    }
    parsed
}
