//! Field validation for ticket payloads.
//!
//! Payloads are taken as raw JSON objects so that each field can be checked individually, in a
//! defined order, with a message that names the field. Unknown fields are ignored.

use crate::{
    api::models::tickets::{Priority, Status, TicketCreate, TicketUpdate},
    errors::{Error, Result},
};
use serde_json::{Map, Value};

/// Fields every creation payload must carry, checked in this order
const REQUIRED_ON_CREATE: [&str; 3] = ["title", "description", "priority"];

fn string_field<'a>(name: &str, value: &'a Value) -> Result<&'a str> {
    let text = value
        .as_str()
        .ok_or_else(|| Error::bad_request(format!("Field '{name}' must be a string")))?;
    if text.is_empty() {
        return Err(Error::bad_request(format!("Field '{name}' must not be empty")));
    }
    Ok(text)
}

fn priority_field(value: &Value) -> Result<Priority> {
    let text = string_field("priority", value)?;
    Priority::parse(text).ok_or_else(|| {
        Error::bad_request(format!(
            "Invalid priority '{text}': must be one of {}",
            join(Priority::ALL.iter().map(Priority::as_str))
        ))
    })
}

fn status_field(value: &Value) -> Result<Status> {
    let text = string_field("status", value)?;
    Status::parse(text).ok_or_else(|| {
        Error::bad_request(format!(
            "Invalid status '{text}': must be one of {}",
            join(Status::ALL.iter().map(Status::as_str))
        ))
    })
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

/// Validate a creation payload.
///
/// A `status` field, if present, is ignored: new tickets always start `open`.
pub fn parse_create(payload: &Map<String, Value>) -> Result<TicketCreate> {
    for field in REQUIRED_ON_CREATE {
        if !payload.contains_key(field) {
            return Err(Error::bad_request(format!("Missing required field: {field}")));
        }
    }

    Ok(TicketCreate {
        title: string_field("title", &payload["title"])?.to_string(),
        description: string_field("description", &payload["description"])?.to_string(),
        priority: priority_field(&payload["priority"])?,
    })
}

/// Validate a partial update.
///
/// Fields are checked in the order they appear in the payload and the first invalid one fails
/// the whole update. Nothing is applied here; the result is handed to the store in one step.
pub fn parse_update(payload: &Map<String, Value>) -> Result<TicketUpdate> {
    let mut update = TicketUpdate::default();
    for (field, value) in payload {
        match field.as_str() {
            "title" => update.title = Some(string_field(field, value)?.to_string()),
            "description" => update.description = Some(string_field(field, value)?.to_string()),
            "priority" => update.priority = Some(priority_field(value)?),
            "status" => update.status = Some(status_field(value)?),
            _ => {}
        }
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn message(result: Result<impl std::fmt::Debug>) -> String {
        match result {
            Err(Error::BadRequest { message }) => message,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_create() {
        let create = parse_create(&object(json!({
            "title": "Printer",
            "description": "On fire",
            "priority": "high",
            "status": "closed",
            "color": "red"
        })))
        .unwrap();
        assert_eq!(
            create,
            TicketCreate {
                title: "Printer".to_string(),
                description: "On fire".to_string(),
                priority: Priority::High,
            }
        );
    }

    #[test]
    fn test_create_missing_fields_reported_in_fixed_order() {
        assert_eq!(message(parse_create(&object(json!({})))), "Missing required field: title");
        assert_eq!(
            message(parse_create(&object(json!({"priority": "low", "title": "t"})))),
            "Missing required field: description"
        );
        assert_eq!(
            message(parse_create(&object(json!({"title": "t", "description": "d"})))),
            "Missing required field: priority"
        );
    }

    #[test]
    fn test_create_rejects_bad_values() {
        assert_eq!(
            message(parse_create(&object(json!({"title": "", "description": "d", "priority": "low"})))),
            "Field 'title' must not be empty"
        );
        assert_eq!(
            message(parse_create(&object(json!({"title": 42, "description": "d", "priority": "low"})))),
            "Field 'title' must be a string"
        );
        assert_eq!(
            message(parse_create(&object(json!({"title": "t", "description": null, "priority": "low"})))),
            "Field 'description' must be a string"
        );
        assert_eq!(
            message(parse_create(&object(json!({"title": "t", "description": "d", "priority": "urgent"})))),
            "Invalid priority 'urgent': must be one of low, medium, high"
        );
    }

    #[test]
    fn test_update_partial() {
        let update = parse_update(&object(json!({"status": "in progress", "unknown": 1}))).unwrap();
        assert_eq!(
            update,
            TicketUpdate {
                status: Some(Status::InProgress),
                ..Default::default()
            }
        );
        assert!(parse_update(&object(json!({}))).unwrap().is_empty());
    }

    #[test]
    fn test_update_first_invalid_field_in_payload_order_wins() {
        let payload = object(json!({"status": "done", "priority": "urgent"}));
        assert_eq!(
            message(parse_update(&payload)),
            "Invalid status 'done': must be one of open, in progress, resolved, closed"
        );

        let payload = object(json!({"priority": "urgent", "status": "done"}));
        assert_eq!(
            message(parse_update(&payload)),
            "Invalid priority 'urgent': must be one of low, medium, high"
        );
    }

    #[test]
    fn test_update_rejects_empty_and_null() {
        assert_eq!(
            message(parse_update(&object(json!({"title": ""})))),
            "Field 'title' must not be empty"
        );
        assert_eq!(
            message(parse_update(&object(json!({"priority": null})))),
            "Field 'priority' must be a string"
        );
    }
}
