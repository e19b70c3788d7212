//! Shape normalization: untyped JSON to typed records.
//!
//! Every shape problem is collected into a [`ShapeIssue`] before the document
//! is rejected, so an author fixes the whole upload in one pass instead of
//! resubmitting once per error.

use serde_json::{Map, Value};

use bramble_types::ExternalId;

use crate::error::{DocumentError, ShapeIssue};
use crate::model::{BookDocument, ContentRecord, OptionRecord, WaypointRecord};

/// Normalize an untyped document into typed records, or report every shape
/// issue found. Cross-reference checks run separately in
/// [`BookDocument::validate`].
pub(crate) fn normalize(value: &Value) -> Result<BookDocument, DocumentError> {
    let Some(root) = value.as_object() else {
        return Err(DocumentError::Malformed(vec![ShapeIssue::new(
            "document",
            "must be a JSON object",
        )]));
    };

    let mut issues = Vec::new();

    let name = required_string(root, "name", "document", &mut issues);
    if let Some(name) = &name {
        if name.is_empty() {
            issues.push(ShapeIssue::new("document", "field `name` must be non-empty"));
        }
    }
    let description = required_string(root, "description", "document", &mut issues);

    let waypoints = match root.get("waypoints") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| normalize_waypoint(index, item, &mut issues))
            .collect(),
        Some(_) => {
            issues.push(ShapeIssue::new("document", "field `waypoints` must be an array"));
            Vec::new()
        }
        None => {
            issues.push(ShapeIssue::new("document", "missing field `waypoints`"));
            Vec::new()
        }
    };

    let (true, Some(name), Some(description)) = (issues.is_empty(), name, description) else {
        return Err(DocumentError::Malformed(issues));
    };

    Ok(BookDocument {
        name,
        description,
        waypoints,
    })
}

fn normalize_waypoint(
    index: usize,
    value: &Value,
    issues: &mut Vec<ShapeIssue>,
) -> Option<WaypointRecord> {
    let location = format!("waypoints[{index}]");
    let Some(record) = value.as_object() else {
        issues.push(ShapeIssue::new(location, "must be a JSON object"));
        return None;
    };
    let before = issues.len();

    let id = match record.get("id") {
        Some(raw) => {
            let id = ExternalId::from_value(raw);
            if id.is_none() {
                issues.push(ShapeIssue::new(
                    location.as_str(),
                    "field `id` must be an integer or a string",
                ));
            }
            id
        }
        None => {
            issues.push(ShapeIssue::new(location.as_str(), "missing field `id`"));
            None
        }
    };

    let start = match record.get("start") {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            issues.push(ShapeIssue::new(location.as_str(), "field `start` must be a boolean"));
            false
        }
    };

    let content = normalize_content(&location, record, issues);
    let options = normalize_options(&location, record, issues);

    if issues.len() > before {
        return None;
    }
    Some(WaypointRecord {
        id: id?,
        start,
        content: content?,
        options: options?,
    })
}

fn normalize_content(
    location: &str,
    record: &Map<String, Value>,
    issues: &mut Vec<ShapeIssue>,
) -> Option<ContentRecord> {
    let content_location = format!("{location}.content");
    let content = match record.get("content") {
        Some(Value::Object(content)) => content,
        Some(_) => {
            issues.push(ShapeIssue::new(content_location, "must be a JSON object"));
            return None;
        }
        None => {
            issues.push(ShapeIssue::new(location, "missing field `content`"));
            return None;
        }
    };

    let kind = required_string(content, "type", &content_location, issues);

    let data = match content.get("data") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.push(ShapeIssue::new(
                content_location.as_str(),
                "field `data` must be a string or null",
            ));
            None
        }
    };

    Some(ContentRecord { kind: kind?, data })
}

fn normalize_options(
    location: &str,
    record: &Map<String, Value>,
    issues: &mut Vec<ShapeIssue>,
) -> Option<Vec<OptionRecord>> {
    let items = match record.get("options") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            issues.push(ShapeIssue::new(location, "field `options` must be an array"));
            return None;
        }
        None => {
            issues.push(ShapeIssue::new(location, "missing field `options`"));
            return None;
        }
    };

    let mut options = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let option_location = format!("{location}.options[{index}]");
        let Some(option) = item.as_object() else {
            issues.push(ShapeIssue::new(option_location, "must be a JSON object"));
            continue;
        };

        let destination = match option.get("destinationWaypoint_id") {
            Some(raw) => {
                let destination = ExternalId::from_value(raw);
                if destination.is_none() {
                    issues.push(ShapeIssue::new(
                        option_location.as_str(),
                        "field `destinationWaypoint_id` must be an integer or a string",
                    ));
                }
                destination
            }
            None => {
                issues.push(ShapeIssue::new(
                    option_location.as_str(),
                    "missing field `destinationWaypoint_id`",
                ));
                None
            }
        };

        let link_text = required_string(option, "linkText", &option_location, issues);

        if let (Some(destination), Some(link_text)) = (destination, link_text) {
            options.push(OptionRecord {
                destination,
                link_text,
            });
        }
    }
    Some(options)
}

fn required_string(
    record: &Map<String, Value>,
    field: &str,
    location: &str,
    issues: &mut Vec<ShapeIssue>,
) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.push(ShapeIssue::new(
                location,
                format!("field `{field}` must be a string"),
            ));
            None
        }
        None => {
            issues.push(ShapeIssue::new(location, format!("missing field `{field}`")));
            None
        }
    }
}
