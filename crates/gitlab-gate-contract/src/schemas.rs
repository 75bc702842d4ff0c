// crates/gitlab-gate-contract/src/schemas.rs
// ============================================================================
// Module: Input Contract Builders
// Description: JSON Schema fragments shared by tool input contracts.
// Purpose: Keep property shapes identical across every tool that uses them.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Small builders for the JSON Schema fragments used by tool input contracts.
//! Pagination lower bounds and calendar formats are left to the cross-field
//! validator so callers receive a field-specific message. Upper bounds that
//! only reflect the width of the decoded integer types live here.

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// Property names used for pagination.
pub const PAGINATION_FIELDS: [&str; 2] = ["page", "per_page"];

/// Builds an object contract from a property list and required names.
#[must_use]
pub fn object_schema(properties: Vec<(&str, Value)>, required: &[&str]) -> Value {
    let mut map = Map::new();
    for (name, schema) in properties {
        map.insert(name.to_string(), schema);
    }
    let required_values: Vec<Value> =
        required.iter().map(|value| Value::String((*value).to_string())).collect();
    json!({
        "type": "object",
        "properties": Value::Object(map),
        "required": required_values
    })
}

/// Opaque project identifier: numeric id or URL-style path.
#[must_use]
pub fn project_id() -> Value {
    identifier("Project ID or URL-encoded path (e.g. `group/project`).")
}

/// Opaque group identifier: numeric id or URL-style path.
#[must_use]
pub fn group_id() -> Value {
    identifier("Group ID or URL-encoded path.")
}

/// Opaque identifier accepted as a string or an integer.
///
/// Integers are bounded to what a 64-bit id can carry so they forward
/// unchanged.
#[must_use]
pub fn identifier(description: &str) -> Value {
    json!({
        "type": ["string", "integer"],
        "minimum": i64::MIN,
        "maximum": u64::MAX,
        "description": description
    })
}

/// Positive numeric identifier (issue iid, pipeline id, runner id).
#[must_use]
pub fn numeric_id(description: &str) -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": u64::MAX,
        "description": description
    })
}

/// Free-form string.
#[must_use]
pub fn string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

/// Non-empty string.
#[must_use]
pub fn non_empty_string(description: &str) -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "description": description
    })
}

/// Boolean flag.
#[must_use]
pub fn boolean(description: &str) -> Value {
    json!({
        "type": "boolean",
        "description": description
    })
}

/// Non-negative integer.
#[must_use]
pub fn integer(description: &str) -> Value {
    json!({
        "type": "integer",
        "minimum": 0,
        "maximum": i64::MAX,
        "description": description
    })
}

/// String restricted to a fixed set of values.
#[must_use]
pub fn string_enum(values: &[&str], description: &str) -> Value {
    json!({
        "type": "string",
        "enum": values,
        "description": description
    })
}

/// Array of strings.
#[must_use]
pub fn string_list(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description
    })
}

/// Array of positive integers.
#[must_use]
pub fn id_list(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "integer", "minimum": 1, "maximum": u64::MAX },
        "description": description
    })
}

/// Calendar timestamp. Format checks happen in cross-field validation.
#[must_use]
pub fn timestamp(description: &str) -> Value {
    json!({
        "type": "string",
        "description": format!("{description} ISO 8601 date or date-time.")
    })
}

/// Returns the `page` and `per_page` properties.
#[must_use]
pub fn pagination() -> Vec<(&'static str, Value)> {
    vec![
        (
            PAGINATION_FIELDS[0],
            json!({
                "type": "integer",
                "maximum": u32::MAX,
                "description": "Page number (1-based)."
            }),
        ),
        (
            PAGINATION_FIELDS[1],
            json!({
                "type": "integer",
                "description": "Results per page (1-100)."
            }),
        ),
    ]
}

/// Sort direction.
#[must_use]
pub fn sort_direction() -> Value {
    string_enum(&["asc", "desc"], "Sort direction.")
}

/// Wiki markup format.
#[must_use]
pub fn wiki_format() -> Value {
    string_enum(&["markdown", "rdoc", "asciidoc", "org"], "Wiki page markup format.")
}

/// Single file entry of a `push_files` request.
#[must_use]
pub fn file_entry() -> Value {
    object_schema(
        vec![
            ("file_path", non_empty_string("Path of the file in the repository.")),
            ("content", string("File content.")),
        ],
        &["file_path", "content"],
    )
}

/// Single CI variable of a `create_pipeline` request.
#[must_use]
pub fn pipeline_variable() -> Value {
    object_schema(
        vec![
            ("key", non_empty_string("Variable name.")),
            ("value", string("Variable value.")),
            ("variable_type", string_enum(&["env_var", "file"], "Variable type.")),
        ],
        &["key", "value"],
    )
}

/// Runner access level.
#[must_use]
pub fn runner_access_level() -> Value {
    string_enum(&["not_protected", "ref_protected"], "Which refs the runner may run jobs for.")
}

/// Array wrapper with a minimum item count.
#[must_use]
pub fn non_empty_array(items: Value, description: &str) -> Value {
    json!({
        "type": "array",
        "items": items,
        "minItems": 1,
        "description": description
    })
}
