// crates/gitlab-gate-mcp/src/validation.rs
// ============================================================================
// Module: Argument Validation
// Description: Structural and cross-field validation of tool arguments.
// Purpose: Reject bad input before any backend call is planned.
// Dependencies: gitlab-gate-contract, jsonschema, time
// ============================================================================

//! ## Overview
//! Validation runs in two stages. The [`ArgumentValidator`] checks raw
//! arguments against the tool's compiled input contract and reports every
//! violation at once. The [`CrossFieldValidator`] then applies the rules JSON
//! Schema cannot express (pagination bounds, calendar fields) and stops at
//! the first violated rule.
//!
//! Security posture: arguments are untrusted; nothing reaches dispatch until
//! both stages pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use gitlab_gate_contract::CatalogError;
use gitlab_gate_contract::CrossFieldRules;
use gitlab_gate_contract::ToolCatalog;
use gitlab_gate_contract::ToolDescriptor;
use gitlab_gate_contract::ToolName;
use jsonschema::Draft;
use jsonschema::Validator;
use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Iso8601;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::tools::ToolError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound for `per_page`.
pub const MAX_PER_PAGE: u64 = 100;
/// Path label used for violations at the argument root.
pub(crate) const ROOT_PATH: &str = "arguments";
/// Separator between aggregated violations.
const VIOLATION_SEPARATOR: &str = "; ";

// ============================================================================
// SECTION: Argument Validator
// ============================================================================

/// Compiled input contracts keyed by tool.
///
/// # Invariants
/// - Holds exactly one compiled validator per catalog entry.
pub struct ArgumentValidator {
    /// Compiled validators.
    validators: BTreeMap<ToolName, Validator>,
}

impl ArgumentValidator {
    /// Compiles every contract in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidContract`] when a contract does not
    /// compile.
    pub fn new(catalog: &ToolCatalog) -> Result<Self, CatalogError> {
        let mut validators = BTreeMap::new();
        for tool in catalog.list() {
            let validator = jsonschema::options()
                .with_draft(Draft::Draft202012)
                .build(&tool.input_schema)
                .map_err(|err| CatalogError::InvalidContract {
                    tool: tool.name,
                    message: err.to_string(),
                })?;
            validators.insert(tool.name, validator);
        }
        Ok(Self {
            validators,
        })
    }

    /// Validates raw arguments against the tool contract.
    ///
    /// Absent or `null` arguments fail before the contract is consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Validation`] listing every violated field.
    pub fn validate<'a>(
        &self,
        tool: &ToolDescriptor,
        arguments: Option<&'a Value>,
    ) -> Result<&'a Value, ToolError> {
        let arguments = match arguments {
            Some(Value::Null) | None => {
                return Err(ToolError::Validation("Arguments are required".to_string()));
            }
            Some(arguments) => arguments,
        };
        let validator = self
            .validators
            .get(&tool.name)
            .ok_or_else(|| ToolError::UnknownTool(tool.name.to_string()))?;
        let violations: Vec<String> = validator
            .iter_errors(arguments)
            .map(|err| {
                let mut path = dotted_path(&err.instance_path().to_string());
                let reason = match err.kind() {
                    ValidationErrorKind::Required {
                        property,
                    } => {
                        let property =
                            property.as_str().map_or_else(|| property.to_string(), str::to_string);
                        path = join_path(&path, &property);
                        "is required".to_string()
                    }
                    _ => err.to_string(),
                };
                let path = if path.is_empty() { ROOT_PATH.to_string() } else { path };
                format!("{path}: {reason}")
            })
            .collect();
        if violations.is_empty() {
            return Ok(arguments);
        }
        Err(ToolError::Validation(format!(
            "Invalid arguments: {}",
            violations.join(VIOLATION_SEPARATOR)
        )))
    }
}

/// Converts a JSON pointer into a dotted field path.
fn dotted_path(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Appends a field to a dotted path.
fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() { field.to_string() } else { format!("{path}.{field}") }
}

// ============================================================================
// SECTION: Cross-Field Validator
// ============================================================================

/// Pagination and calendar checks applied after structural validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossFieldValidator;

impl CrossFieldValidator {
    /// Applies the tool's declared rules in order: `page`, `per_page`, then
    /// each calendar field in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Validation`] for the first violated rule.
    pub fn validate(self, rules: &CrossFieldRules, arguments: &Value) -> Result<(), ToolError> {
        if rules.is_empty() {
            return Ok(());
        }
        if rules.paginated {
            if let Some(page) = arguments.get("page").and_then(Value::as_f64)
                && page < 1.0
            {
                return Err(ToolError::Validation("page must be greater than 0".to_string()));
            }
            if let Some(per_page) = arguments.get("per_page").and_then(Value::as_f64)
                && !(1.0..=100.0).contains(&per_page)
            {
                return Err(ToolError::Validation(format!(
                    "per_page must be between 1 and {MAX_PER_PAGE}"
                )));
            }
        }
        for field in &rules.date_fields {
            if let Some(value) = arguments.get(*field).and_then(Value::as_str)
                && !is_calendar_timestamp(value)
            {
                return Err(ToolError::Validation(format!(
                    "{field} must be a valid ISO 8601 date"
                )));
            }
        }
        Ok(())
    }
}

/// Calendar date form accepted for date-only fields.
const CALENDAR_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Returns true for `YYYY-MM-DD` or an ISO 8601 date-time; a date-time
/// without an offset is read as UTC.
///
/// The value is checked exactly as it will be forwarded, so surrounding
/// whitespace is rejected.
#[must_use]
pub fn is_calendar_timestamp(value: &str) -> bool {
    if value.contains(['T', 't']) {
        return OffsetDateTime::parse(value, &Rfc3339).is_ok()
            || OffsetDateTime::parse(value, &Iso8601::PARSING).is_ok()
            || PrimitiveDateTime::parse(value, &Iso8601::PARSING).is_ok();
    }
    Date::parse(value, CALENDAR_DATE).is_ok()
}
