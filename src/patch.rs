//! JSON-Patch-style edit operations over the point-of-interest update view.
//!
//! A patch request is an ordered sequence of operations, each an op code, a
//! target path and optionally a value. Application is all-or-nothing: the
//! operations run against a copy of the base document, and the first failing
//! operation rejects the whole sequence with the base left untouched.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::dto::PointOfInterestForUpdate;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

/// One step of a patch request.
#[derive(Clone, Debug, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default)]
    pub from: Option<String>,
    /// Absent and JSON null are equivalent: both clear the target.
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("the target path '{0}' does not exist on the document")]
    UnknownPath(String),
    #[error("the '{0:?}' operation requires a 'from' path")]
    MissingFrom(PatchOp),
    #[error("the value for '{0}' must be a string or null")]
    InvalidValue(String),
    #[error("the 'test' operation failed at '{0}'")]
    TestFailed(String),
}

/// The two patchable fields of the update view.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Target {
    Name,
    Description,
}

impl Target {
    fn resolve(path: &str) -> Result<Self, PatchError> {
        match path.trim_start_matches('/') {
            "name" => Ok(Target::Name),
            "description" => Ok(Target::Description),
            _ => Err(PatchError::UnknownPath(path.to_string())),
        }
    }
}

fn read(doc: &PointOfInterestForUpdate, target: Target) -> Option<String> {
    match target {
        Target::Name => doc.name.clone(),
        Target::Description => doc.description.clone(),
    }
}

fn write(doc: &mut PointOfInterestForUpdate, target: Target, value: Option<String>) {
    match target {
        Target::Name => doc.name = value,
        Target::Description => doc.description = value,
    }
}

fn string_value(op: &PatchOperation) -> Result<Option<String>, PatchError> {
    match &op.value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(PatchError::InvalidValue(op.path.clone())),
    }
}

/// Applies `operations` in order to a copy of `base`. Returns the patched
/// document, or the first error with nothing applied.
pub fn apply(
    operations: &[PatchOperation],
    base: &PointOfInterestForUpdate,
) -> Result<PointOfInterestForUpdate, PatchError> {
    let mut doc = base.clone();

    for operation in operations {
        let target = Target::resolve(&operation.path)?;
        match operation.op {
            PatchOp::Add | PatchOp::Replace => {
                write(&mut doc, target, string_value(operation)?);
            }
            PatchOp::Remove => {
                write(&mut doc, target, None);
            }
            PatchOp::Test => {
                if read(&doc, target) != string_value(operation)? {
                    return Err(PatchError::TestFailed(operation.path.clone()));
                }
            }
            PatchOp::Move | PatchOp::Copy => {
                let from = operation
                    .from
                    .as_deref()
                    .ok_or(PatchError::MissingFrom(operation.op))?;
                let source = Target::resolve(from)?;
                let value = read(&doc, source);
                if operation.op == PatchOp::Move {
                    write(&mut doc, source, None);
                }
                write(&mut doc, target, value);
            }
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> PointOfInterestForUpdate {
        PointOfInterestForUpdate {
            name: Some("Central Park".to_string()),
            description: Some("The most visited urban park in the United States.".to_string()),
        }
    }

    fn op(op: PatchOp, path: &str, value: Value) -> PatchOperation {
        PatchOperation {
            op,
            path: path.to_string(),
            from: None,
            value,
        }
    }

    #[test]
    fn test_replace_sets_the_target_field() {
        let patched = apply(
            &[op(PatchOp::Replace, "/name", json!("Sheep Meadow"))],
            &base(),
        )
        .unwrap();
        assert_eq!(patched.name.as_deref(), Some("Sheep Meadow"));
        assert_eq!(patched.description, base().description);
    }

    #[test]
    fn test_remove_clears_the_target_field() {
        let patched = apply(&[op(PatchOp::Remove, "/description", Value::Null)], &base()).unwrap();
        assert_eq!(patched.description, None);
    }

    #[test]
    fn test_operations_apply_in_order() {
        let patched = apply(
            &[
                op(PatchOp::Replace, "/description", json!("First")),
                op(PatchOp::Replace, "/description", json!("Second")),
            ],
            &base(),
        )
        .unwrap();
        assert_eq!(patched.description.as_deref(), Some("Second"));
    }

    #[test]
    fn test_unknown_path_rejects_the_whole_sequence() {
        let result = apply(
            &[
                op(PatchOp::Replace, "/name", json!("Sheep Meadow")),
                op(PatchOp::Replace, "/rating", json!("5")),
            ],
            &base(),
        );
        assert_eq!(
            result,
            Err(PatchError::UnknownPath("/rating".to_string()))
        );
    }

    #[test]
    fn test_base_document_is_never_mutated() {
        let document = base();
        let _ = apply(
            &[
                op(PatchOp::Replace, "/name", json!("Sheep Meadow")),
                op(PatchOp::Replace, "/missing", json!("x")),
            ],
            &document,
        );
        assert_eq!(document, base());
    }

    #[test]
    fn test_non_string_value_is_rejected() {
        let result = apply(&[op(PatchOp::Replace, "/name", json!(42))], &base());
        assert_eq!(result, Err(PatchError::InvalidValue("/name".to_string())));
    }

    #[test]
    fn test_failed_test_operation_rejects() {
        let result = apply(
            &[
                op(PatchOp::Test, "/name", json!("Eiffel Tower")),
                op(PatchOp::Remove, "/description", Value::Null),
            ],
            &base(),
        );
        assert_eq!(result, Err(PatchError::TestFailed("/name".to_string())));
    }

    #[test]
    fn test_move_clears_the_source_field() {
        let mut operation = op(PatchOp::Move, "/description", Value::Null);
        operation.from = Some("/name".to_string());
        let patched = apply(&[operation], &base()).unwrap();
        assert_eq!(patched.name, None);
        assert_eq!(patched.description.as_deref(), Some("Central Park"));
    }

    #[test]
    fn test_null_value_clears_like_remove() {
        let patched = apply(
            &[op(PatchOp::Replace, "/description", Value::Null)],
            &base(),
        )
        .unwrap();
        assert_eq!(patched.description, None);
    }
}
