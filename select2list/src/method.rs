//! Named operations reachable through the dispatcher.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::controller::Values;

/// Argument decoding error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodError {
    #[error("`{method}` expects {expected} as argument {position}, got {found}")]
    InvalidArgument {
        method: &'static str,
        position: usize,
        expected: &'static str,
        found: String,
    },
}

/// The closed set of operations a bound widget answers to by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Re-render from the source
    Redraw,
    /// Append an option to the source
    Add {
        value: String,
        label: Option<String>,
        attributes: BTreeMap<String, String>,
    },
    /// Change the current selection
    Select(String),
    Enable(Values),
    Disable(Values),
}

impl Method {
    pub const NAMES: [&'static str; 5] = ["redraw", "add", "select", "enable", "disable"];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Redraw => "redraw",
            Method::Add { .. } => "add",
            Method::Select(_) => "select",
            Method::Enable(_) => "enable",
            Method::Disable(_) => "disable",
        }
    }

    /// Look `name` up and decode its positional arguments.
    ///
    /// Returns `Ok(None)` for names that are not operations. Extra arguments
    /// are ignored; missing ones read as absent.
    pub fn parse(name: &str, args: &[Value]) -> Result<Option<Self>, MethodError> {
        let method = match name {
            "redraw" => Method::Redraw,
            "add" => Method::Add {
                value: optional_scalar("add", args, 0)?.unwrap_or_default(),
                label: optional_scalar("add", args, 1)?,
                attributes: attributes("add", args, 2)?,
            },
            "select" => Method::Select(optional_scalar("select", args, 0)?.unwrap_or_default()),
            "enable" => Method::Enable(values("enable", args, 0)?),
            "disable" => Method::Disable(values("disable", args, 0)?),
            _ => return Ok(None),
        };
        Ok(Some(method))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "a boolean".into(),
        Value::Number(_) => "a number".into(),
        Value::String(_) => "a string".into(),
        Value::Array(_) => "an array".into(),
        Value::Object(_) => "an object".into(),
    }
}

/// Scalars read as strings; `null` reads as absent.
fn scalar(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::Bool(b) => Some(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn optional_scalar(
    method: &'static str,
    args: &[Value],
    position: usize,
) -> Result<Option<String>, MethodError> {
    let Some(arg) = args.get(position) else {
        return Ok(None);
    };
    scalar(arg).ok_or_else(|| MethodError::InvalidArgument {
        method,
        position,
        expected: "a string",
        found: describe(arg),
    })
}

fn values(method: &'static str, args: &[Value], position: usize) -> Result<Values, MethodError> {
    let invalid = |arg: &Value| MethodError::InvalidArgument {
        method,
        position,
        expected: "a value or an array of values",
        found: describe(arg),
    };

    match args.get(position) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Values::All),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match scalar(item) {
                Some(Some(value)) => Ok(value),
                _ => Err(invalid(item)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Values::Many),
        Some(Value::Object(_)) | Some(Value::Bool(true)) => Err(invalid(&args[position])),
        Some(arg) => match scalar(arg) {
            Some(Some(value)) => Ok(Values::One(value)),
            _ => Err(invalid(arg)),
        },
    }
}

fn attributes(
    method: &'static str,
    args: &[Value],
    position: usize,
) -> Result<BTreeMap<String, String>, MethodError> {
    match args.get(position) {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => {
            let mut attributes = BTreeMap::new();
            for (name, value) in map {
                match scalar(value) {
                    Some(Some(value)) => {
                        attributes.insert(name.clone(), value);
                    }
                    Some(None) => {}
                    None => {
                        return Err(MethodError::InvalidArgument {
                            method,
                            position,
                            expected: "an object of scalar attribute values",
                            found: describe(value),
                        });
                    }
                }
            }
            Ok(attributes)
        }
        Some(arg) => Err(MethodError::InvalidArgument {
            method,
            position,
            expected: "an object of attributes",
            found: describe(arg),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_name_is_none() {
        assert_eq!(Method::parse("destroy", &[]), Ok(None));
        assert_eq!(Method::parse("Select", &[json!("a")]), Ok(None));
    }

    #[test]
    fn test_select_stringifies_scalars() {
        assert_eq!(
            Method::parse("select", &[json!("b")]),
            Ok(Some(Method::Select("b".into())))
        );
        assert_eq!(
            Method::parse("select", &[json!(7)]),
            Ok(Some(Method::Select("7".into())))
        );
        assert_eq!(
            Method::parse("select", &[]),
            Ok(Some(Method::Select(String::new())))
        );
        assert!(Method::parse("select", &[json!({"v": 1})]).is_err());
    }

    #[test]
    fn test_add_arguments() {
        let method = Method::parse(
            "add",
            &[json!("kiwi"), json!(null), json!({"disabled": "disabled", "title": null})],
        );

        assert_eq!(
            method,
            Ok(Some(Method::Add {
                value: "kiwi".into(),
                label: None,
                attributes: BTreeMap::from([("disabled".into(), "disabled".into())]),
            }))
        );
        assert!(Method::parse("add", &[json!("kiwi"), json!("Kiwi"), json!("x")]).is_err());
    }

    #[test]
    fn test_enable_disable_targets() {
        assert_eq!(
            Method::parse("enable", &[]),
            Ok(Some(Method::Enable(Values::All)))
        );
        assert_eq!(
            Method::parse("disable", &[json!("a")]),
            Ok(Some(Method::Disable(Values::One("a".into()))))
        );
        assert_eq!(
            Method::parse("disable", &[json!(["a", 2])]),
            Ok(Some(Method::Disable(Values::Many(vec!["a".into(), "2".into()]))))
        );
        assert!(Method::parse("disable", &[json!([["a"]])]).is_err());
        assert!(Method::parse("enable", &[json!({})]).is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for name in Method::NAMES {
            let method = Method::parse(name, &[]).unwrap().unwrap();
            assert_eq!(method.name(), name);
        }
    }
}
