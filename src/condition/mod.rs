//! Condition evaluation over prior step results.
//!
//! Conditions are small boolean expressions that may reference fields of
//! earlier results with `{step_id.field}` placeholders:
//!
//! ```text
//! {review.review} != None and len({gen.code}) > 0
//! {ask.input} == 'yes' or {ask.input} == 'y'
//! 'TODO' not in {gen.code}
//! ```
//!
//! References are looked up by value at evaluation time; they are never
//! spliced into the expression text. A reference to a missing step or
//! field evaluates to `None`.
//!
//! The grammar is documented in [`parser`].

pub mod lexer;
pub mod parser;

use serde_json::Value;
use thiserror::Error;

pub use parser::{parse, CompareOp, Expr};

/// Errors raised while parsing or evaluating a condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("condition is empty")]
    Empty,

    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated reference, expected '}}'")]
    UnterminatedReference,

    #[error("invalid reference '{{{reference}}}', expected {{step.field}}")]
    InvalidReference { reference: String },

    #[error("invalid number '{text}'")]
    InvalidNumber { text: String },

    #[error("unexpected '{found}'")]
    UnexpectedToken { found: String },

    #[error("unexpected end of condition")]
    UnexpectedEnd,

    #[error("unknown name '{name}'")]
    UnknownName { name: String },

    #[error("cannot apply '{operation}' to {left} and {right}")]
    TypeMismatch {
        operation: String,
        left: String,
        right: String,
    },
}

/// Source of `{step.field}` values.
pub trait FieldLookup {
    /// Look up `field` in the result of `step`.
    fn lookup(&self, step: &str, field: &str) -> Option<&Value>;
}

/// Parse and evaluate `condition` to a boolean.
pub fn evaluate(condition: &str, fields: &dyn FieldLookup) -> Result<bool, ConditionError> {
    let expr = parse(condition)?;
    evaluate_expr(&expr, fields)
}

/// Evaluate an already-parsed condition to a boolean.
pub fn evaluate_expr(expr: &Expr, fields: &dyn FieldLookup) -> Result<bool, ConditionError> {
    Ok(truthy(&eval(expr, fields)?))
}

fn eval(expr: &Expr, fields: &dyn FieldLookup) -> Result<Value, ConditionError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Reference { step, field } => {
            Ok(fields.lookup(step, field).cloned().unwrap_or(Value::Null))
        }
        Expr::Not(inner) => Ok(Value::Bool(!truthy(&eval(inner, fields)?))),
        Expr::Negate(inner) => {
            let value = eval(inner, fields)?;
            match value.as_f64() {
                Some(n) => Ok(number(-n)),
                None => Err(mismatch("-", &value, &Value::Null)),
            }
        }
        Expr::And(left, right) => {
            if !truthy(&eval(left, fields)?) {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(truthy(&eval(right, fields)?)))
        }
        Expr::Or(left, right) => {
            if truthy(&eval(left, fields)?) {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(truthy(&eval(right, fields)?)))
        }
        Expr::Len(inner) => {
            let value = eval(inner, fields)?;
            let len = match &value {
                Value::String(s) => s.chars().count(),
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                other => return Err(mismatch("len", other, &Value::Null)),
            };
            Ok(number(len as f64))
        }
        Expr::Compare { op, left, right } => {
            let left = eval(left, fields)?;
            let right = eval(right, fields)?;
            compare(*op, &left, &right).map(Value::Bool)
        }
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, ConditionError> {
    match op {
        CompareOp::Eq => Ok(values_equal(left, right)),
        CompareOp::Ne => Ok(!values_equal(left, right)),
        CompareOp::Is => Ok(values_equal(left, right)),
        CompareOp::IsNot => Ok(!values_equal(left, right)),
        CompareOp::In => contains(right, left).ok_or_else(|| mismatch(op.symbol(), left, right)),
        CompareOp::NotIn => contains(right, left)
            .map(|found| !found)
            .ok_or_else(|| mismatch(op.symbol(), left, right)),
        CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
            let ordering = match (left, right) {
                (Value::Number(_), Value::Number(_)) => {
                    let (a, b) = (left.as_f64(), right.as_f64());
                    a.zip(b).and_then(|(a, b)| a.partial_cmp(&b))
                }
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => None,
            };
            let ordering = ordering.ok_or_else(|| mismatch(op.symbol(), left, right))?;
            Ok(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::Le => ordering.is_le(),
                CompareOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            })
        }
    }
}

/// `needle in haystack`; `None` when the operands don't support membership.
fn contains(haystack: &Value, needle: &Value) -> Option<bool> {
    match (haystack, needle) {
        (Value::String(h), Value::String(n)) => Some(h.contains(n.as_str())),
        (Value::Array(items), _) => Some(items.iter().any(|item| values_equal(item, needle))),
        (Value::Object(map), Value::String(key)) => Some(map.contains_key(key)),
        _ => None,
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => left.as_f64() == right.as_f64(),
        _ => left == right,
    }
}

/// Truthiness: `None`, `false`, `0`, empty strings and empty collections are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn number(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn mismatch(operation: &str, left: &Value, right: &Value) -> ConditionError {
    ConditionError::TypeMismatch {
        operation: operation.to_string(),
        left: type_name(left).to_string(),
        right: type_name(right).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Fields(HashMap<(String, String), Value>);

    impl Fields {
        fn with(mut self, step: &str, field: &str, value: Value) -> Self {
            self.0.insert((step.to_string(), field.to_string()), value);
            self
        }
    }

    impl FieldLookup for Fields {
        fn lookup(&self, step: &str, field: &str) -> Option<&Value> {
            self.0.get(&(step.to_string(), field.to_string()))
        }
    }

    fn eval_with(condition: &str, fields: &Fields) -> bool {
        evaluate(condition, fields).unwrap()
    }

    #[test]
    fn boolean_literals() {
        let fields = Fields::default();
        assert!(eval_with("True", &fields));
        assert!(!eval_with("False", &fields));
        assert!(eval_with("true && !false", &fields));
    }

    #[test]
    fn missing_reference_is_none() {
        let fields = Fields::default();
        assert!(eval_with("{gen.code} == None", &fields));
        assert!(eval_with("{gen.code} is None", &fields));
        assert!(!eval_with("{gen.code}", &fields));
    }

    #[test]
    fn reference_values_are_not_reinterpreted() {
        let fields = Fields::default().with("ask", "input", json!("') or True or ('"));
        assert!(!eval_with("{ask.input} == 'x'", &fields));
    }

    #[test]
    fn string_comparisons() {
        let fields = Fields::default().with("ask", "input", json!("yes"));
        assert!(eval_with("{ask.input} == 'yes'", &fields));
        assert!(eval_with("{ask.input} != \"no\"", &fields));
        assert!(eval_with("'es' in {ask.input}", &fields));
        assert!(eval_with("'z' not in {ask.input}", &fields));
        assert!(eval_with("'abc' < 'abd'", &fields));
    }

    #[test]
    fn numeric_comparisons_mix_integers_and_floats() {
        let fields = Fields::default().with("count", "value", json!(3));
        assert!(eval_with("{count.value} == 3.0", &fields));
        assert!(eval_with("{count.value} >= 3", &fields));
        assert!(eval_with("{count.value} < 10 and {count.value} > -1", &fields));
    }

    #[test]
    fn is_compares_numbers_by_value() {
        let fields = Fields::default()
            .with("a", "n", json!(3))
            .with("a", "f", json!(2.5));
        assert!(eval_with("{a.n} is 3", &fields));
        assert!(eval_with("{a.n} is 3.0", &fields));
        assert!(!eval_with("{a.n} is not 3", &fields));
        assert!(eval_with("{a.f} is 2.5", &fields));
    }

    #[test]
    fn len_of_strings_and_lists() {
        let fields = Fields::default()
            .with("gen", "code", json!("print()"))
            .with("gen", "items", json!([1, 2, 3]));
        assert!(eval_with("len({gen.code}) == 7", &fields));
        assert!(eval_with("len({gen.items}) > 2", &fields));
    }

    #[test]
    fn membership_in_lists_and_objects() {
        let fields = Fields::default()
            .with("a", "list", json!(["x", 2]))
            .with("a", "map", json!({"k": 1}));
        assert!(eval_with("'x' in {a.list}", &fields));
        assert!(eval_with("2.0 in {a.list}", &fields));
        assert!(eval_with("'k' in {a.map}", &fields));
    }

    #[test]
    fn boolean_fields() {
        let fields = Fields::default().with("save", "success", json!(true));
        assert!(eval_with("{save.success}", &fields));
        assert!(eval_with("{save.success} == True", &fields));
        assert!(!eval_with("not {save.success}", &fields));
    }

    #[test]
    fn truthiness_rules() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!([])));
        assert!(truthy(&json!("x")));
        assert!(truthy(&json!(0.5)));
        assert!(truthy(&json!({"a": 1})));
    }

    #[test]
    fn short_circuit_skips_type_errors() {
        let fields = Fields::default();
        assert!(!eval_with("False and len(None) > 0", &fields));
        assert!(eval_with("True or len(None) > 0", &fields));
    }

    #[test]
    fn ordering_across_types_is_an_error() {
        let fields = Fields::default().with("a", "b", json!("3"));
        let err = evaluate("{a.b} > 2", &fields).unwrap_err();
        assert_eq!(
            err,
            ConditionError::TypeMismatch {
                operation: ">".into(),
                left: "string".into(),
                right: "number".into()
            }
        );
    }

    #[test]
    fn len_of_none_is_an_error() {
        let err = evaluate("len({a.b}) > 0", &Fields::default()).unwrap_err();
        assert!(matches!(err, ConditionError::TypeMismatch { .. }));
    }

    #[test]
    fn syntax_errors_surface() {
        assert!(evaluate("{a.b} = 1", &Fields::default()).is_err());
        assert!(evaluate("", &Fields::default()).is_err());
    }

    #[test]
    fn error_messages_are_readable() {
        let err = ConditionError::InvalidReference {
            reference: "gen".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid reference '{gen}', expected {step.field}"
        );
    }
}
