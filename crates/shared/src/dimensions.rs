//! Dimension input parsing
//!
//! Room size fields accept plain numbers or arithmetic expressions
//! (`2*3.5`, `10 - 0.2`), evaluated with `evalexpr`.

use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Value};

/// Errors when turning a text field into a dimension
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionError {
    /// The field is empty
    Empty,
    /// The expression could not be parsed
    ParseError(String),
    /// The expression failed to evaluate
    EvaluationError(String),
    /// The expression produced a non-numeric value
    InvalidType(String),
    /// A length that is zero, negative or not finite
    NotPositive(f32),
}

impl std::fmt::Display for DimensionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimensionError::Empty => write!(f, "Value is empty"),
            DimensionError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DimensionError::EvaluationError(msg) => write!(f, "Evaluation error: {}", msg),
            DimensionError::InvalidType(msg) => write!(f, "Invalid type: {}", msg),
            DimensionError::NotPositive(v) => write!(f, "Expected a positive length, got {}", v),
        }
    }
}

impl std::error::Error for DimensionError {}

/// Evaluate a dimension field. Non-positive results are returned as-is;
/// callers decide whether to accept them.
pub fn parse_dimension(input: &str) -> Result<f32, DimensionError> {
    let expression = input.trim();
    if expression.is_empty() {
        return Err(DimensionError::Empty);
    }

    let mut context = HashMapContext::new();
    context
        .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
        .ok();

    let tree = build_operator_tree(expression)
        .map_err(|e| DimensionError::ParseError(e.to_string()))?;

    let value = tree
        .eval_with_context(&context)
        .map_err(|e| DimensionError::EvaluationError(e.to_string()))?;

    match value {
        Value::Float(f) => Ok(f as f32),
        Value::Int(i) => Ok(i as f32),
        _ => Err(DimensionError::InvalidType(format!(
            "Expected number, got {:?}",
            value
        ))),
    }
}

/// Evaluate a field that must hold a positive, finite length
pub fn parse_length(input: &str) -> Result<f32, DimensionError> {
    let value = parse_dimension(input)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DimensionError::NotPositive(value))
    }
}
