use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::error::FieldError;
use crate::common::path::FieldPath;

/// How consecutive admissible quantities of a range are derived from each other.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CountOperator {
    #[default]
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "^")]
    Power,
}

impl CountOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountOperator::Add => "+",
            CountOperator::Multiply => "*",
            CountOperator::Power => "^",
        }
    }

    /// Returns `None` when the result does not fit into `u64`.
    pub fn apply(&self, value: u64, operand: u64) -> Option<u64> {
        match self {
            CountOperator::Add => value.checked_add(operand),
            CountOperator::Multiply => value.checked_mul(operand),
            CountOperator::Power => u32::try_from(operand)
                .ok()
                .and_then(|exp| value.checked_pow(exp)),
        }
    }
}

impl FromStr for CountOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(CountOperator::Add),
            "*" => Ok(CountOperator::Multiply),
            "^" => Ok(CountOperator::Power),
            _ => Err(format!("operator `{s}` is not one of +, * or ^")),
        }
    }
}

impl fmt::Display for CountOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized quantity of a resource: a range `min..=max` walked with `operator`/`operand`.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize)]
pub struct ResourceCount {
    min: u64,
    max: u64,
    operand: u64,
    operator: CountOperator,
}

impl Default for ResourceCount {
    fn default() -> Self {
        Self {
            min: 1,
            max: 1,
            operand: 1,
            operator: CountOperator::Add,
        }
    }
}

impl ResourceCount {
    pub fn exact(count: u64) -> Self {
        Self {
            min: count,
            max: count,
            ..Default::default()
        }
    }

    pub fn new(
        min: u64,
        max: u64,
        operand: u64,
        operator: CountOperator,
    ) -> Result<Self, String> {
        if max < min {
            return Err(format!(
                "maximum ({max}) must not be smaller than minimum ({min})"
            ));
        }
        if operand == 0 {
            return Err("zero count operands are not supported".to_string());
        }
        Ok(Self {
            min,
            max,
            operand,
            operator,
        })
    }

    #[inline]
    pub fn min(&self) -> u64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> u64 {
        self.max
    }

    #[inline]
    pub fn operand(&self) -> u64 {
        self.operand
    }

    #[inline]
    pub fn operator(&self) -> CountOperator {
        self.operator
    }

    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }

    /// Admissible quantities in increasing order, starting at `min`.
    pub fn values(&self) -> CountValues {
        CountValues {
            next: Some(self.min),
            max: self.max,
            operand: self.operand,
            operator: self.operator,
        }
    }
}

impl fmt::Display for ResourceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            write!(f, "{}", self.min)
        } else if self.operator == CountOperator::Add && self.operand == 1 {
            write!(f, "{}-{}", self.min, self.max)
        } else {
            write!(
                f,
                "{}-{}:{}{}",
                self.min, self.max, self.operator, self.operand
            )
        }
    }
}

pub struct CountValues {
    next: Option<u64>,
    max: u64,
    operand: u64,
    operator: CountOperator,
}

impl Iterator for CountValues {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|v| *v <= self.max)?;
        self.next = self
            .operator
            .apply(current, self.operand)
            .filter(|v| *v > current);
        Some(current)
    }
}

/// Structured form of a count as it may appear in a document.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct RangeDef {
    min: Option<u64>,
    max: Option<u64>,
    operand: Option<u64>,
    operator: Option<String>,
}

/// The two accepted wire shapes of a count.
#[derive(Debug)]
enum RawCount {
    Scalar(u64),
    Range(RangeDef),
}

impl RawCount {
    fn from_value(value: &Value) -> Result<RawCount, String> {
        if let Ok(count) = u64::deserialize(value) {
            return Ok(RawCount::Scalar(count));
        }
        match value {
            Value::Object(_) => RangeDef::deserialize(value)
                .map(RawCount::Range)
                .map_err(|e| e.to_string()),
            other => Err(format!(
                "expected a non-negative integer or a range object, found {}",
                describe_value(other)
            )),
        }
    }

    fn into_count(self) -> Result<ResourceCount, String> {
        match self {
            RawCount::Scalar(count) => Ok(ResourceCount::exact(count)),
            RawCount::Range(def) => {
                let defaults = ResourceCount::default();
                let min = def.min.unwrap_or(defaults.min);
                // Without an explicit maximum the range never ends below its minimum
                let max = def.max.unwrap_or(defaults.max.max(min));
                let operator = match def.operator {
                    Some(op) => op.parse::<CountOperator>()?,
                    None => defaults.operator,
                };
                ResourceCount::new(
                    min,
                    max,
                    def.operand.unwrap_or(defaults.operand),
                    operator,
                )
            }
        }
    }
}

pub(crate) fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a floating point number",
        Value::Number(n) if n.is_i64() && n.as_i64().is_some_and(|v| v < 0) => {
            "a negative integer"
        }
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Decodes a `count` field that is either a bare non-negative integer or a range object.
pub fn decode_count(value: &Value, path: &FieldPath) -> crate::Result<ResourceCount> {
    RawCount::from_value(value)
        .and_then(RawCount::into_count)
        .map_err(|reason| FieldError::malformed_count(path, reason))
}
