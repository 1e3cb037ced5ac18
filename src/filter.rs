//! Group filter construction
//!
//! The query engine hands over predicates on the multi-valued `groups` column.
//! The catalog API takes a single comma-separated `groups` parameter, so the
//! supported predicates are flattened into one value list, in order, without
//! de-duplication. Predicates the API cannot express are dropped rather than
//! rejected: the filter gets looser, the query still runs.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualOperator {
    /// `=`
    Equal,
    /// `?`: the array contains this value
    ExistsOne,
    /// `?|`: the array contains any of these values
    ExistsAny,
    /// Anything else (`@>`, `<>`, ...); contributes nothing to the filter
    Unsupported(String),
}

impl QualOperator {
    pub fn token(&self) -> &str {
        match self {
            QualOperator::Equal => "=",
            QualOperator::ExistsOne => "?",
            QualOperator::ExistsAny => "?|",
            QualOperator::Unsupported(token) => token,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, QualOperator::Unsupported(_))
    }
}

impl FromStr for QualOperator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "=" => QualOperator::Equal,
            "?" => QualOperator::ExistsOne,
            "?|" => QualOperator::ExistsAny,
            other => QualOperator::Unsupported(other.to_string()),
        })
    }
}

impl fmt::Display for QualOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualValue {
    Scalar(String),
    List(Vec<String>),
}

/// One predicate on the `groups` column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupQual {
    pub operator: QualOperator,
    pub value: QualValue,
}

impl GroupQual {
    pub fn new(operator: QualOperator, value: QualValue) -> Self {
        Self { operator, value }
    }

    pub fn exists_one(value: impl Into<String>) -> Self {
        Self::new(QualOperator::ExistsOne, QualValue::Scalar(value.into()))
    }

    pub fn exists_any<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            QualOperator::ExistsAny,
            QualValue::List(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn equal(value: impl Into<String>) -> Self {
        Self::new(QualOperator::Equal, QualValue::Scalar(value.into()))
    }
}

/// Flatten supported group predicates into the values for the `groups` parameter.
///
/// The exists operators take a scalar or a list operand; equality only takes a
/// scalar, so `= [..]` contributes nothing. Empty strings are skipped.
pub fn build_group_filters(quals: &[GroupQual]) -> Vec<String> {
    let mut filters = Vec::new();
    for qual in quals {
        if !qual.operator.is_supported() {
            tracing::debug!("dropping unsupported groups operator {}", qual.operator);
            continue;
        }
        match &qual.value {
            QualValue::Scalar(value) => {
                if !value.is_empty() {
                    filters.push(value.clone());
                }
            }
            QualValue::List(_) if qual.operator == QualOperator::Equal => {
                tracing::debug!("dropping list operand for groups equality");
            }
            QualValue::List(values) => {
                filters.extend(values.iter().filter(|v| !v.is_empty()).cloned());
            }
        }
    }
    filters
}

/// The `groups` query parameter value
pub fn join_group_filters(quals: &[GroupQual]) -> String {
    build_group_filters(quals).join(",")
}
