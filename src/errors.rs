// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use thiserror::Error;

/// Failures raised while building or decoding a [`crate::models::Transaction`].
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    #[error("Invalid transaction mapping: {}", join_problems(.problems))]
    InvalidMapping { problems: Vec<FieldProblem> },
    #[error("Transaction mapping must be a JSON object")]
    NotAnObject,
    #[error("Invalid timestamp '{value}', expected ISO-8601 (YYYY-MM-DDTHH:MM:SS.sss)")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },
}

impl RecordError {
    pub fn malformed_timestamp(value: &str, source: chrono::ParseError) -> Self {
        Self::MalformedTimestamp {
            value: value.to_string(),
            source: Some(source),
        }
    }

    /// Input that is ISO-8601 only once surrounding whitespace is stripped.
    pub fn padded_timestamp(value: &str) -> Self {
        Self::MalformedTimestamp {
            value: value.to_string(),
            source: None,
        }
    }
}

/// One bad key in a mapping handed to `Transaction::from_json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProblem {
    pub field: &'static str,
    pub kind: ProblemKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    Missing,
    WrongType { expected: &'static str },
}

impl FieldProblem {
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            kind: ProblemKind::Missing,
        }
    }

    pub fn wrong_type(field: &'static str, expected: &'static str) -> Self {
        Self {
            field,
            kind: ProblemKind::WrongType { expected },
        }
    }
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProblemKind::Missing => write!(f, "'{}' is missing", self.field),
            ProblemKind::WrongType { expected } => {
                write!(f, "'{}' must be {}", self.field, expected)
            }
        }
    }
}

fn join_problems(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
