// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::{FieldProblem, RecordError};
use crate::utils::{format_timestamp, parse_timestamp, truncate_to_millis};

/// One income or expense entry.
///
/// Fields are fixed at construction; there are no setters. `date` is held at
/// millisecond precision, the same as the wire format. `type` is kept as
/// the caller supplied it, use [`Transaction::kind`] for the typed view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    id: Option<String>,
    title: String,
    amount: f64,
    r#type: String,
    #[serde(serialize_with = "crate::utils::serialize_timestamp")]
    date: NaiveDateTime,
    category: String,
}

impl Transaction {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        r#type: impl Into<String>,
        date: NaiveDateTime,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            amount,
            r#type: r#type.into(),
            date: truncate_to_millis(date),
            category: category.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// `None` when `type` is neither "Income" nor "Expense".
    pub fn kind(&self) -> Option<TransactionKind> {
        self.r#type.parse().ok()
    }

    pub fn to_json(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert(
            "id".into(),
            self.id.clone().map_or(Value::Null, Value::String),
        );
        m.insert("title".into(), Value::String(self.title.clone()));
        // NaN and infinities have no JSON form
        m.insert(
            "amount".into(),
            Number::from_f64(self.amount).map_or(Value::Null, Value::Number),
        );
        m.insert("type".into(), Value::String(self.r#type.clone()));
        m.insert("date".into(), Value::String(format_timestamp(&self.date)));
        m.insert("category".into(), Value::String(self.category.clone()));
        m
    }

    /// Rebuild a record from a mapping produced by [`Transaction::to_json`].
    ///
    /// Every missing or mistyped key is reported together in
    /// [`RecordError::InvalidMapping`]. The timestamp is only parsed once the
    /// mapping has the right shape.
    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        let obj = value.as_object().ok_or(RecordError::NotAnObject)?;
        let mut problems = Vec::new();

        let id = match obj.get("id") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                problems.push(FieldProblem::wrong_type("id", "a string or null"));
                None
            }
        };
        let title = required_str(obj, "title", &mut problems);
        let amount = match obj.get("amount") {
            None | Some(Value::Null) => {
                problems.push(FieldProblem::missing("amount"));
                None
            }
            Some(v) => {
                let n = v.as_f64();
                if n.is_none() {
                    problems.push(FieldProblem::wrong_type("amount", "a number"));
                }
                n
            }
        };
        let r#type = required_str(obj, "type", &mut problems);
        let date = required_str(obj, "date", &mut problems);
        let category = required_str(obj, "category", &mut problems);

        match (title, amount, r#type, date, category) {
            (Some(title), Some(amount), Some(r#type), Some(date), Some(category))
                if problems.is_empty() =>
            {
                Ok(Self {
                    id,
                    title: title.to_string(),
                    amount,
                    r#type: r#type.to_string(),
                    date: truncate_to_millis(parse_timestamp(date)?),
                    category: category.to_string(),
                })
            }
            _ => Err(RecordError::InvalidMapping { problems }),
        }
    }
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    problems: &mut Vec<FieldProblem>,
) -> Option<&'a str> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            problems.push(FieldProblem::missing(field));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            problems.push(FieldProblem::wrong_type(field, "a string"));
            None
        }
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Transaction::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Field-by-field construction for input that may be incomplete.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    id: Option<String>,
    title: Option<String>,
    amount: Option<f64>,
    transaction_type: Option<String>,
    date: Option<NaiveDateTime>,
    category: Option<String>,
}

impl TransactionBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn transaction_type(mut self, t: impl Into<String>) -> Self {
        self.transaction_type = Some(t.into());
        self
    }

    pub fn date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Fails on the first unset required field, checked in field order.
    pub fn build(self) -> Result<Transaction, RecordError> {
        Ok(Transaction {
            id: self.id,
            title: self.title.ok_or(RecordError::MissingField("title"))?,
            amount: self.amount.ok_or(RecordError::MissingField("amount"))?,
            r#type: self
                .transaction_type
                .ok_or(RecordError::MissingField("type"))?,
            date: truncate_to_millis(self.date.ok_or(RecordError::MissingField("date"))?),
            category: self.category.ok_or(RecordError::MissingField("category"))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionKind::Income),
            "Expense" => Ok(TransactionKind::Expense),
            other => Err(format!("Unknown transaction type '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(h, min, s, ms)
            .unwrap()
    }

    fn coffee() -> Transaction {
        Transaction::new("Coffee", 4.50, "Expense", at(2024, 3, 15, 10, 30, 0, 0), "Food")
    }

    #[test]
    fn coffee_serializes_to_six_keys() {
        let m = coffee().to_json();
        assert_eq!(m.len(), 6);
        assert_eq!(
            Value::Object(m),
            json!({
                "id": null,
                "title": "Coffee",
                "amount": 4.5,
                "type": "Expense",
                "date": "2024-03-15T10:30:00.000",
                "category": "Food"
            })
        );
    }

    #[test]
    fn coffee_round_trips() {
        let tx = coffee();
        let back = Transaction::from_json(&Value::Object(tx.to_json())).unwrap();
        assert_eq!(back, tx);
        assert_eq!(back.id(), None);
    }

    #[test]
    fn round_trip_keeps_milliseconds() {
        let date = at(2024, 2, 29, 23, 59, 59, 123);
        let tx = Transaction::new("Lunch", -12.75, "Expense", date, "Food").with_id("abc");
        let back = Transaction::from_json(&Value::Object(tx.to_json())).unwrap();
        assert_eq!(back, tx);
        assert_eq!(back.date().nanosecond(), 123_000_000);
    }

    #[test]
    fn salary_with_integer_amount() {
        let tx = Transaction::from_json(&json!({
            "id": "tx1",
            "title": "Salary",
            "amount": 3000,
            "type": "Income",
            "date": "2024-01-01T00:00:00.000",
            "category": "Work"
        }))
        .unwrap();
        assert_eq!(tx.id(), Some("tx1"));
        assert_eq!(tx.title(), "Salary");
        assert_eq!(tx.amount(), 3000.0);
        assert_eq!(tx.kind(), Some(TransactionKind::Income));
        assert_eq!(tx.date(), at(2024, 1, 1, 0, 0, 0, 0));
        assert_eq!(tx.category(), "Work");
    }

    #[test]
    fn id_may_be_absent() {
        let tx = Transaction::from_json(&json!({
            "title": "Bus",
            "amount": 2.0,
            "type": "Expense",
            "date": "2024-01-01T08:00:00.000",
            "category": "Travel"
        }))
        .unwrap();
        assert_eq!(tx.id(), None);
    }

    #[test]
    fn problems_are_aggregated() {
        let err = Transaction::from_json(&json!({
            "id": 7,
            "amount": "4.50",
            "type": "Expense",
            "date": "2024-03-15T10:30:00.000",
            "category": "Food"
        }))
        .unwrap_err();
        match err {
            RecordError::InvalidMapping { problems } => {
                assert_eq!(
                    problems,
                    vec![
                        FieldProblem::wrong_type("id", "a string or null"),
                        FieldProblem::missing("title"),
                        FieldProblem::wrong_type("amount", "a number"),
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_date_is_malformed_timestamp() {
        let err = Transaction::from_json(&json!({
            "title": "Coffee",
            "amount": 4.5,
            "type": "Expense",
            "date": "15/03/2024",
            "category": "Food"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            RecordError::MalformedTimestamp { ref value, .. } if value == "15/03/2024"
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            Transaction::from_json(&json!([1, 2])),
            Err(RecordError::NotAnObject)
        ));
    }

    #[test]
    fn unknown_type_is_kept_verbatim() {
        let tx = Transaction::new("Gift", 20.0, "Transfer", at(2024, 5, 1, 0, 0, 0, 0), "Misc");
        assert_eq!(tx.kind(), None);
        let back = Transaction::from_json(&Value::Object(tx.to_json())).unwrap();
        assert_eq!(back.r#type(), "Transfer");
    }

    fn full_builder_without(field: &str) -> TransactionBuilder {
        let mut b = Transaction::builder().id("r1");
        if field != "title" {
            b = b.title("Rent");
        }
        if field != "amount" {
            b = b.amount(900.0);
        }
        if field != "type" {
            b = b.transaction_type("Expense");
        }
        if field != "date" {
            b = b.date(at(2024, 4, 1, 0, 0, 0, 0));
        }
        if field != "category" {
            b = b.category("Home");
        }
        b
    }

    #[test]
    fn builder_rejects_each_missing_required_field() {
        for field in ["title", "amount", "type", "date", "category"] {
            let err = full_builder_without(field).build().unwrap_err();
            match err {
                RecordError::MissingField(name) => assert_eq!(name, field),
                other => panic!("unexpected error for {field}: {other}"),
            }
        }
        assert!(full_builder_without("id").build().is_ok());
    }

    #[test]
    fn builder_reports_first_missing_field() {
        let err = Transaction::builder()
            .amount(1.0)
            .transaction_type("Expense")
            .build()
            .unwrap_err();
        assert!(matches!(err, RecordError::MissingField("title")));
    }

    #[test]
    fn sub_millisecond_dates_round_trip_equal() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_micro_opt(0, 0, 0, 123_456)
            .unwrap();
        let tx = Transaction::new("Tea", 3.0, "Expense", date, "Food");
        assert_eq!(tx.date(), at(2024, 1, 1, 0, 0, 0, 123));
        let back = Transaction::from_json(&Value::Object(tx.to_json())).unwrap();
        assert_eq!(back, tx);

        let built = Transaction::builder()
            .title("Tea")
            .amount(3.0)
            .transaction_type("Expense")
            .date(date)
            .category("Food")
            .build()
            .unwrap();
        assert_eq!(built, tx);
    }

    #[test]
    fn builder_without_id() {
        let tx = Transaction::builder()
            .title("Coffee")
            .amount(4.50)
            .transaction_type("Expense")
            .date(at(2024, 3, 15, 10, 30, 0, 0))
            .category("Food")
            .build()
            .unwrap();
        assert_eq!(tx, coffee());
    }

    #[test]
    fn serde_impls_match_mapping() {
        let tx = coffee().with_id("c1");
        let text = serde_json::to_string(&tx).unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v, Value::Object(tx.to_json()));
        let back: Transaction = serde_json::from_str(&text).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn serde_error_carries_record_message() {
        let err = serde_json::from_str::<Transaction>(r#"{"title":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("'amount' is missing"));
    }
}
