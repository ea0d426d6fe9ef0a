// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use serde::Serializer;
use serde_json::Value;
use tracing::debug;

use crate::errors::RecordError;
use crate::models::Transaction;

/// Wire format of the `date` field: `YYYY-MM-DDTHH:MM:SS.sss`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Drop everything below the millisecond, the finest precision the wire keeps.
pub fn truncate_to_millis(dt: NaiveDateTime) -> NaiveDateTime {
    dt.trunc_subsecs(3)
}

pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

pub fn serialize_timestamp<S>(dt: &NaiveDateTime, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&format_timestamp(dt))
}

/// Parse an ISO-8601 timestamp.
///
/// Zoned input (`Z`, `+02:00`) is normalized to UTC; a bare date means midnight.
/// Surrounding whitespace is not ISO-8601 and is rejected.
pub fn parse_timestamp(raw: &str) -> std::result::Result<NaiveDateTime, RecordError> {
    // chrono skips leading whitespace before numeric fields
    if raw.trim() != raw {
        return Err(RecordError::padded_timestamp(raw));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| RecordError::malformed_timestamp(raw, e))
}

pub fn parse_month(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn month_of(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m").to_string()
}

pub fn parse_amount(s: &str) -> Result<f64> {
    let v = s
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Invalid amount '{}'", s))?;
    if !v.is_finite() {
        return Err(anyhow!("Invalid amount '{}', must be finite", s));
    }
    Ok(v)
}

pub fn fmt_amount(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Read a JSON array of transaction mappings. A missing or blank file is empty.
pub fn load_records(path: &Path) -> Result<Vec<Transaction>> {
    if !path.exists() {
        debug!(path = %path.display(), "record file absent, starting empty");
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Read records from {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: Value = serde_json::from_str(&text)
        .with_context(|| format!("Parse JSON in {}", path.display()))?;
    let items = doc
        .as_array()
        .ok_or_else(|| anyhow!("{} must contain a JSON array", path.display()))?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let tx = Transaction::from_json(item).with_context(|| {
            format!("Invalid transaction at index {} in {}", i, path.display())
        })?;
        out.push(tx);
    }
    debug!(path = %path.display(), count = out.len(), "loaded records");
    Ok(out)
}

pub fn save_records(path: &Path, records: &[Transaction]) -> Result<()> {
    let items: Vec<Value> = records
        .iter()
        .map(|r| Value::Object(r.to_json()))
        .collect();
    fs::write(path, serde_json::to_string_pretty(&items)?)
        .with_context(|| format!("Write records to {}", path.display()))?;
    debug!(path = %path.display(), count = records.len(), "saved records");
    Ok(())
}
