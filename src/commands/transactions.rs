// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::commands::Filter;
use crate::models::Transaction;
use crate::utils::{
    fmt_amount, format_timestamp, load_records, maybe_print_json, parse_amount, parse_timestamp,
    pretty_table, save_records,
};
use anyhow::{Context, Result};
use tracing::{debug, info};

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("new", sub)) => add(sub)?,
        Some(("list", sub)) => list(sub)?,
        _ => {}
    }
    Ok(())
}

/// Assemble a record from `tx new` flags. Unset required flags surface as
/// `MissingField` from the builder.
pub fn build_from_args(sub: &clap::ArgMatches) -> Result<Transaction> {
    let arg = |name: &str| sub.get_one::<String>(name).map(|s| s.trim().to_string());

    let mut b = Transaction::builder();
    if let Some(id) = arg("id").filter(|s| !s.is_empty()) {
        b = b.id(id);
    }
    if let Some(title) = arg("title") {
        b = b.title(title);
    }
    if let Some(raw) = arg("amount") {
        b = b.amount(parse_amount(&raw)?);
    }
    if let Some(t) = arg("type") {
        b = b.transaction_type(t);
    }
    if let Some(raw) = arg("date") {
        let date = parse_timestamp(&raw)
            .with_context(|| format!("Invalid transaction date '{}'", raw))?;
        b = b.date(date);
    }
    if let Some(category) = arg("category") {
        b = b.category(category);
    }
    let tx = b.build()?;
    if tx.kind().is_none() {
        debug!(kind = tx.r#type(), "type is neither Income nor Expense");
    }
    Ok(tx)
}

fn add(sub: &clap::ArgMatches) -> Result<()> {
    let tx = build_from_args(sub)?;
    match sub.get_one::<String>("out") {
        Some(out) => {
            let path = Path::new(out.trim());
            let mut records = load_records(path)?;
            records.push(tx.clone());
            save_records(path, &records)?;
            info!(path = %path.display(), total = records.len(), "appended transaction");
            println!(
                "Recorded {} '{}' of {} on {} ({})",
                tx.r#type(),
                tx.title(),
                fmt_amount(tx.amount()),
                format_timestamp(&tx.date()),
                tx.category()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&tx.to_json())?),
    }
    Ok(())
}

fn list(sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_records(sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    format_timestamp(&t.date()),
                    t.title().to_string(),
                    t.r#type().to_string(),
                    t.category().to_string(),
                    fmt_amount(t.amount()),
                    t.id().unwrap_or_default().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Title", "Type", "Category", "Amount", "Id"], rows)
        );
    }
    Ok(())
}

/// Records from `--file` after filters, newest first, truncated to `--limit`.
pub fn query_records(sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let path = sub
        .get_one::<String>("file")
        .context("--file is required")?;
    let filter = Filter::from_matches(sub)?;
    let mut data = filter.apply(load_records(Path::new(path.trim()))?);
    // later entries first among equal timestamps
    data.reverse();
    data.sort_by(|a, b| b.date().cmp(&a.date()));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}
