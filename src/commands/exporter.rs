// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::utils::{format_timestamp, load_records};
use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::info;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(sub),
        _ => Ok(()),
    }
}

fn export_transactions(sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").context("--out is required")?;
    let file = sub
        .get_one::<String>("file")
        .context("--file is required")?;

    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    let records = load_records(Path::new(file.trim()))?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create CSV {}", out))?;
            wtr.write_record(["id", "date", "title", "type", "category", "amount"])?;
            for tx in &records {
                wtr.write_record([
                    tx.id().unwrap_or_default().to_string(),
                    format_timestamp(&tx.date()),
                    tx.title().to_string(),
                    tx.r#type().to_string(),
                    tx.category().to_string(),
                    tx.amount().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<Value> = records
                .iter()
                .map(|tx| Value::Object(tx.to_json()))
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    info!(out = %out, count = records.len(), format = %fmt, "export finished");
    println!("Exported {} transactions to {}", records.len(), out);
    Ok(())
}
