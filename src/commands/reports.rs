// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::path::Path;

use crate::commands::Filter;
use crate::models::{Transaction, TransactionKind};
use crate::utils::{fmt_amount, load_records, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(sub)?,
        Some(("categories", sub)) => categories(sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub income: f64,
    pub expense: f64,
    /// Sum of amounts whose type is neither Income nor Expense.
    pub other: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Balance is income minus expense; amounts are taken as recorded.
pub fn summarize(records: &[Transaction]) -> Summary {
    let mut s = Summary::default();
    for tx in records {
        s.count += 1;
        match tx.kind() {
            Some(TransactionKind::Income) => s.income += tx.amount(),
            Some(TransactionKind::Expense) => s.expense += tx.amount(),
            None => s.other += tx.amount(),
        }
    }
    s.balance = s.income - s.expense;
    s
}

pub fn category_totals(records: &[Transaction]) -> Vec<CategoryTotal> {
    let mut map: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for tx in records {
        let e = map.entry(tx.category()).or_insert((0.0, 0));
        e.0 += tx.amount();
        e.1 += 1;
    }
    let mut out: Vec<CategoryTotal> = map
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    // largest magnitude first, name breaks ties
    out.sort_by(|a, b| {
        b.total
            .abs()
            .total_cmp(&a.total.abs())
            .then_with(|| a.category.cmp(&b.category))
    });
    out
}

fn load_filtered(sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let path = sub
        .get_one::<String>("file")
        .context("--file is required")?;
    let filter = Filter::from_matches(sub)?;
    Ok(filter.apply(load_records(Path::new(path.trim()))?))
}

fn summary(sub: &clap::ArgMatches) -> Result<()> {
    let s = summarize(&load_filtered(sub)?);
    if s.other != 0.0 {
        warn!(other = s.other, "records with an unrecognized type were left out of the balance");
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![
            vec!["Income".to_string(), fmt_amount(s.income)],
            vec!["Expense".to_string(), fmt_amount(s.expense)],
            vec!["Other".to_string(), fmt_amount(s.other)],
            vec!["Balance".to_string(), fmt_amount(s.balance)],
            vec!["Count".to_string(), s.count.to_string()],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn categories(sub: &clap::ArgMatches) -> Result<()> {
    let data = category_totals(&load_filtered(sub)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| vec![c.category.clone(), fmt_amount(c.total), c.count.to_string()])
            .collect();
        println!("{}", pretty_table(&["Category", "Total", "Count"], rows));
    }
    Ok(())
}
