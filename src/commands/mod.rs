// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod reports;
pub mod exporter;

use anyhow::Result;

use crate::models::Transaction;
use crate::utils::{month_of, parse_month};

/// Row selection shared by `tx list` and the reports.
#[derive(Debug, Default, Clone)]
pub struct Filter {
    pub r#type: Option<String>,
    pub category: Option<String>,
    pub month: Option<String>,
}

impl Filter {
    pub fn from_matches(sub: &clap::ArgMatches) -> Result<Self> {
        let opt = |name: &str| {
            sub.try_get_one::<String>(name)
                .ok()
                .flatten()
                .map(|s| s.trim().to_string())
        };
        let month = match opt("month") {
            Some(m) => Some(parse_month(&m)?),
            None => None,
        };
        Ok(Self {
            r#type: opt("type"),
            category: opt("category"),
            month,
        })
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(t) = &self.r#type {
            if !tx.r#type().eq_ignore_ascii_case(t) {
                return false;
            }
        }
        if let Some(c) = &self.category {
            if !tx.category().eq_ignore_ascii_case(c) {
                return false;
            }
        }
        if let Some(m) = &self.month {
            if &month_of(&tx.date()) != m {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: Vec<Transaction>) -> Vec<Transaction> {
        records.into_iter().filter(|t| self.matches(t)).collect()
    }
}
