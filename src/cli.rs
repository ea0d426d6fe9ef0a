// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

pub const FILE_ENV: &str = "MONEYTRACK_FILE";

fn file_arg() -> Arg {
    Arg::new("file")
        .long("file")
        .short('f')
        .env(FILE_ENV)
        .required(true)
        .help("JSON file holding an array of transactions")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Restrict to one month (YYYY-MM)")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("moneytrack")
        .version(clap::crate_version!())
        .about("Income and expense records with JSON import/export")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .help("Log level when RUST_LOG is unset (error, warn, info, debug, trace)"),
        )
        .subcommand(
            Command::new("tx")
                .about("Create and list transactions")
                .subcommand(
                    Command::new("new")
                        .about("Build a transaction; print it or append it to --out")
                        .arg(Arg::new("id").long("id"))
                        .arg(Arg::new("title").long("title"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .help("Income or Expense"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("ISO-8601 timestamp, e.g. 2024-03-15T10:30:00.000"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("out").long("out").help("Record file to append to")),
                )
                .subcommand(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(file_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(month_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Totals over a record file")
                .subcommand(
                    Command::new("summary")
                        .about("Income, expense and balance")
                        .arg(file_arg())
                        .arg(month_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("categories")
                        .about("Totals per category, largest first")
                        .arg(file_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(month_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export records to CSV or JSON")
                .subcommand(
                    Command::new("transactions")
                        .arg(file_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
