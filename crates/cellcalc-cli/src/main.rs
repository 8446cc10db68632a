//! cellcalc CLI - evaluate token formulas against a small in-memory sheet

use anyhow::{bail, Context, Result};
use cellcalc_core::{A1Labels, SheetMemory};
use cellcalc_formula::{recalculate_in_order, serialize_number, Evaluation, Evaluator, Token};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellcalc")]
#[command(author, version, about = "Token formula evaluator for spreadsheet cells")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula given as whitespace-separated tokens
    Eval {
        /// Define a cell, e.g. --cell "A1=2 * 3". Cells are recalculated in the order given.
        #[arg(short, long = "cell", value_name = "LABEL=TOKENS", value_parser = parse_cell_def)]
        cells: Vec<CellDef>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,

        /// Also print every defined cell after recalculation
        #[arg(long)]
        show_cells: bool,

        /// Formula tokens, e.g. ( A1 + 1 ) / 2
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        formula: Vec<String>,
    },

    /// Show how each token is classified
    Classify {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
}

/// A cell definition from the command line
#[derive(Debug, Clone, PartialEq)]
struct CellDef {
    label: String,
    tokens: Vec<String>,
}

fn parse_cell_def(s: &str) -> std::result::Result<CellDef, String> {
    let (label, formula) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=TOKENS, got '{}'", s))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("missing cell label in '{}'", s));
    }
    Ok(CellDef {
        label: label.to_string(),
        tokens: formula.split_whitespace().map(str::to_string).collect(),
    })
}

#[derive(Serialize)]
struct CellReport<'a> {
    label: &'a str,
    #[serde(serialize_with = "serialize_number")]
    value: f64,
    error: &'a str,
}

#[derive(Serialize)]
struct EvalReport<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cells: Vec<CellReport<'a>>,
    result: &'a Evaluation,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Eval {
            cells,
            json,
            show_cells,
            formula,
        } => eval(&mut stdout, &cells, &formula, json, show_cells),
        Commands::Classify { tokens } => classify(&mut stdout, &tokens),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_sheet(cells: &[CellDef]) -> Result<SheetMemory> {
    let mut sheet = SheetMemory::new();

    for def in cells {
        sheet
            .set_formula(&def.label, def.tokens.iter().cloned())
            .with_context(|| format!("Invalid cell definition for '{}'", def.label))?;
    }

    let stats = recalculate_in_order(&mut sheet, cells.iter().map(|def| def.label.as_str()))
        .context("Failed to recalculate cells")?;
    tracing::debug!(
        cells = stats.cells_calculated,
        errors = stats.errors,
        "recalculated sheet"
    );

    Ok(sheet)
}

fn eval(
    out: &mut impl Write,
    cells: &[CellDef],
    formula: &[String],
    json: bool,
    show_cells: bool,
) -> Result<()> {
    if formula.iter().all(|t| t.trim().is_empty()) {
        bail!("No formula tokens given");
    }
    let tokens: Vec<String> = formula
        .iter()
        .flat_map(|t| t.split_whitespace())
        .map(str::to_string)
        .collect();

    let sheet = build_sheet(cells)?;
    let outcome = Evaluator::new(&sheet).evaluate(tokens.as_slice());

    let cell_reports: Vec<CellReport<'_>> = if show_cells {
        cells
            .iter()
            .filter_map(|def| {
                sheet.cell(&def.label).map(|cell| CellReport {
                    label: &def.label,
                    value: cell.value(),
                    error: cell.error(),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    if json {
        let report = EvalReport {
            cells: cell_reports,
            result: &outcome,
        };
        serde_json::to_writer_pretty(&mut *out, &report).context("Failed to write JSON")?;
        writeln!(out)?;
        return Ok(());
    }

    for report in &cell_reports {
        writeln!(
            out,
            "{}\t{}\t{}",
            report.label,
            format_number(report.value),
            report.error
        )?;
    }
    writeln!(out, "{}", format_number(outcome.value))?;
    if let Some(err) = &outcome.error {
        writeln!(out, "error: {}", err)?;
    }

    Ok(())
}

fn classify(out: &mut impl Write, tokens: &[String]) -> Result<()> {
    for raw in tokens.iter().flat_map(|t| t.split_whitespace()) {
        let kind = match Token::classify(raw, &A1Labels) {
            Token::Number(n) => format!("number {}", format_number(n)),
            Token::Operator(op) => format!("operator {}", op),
            Token::OpenParen => "open paren".to_string(),
            Token::CloseParen => "close paren".to_string(),
            Token::CellRef(label) => format!("cell {}", label),
            Token::Other(_) => "other".to_string(),
        };
        writeln!(out, "{}\t{}", raw, kind)?;
    }

    Ok(())
}

/// Format a number without trailing zeros for whole values
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_cell_def() {
        let def = parse_cell_def("A1=( 1 + 2 ) * 3").unwrap();
        assert_eq!(def.label, "A1");
        assert_eq!(def.tokens, vec!["(", "1", "+", "2", ")", "*", "3"]);

        let def = parse_cell_def(" B2 =").unwrap();
        assert_eq!(def.label, "B2");
        assert!(def.tokens.is_empty());

        assert!(parse_cell_def("A1").is_err());
        assert!(parse_cell_def("=1").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.25), "1.25");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_build_sheet_in_definition_order() {
        let cells = vec![
            parse_cell_def("A1=4").unwrap(),
            parse_cell_def("B1=A1 * 2").unwrap(),
        ];
        let sheet = build_sheet(&cells).unwrap();
        assert_eq!(sheet.cell("B1").unwrap().value(), 8.0);
    }

    #[test]
    fn test_build_sheet_rejects_bad_label() {
        let cells = vec![parse_cell_def("a1=4").unwrap()];
        assert!(build_sheet(&cells).is_err());
    }

    fn tokens(formula: &str) -> Vec<String> {
        formula.split_whitespace().map(str::to_string).collect()
    }

    fn eval_output(cells: &[&str], formula: &str, json: bool, show_cells: bool) -> String {
        let cells: Vec<CellDef> = cells.iter().map(|c| parse_cell_def(c).unwrap()).collect();
        let mut out = Vec::new();
        eval(&mut out, &cells, &tokens(formula), json, show_cells).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_eval_prints_value() {
        assert_eq!(eval_output(&[], "2 + 3 * 4", false, false), "14\n");
        assert_eq!(eval_output(&["A1=3"], "( A1 + 1 ) / 8", false, false), "0.5\n");
    }

    #[test]
    fn test_eval_prints_error_line_and_succeeds() {
        assert_eq!(
            eval_output(&[], "5 / 0", false, false),
            "inf\nerror: divide by zero\n"
        );
        assert_eq!(
            eval_output(&[], "1 +", false, false),
            "1\nerror: invalid formula\n"
        );
    }

    #[test]
    fn test_eval_show_cells_lists_cells_in_definition_order() {
        assert_eq!(
            eval_output(&["A1=4", "B2="], "B2 + A1", false, true),
            "A1\t4\t\nB2\t0\tempty formula\n0\nerror: invalid cell\n"
        );
    }

    #[test]
    fn test_eval_rejects_blank_formula() {
        let mut out = Vec::new();
        assert!(eval(&mut out, &[], &["  ".to_string()], false, false).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_eval_json_shape() {
        let output = eval_output(&[], "2 + 3 * 4", true, false);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "result": { "value": 14.0, "error": null } })
        );
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_eval_json_keeps_infinite_values() {
        let output = eval_output(&["A1=1 / 0"], "5 / 0", true, true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "cells": [
                    { "label": "A1", "value": "Infinity", "error": "divide by zero" }
                ],
                "result": { "value": "Infinity", "error": "divide by zero" }
            })
        );
    }

    #[test]
    fn test_classify_prints_one_line_per_token() {
        let mut out = Vec::new();
        classify(&mut out, &tokens("3 + - * / ( ) B7 foo 1.2.3")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "3\tnumber 3\n\
             +\toperator +\n\
             -\toperator -\n\
             *\toperator *\n\
             /\toperator /\n\
             (\topen paren\n\
             )\tclose paren\n\
             B7\tcell B7\n\
             foo\tother\n\
             1.2.3\tnumber 1.2\n"
        );
    }

    #[test]
    fn test_cli_parses_operator_tokens() {
        let cli = Cli::try_parse_from([
            "cellcalc", "eval", "--cell", "A1=3", "--json", "A1", "-", "1",
        ])
        .unwrap();
        match cli.command {
            Commands::Eval {
                cells,
                json,
                formula,
                ..
            } => {
                assert_eq!(cells.len(), 1);
                assert!(json);
                assert_eq!(formula, vec!["A1", "-", "1"]);
            }
            Commands::Classify { .. } => panic!("expected eval"),
        }
    }
}
