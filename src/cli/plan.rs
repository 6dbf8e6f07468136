//! Plan and row command implementations

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::arrange::arrange;
use crate::config::CliOverrides;
use crate::generate::{compose_all, SegmentFailure};
use crate::models::{Direction, Sign};

use super::generate::{load_input, load_settings};
use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// JSON document printed by `plan --json`.
#[derive(Serialize)]
struct PlanReport<'a> {
    signs: &'a [Sign],
    failures: Vec<FailureEntry<'a>>,
}

#[derive(Serialize)]
struct FailureEntry<'a> {
    segment: usize,
    line: &'a str,
    error: &'a str,
}

/// Render a grid row for the terminal, showing blanks as `.`.
fn format_row(row: &[String]) -> String {
    row.iter().map(|t| if t.is_empty() { "." } else { t.as_str() }).collect::<Vec<_>>().join(" ")
}

/// Run the plan command
pub fn run_plan(input: Option<&Path>, config: Option<&Path>, json: bool) -> ExitCode {
    let overrides = CliOverrides { input: input.map(Path::to_path_buf), ..Default::default() };
    let settings = match load_settings(config, &overrides) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let loaded = match load_input(&settings.project.input) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (signs, failures) = compose_all(&loaded.segments, &settings.layout);

    if json {
        let report = PlanReport {
            signs: &signs,
            failures: failures
                .iter()
                .map(|f: &SegmentFailure| FailureEntry {
                    segment: f.index + 1,
                    line: &f.line,
                    error: &f.error,
                })
                .collect(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for sign in &signs {
            println!("{} ({}x{})", sign.name, sign.columns(), sign.grid.len());
            for row in &sign.grid {
                println!("  {}", format_row(row));
            }
        }
        for failure in &failures {
            eprintln!("Error: segment {} (line {}): {}", failure.index + 1, failure.line, failure.error);
        }
    }

    if failures.is_empty() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Run the row command
pub fn run_row(
    stations: &[String],
    anchor: &[String],
    current: &str,
    direction: Direction,
    length: usize,
    blank: &str,
    json: bool,
) -> ExitCode {
    match arrange(stations, anchor, current, direction, length, blank) {
        Ok(row) => {
            if json {
                match serde_json::to_string(&row) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                println!("{}", format_row(&row));
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_marks_blanks() {
        let row = vec!["tcA".to_string(), String::new(), "tcB@".to_string()];
        assert_eq!(format_row(&row), "tcA . tcB@");
    }
}
