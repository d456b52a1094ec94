//! `sift extrema`: report the local extrema and zero crossings of a signal.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use sift_emd::{ExtremumSet, count_zero_crossings, find_extrema};
use sift_io::{Column, ReaderConfig};

use crate::cli::ExtremaArgs;

#[derive(Debug, Serialize, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct ExtremaReport {
    len: usize,
    extrema_good: bool,
    maxima: Vec<Point>,
    minima: Vec<Point>,
    zero_crossings: usize,
}

impl ExtremaReport {
    fn build(x: &[f64]) -> Self {
        let set: ExtremumSet = find_extrema(x);
        Self {
            len: x.len(),
            extrema_good: set.extrema_good(),
            maxima: set.maxima().map(|(x, y)| Point { x, y }).collect(),
            minima: set.minima().map(|(x, y)| Point { x, y }).collect(),
            zero_crossings: count_zero_crossings(x),
        }
    }
}

pub fn run(args: ExtremaArgs) -> Result<()> {
    let reader_config = ReaderConfig::default()
        .with_column(Column::from(args.column.as_str()))
        .with_has_header(!args.no_header);
    let signal = sift_io::read_signal(&args.input, &reader_config)
        .with_context(|| format!("failed to read signal from {}", args.input.display()))?;

    let report = ExtremaReport::build(signal.as_slice());
    info!(
        maxima = report.maxima.len(),
        minima = report.minima.len(),
        zero_crossings = report.zero_crossings,
        "extrema found"
    );
    let json = serde_json::to_string_pretty(&report)?;

    match &args.output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_for_zigzag() {
        let report = ExtremaReport::build(&[0.0, 2.0, -1.0, 3.0, 0.5]);
        assert_eq!(report.len, 5);
        assert_eq!(report.zero_crossings, 2);
        assert!(report.maxima.contains(&Point { x: 1.0, y: 2.0 }));
        assert!(report.maxima.contains(&Point { x: 3.0, y: 3.0 }));
        assert!(report.minima.contains(&Point { x: 2.0, y: -1.0 }));
    }

    #[test]
    fn writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("s.csv");
        std::fs::write(&input, "1\n-1\n1\n-1\n1\n").unwrap();
        let output = dir.path().join("extrema.json");
        run(ExtremaArgs {
            input,
            column: "0".into(),
            no_header: true,
            output: Some(output.clone()),
        })
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(value["len"], 5);
        assert_eq!(value["zero_crossings"], 4);
        assert!(value["maxima"].is_array());
    }
}
