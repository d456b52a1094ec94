//! `sift decompose`: read a signal, decompose it, write the IMF table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use crate::cli::DecomposeArgs;
use crate::config::SiftConfig;
use crate::convert;

/// Default output path: the input with its extension replaced by `imfs.csv`.
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("imfs.csv")
}

/// Applies command-line overrides on top of the file configuration.
fn apply_overrides(config: &mut SiftConfig, args: &DecomposeArgs) {
    let d = &mut config.decompose;
    if let Some(method) = &args.method {
        d.method.clone_from(method);
    }
    if args.num_imfs.is_some() {
        d.num_imfs = args.num_imfs;
    }
    if let Some(e) = args.ensemble_size {
        d.ensemble_size = e;
    }
    if let Some(s) = args.noise_strength {
        d.noise_strength = s;
    }
    if args.s_number.is_some() {
        d.s_number = args.s_number;
    }
    if args.num_siftings.is_some() {
        d.num_siftings = args.num_siftings;
    }
    if let Some(seed) = args.seed {
        d.seed = seed;
    }
    if args.sequential {
        d.parallel = false;
    }

    let io = &mut config.io;
    if args.input.is_some() {
        io.input.clone_from(&args.input);
    }
    if args.output.is_some() {
        io.output.clone_from(&args.output);
    }
    if let Some(column) = &args.column {
        io.column.clone_from(column);
    }
}

pub fn run(args: DecomposeArgs) -> Result<()> {
    let mut config = SiftConfig::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let Some(input) = config.io.input.clone() else {
        bail!("no input file given (use --input or [io].input)");
    };
    let output = config
        .io
        .output
        .clone()
        .unwrap_or_else(|| default_output(&input));

    let (method, decompose_config) = convert::build_decompose_config(&config.decompose)?;
    let reader_config = convert::build_reader_config(&config.io)?;
    let writer_config = convert::build_writer_config(&config.io, &output)?;

    let _span = info_span!("decompose", method = %method, input = %input.display()).entered();

    let signal = sift_io::read_signal(&input, &reader_config)
        .with_context(|| format!("failed to read signal from {}", input.display()))?;

    let imfs = sift_emd::decompose(&signal, method, &decompose_config)
        .context("decomposition failed")?;

    info!(
        rows = imfs.n_rows(),
        len = imfs.len(),
        reconstruction_error = imfs.reconstruction_error(signal.as_slice()),
        "decomposition finished"
    );
    for (name, fraction) in sift_io::column_names(imfs.n_rows())
        .iter()
        .zip(imfs.variance_fractions())
    {
        info!(component = %name, variance_fraction = fraction, "variance");
    }

    sift_io::write_imfs(&output, &imfs, &writer_config)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_replaces_extension() {
        assert_eq!(
            default_output(Path::new("data/flow.csv")),
            PathBuf::from("data/flow.imfs.csv")
        );
        assert_eq!(
            default_output(Path::new("flow.parquet")),
            PathBuf::from("flow.imfs.csv")
        );
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = SiftConfig::default();
        let args = DecomposeArgs {
            method: Some("ceemdan".into()),
            ensemble_size: Some(10),
            s_number: Some(-1),
            seed: Some(7),
            sequential: true,
            input: Some(PathBuf::from("in.csv")),
            column: Some("flow".into()),
            ..DecomposeArgs::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.decompose.method, "ceemdan");
        assert_eq!(config.decompose.ensemble_size, 10);
        assert_eq!(config.decompose.s_number, Some(-1));
        assert_eq!(config.decompose.seed, 7);
        assert!(!config.decompose.parallel);
        assert_eq!(config.io.input, Some(PathBuf::from("in.csv")));
        assert_eq!(config.io.column, "flow");
        // untouched fields keep their file values
        assert!((config.decompose.noise_strength - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.io.output, None);
    }

    #[test]
    fn end_to_end_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("signal.csv");
        let mut text = String::from("value\n");
        for i in 0..128 {
            let t = i as f64;
            text.push_str(&format!("{}\n", (t * 0.7).sin() + 0.05 * t));
        }
        std::fs::write(&input, text).unwrap();

        let args = DecomposeArgs {
            input: Some(input.clone()),
            method: Some("emd".into()),
            ..DecomposeArgs::default()
        };
        run(args).unwrap();

        let written = std::fs::read_to_string(dir.path().join("signal.imfs.csv")).unwrap();
        let header = written.lines().next().unwrap();
        assert!(header.starts_with("imf_1,"));
        assert!(header.ends_with("residual"));
        assert_eq!(written.lines().count(), 129);
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = run(DecomposeArgs::default()).unwrap_err();
        assert!(err.to_string().contains("no input file"));
    }
}
