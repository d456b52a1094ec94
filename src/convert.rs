//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use sift_emd::{DecomposeConfig, Method, StoppingCriteria};
use sift_io::{Column, Compression, Format, ReaderConfig, WriterConfig};

use crate::config::{DecomposeToml, IoToml};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses a single-byte delimiter; `"\t"` and `"tab"` mean a tab.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\t" | "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => bail!("delimiter must be a single ASCII character, got {other:?}"),
    }
}

/// Builds the method and [`DecomposeConfig`] from the TOML decompose table.
pub fn build_decompose_config(d: &DecomposeToml) -> Result<(Method, DecomposeConfig)> {
    let method = Method::from_name(&d.method)?;
    let criteria = StoppingCriteria::resolve(d.s_number, d.num_siftings)?;
    let config = DecomposeConfig::new()
        .with_num_imfs_opt(d.num_imfs)
        .with_ensemble_size(d.ensemble_size)
        .with_noise_strength(d.noise_strength)
        .with_criteria(criteria)
        .with_seed(d.seed)
        .with_parallel(d.parallel);
    Ok((method, config))
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    let cfg = ReaderConfig::default()
        .with_column(Column::from(io.column.as_str()))
        .with_has_header(io.has_header)
        .with_delimiter(parse_delimiter(&io.delimiter)?);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] for `output` from the TOML I/O configuration.
///
/// The format follows the output file extension.
pub fn build_writer_config(io: &IoToml, output: &std::path::Path) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    let cfg = WriterConfig::default()
        .with_format(Format::from_path(output))
        .with_compression(compression)
        .with_row_group_size(io.row_group_size);
    cfg.validate()?;
    Ok(cfg)
}
