// mod.rs - Output formatters module

use std::fmt;
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use crate::core::DistanceMatrix;
use crate::error::{DistError, Result};

/// Supported distance matrix layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Sequence count, then one tab-separated row per sequence
    #[default]
    Dist,
    Tsv,
    Csv,
    /// Lower-triangular PHYLIP matrix
    Phylip,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Dist => "dist",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
            OutputFormat::Phylip => "phylip",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = DistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dist" => Ok(OutputFormat::Dist),
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "phylip" => Ok(OutputFormat::Phylip),
            _ => Err(DistError::config(format!(
                "Unsupported output format: {}. Use: dist, tsv, csv, phylip",
                s
            ))),
        }
    }
}

/// `-` and `stdout` both mean standard output
pub fn is_stdout(path: &str) -> bool {
    path == "-" || path == "stdout"
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_header<W: Write>(writer: &mut W, command_line: &str) -> Result<()> {
    writeln!(writer, "# Command: {}", command_line)?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(writer, "# ntdist v{}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

/// Write the plain layout: the sequence count on the first line, then each
/// name followed by its tab-separated distances with 12 decimals
pub fn write_dist<W: Write>(writer: &mut W, matrix: &DistanceMatrix) -> Result<()> {
    writeln!(writer, "{}", matrix.len())?;
    for (name, row) in matrix.names().iter().zip(matrix.values()) {
        write!(writer, "{}", name)?;
        for d in row {
            write!(writer, "\t{:.12}", d)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_delimited<W: Write>(
    writer: &mut W,
    matrix: &DistanceMatrix,
    command_line: &str,
    separator: char,
) -> Result<()> {
    write_header(writer, command_line)?;

    write!(writer, "Sequence")?;
    for name in matrix.names() {
        write!(writer, "{}{}", separator, name)?;
    }
    writeln!(writer)?;

    for (name, row) in matrix.names().iter().zip(matrix.values()) {
        write!(writer, "{}", name)?;
        for d in row {
            write!(writer, "{}{:.12}", separator, d)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write distance matrix in TSV format
pub fn write_tsv<W: Write>(writer: &mut W, matrix: &DistanceMatrix, command_line: &str) -> Result<()> {
    write_delimited(writer, matrix, command_line, '\t')
}

/// Write distance matrix in CSV format
pub fn write_csv<W: Write>(writer: &mut W, matrix: &DistanceMatrix, command_line: &str) -> Result<()> {
    write_delimited(writer, matrix, command_line, ',')
}

/// Write distance matrix in PHYLIP lower-triangular format
pub fn write_phylip<W: Write>(writer: &mut W, matrix: &DistanceMatrix) -> Result<()> {
    writeln!(writer, "    {}", matrix.len())?;
    for (i, (name, row)) in matrix.names().iter().zip(matrix.values()).enumerate() {
        write!(writer, "{:<10}", name)?;
        for d in &row[..i] {
            write!(writer, "  {:.6}", d)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write distance matrix in the specified format
pub fn write_matrix<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    matrix: &DistanceMatrix,
    command_line: &str,
) -> Result<()> {
    match format {
        OutputFormat::Dist => write_dist(writer, matrix),
        OutputFormat::Tsv => write_tsv(writer, matrix, command_line),
        OutputFormat::Csv => write_csv(writer, matrix, command_line),
        OutputFormat::Phylip => write_phylip(writer, matrix),
    }
}

/// Write distance matrix to a file, or to stdout for `-`
pub fn write_matrix_to(
    file_path: &str,
    format: OutputFormat,
    matrix: &DistanceMatrix,
    command_line: &str,
) -> Result<()> {
    if is_stdout(file_path) {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        write_matrix(&mut writer, format, matrix, command_line)?;
        writer.flush()?;
        return Ok(());
    }

    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    write_matrix(&mut writer, format, matrix, command_line)?;
    writer.flush()?;
    Ok(())
}
