//! Fill an [`UnlimitedStorage`] from a stream of `index [weight]` records.
//!
//! Each non-empty line names a cell index and an optional weight:
//!
//! ```text
//! # comment
//! 3          increments cell 3
//! 3 250      adds 250 to cell 3
//! 0 -1.5     adds -1.5 to cell 0, the storage becomes f64
//! ```
//!
//! Integer weights that do not fit into 64 bits are accepted and added exactly.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use clap::ValueEnum;
use thiserror::Error;
use unlimited_storage::{Counter, LargeInt, StorageError, UnlimitedStorage, Value, Visitor, log};

#[derive(clap::Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input file with one `index [weight]` record per line. Reads stdin when omitted.
    #[clap(value_parser)]
    pub file: Option<PathBuf>,

    /// Number of cells.
    #[arg(long, short, default_value_t = 16)]
    pub bins: usize,

    /// Multiply every cell by this factor after filling.
    #[arg(long)]
    pub scale: Option<f64>,

    /// How to print the cells.
    #[arg(long, value_enum, default_value_t = OutputFormat::Float)]
    pub output_format: OutputFormat,
}

impl Args {
    pub fn to_fill_config(&self) -> FillConfig {
        FillConfig {
            bins: self.bins,
            scale: self.scale,
            output_format: self.output_format,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every cell converted to a floating point number.
    #[default]
    Float,
    /// Cells in their current representation, exact for integers of any size.
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillConfig {
    pub bins: usize,
    pub scale: Option<f64>,
    pub output_format: OutputFormat,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            bins: 16,
            scale: None,
            output_format: OutputFormat::Float,
        }
    }
}

#[derive(Debug, Error)]
pub enum FillError {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("line {line}: malformed record {record:?}")]
    Malformed {
        line: usize,
        record: String,
    },
    #[error("line {line}: cell index {index} out of range for {bins} cells")]
    OutOfRange {
        line: usize,
        index: usize,
        bins: usize,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One parsed record. `weight == None` means a plain increment.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub index: usize,
    pub weight: Option<Value>,
}

fn parse_weight(s: &str) -> Option<Value> {
    if let Ok(v) = s.parse::<u64>() {
        return Some(Value::Unsigned(v));
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(Value::Signed(v));
    }
    if let Ok(v) = s.parse::<LargeInt>() {
        return Some(Value::Large(v));
    }
    s.parse::<f64>().ok().map(Value::Float)
}

/// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_record(line: &str, lineno: usize) -> Result<Option<Record>, FillError> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }
    let malformed = || FillError::Malformed {
        line: lineno,
        record: line.to_string(),
    };
    let mut fields = content.split_whitespace();
    let index = fields
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(malformed)?;
    let weight = match fields.next() {
        Some(s) => Some(parse_weight(s).ok_or_else(malformed)?),
        None => None,
    };
    if fields.next().is_some() {
        return Err(malformed());
    }
    Ok(Some(Record { index, weight }))
}

pub fn fill<R: BufRead>(reader: R, config: &FillConfig) -> Result<UnlimitedStorage, FillError> {
    let mut storage = UnlimitedStorage::new();
    storage.try_reset(config.bins)?;
    let mut count = 0usize;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(Record { index, weight }) = parse_record(&line, i + 1)? else {
            continue;
        };
        if index >= storage.len() {
            return Err(FillError::OutOfRange {
                line: i + 1,
                index,
                bins: storage.len(),
            });
        }
        let mut cell = storage.get_mut(index);
        match weight {
            Some(w) => cell.add(w),
            None => cell.increment(),
        }
        count += 1;
    }
    if let Some(factor) = config.scale {
        storage.scale(factor);
    }
    log::info!(
        "filled {} records into {} cells, representation {}",
        count,
        storage.len(),
        storage.repr()
    );
    Ok(storage)
}

struct RawWriter<'w, W: Write> {
    out: &'w mut W,
}

impl<W: Write> Visitor for RawWriter<'_, W> {
    type Output = io::Result<()>;

    fn visit<T: Counter>(self, cells: &[T]) -> io::Result<()> {
        writeln!(self.out, "# {}", T::REPR)?;
        for (i, cell) in cells.iter().enumerate() {
            writeln!(self.out, "{i}\t{cell}")?;
        }
        Ok(())
    }
}

pub fn write_report<W: Write>(
    out: &mut W,
    storage: &UnlimitedStorage,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Float => {
            for cell in storage {
                writeln!(out, "{}\t{}", cell.index(), cell.to_f64())?;
            }
            Ok(())
        }
        OutputFormat::Raw => storage.visit(RawWriter { out }),
    }
}

pub fn run(args: Args) -> Result<(), FillError> {
    let config = args.to_fill_config();
    let storage = match &args.file {
        Some(path) => fill(BufReader::new(File::open(path)?), &config)?,
        None => fill(io::stdin().lock(), &config)?,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &storage, config.output_format)?;
    Ok(())
}
