//! Record Loader Module
//! Reads a (possibly compressed) accident CSV file into a Polars DataFrame.

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use polars::prelude::*;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("file '{}' does not exist", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to decompress '{}': {source}", path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
    #[error("Column '{column}' missing from '{}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

/// Container format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    Bzip2,
    Gzip,
    Plain,
}

impl Compression {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bz2") => Compression::Bzip2,
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Compression::Gzip,
            _ => Compression::Plain,
        }
    }
}

/// Load an accident file. The whole file is decoded and parsed, or an error is returned.
pub fn fars_read(path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }

    let bytes = read_decompressed(path)?;
    let df = parse_csv(bytes)?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded accident file"
    );
    Ok(df)
}

/// Fail unless every named column is present in the frame.
pub fn require_columns(df: &DataFrame, path: &Path, columns: &[&str]) -> Result<(), LoaderError> {
    let names = df.get_column_names();
    for column in columns {
        if !names.iter().any(|n| n.as_str() == *column) {
            return Err(LoaderError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn read_decompressed(path: &Path) -> Result<Vec<u8>, LoaderError> {
    let file = File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut buf = Vec::new();
    let decompress_err = |source| LoaderError::Decompress {
        path: path.to_path_buf(),
        source,
    };
    match Compression::from_path(path) {
        Compression::Bzip2 => {
            BzDecoder::new(file)
                .read_to_end(&mut buf)
                .map_err(decompress_err)?;
        }
        Compression::Gzip => {
            GzDecoder::new(file)
                .read_to_end(&mut buf)
                .map_err(decompress_err)?;
        }
        Compression::Plain => {
            let mut file = file;
            file.read_to_end(&mut buf).map_err(|source| LoaderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(buf)
}

/// Parse header-having CSV text. Malformed rows surface as a Polars error.
pub(crate) fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
    let opts = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000));
    let df = opts.into_reader_with_file_handle(Cursor::new(bytes)).finish()?;
    Ok(df)
}
