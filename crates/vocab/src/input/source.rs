//! Dataset sources: plain or gzip-compressed text files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::{Result, VocabError};

/// Compression type detected from file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Detect compression from a file path.
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy().to_lowercase();
        if name.ends_with(".gz") || name.ends_with(".gzip") {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}

/// A dataset file that can be re-opened for reading any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    path: PathBuf,
    compression: Compression,
}

impl Source {
    /// Create a source for an existing file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(VocabError::Config(format!(
                "file '{}' does not exist",
                path.display()
            )));
        }
        let compression = Compression::from_path(&path);
        Ok(Self { path, compression })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compression applied to the file.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Open the file from the start, decompressing if needed.
    pub fn open(&self) -> Result<Lines<Box<dyn BufRead>>> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let reader: Box<dyn BufRead> = match self.compression {
            Compression::Gzip => Box::new(BufReader::new(GzDecoder::new(file))),
            Compression::None => Box::new(BufReader::new(file)),
        };
        Ok(Lines::new(reader, Some(self.path.clone())))
    }

    fn io_error(&self, source: std::io::Error) -> VocabError {
        VocabError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Numbered line reader over a dataset.
///
/// Yields `(line_number, line)` pairs with 1-based line numbers; line
/// terminators (`\n` or `\r\n`) are stripped.
pub struct Lines<R> {
    reader: R,
    path: Option<PathBuf>,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> Lines<R> {
    /// Wrap a buffered reader. `path` is only used in error messages.
    pub fn new(reader: R, path: Option<PathBuf>) -> Self {
        Self {
            reader,
            path,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Read the next line, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.buffer.clear();
        let read = self.reader.read_line(&mut self.buffer).map_err(|e| VocabError::Io {
            path: self.path.clone().unwrap_or_default(),
            source: e,
        })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        if self.buffer.ends_with('\n') {
            self.buffer.pop();
            if self.buffer.ends_with('\r') {
                self.buffer.pop();
            }
        }
        Ok(Some((self.line_number, self.buffer.as_str())))
    }

    /// Read the header line, failing on empty input.
    pub fn header(&mut self) -> Result<String> {
        match self.next_line()? {
            Some((_, line)) => Ok(line.to_string()),
            None => Err(VocabError::format(1, "dataset is empty, expected a header line")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use flate2::write::GzEncoder;
    use tempfile::Builder;

    #[test]
    fn test_compression_from_path() {
        assert_eq!(Compression::from_path(Path::new("a.tsv.gz")), Compression::Gzip);
        assert_eq!(Compression::from_path(Path::new("A.TSV.GZIP")), Compression::Gzip);
        assert_eq!(Compression::from_path(Path::new("a.tsv")), Compression::None);
    }

    #[test]
    fn test_lines_strip_terminators() {
        let mut lines = Lines::new(Cursor::new("h\r\na\nb"), None);
        assert_eq!(lines.header().unwrap(), "h");
        assert_eq!(lines.next_line().unwrap(), Some((2, "a")));
        assert_eq!(lines.next_line().unwrap(), Some((3, "b")));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let mut lines = Lines::new(Cursor::new(""), None);
        assert!(matches!(lines.header(), Err(VocabError::Format { .. })));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Source::new("/nonexistent/vocab.tsv"),
            Err(VocabError::Config(_))
        ));
    }

    #[test]
    fn test_open_gzip() {
        let mut file = Builder::new().suffix(".tsv.gz").tempfile().unwrap();
        {
            let mut encoder = GzEncoder::new(&mut file, flate2::Compression::default());
            writeln!(encoder, "name\tsynonym").unwrap();
            writeln!(encoder, "Felis catus\tcat").unwrap();
            encoder.finish().unwrap();
        }

        let source = Source::new(file.path()).unwrap();
        assert_eq!(source.compression(), Compression::Gzip);

        let mut lines = source.open().unwrap();
        assert_eq!(lines.header().unwrap(), "name\tsynonym");
        assert_eq!(lines.next_line().unwrap(), Some((2, "Felis catus\tcat")));
        assert_eq!(lines.next_line().unwrap(), None);
    }
}
