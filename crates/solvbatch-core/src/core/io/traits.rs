use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading one of the pipeline's input formats.
///
/// Implementors carry any format options (such as the solute identifier prefix)
/// and turn a buffered reader into a fully validated in-memory value.
pub trait InputFile {
    /// The parsed representation of the file.
    type Output;

    /// The error type for parsing and I/O operations.
    type Error: Error + From<io::Error>;

    /// Parses the format from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content violates the format.
    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Parses the format from an in-memory string.
    fn read_from_str(&self, text: &str) -> Result<Self::Output, Self::Error> {
        self.read_from(&mut text.as_bytes())
    }

    /// Opens and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }
}
