use crate::core::models::system::SimulationBox;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for file formats that fully describe a simulation box.
///
/// Implementors handle format-specific parsing and serialization; the path-based
/// helpers take care of opening and buffering files.
pub trait BoxFile {
    /// Format-specific data stored alongside the box (e.g., the step of a checkpoint).
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a simulation box and its metadata from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the described box is invalid.
    fn read_from(reader: &mut impl BufRead) -> Result<(SimulationBox, Self::Metadata), Self::Error>;

    /// Writes a simulation box and its metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn write_to(
        sim_box: &SimulationBox,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads a simulation box and its metadata from a file path.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(SimulationBox, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a simulation box and its metadata to a file path, creating or truncating it.
    fn write_to_path<P: AsRef<Path>>(
        sim_box: &SimulationBox,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(sim_box, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
