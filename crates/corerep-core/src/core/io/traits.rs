use crate::core::models::atoms::AtomCollection;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface of the geometry formats an [`AtomCollection`] can be read from
/// and written to.
pub trait GeometryFile {
    /// Format-specific data that does not belong to the atoms themselves.
    type Metadata;

    type Error: Error + From<io::Error>;

    /// Reads one geometry from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or the reader fails.
    fn read_from(reader: &mut impl BufRead)
    -> Result<(AtomCollection, Self::Metadata), Self::Error>;

    /// Writes one geometry, with its metadata, to a writer.
    fn write_to(
        atoms: &AtomCollection,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(AtomCollection, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        atoms: &AtomCollection,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(atoms, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
