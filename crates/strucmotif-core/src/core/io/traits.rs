use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface for on-disk structure tables.
///
/// A file may hold any number of structures; reading returns them in the order they first
/// appear.
pub trait StructureFile {
    type Error: Error + From<io::Error>;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Structure>, Self::Error>;

    fn write_to(structures: &[Structure], writer: &mut impl Write) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Structure>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(structures: &[Structure], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structures, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
