use super::traits::GeometryFile;
use crate::core::models::atoms::AtomCollection;
use crate::core::models::element::Element;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// The free-text second line of an XYZ file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XyzMetadata {
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Expected {expected} atom records but found {found}")]
    AtomCount { expected: usize, found: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XyzParseErrorKind {
    #[error("Missing atom count line")]
    MissingCount,
    #[error("Invalid atom count '{0}'")]
    InvalidCount(String),
    #[error("Unknown element '{0}'")]
    UnknownElement(String),
    #[error("Invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("Atom record needs an element and three coordinates")]
    TooFewFields,
}

fn parse_error(line: usize, kind: XyzParseErrorKind) -> XyzError {
    XyzError::Parse { line, kind }
}

fn parse_record(line_num: usize, line: &str) -> Result<(Element, Point3<f64>), XyzError> {
    let mut fields = line.split_whitespace();
    let (Some(symbol), Some(x), Some(y), Some(z)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(parse_error(line_num, XyzParseErrorKind::TooFewFields));
    };

    let element: Element = symbol
        .parse()
        .map_err(|_| parse_error(line_num, XyzParseErrorKind::UnknownElement(symbol.to_string())))?;
    let coordinate = |value: &str| {
        value.parse::<f64>().map_err(|_| {
            parse_error(
                line_num,
                XyzParseErrorKind::InvalidCoordinate(value.to_string()),
            )
        })
    };
    Ok((element, Point3::new(coordinate(x)?, coordinate(y)?, coordinate(z)?)))
}

pub struct XyzFile;

impl GeometryFile for XyzFile {
    type Metadata = XyzMetadata;
    type Error = XyzError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(AtomCollection, Self::Metadata), Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines
            .next()
            .transpose()?
            .ok_or_else(|| parse_error(1, XyzParseErrorKind::MissingCount))?;
        let count_text = count_line.trim();
        let expected: usize = count_text
            .parse()
            .map_err(|_| parse_error(1, XyzParseErrorKind::InvalidCount(count_text.to_string())))?;

        let comment = lines.next().transpose()?.unwrap_or_default();

        let mut atoms = AtomCollection::new();
        for (offset, line) in lines.enumerate() {
            let line = line?;
            if atoms.len() == expected {
                // Trailing frames or blank lines are ignored.
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            let (element, position) = parse_record(offset + 3, &line)?;
            atoms.push(element, position);
        }

        if atoms.len() != expected {
            return Err(XyzError::AtomCount {
                expected,
                found: atoms.len(),
            });
        }

        Ok((
            atoms,
            XyzMetadata {
                comment: comment.trim_end().to_string(),
            },
        ))
    }

    fn write_to(
        atoms: &AtomCollection,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "{}", atoms.len())?;
        writeln!(writer, "{}", metadata.comment)?;
        for (element, position) in atoms.iter() {
            writeln!(
                writer,
                "{:<2} {:>14.8} {:>14.8} {:>14.8}",
                element.symbol(),
                position.x,
                position.y,
                position.z
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const WATER: &str = "3\nwater molecule\nO 0.000 0.000 0.000\nH 0.960 0.000 0.000\nh -0.240 0.930 0.000\n";

    fn read(content: &str) -> Result<(AtomCollection, XyzMetadata), XyzError> {
        XyzFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_atoms_and_comment() {
        let (atoms, metadata) = read(WATER).unwrap();
        assert_eq!(metadata.comment, "water molecule");
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms.elements(), &[Element::O, Element::H, Element::H]);
        assert_eq!(atoms.positions()[2], Point3::new(-0.24, 0.93, 0.0));
    }

    #[test]
    fn ignores_blank_lines_and_trailing_frames() {
        let content = format!("{WATER}\n3\nsecond frame\nC 0 0 0\nC 1 0 0\nC 2 0 0\n");
        let (atoms, _) = read(&content).unwrap();
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms.elements()[0], Element::O);

        let (atoms, _) = read("2\n\nC 0 0 0\n\nO 1.2 0 0\n").unwrap();
        assert_eq!(atoms.len(), 2);
    }

    #[test]
    fn accepts_atomic_numbers_and_extra_columns() {
        let (atoms, _) = read("1\n\n8 0.0 0.0 0.0 -0.834\n").unwrap();
        assert_eq!(atoms.elements(), &[Element::O]);
    }

    #[test]
    fn reports_line_of_malformed_records() {
        let err = read("2\n\nC 0 0 0\nC 1.0 zero 0\n").unwrap_err();
        match err {
            XyzError::Parse { line, kind } => {
                assert_eq!(line, 4);
                assert_eq!(kind, XyzParseErrorKind::InvalidCoordinate("zero".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = read("1\n\nXx 0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::UnknownElement(_)
            }
        ));

        let err = read("1\n\nC 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                kind: XyzParseErrorKind::TooFewFields,
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_or_missing_count() {
        assert!(matches!(
            read("").unwrap_err(),
            XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::MissingCount
            }
        ));
        assert!(matches!(
            read("three\n\n").unwrap_err(),
            XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::InvalidCount(_)
            }
        ));
        assert!(matches!(
            read("4\n\nC 0 0 0\n").unwrap_err(),
            XyzError::AtomCount {
                expected: 4,
                found: 1
            }
        ));
    }

    #[test]
    fn empty_geometry_is_valid() {
        let (atoms, metadata) = read("0\nnothing here\n").unwrap();
        assert!(atoms.is_empty());
        assert_eq!(metadata.comment, "nothing here");
    }

    #[test]
    fn written_file_reads_back() {
        let (atoms, metadata) = read(WATER).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("water.xyz");
        XyzFile::write_to_path(&atoms, &metadata, &path).unwrap();

        let (reread, remeta) = XyzFile::read_from_path(&path).unwrap();
        assert_eq!(remeta, metadata);
        assert_eq!(reread.elements(), atoms.elements());
        for (a, b) in reread.positions().iter().zip(atoms.positions()) {
            assert!((a - b).norm() < 1e-8);
        }
    }
}
