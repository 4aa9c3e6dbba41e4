use super::element::Element;
use nalgebra::Point3;
use thiserror::Error;

/// Read-only view of the atoms a repulsion calculation runs over.
///
/// Indices are stable for the duration of one computation. Implementors must be
/// `Sync` because pair work reads positions from several threads at once.
pub trait AtomSource: Sync {
    fn atom_count(&self) -> usize;
    fn element_at(&self, index: usize) -> Element;
    fn position_at(&self, index: usize) -> Point3<f64>;
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AtomSetError {
    #[error("Got {elements} elements but {positions} positions")]
    LengthMismatch { elements: usize, positions: usize },
    #[error("Atom index {index} is out of range for {count} atoms")]
    IndexOutOfRange { index: usize, count: usize },
}

/// An ordered set of atoms stored as parallel element and position arrays.
///
/// Positions are in Ångström.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomCollection {
    elements: Vec<Element>,
    positions: Vec<Point3<f64>>,
}

impl AtomCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        elements: Vec<Element>,
        positions: Vec<Point3<f64>>,
    ) -> Result<Self, AtomSetError> {
        if elements.len() != positions.len() {
            return Err(AtomSetError::LengthMismatch {
                elements: elements.len(),
                positions: positions.len(),
            });
        }
        Ok(Self {
            elements,
            positions,
        })
    }

    pub fn push(&mut self, element: Element, position: Point3<f64>) {
        self.elements.push(element);
        self.positions.push(position);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn set_position(&mut self, index: usize, position: Point3<f64>) -> Result<(), AtomSetError> {
        let count = self.len();
        let slot = self
            .positions
            .get_mut(index)
            .ok_or(AtomSetError::IndexOutOfRange { index, count })?;
        *slot = position;
        Ok(())
    }

    /// Exchanges the storage order of two atoms, element and position together.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), AtomSetError> {
        let count = self.len();
        for index in [a, b] {
            if index >= count {
                return Err(AtomSetError::IndexOutOfRange { index, count });
            }
        }
        self.elements.swap(a, b);
        self.positions.swap(a, b);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, &Point3<f64>)> + '_ {
        self.elements.iter().copied().zip(self.positions.iter())
    }
}

impl AtomSource for AtomCollection {
    fn atom_count(&self) -> usize {
        self.len()
    }

    fn element_at(&self, index: usize) -> Element {
        self.elements[index]
    }

    fn position_at(&self, index: usize) -> Point3<f64> {
        self.positions[index]
    }
}

impl FromIterator<(Element, Point3<f64>)> for AtomCollection {
    fn from_iter<T: IntoIterator<Item = (Element, Point3<f64>)>>(iter: T) -> Self {
        let (elements, positions) = iter.into_iter().unzip();
        Self {
            elements,
            positions,
        }
    }
}
