use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical element identity of an atom.
///
/// The domain is closed: the first three periods plus the heavier halogens
/// commonly found in semiempirical parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    Br,
    I,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown element symbol: '{0}'")]
pub struct UnknownElementError(pub String);

impl Element {
    pub const ALL: [Element; 20] = [
        Element::H,
        Element::He,
        Element::Li,
        Element::Be,
        Element::B,
        Element::C,
        Element::N,
        Element::O,
        Element::F,
        Element::Ne,
        Element::Na,
        Element::Mg,
        Element::Al,
        Element::Si,
        Element::P,
        Element::S,
        Element::Cl,
        Element::Ar,
        Element::Br,
        Element::I,
    ];

    pub fn atomic_number(self) -> u8 {
        match self {
            Element::H => 1,
            Element::He => 2,
            Element::Li => 3,
            Element::Be => 4,
            Element::B => 5,
            Element::C => 6,
            Element::N => 7,
            Element::O => 8,
            Element::F => 9,
            Element::Ne => 10,
            Element::Na => 11,
            Element::Mg => 12,
            Element::Al => 13,
            Element::Si => 14,
            Element::P => 15,
            Element::S => 16,
            Element::Cl => 17,
            Element::Ar => 18,
            Element::Br => 35,
            Element::I => 53,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::He => "He",
            Element::Li => "Li",
            Element::Be => "Be",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Ne => "Ne",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Al => "Al",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Ar => "Ar",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    pub fn from_atomic_number(z: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.atomic_number() == z)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = UnknownElementError;

    /// Parses an element symbol, ignoring case and surrounding whitespace.
    ///
    /// Bare atomic numbers (e.g. `"8"`) are accepted as well, since several
    /// XYZ writers emit them instead of symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(z) = trimmed.parse::<u8>() {
            return Self::from_atomic_number(z)
                .ok_or_else(|| UnknownElementError(trimmed.to_string()));
        }
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.symbol().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownElementError(trimmed.to_string()))
    }
}
