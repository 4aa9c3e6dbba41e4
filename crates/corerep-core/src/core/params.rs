use crate::core::models::element::{Element, UnknownElementError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// One Gaussian correction term `a · exp(-b (R - c)²)` of the AM1 core-core function.
///
/// `a` is in eV, `b` in Å⁻² and `c` in Å.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GaussianTerm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Immutable per-element parameter record consumed by the pair repulsion families.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementParameters {
    pub element: Element,
    /// Effective core charge (valence electrons), in units of e.
    pub core_charge: f64,
    /// Core-core exponent, in Å⁻¹.
    pub alpha: f64,
    /// One-center s-s Coulomb integral, in eV.
    pub gss: f64,
    pub gaussians: Vec<GaussianTerm>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawElementParameters {
    core_charge: f64,
    alpha: f64,
    gss: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    gaussians: Vec<GaussianTerm>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawParameterFile {
    name: String,
    elements: BTreeMap<String, RawElementParameters>,
}

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    UnknownElement(#[from] UnknownElementError),
    #[error("No repulsion parameters for element {0}")]
    MissingElement(Element),
    #[error("Invalid value {value} for '{field}' of element {element}")]
    InvalidValue {
        element: Element,
        field: &'static str,
        value: f64,
    },
}

/// Read-only lookup from element to its parameter record.
///
/// Shared by reference across the parallel pair-construction tasks, so lookups
/// never mutate.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementParameterTable {
    name: String,
    elements: HashMap<Element, ElementParameters>,
}

impl ElementParameterTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            elements: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, element: Element) -> bool {
        self.elements.contains_key(&element)
    }

    /// Inserts a record after checking that its values are physically meaningful.
    ///
    /// Replaces any record previously stored for the same element.
    pub fn insert(&mut self, params: ElementParameters) -> Result<(), ParameterError> {
        validate(&params)?;
        self.elements.insert(params.element, params);
        Ok(())
    }

    pub fn get(&self, element: Element) -> Result<&ElementParameters, ParameterError> {
        self.elements
            .get(&element)
            .ok_or(ParameterError::MissingElement(element))
    }

    /// Elements with a record, in atomic-number order.
    pub fn elements(&self) -> Vec<Element> {
        let mut elements: Vec<_> = self.elements.keys().copied().collect();
        elements.sort();
        elements
    }

    pub fn load(path: &Path) -> Result<Self, ParameterError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParameterError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ParameterError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ParameterError> {
        let raw: RawParameterFile = toml::from_str(content).map_err(|e| ParameterError::Toml {
            path: origin.to_string(),
            source: e,
        })?;

        let mut table = Self::new(&raw.name);
        for (symbol, record) in raw.elements {
            let element: Element = symbol.parse()?;
            table.insert(ElementParameters {
                element,
                core_charge: record.core_charge,
                alpha: record.alpha,
                gss: record.gss,
                gaussians: record.gaussians,
            })?;
        }
        Ok(table)
    }

    pub fn to_toml_string(&self) -> Result<String, ParameterError> {
        let elements = self
            .elements
            .values()
            .map(|p| {
                (
                    p.element.symbol().to_string(),
                    RawElementParameters {
                        core_charge: p.core_charge,
                        alpha: p.alpha,
                        gss: p.gss,
                        gaussians: p.gaussians.clone(),
                    },
                )
            })
            .collect();
        let raw = RawParameterFile {
            name: self.name.clone(),
            elements,
        };
        Ok(toml::to_string(&raw)?)
    }

    /// Built-in MNDO core-core parameters for H, C, N, O and F.
    pub fn mndo() -> Self {
        Self::from_builtin("MNDO", &MNDO_RECORDS, |_| Vec::new())
    }

    /// Built-in AM1 core-core parameters for H, C, N, O and F.
    pub fn am1() -> Self {
        Self::from_builtin("AM1", &AM1_RECORDS, |element| {
            AM1_GAUSSIANS
                .iter()
                .find(|(e, _)| *e == element)
                .map(|(_, terms)| terms.to_vec())
                .unwrap_or_default()
        })
    }

    fn from_builtin(
        name: &str,
        records: &[(Element, f64, f64, f64)],
        gaussians: impl Fn(Element) -> Vec<GaussianTerm>,
    ) -> Self {
        let elements = records
            .iter()
            .map(|&(element, core_charge, alpha, gss)| {
                (
                    element,
                    ElementParameters {
                        element,
                        core_charge,
                        alpha,
                        gss,
                        gaussians: gaussians(element),
                    },
                )
            })
            .collect();
        Self {
            name: name.to_string(),
            elements,
        }
    }
}

fn validate(params: &ElementParameters) -> Result<(), ParameterError> {
    let invalid = |field, value| ParameterError::InvalidValue {
        element: params.element,
        field,
        value,
    };
    if !params.core_charge.is_finite() || params.core_charge < 0.0 {
        return Err(invalid("core-charge", params.core_charge));
    }
    if !params.alpha.is_finite() || params.alpha <= 0.0 {
        return Err(invalid("alpha", params.alpha));
    }
    if !params.gss.is_finite() || params.gss <= 0.0 {
        return Err(invalid("gss", params.gss));
    }
    for term in &params.gaussians {
        if !term.a.is_finite() || !term.c.is_finite() {
            return Err(invalid("gaussians", f64::NAN));
        }
        if !term.b.is_finite() || term.b < 0.0 {
            return Err(invalid("gaussians.b", term.b));
        }
    }
    Ok(())
}

// (element, core charge, alpha [1/Å], Gss [eV])
const MNDO_RECORDS: [(Element, f64, f64, f64); 5] = [
    (Element::H, 1.0, 2.544134, 12.848),
    (Element::C, 4.0, 2.546380, 12.23),
    (Element::N, 5.0, 2.861342, 13.59),
    (Element::O, 6.0, 3.160604, 15.42),
    (Element::F, 7.0, 3.419661, 16.92),
];

const AM1_RECORDS: [(Element, f64, f64, f64); 5] = [
    (Element::H, 1.0, 2.882324, 12.848),
    (Element::C, 4.0, 2.648274, 12.23),
    (Element::N, 5.0, 2.947286, 13.59),
    (Element::O, 6.0, 4.455371, 15.42),
    (Element::F, 7.0, 3.419661, 16.92),
];

const fn g(a: f64, b: f64, c: f64) -> GaussianTerm {
    GaussianTerm { a, b, c }
}

const AM1_GAUSSIANS: [(Element, &[GaussianTerm]); 5] = [
    (
        Element::H,
        &[g(0.122796, 5.0, 1.2), g(0.005090, 5.0, 1.8), g(-0.018336, 2.0, 2.1)],
    ),
    (
        Element::C,
        &[
            g(0.011355, 5.0, 1.6),
            g(0.045924, 5.0, 1.85),
            g(-0.020061, 5.0, 2.05),
            g(-0.001260, 5.0, 2.65),
        ],
    ),
    (
        Element::N,
        &[g(0.025251, 5.0, 1.5), g(0.028953, 5.0, 2.1), g(-0.005806, 2.0, 2.4)],
    ),
    (
        Element::O,
        &[g(0.280962, 5.0, 0.847918), g(0.081430, 7.0, 1.445071)],
    ),
    (Element::F, &[g(0.242079, 4.8, 0.93), g(0.003607, 4.6, 1.66)]),
];
