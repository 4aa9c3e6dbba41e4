use super::params::builtin_table;
use crate::cli::ComputeArgs;
use crate::config::{ParameterSource, build_config};
use crate::error::{CliError, Result};
use corerep::core::io::{traits::GeometryFile, xyz::XyzFile};
use corerep::core::params::ElementParameterTable;
use corerep::workflows::repulsion::{self, RepulsionReport, SystemDerivatives};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Serialized form of a [`RepulsionReport`]. Energies are in eV, gradients in eV/Å and
/// Hessians in eV/Å².
#[derive(Serialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct ReportFile {
    method: String,
    order: String,
    atoms: usize,
    pairs: usize,
    energy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    gradient: Option<Vec<[f64; 3]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    atomic_hessians: Option<Vec<[[f64; 3]; 3]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hessian: Option<Vec<Vec<f64>>>,
}

impl From<&RepulsionReport> for ReportFile {
    fn from(report: &RepulsionReport) -> Self {
        let mut file = ReportFile {
            method: report.method.to_string(),
            order: report.order.to_string(),
            atoms: report.atom_count,
            pairs: report.pair_count,
            energy: report.energy,
            gradient: None,
            atomic_hessians: None,
            hessian: None,
        };
        match &report.derivatives {
            SystemDerivatives::None => {}
            SystemDerivatives::Gradient(acc) => {
                file.gradient = Some(acc.gradients().iter().map(|g| [g.x, g.y, g.z]).collect());
            }
            SystemDerivatives::Atomic(acc) => {
                file.gradient = Some(acc.gradients().iter().map(|g| [g.x, g.y, g.z]).collect());
                file.atomic_hessians = Some(
                    acc.hessians()
                        .iter()
                        .map(|h| h.transpose().into())
                        .collect(),
                );
            }
            SystemDerivatives::Full(acc) => {
                file.gradient = Some(acc.gradients().iter().map(|g| [g.x, g.y, g.z]).collect());
                file.hessian = Some(
                    acc.hessian()
                        .row_iter()
                        .map(|row| row.iter().copied().collect())
                        .collect(),
                );
            }
        }
        file
    }
}

fn load_parameters(source: &ParameterSource) -> Result<ElementParameterTable> {
    match source {
        ParameterSource::BuiltIn(method) => {
            debug!("Using built-in {} parameters.", method);
            Ok(builtin_table(*method))
        }
        ParameterSource::File(path) => {
            info!("Loading element parameters from {:?}", path);
            Ok(ElementParameterTable::load(path)?)
        }
    }
}

fn write_report(report: &RepulsionReport, path: &Path) -> Result<()> {
    let content = toml::to_string(&ReportFile::from(report))
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize report: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

fn print_summary(report: &RepulsionReport) {
    println!(
        "{} core-core repulsion for {} atoms ({} pairs)",
        report.method, report.atom_count, report.pair_count
    );
    println!("  Energy: {:.10} eV", report.energy);

    let gradients = match &report.derivatives {
        SystemDerivatives::None => return,
        SystemDerivatives::Gradient(acc) => acc.gradients(),
        SystemDerivatives::Atomic(acc) => acc.gradients(),
        SystemDerivatives::Full(acc) => acc.gradients(),
    };
    println!("  Gradient (eV/Å):");
    for (i, g) in gradients.iter().enumerate() {
        println!("    {:>5} {:>16.8} {:>16.8} {:>16.8}", i, g.x, g.y, g.z);
    }
}

pub fn run(args: ComputeArgs) -> Result<()> {
    let app = build_config(&args)?;

    info!("Loading input geometry from {:?}", &app.input_path);
    let (atoms, metadata) =
        XyzFile::read_from_path(&app.input_path).map_err(|e| CliError::FileParsing {
            path: app.input_path.clone(),
            source: e.into(),
        })?;
    debug!(atoms = atoms.len(), comment = %metadata.comment, "Geometry loaded.");

    let params = load_parameters(&app.parameters)?;
    let report = repulsion::run(&atoms, &params, &app.core_config)?;

    print_summary(&report);

    if let Some(path) = &app.output_path {
        write_report(&report, path)?;
        info!("Report written to {:?}", path);
        println!("✓ Report written to: {}", path.display());
    }
    Ok(())
}
