use crate::cli::ParamsArgs;
use crate::error::Result;
use corerep::core::params::ElementParameterTable;
use corerep::engine::config::RepulsionMethod;
use tracing::info;

pub fn builtin_table(method: RepulsionMethod) -> ElementParameterTable {
    match method {
        RepulsionMethod::Mndo => ElementParameterTable::mndo(),
        RepulsionMethod::Am1 => ElementParameterTable::am1(),
    }
}

pub fn run(args: ParamsArgs) -> Result<()> {
    let table = builtin_table(args.method);
    let content = table.to_toml_string()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, content)?;
            info!("Wrote {} parameters to {:?}", args.method, path);
            println!(
                "✓ {} parameters for {} elements written to: {}",
                args.method,
                table.len(),
                path.display()
            );
        }
        None => print!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use corerep::core::models::element::Element;
    use tempfile::tempdir;

    #[test]
    fn exported_parameters_load_back_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mndo.toml");
        run(ParamsArgs {
            method: RepulsionMethod::Mndo,
            output: Some(path.clone()),
        })
        .unwrap();

        let loaded = ElementParameterTable::load(&path).unwrap();
        let builtin = builtin_table(RepulsionMethod::Mndo);
        assert_eq!(loaded.name(), builtin.name());
        assert_eq!(loaded.elements(), builtin.elements());
        assert_eq!(
            loaded.get(Element::O).unwrap(),
            builtin.get(Element::O).unwrap()
        );
    }
}
