use super::defaults::DefaultsConfig;
use super::file::{FileCalculationConfig, FileConfig};
use super::models::{AppConfig, ParameterSource};
use crate::cli::ComputeArgs;
use crate::error::{CliError, Result};
use corerep::core::pair::DerivativeOrder;
use corerep::engine::config::{RepulsionConfigBuilder, RepulsionMethod};
use std::path::PathBuf;
use tracing::debug;

pub fn build_config(args: &ComputeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let calc_file = file_config.calculation.take().unwrap_or_default();
    let params_file = file_config.parameters.take().unwrap_or_default();

    let method = match (args.method, calc_file.method.as_deref()) {
        (Some(method), _) => method,
        (None, Some(name)) => parse_method(name)?,
        (None, None) => defaults.method,
    };
    let order = match (args.order, calc_file.order.as_deref()) {
        (Some(order), _) => order,
        (None, Some(name)) => parse_order(name)?,
        (None, None) => defaults.order,
    };
    let min_pairs_per_task = args
        .min_pairs_per_task
        .or(calc_file.min_pairs_per_task)
        .unwrap_or(defaults.min_pairs_per_task);

    let parameters = match args.params.clone().or(params_file.path) {
        Some(path) => ParameterSource::File(path),
        None => ParameterSource::BuiltIn(method),
    };

    let core_config = RepulsionConfigBuilder::new()
        .method(method)
        .order(order)
        .min_pairs_per_task(min_pairs_per_task)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    debug!(?core_config, ?parameters, "Run configuration resolved.");

    Ok(AppConfig {
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        parameters,
        core_config,
    })
}

fn parse_method(value: &str) -> Result<RepulsionMethod> {
    value.parse().map_err(|e| CliError::Config(format!("{e}")))
}

fn parse_order(value: &str) -> Result<DerivativeOrder> {
    value.parse().map_err(|e| CliError::Config(format!("{e}")))
}

fn calculation(config: &mut FileConfig) -> &mut FileCalculationConfig {
    config.calculation.get_or_insert_with(Default::default)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "calculation.method" => {
                parse_method(value_str)?;
                calculation(&mut config).method = Some(value_str.to_string());
            }
            "calculation.order" => {
                parse_order(value_str)?;
                calculation(&mut config).order = Some(value_str.to_string());
            }
            "calculation.min-pairs-per-task" => {
                calculation(&mut config).min_pairs_per_task =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid integer value for {}: {}",
                            key, value_str
                        ))
                    })?);
            }
            "parameters.path" => {
                config
                    .parameters
                    .get_or_insert_with(Default::default)
                    .path = Some(PathBuf::from(value_str));
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn base_compute_args() -> ComputeArgs {
        ComputeArgs {
            input: PathBuf::from("mol.xyz"),
            output: None,
            config: None,
            params: None,
            method: None,
            order: None,
            min_pairs_per_task: None,
            set_values: vec![],
        }
    }

    #[test]
    fn build_config_uses_defaults_without_file_or_flags() {
        let app = build_config(&base_compute_args()).expect("build ok");
        let defaults = DefaultsConfig::default();

        assert_eq!(app.input_path, PathBuf::from("mol.xyz"));
        assert_eq!(app.core_config.method, defaults.method);
        assert_eq!(app.core_config.order, defaults.order);
        assert_eq!(
            app.core_config.table.min_pairs_per_task,
            defaults.min_pairs_per_task
        );
        assert_eq!(app.parameters, ParameterSource::BuiltIn(RepulsionMethod::Am1));
    }

    #[test]
    fn build_config_reads_file_and_resolves_relative_parameter_path() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("run.toml");
        let toml = r#"
            [calculation]
            method = "mndo"
            order = "hessian-full"
            min-pairs-per-task = 32

            [parameters]
            path = "custom.toml"
            "#;
        fs::write(&cfg_path, toml).unwrap();

        let mut args = base_compute_args();
        args.config = Some(cfg_path);
        let app = build_config(&args).expect("build ok");

        assert_eq!(app.core_config.method, RepulsionMethod::Mndo);
        assert_eq!(app.core_config.order, DerivativeOrder::SecondFull);
        assert_eq!(app.core_config.table.min_pairs_per_task, 32);
        assert_eq!(
            app.parameters,
            ParameterSource::File(dir.path().join("custom.toml"))
        );
    }

    #[test]
    fn cli_overrides_file_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("run.toml");
        fs::write(
            &cfg_path,
            "[calculation]\nmethod = \"mndo\"\norder = \"energy\"\n",
        )
        .unwrap();

        let mut args = base_compute_args();
        args.config = Some(cfg_path);
        args.method = Some(RepulsionMethod::Am1);
        args.order = Some(DerivativeOrder::Gradient);
        args.params = Some(PathBuf::from("/tmp/override.toml"));

        let app = build_config(&args).expect("build ok");
        assert_eq!(app.core_config.method, RepulsionMethod::Am1);
        assert_eq!(app.core_config.order, DerivativeOrder::Gradient);
        assert_eq!(
            app.parameters,
            ParameterSource::File(PathBuf::from("/tmp/override.toml"))
        );
    }

    #[test]
    fn set_values_override_file() {
        let mut args = base_compute_args();
        args.set_values = vec![
            "calculation.method=MNDO".to_string(),
            "calculation.order=1".to_string(),
            "calculation.min-pairs-per-task=8".to_string(),
        ];

        let app = build_config(&args).expect("build ok");
        assert_eq!(app.core_config.method, RepulsionMethod::Mndo);
        assert_eq!(app.core_config.order, DerivativeOrder::Gradient);
        assert_eq!(app.core_config.table.min_pairs_per_task, 8);
        assert_eq!(app.parameters, ParameterSource::BuiltIn(RepulsionMethod::Mndo));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for set in [
            "calculation.method=pm3",
            "calculation.order=third",
            "calculation.min-pairs-per-task=many",
            "calculation.unknown=1",
            "no-equals-sign",
        ] {
            let mut args = base_compute_args();
            args.set_values = vec![set.to_string()];
            assert!(
                matches!(build_config(&args), Err(CliError::Config(_))),
                "{set} should be rejected"
            );
        }

        let mut args = base_compute_args();
        args.min_pairs_per_task = Some(0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("run.toml");
        fs::write(&cfg_path, "[calculation]\nthreads = 4\n").unwrap();

        let mut args = base_compute_args();
        args.config = Some(cfg_path);
        assert!(matches!(
            build_config(&args),
            Err(CliError::FileParsing { .. })
        ));
    }
}
