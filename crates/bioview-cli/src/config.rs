use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use bioview::engine::config::{
    self as core_config, ConnectivityConfigBuilder, ConnectivityStrategy, ParserConfigBuilder,
};
use bioview::workflows::import::ImportOptions;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Values used when neither the config file, `--set`, nor a flag provides one.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsConfig {
    pub block_size: usize,
    pub bonds_enabled: bool,
    pub bond_threshold: f32,
    pub bond_radius: f32,
    pub strategy: ConnectivityStrategy,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            block_size: core_config::DEFAULT_BLOCK_SIZE,
            bonds_enabled: false,
            bond_threshold: core_config::DEFAULT_BOND_THRESHOLD,
            bond_radius: core_config::DEFAULT_BOND_RADIUS,
            strategy: ConnectivityStrategy::default(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialParserConfig {
    #[serde(rename = "block-size")]
    block_size: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialConnectivityConfig {
    enabled: Option<bool>,
    threshold: Option<f32>,
    #[serde(rename = "bond-radius")]
    bond_radius: Option<f32>,
    strategy: Option<ConnectivityStrategy>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialInspectConfig {
    parser: Option<PartialParserConfig>,
    connectivity: Option<PartialConnectivityConfig>,
}

impl PartialInspectConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the final import options: flags, then `--set`, then the file, then defaults.
    pub fn merge_with_cli(mut self, args: &InspectArgs) -> Result<ImportOptions> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let parser_file = self.parser.take().unwrap_or_default();
        let conn_file = self.connectivity.take().unwrap_or_default();

        let parser = ParserConfigBuilder::new()
            .block_size(
                args.block_size
                    .or(parser_file.block_size)
                    .unwrap_or(defaults.block_size),
            )
            .build()?;

        let bonds_enabled = args.bonds || conn_file.enabled.unwrap_or(defaults.bonds_enabled);
        let connectivity = if bonds_enabled {
            Some(
                ConnectivityConfigBuilder::new()
                    .bond_threshold(
                        args.threshold
                            .or(conn_file.threshold)
                            .unwrap_or(defaults.bond_threshold),
                    )
                    .bond_radius(conn_file.bond_radius.unwrap_or(defaults.bond_radius))
                    .strategy(
                        args.strategy
                            .or(conn_file.strategy)
                            .unwrap_or(defaults.strategy),
                    )
                    .build()?,
            )
        } else {
            None
        };

        Ok(ImportOptions {
            parser,
            connectivity,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let (key, value_str) = (key.trim(), value_str.trim());

            match key {
                "parser.block-size" => {
                    self.parser
                        .get_or_insert_with(Default::default)
                        .block_size = Some(parse_value(key, value_str)?);
                }
                "connectivity.enabled" => {
                    self.connectivity
                        .get_or_insert_with(Default::default)
                        .enabled = Some(parse_value(key, value_str)?);
                }
                "connectivity.threshold" => {
                    self.connectivity
                        .get_or_insert_with(Default::default)
                        .threshold = Some(parse_value(key, value_str)?);
                }
                "connectivity.bond-radius" => {
                    self.connectivity
                        .get_or_insert_with(Default::default)
                        .bond_radius = Some(parse_value(key, value_str)?);
                }
                "connectivity.strategy" => {
                    self.connectivity
                        .get_or_insert_with(Default::default)
                        .strategy = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value_str)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn inspect_args(extra: &[&str]) -> InspectArgs {
        let mut argv = vec!["bioview", "inspect", "in.pdb"];
        argv.extend_from_slice(extra);
        let Commands::Inspect(args) = Cli::parse_from(argv).command;
        args
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("bioview.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let options = PartialInspectConfig::default()
            .merge_with_cli(&inspect_args(&[]))
            .unwrap();
        assert_eq!(options.parser.block_size, 1024);
        assert!(options.connectivity.is_none());
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [parser]
            block-size = 256

            [connectivity]
            enabled = true
            threshold = 1.9
            bond-radius = 0.1
            strategy = "spatial-index"
            "#,
        );
        let options = PartialInspectConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&inspect_args(&[]))
            .unwrap();

        assert_eq!(options.parser.block_size, 256);
        let connectivity = options.connectivity.unwrap();
        assert_eq!(connectivity.bond_threshold, 1.9);
        assert_eq!(connectivity.bond_radius, 0.1);
        assert_eq!(connectivity.strategy, ConnectivityStrategy::SpatialIndex);
    }

    #[test]
    fn flags_beat_set_values_which_beat_the_file() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[parser]\nblock-size = 256\n[connectivity]\nthreshold = 1.9\n",
        );
        let args = inspect_args(&[
            "--bonds",
            "--block-size",
            "8",
            "-S",
            "parser.block-size=32",
            "-S",
            "connectivity.threshold=2.2",
        ]);
        let options = PartialInspectConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(options.parser.block_size, 8);
        assert_eq!(options.connectivity.unwrap().bond_threshold, 2.2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "[parser]\nblocksize = 3\n");
        let err = PartialInspectConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));

        let err = PartialInspectConfig::default()
            .merge_with_cli(&inspect_args(&["-S", "render.mode=fast"]))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["parser.block-size", "parser.block-size=many"] {
            let err = PartialInspectConfig::default()
                .merge_with_cli(&inspect_args(&["-S", bad]))
                .unwrap_err();
            assert!(matches!(err, CliError::Config(_)), "{bad}");
        }
    }

    #[test]
    fn invalid_values_fail_core_validation() {
        let err = PartialInspectConfig::default()
            .merge_with_cli(&inspect_args(&["--block-size", "0"]))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));

        let err = PartialInspectConfig::default()
            .merge_with_cli(&inspect_args(&["--bonds", "--threshold=0"]))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
