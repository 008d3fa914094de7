use crate::core::models::file::ProteinFileInfo;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_BLOCK_SIZE: usize = 1024;
pub const DEFAULT_BOND_THRESHOLD: f32 = 1.6;
pub const DEFAULT_BOND_RADIUS: f32 = 0.05;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Lines per classification block.
    pub block_size: usize,
    /// Metadata already known about the file; populated fields are kept as-is.
    pub prior_info: Option<ProteinFileInfo>,
    /// Expected number of lines, used only to size progress reporting.
    pub record_count_hint: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            prior_info: None,
            record_count_hint: None,
        }
    }
}

#[derive(Default)]
pub struct ParserConfigBuilder {
    block_size: Option<usize>,
    prior_info: Option<ProteinFileInfo>,
    record_count_hint: Option<usize>,
}

impl ParserConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_size(mut self, lines: usize) -> Self {
        self.block_size = Some(lines);
        self
    }
    pub fn prior_info(mut self, info: ProteinFileInfo) -> Self {
        self.prior_info = Some(info);
        self
    }
    pub fn record_count_hint(mut self, lines: usize) -> Self {
        self.record_count_hint = Some(lines);
        self
    }

    pub fn build(self) -> Result<ParserConfig, ConfigError> {
        let block_size = self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        if block_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "block_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(ParserConfig {
            block_size,
            prior_info: self.prior_info,
            record_count_hint: self.record_count_hint,
        })
    }
}

/// How candidate atom pairs are enumerated when generating bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectivityStrategy {
    /// Every pair `(i, j)` with `j < i` is compared directly.
    #[default]
    BruteForce,
    /// Pairs are taken from a k-d tree radius query over each configuration.
    SpatialIndex,
}

impl fmt::Display for ConnectivityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectivityStrategy::BruteForce => "brute-force",
            ConnectivityStrategy::SpatialIndex => "spatial-index",
        })
    }
}

impl std::str::FromStr for ConnectivityStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brute-force" | "brute_force" | "bruteforce" => Ok(Self::BruteForce),
            "spatial-index" | "spatial_index" | "kdtree" | "kd-tree" => Ok(Self::SpatialIndex),
            other => Err(ConfigError::InvalidParameter {
                name: "strategy",
                reason: format!("unknown strategy '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectivityConfig {
    /// Pairs closer than this distance (in ångström) are bonded.
    pub bond_threshold: f32,
    pub bond_radius: f32,
    pub strategy: ConnectivityStrategy,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            bond_threshold: DEFAULT_BOND_THRESHOLD,
            bond_radius: DEFAULT_BOND_RADIUS,
            strategy: ConnectivityStrategy::default(),
        }
    }
}

#[derive(Default)]
pub struct ConnectivityConfigBuilder {
    bond_threshold: Option<f32>,
    bond_radius: Option<f32>,
    strategy: Option<ConnectivityStrategy>,
}

impl ConnectivityConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond_threshold(mut self, angstroms: f32) -> Self {
        self.bond_threshold = Some(angstroms);
        self
    }
    pub fn bond_radius(mut self, radius: f32) -> Self {
        self.bond_radius = Some(radius);
        self
    }
    pub fn strategy(mut self, strategy: ConnectivityStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn build(self) -> Result<ConnectivityConfig, ConfigError> {
        let bond_threshold = positive("bond_threshold", self.bond_threshold, DEFAULT_BOND_THRESHOLD)?;
        let bond_radius = positive("bond_radius", self.bond_radius, DEFAULT_BOND_RADIUS)?;
        Ok(ConnectivityConfig {
            bond_threshold,
            bond_radius,
            strategy: self.strategy.unwrap_or_default(),
        })
    }
}

fn positive(name: &'static str, value: Option<f32>, default: f32) -> Result<f32, ConfigError> {
    let value = value.unwrap_or(default);
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}
