use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EngineError {
    #[error("Bonds have not been computed for this selection")]
    BondsUnavailable,

    #[error("Bond layout was already attached to this selection")]
    BondsAlreadyAttached,

    #[error("Configuration {index} is out of range (selection has {count})")]
    ConfigurationOutOfRange { index: usize, count: usize },

    #[error("Bond layout covers {found} configurations, expected {expected}")]
    LayoutMismatch { expected: usize, found: usize },

    #[error("Cannot build a selection from zero proteins")]
    EmptySelection,

    #[error("Proteins in one selection must share the same configuration count")]
    InconsistentConfigurationCount,
}
