//! Error taxonomy shared by the rule parser, decoders and gradient builders.

use crate::schema::{ConfigError, GradientKind};

/// Errors raised while building rules, gradients or decoding patterns.
///
/// All of these are recoverable by the caller. Decoders report failures
/// line by line, so cells written before the failing line stay written.
#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    #[error("Malformed rule: {0}")]
    MalformedRule(String),
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    #[error("Malformed pattern: {0}")]
    MalformedPattern(String),
    #[error("{kind} gradient requires at least {required} control colors, got {given}")]
    InsufficientControlColors {
        kind: GradientKind,
        required: usize,
        given: usize,
    },
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
    #[error("Invalid color triplet: {0:?}")]
    InvalidColor(String),
    #[error("Unsupported pattern format: {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LifeError>;
