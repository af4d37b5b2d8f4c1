// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::ValidationError;

/// Errors that can occur while loading a pipeline definition or building a
/// runtime from one.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The definition file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The definition file is not valid YAML.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A component declares a type the factory doesn't know.
    #[error("Component '{component}' has unknown type '{kind}'")]
    UnknownComponentType { component: String, kind: String },

    /// The requested pipeline is not defined in the document.
    #[error("Pipeline '{0}' is not defined")]
    UnknownPipeline(String),

    /// A component parameter is missing, mistyped, or references another
    /// component that doesn't fit.
    #[error("Component '{component}': {reason}")]
    BadComponent { component: String, reason: String },

    /// The document failed structural validation.
    #[error("Invalid pipeline definition: {}", format_validation_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
