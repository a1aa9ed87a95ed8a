#![allow(unused_assignments)]

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScriptgenError {
    #[error("Empty file path at \"{}\"", path.display())]
    #[diagnostic(help("Select a template document to generate from"))]
    EmptyPath { path: PathBuf },

    #[error("Invalid asset type at \"{}\". \"{asset}\" asset should be a script", path.display())]
    #[diagnostic(help("Template documents are plain-text source files"))]
    NotAScript { asset: String, path: PathBuf },

    #[error("Invalid file extension at \"{}\". Extension should be {expected}", path.display())]
    #[diagnostic(help("Rename the template so its file name ends with {expected}"))]
    WrongExtension { path: PathBuf, expected: String },

    #[error("Invalid file path at \"{}\". File not found", path.display())]
    MissingFile { path: PathBuf },

    #[error(
        "Invalid script at \"{}\". Script doesn't declare any public type. \
         It should declare a type that implements \"{contract}\"",
        path.display()
    )]
    #[diagnostic(help("Add a public type and an `impl {contract} for <Type>` block"))]
    NoDeclaredLogic { path: PathBuf, contract: String },

    #[error(
        "Invalid script at \"{}\". Declared \"{type_name}\" type should implement \"{contract}\"",
        path.display()
    )]
    LogicDoesNotConform {
        path: PathBuf,
        type_name: String,
        contract: String,
    },

    #[error(
        "Invalid script at \"{}\". Multiple types implement \"{contract}\": {}",
        path.display(),
        type_names.join(", ")
    )]
    #[diagnostic(help("A template document must declare exactly one generation type"))]
    AmbiguousLogic {
        path: PathBuf,
        type_names: Vec<String>,
        contract: String,
    },

    #[error("No generation logic registered for \"{type_name}\" declared at \"{}\"", path.display())]
    #[diagnostic(help(
        "Register a native factory or add a {type_name}.rhai script next to the template"
    ))]
    UnregisteredLogic { path: PathBuf, type_name: String },

    #[error("Invalid output name \"{name}\" declared at \"{}\". {reason}", path.display())]
    #[diagnostic(help("Output names are bare file names, written next to the template"))]
    InvalidOutputName {
        path: PathBuf,
        name: String,
        reason: String,
    },

    #[error("Generator script '{}' failed: {message}", script.display())]
    #[diagnostic(help("Check the Rhai script for errors"))]
    Script { script: PathBuf, message: String },

    #[error("Failed to parse {}", path.display())]
    #[diagnostic(help("Check the TOML syntax in your scriptgen.toml file"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {reason}")]
    ConfigInvalid { reason: String },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of a [`ScriptgenError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    EmptyPath,
    NotAScript,
    WrongExtension,
    MissingFile,
    NoDeclaredLogic,
    LogicDoesNotConform,
    AmbiguousLogic,
    UnregisteredLogic,
    InvalidOutputName,
    Script,
    Config,
    Io,
}

impl ScriptgenError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::EmptyPath { .. } => FailureKind::EmptyPath,
            Self::NotAScript { .. } => FailureKind::NotAScript,
            Self::WrongExtension { .. } => FailureKind::WrongExtension,
            Self::MissingFile { .. } => FailureKind::MissingFile,
            Self::NoDeclaredLogic { .. } => FailureKind::NoDeclaredLogic,
            Self::LogicDoesNotConform { .. } => FailureKind::LogicDoesNotConform,
            Self::AmbiguousLogic { .. } => FailureKind::AmbiguousLogic,
            Self::UnregisteredLogic { .. } => FailureKind::UnregisteredLogic,
            Self::InvalidOutputName { .. } => FailureKind::InvalidOutputName,
            Self::Script { .. } => FailureKind::Script,
            Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => FailureKind::Config,
            Self::Io { .. } => FailureKind::Io,
        }
    }

    /// The path the failure is attached to, when it originates from one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::EmptyPath { path }
            | Self::NotAScript { path, .. }
            | Self::WrongExtension { path, .. }
            | Self::MissingFile { path }
            | Self::NoDeclaredLogic { path, .. }
            | Self::LogicDoesNotConform { path, .. }
            | Self::AmbiguousLogic { path, .. }
            | Self::UnregisteredLogic { path, .. }
            | Self::InvalidOutputName { path, .. }
            | Self::ConfigParse { path, .. } => Some(path),
            Self::Script { script, .. } => Some(script),
            Self::ConfigInvalid { .. } | Self::Io { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScriptgenError>;
