use crate::{config::ConfigError, store::StoreError, types::FieldType, value::Value};
use derive_more::Display;
use std::{collections::BTreeMap, fmt};
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Stable classification used by callers to decide how to surface an error.
/// `Request` errors belong to the caller's selection, `Unavailable` errors
/// may be retried by the caller, `Internal` and `Schema` errors are defects.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ErrorClass {
    Cancelled,
    Internal,
    Request,
    Schema,
    Unavailable,
}

///
/// Error
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error("backend unavailable: {0}")]
    BackendUnavailable(#[from] StoreError),

    #[error("execution cancelled")]
    Cancelled,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("link '{link}' on entity '{entity}' requires an integer key, found {value:?}")]
    InvalidKey {
        entity: String,
        link: String,
        value: Value,
    },

    #[error("invalid selection of '{name}' on entity '{entity}': {reason}")]
    InvalidSelection {
        entity: String,
        name: String,
        reason: &'static str,
    },

    #[error(
        "field '{field}' on entity '{entity}' was evaluated before its dependency '{dependency}' was resolved"
    )]
    MissingDependency {
        entity: String,
        field: String,
        dependency: String,
    },

    #[error("schema composition failed:\n{0}")]
    SchemaComposition(ErrorTree),

    #[error("field '{field}' on entity '{entity}' read {value:?}, expected {expected}")]
    TypeMismatch {
        entity: String,
        field: String,
        expected: FieldType,
        value: Value,
    },

    #[error("unknown value '{value}' for enum '{enum_type}'")]
    UnknownEnumValue { enum_type: String, value: String },

    #[error("unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("unknown link '{link}' on entity '{entity}'")]
    UnknownLink { entity: String, link: String },
}

impl Error {
    pub(crate) fn unknown_field(entity: &str, field: &str) -> Self {
        Self::UnknownField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn unknown_link(entity: &str, link: &str) -> Self {
        Self::UnknownLink {
            entity: entity.to_string(),
            link: link.to_string(),
        }
    }

    pub(crate) fn missing_dependency(entity: &str, field: &str, dependency: &str) -> Self {
        Self::MissingDependency {
            entity: entity.to_string(),
            field: field.to_string(),
            dependency: dependency.to_string(),
        }
    }

    pub(crate) fn invalid_selection(entity: &str, name: &str, reason: &'static str) -> Self {
        Self::InvalidSelection {
            entity: entity.to_string(),
            name: name.to_string(),
            reason,
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownField { .. }
            | Self::UnknownLink { .. }
            | Self::InvalidSelection { .. } => ErrorClass::Request,
            Self::BackendUnavailable(_) => ErrorClass::Unavailable,
            Self::SchemaComposition(_) | Self::Config(_) => ErrorClass::Schema,
            Self::Cancelled => ErrorClass::Cancelled,
            Self::UnknownEnumValue { .. }
            | Self::MissingDependency { .. }
            | Self::TypeMismatch { .. }
            | Self::InvalidKey { .. } => ErrorClass::Internal,
        }
    }

    /// Only backend failures are worth retrying; the engine never retries itself.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::Unavailable)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorTree
///
/// Validation messages grouped by route (entity, root, enum name).
/// Composition collects every problem before failing once.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn add_for(&mut self, route: &str, message: impl Into<String>) {
        self.children.entry(route.to_string()).or_default().add(message);
    }

    /// Merge a child tree under `route`, skipping empty trees.
    pub fn merge_for(&mut self, route: &str, tree: Self) {
        if tree.is_empty() {
            return;
        }

        let child = self.children.entry(route.to_string()).or_default();
        child.messages.extend(tree.messages);
        for (k, v) in tree.children {
            child.merge_for(&k, v);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    /// Flatten into `(route, message)` pairs, routes joined with '/'.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);

        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }
        for (route, child) in &self.children {
            let path = if prefix.is_empty() {
                route.clone()
            } else {
                format!("{prefix}/{route}")
            };
            child.flatten_into(&path, out);
        }
    }

    /// Convert into a result, `Ok` when nothing was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (route, message) in self.flatten() {
            if route.is_empty() {
                writeln!(f, "{message}")?;
            } else {
                writeln!(f, "{route}: {message}")?;
            }
        }

        Ok(())
    }
}

/// Record a formatted message into an `ErrorTree`.
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {{
        $errs.add(format!($($arg)*));
    }};
}
