use crate::{
    error::Error,
    store::ColumnCodec,
    types::{FieldType, ScalarKind},
    value::Value,
};
use std::{fmt, slice};

///
/// ComputeFn
///
/// Pure derivation over dependency values, passed in declaration order.
///

pub type ComputeFn = fn(&[&Value]) -> Result<Value, Error>;

///
/// FieldKind
///

#[derive(Clone)]
pub enum FieldKind {
    /// Fetched verbatim from a store column.
    Raw { column: String, codec: ColumnCodec },

    /// Derived from other fields of the same record.
    Computed {
        dependencies: Vec<String>,
        compute: ComputeFn,
    },

    /// Enum set (or single enum value) rendered as sorted, joined titles.
    EnumTitles {
        dependency: String,
        enum_type: String,
    },
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw { column, codec } => f
                .debug_struct("Raw")
                .field("column", column)
                .field("codec", codec)
                .finish(),
            Self::Computed { dependencies, .. } => f
                .debug_struct("Computed")
                .field("dependencies", dependencies)
                .finish_non_exhaustive(),
            Self::EnumTitles {
                dependency,
                enum_type,
            } => f
                .debug_struct("EnumTitles")
                .field("dependency", dependency)
                .field("enum_type", enum_type)
                .finish(),
        }
    }
}

///
/// FieldModel
///

#[derive(Clone, Debug)]
pub struct FieldModel {
    name: String,
    ty: FieldType,
    kind: FieldKind,
}

impl FieldModel {
    /// Raw field stored in a column of the same name.
    #[must_use]
    pub fn raw(name: &str, ty: FieldType) -> Self {
        Self::raw_column(name, name, ty)
    }

    #[must_use]
    pub fn raw_column(name: &str, column: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            kind: FieldKind::Raw {
                column: column.to_string(),
                codec: ColumnCodec::Plain,
            },
        }
    }

    /// Raw enum-set column stored as JSON text.
    #[must_use]
    pub fn raw_enum_set(name: &str, optional: bool) -> Self {
        let ty = FieldType {
            kind: ScalarKind::EnumSet,
            optional,
        };

        Self::raw(name, ty).with_codec(ColumnCodec::JsonEnumSet)
    }

    /// Replace the codec of a raw field; no effect on derived fields.
    #[must_use]
    pub fn with_codec(mut self, codec: ColumnCodec) -> Self {
        if let FieldKind::Raw { codec: c, .. } = &mut self.kind {
            *c = codec;
        }
        self
    }

    #[must_use]
    pub fn computed(name: &str, ty: FieldType, dependencies: &[&str], compute: ComputeFn) -> Self {
        Self {
            name: name.to_string(),
            ty,
            kind: FieldKind::Computed {
                dependencies: dependencies.iter().map(ToString::to_string).collect(),
                compute,
            },
        }
    }

    /// Re-expose the dependency `source` unchanged under `name`.
    #[must_use]
    pub fn alias(name: &str, source: &str, ty: FieldType) -> Self {
        Self::computed(name, ty, &[source], identity)
    }

    /// Re-expose the same-named dependency unchanged.
    #[must_use]
    pub fn passthrough(name: &str, ty: FieldType) -> Self {
        Self::alias(name, name, ty)
    }

    #[must_use]
    pub fn enum_titles(name: &str, dependency: &str, enum_type: &str, optional: bool) -> Self {
        let ty = FieldType {
            kind: ScalarKind::Text,
            optional,
        };

        Self {
            name: name.to_string(),
            ty,
            kind: FieldKind::EnumTitles {
                dependency: dependency.to_string(),
                enum_type: enum_type.to_string(),
            },
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> FieldType {
        self.ty
    }

    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self.kind, FieldKind::Raw { .. })
    }

    /// Names this field is derived from; empty for raw fields.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        match &self.kind {
            FieldKind::Raw { .. } => &[],
            FieldKind::Computed { dependencies, .. } => dependencies,
            FieldKind::EnumTitles { dependency, .. } => slice::from_ref(dependency),
        }
    }
}

// identity
fn identity(values: &[&Value]) -> Result<Value, Error> {
    Ok(values.first().map_or(Value::Null, |v| (*v).clone()))
}
