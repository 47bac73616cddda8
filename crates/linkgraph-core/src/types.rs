use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Id
/// Identifier of one stored record; every batch is keyed by a set of these.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(pub i64);

impl Id {
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Cardinality {
    One,
    Many,
}

///
/// ScalarKind
/// Declared result shape of a field. `Any` opts out of result checking.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ScalarKind {
    Any,
    Bool,
    Date,
    EnumSet,
    Float,
    Int,
    Text,
}

///
/// FieldType
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FieldType {
    pub kind: ScalarKind,
    pub optional: bool,
}

impl FieldType {
    pub const INT: Self = Self::required(ScalarKind::Int);
    pub const TEXT: Self = Self::required(ScalarKind::Text);
    pub const OPT_INT: Self = Self::optional(ScalarKind::Int);
    pub const OPT_TEXT: Self = Self::optional(ScalarKind::Text);

    #[must_use]
    pub const fn required(kind: ScalarKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    #[must_use]
    pub const fn optional(kind: ScalarKind) -> Self {
        Self {
            kind,
            optional: true,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "Optional[{}]", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_types_display_wrapped() {
        assert_eq!(FieldType::OPT_INT.to_string(), "Optional[Int]");
        assert_eq!(FieldType::TEXT.to_string(), "Text");
        assert!(FieldType::optional(ScalarKind::Date).optional);
    }
}
