//! Enum display registry.
//!
//! Maps stored enumeration values to a stable identifier and a display title.
//! Titles are the only locale-dependent data; swapping them never changes
//! how values are resolved.

use crate::{
    err,
    error::{Error, ErrorTree},
};
use std::collections::BTreeMap;

///
/// EnumEntry
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumEntry {
    pub value: i64,
    pub ident: String,
    pub title: String,
}

///
/// EnumDef
/// Static declaration of one enumeration.
///

#[derive(Clone, Debug)]
pub struct EnumDef {
    name: String,
    entries: Vec<EnumEntry>,
}

impl EnumDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn variant(mut self, value: i64, ident: &str, title: &str) -> Self {
        self.entries.push(EnumEntry {
            value,
            ident: ident.to_string(),
            title: title.to_string(),
        });
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

///
/// EnumRegistry
///

#[derive(Clone, Debug, Default)]
pub struct EnumRegistry {
    enums: BTreeMap<String, BTreeMap<i64, EnumEntry>>,
}

impl EnumRegistry {
    /// Build a registry from static declarations.
    /// Duplicate enum names, stored values, or identifiers fail composition.
    pub fn new(defs: impl IntoIterator<Item = EnumDef>) -> Result<Self, Error> {
        let mut errs = ErrorTree::new();
        let mut enums = BTreeMap::new();

        for def in defs {
            if enums.contains_key(&def.name) {
                err!(errs, "enum '{}' is registered twice", def.name);
                continue;
            }

            let mut route = ErrorTree::new();
            let mut entries = BTreeMap::new();
            for entry in def.entries {
                if entries.values().any(|e: &EnumEntry| e.ident == entry.ident) {
                    err!(route, "duplicate identifier '{}'", entry.ident);
                }
                if entries.contains_key(&entry.value) {
                    err!(route, "duplicate stored value {}", entry.value);
                    continue;
                }
                entries.insert(entry.value, entry);
            }

            errs.merge_for(&def.name, route);
            enums.insert(def.name, entries);
        }

        errs.result().map_err(Error::SchemaComposition)?;

        Ok(Self { enums })
    }

    #[must_use]
    pub fn contains(&self, enum_type: &str) -> bool {
        self.enums.contains_key(enum_type)
    }

    pub fn entry(&self, enum_type: &str, value: i64) -> Result<&EnumEntry, Error> {
        self.enums
            .get(enum_type)
            .and_then(|entries| entries.get(&value))
            .ok_or_else(|| Error::UnknownEnumValue {
                enum_type: enum_type.to_string(),
                value: value.to_string(),
            })
    }

    pub fn title_of(&self, enum_type: &str, value: i64) -> Result<&str, Error> {
        self.entry(enum_type, value).map(|e| e.title.as_str())
    }

    pub fn ident_of(&self, enum_type: &str, value: i64) -> Result<&str, Error> {
        self.entry(enum_type, value).map(|e| e.ident.as_str())
    }

    /// Replace the display title of the entry identified by `ident`.
    pub fn retitle(mut self, enum_type: &str, ident: &str, title: &str) -> Result<Self, Error> {
        let entry = self
            .enums
            .get_mut(enum_type)
            .and_then(|entries| entries.values_mut().find(|e| e.ident == ident))
            .ok_or_else(|| Error::UnknownEnumValue {
                enum_type: enum_type.to_string(),
                value: ident.to_string(),
            })?;
        entry.title = title.to_string();

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate() -> EnumDef {
        EnumDef::new("climate")
            .variant(1, "arid", "Arid")
            .variant(2, "temperate", "Temperate")
            .variant(3, "tropical", "Tropical")
    }

    #[test]
    fn title_and_ident_lookup() {
        let enums = EnumRegistry::new([climate()]).unwrap();

        assert_eq!(enums.title_of("climate", 1).unwrap(), "Arid");
        assert_eq!(enums.ident_of("climate", 3).unwrap(), "tropical");
    }

    #[test]
    fn unknown_value_is_an_error() {
        let enums = EnumRegistry::new([climate()]).unwrap();

        let err = enums.title_of("climate", 9).unwrap_err();
        assert!(matches!(err, Error::UnknownEnumValue { .. }));

        let err = enums.title_of("terrain", 1).unwrap_err();
        assert!(matches!(err, Error::UnknownEnumValue { .. }));
    }

    #[test]
    fn retitle_swaps_only_the_title() {
        let enums = EnumRegistry::new([climate()])
            .unwrap()
            .retitle("climate", "arid", "Aride")
            .unwrap();

        assert_eq!(enums.title_of("climate", 1).unwrap(), "Aride");
        assert_eq!(enums.ident_of("climate", 1).unwrap(), "arid");
    }

    #[test]
    fn retitle_unknown_ident_fails() {
        let err = EnumRegistry::new([climate()])
            .unwrap()
            .retitle("climate", "frozen", "Frozen")
            .unwrap_err();

        assert!(matches!(err, Error::UnknownEnumValue { .. }));
    }

    #[test]
    fn duplicates_fail_composition() {
        let dup_value = EnumDef::new("gender")
            .variant(1, "male", "Male")
            .variant(1, "female", "Female");

        let err = EnumRegistry::new([climate(), climate(), dup_value]).unwrap_err();
        let Error::SchemaComposition(tree) = err else {
            panic!("expected composition error");
        };

        let routes: Vec<_> = tree.flatten().into_iter().map(|(r, _)| r).collect();
        assert_eq!(routes, vec![String::new(), "gender".to_string()]);
    }
}
