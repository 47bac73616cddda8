use crate::{
    MAX_NAME_LEN,
    enums::EnumRegistry,
    err,
    error::ErrorTree,
    model::{EntityModel, EntitySource, FieldKind, LinkStrategy, RootLink, RootStrategy},
    types::Cardinality,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Visit
/// DFS colouring for dependency cycle detection.
///

#[derive(Clone, Copy, Eq, PartialEq)]
enum Visit {
    InProgress,
    Done,
}

// validate_schema
pub(super) fn validate_schema(
    entities: &[EntityModel],
    roots: &[RootLink],
    enums: &EnumRegistry,
) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    // Phase 1: names must be unique across the schema.
    let mut names = BTreeSet::new();
    for entity in entities {
        if !names.insert(entity.name()) {
            err!(errs, "entity '{}' is declared twice", entity.name());
        }
    }

    // Phase 2: per-entity structure, links resolved against the name set.
    for entity in entities {
        let mut route = ErrorTree::new();
        validate_entity(entity, enums, &mut route);
        validate_links(entity, &names, &mut route);
        errs.merge_for(entity.name(), route);
    }

    // Phase 3: entry points.
    let mut root_names = BTreeSet::new();
    for root in roots {
        let mut route = ErrorTree::new();
        if let Err(msg) = validate_name(root.name()) {
            route.add(msg);
        }
        if !root_names.insert(root.name()) {
            err!(route, "root link is declared twice");
        }
        if !names.contains(root.target()) {
            err!(route, "target entity '{}' does not exist", root.target());
        }
        if let RootStrategy::Scan { table, column } = root.strategy()
            && (table.is_empty() || column.is_empty())
        {
            err!(route, "scan needs both a table and a column");
        }
        errs.merge_for(&format!("root:{}", root.name()), route);
    }

    errs.result()
}

/// Ensure identifiers are non-empty, ASCII, and within the maximum length.
pub(super) fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is empty".to_string());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("name '{name}' exceeds max length {MAX_NAME_LEN}"));
    }
    if !name.is_ascii() {
        return Err(format!("name '{name}' must be ASCII"));
    }

    Ok(())
}

// Validate fields of one entity (and, recursively, the entity it embeds).
fn validate_entity(entity: &EntityModel, enums: &EnumRegistry, errs: &mut ErrorTree) {
    if let Err(msg) = validate_name(entity.name()) {
        errs.add(msg);
    }

    // fields and links share one namespace
    let mut seen = BTreeSet::new();
    let names = entity
        .fields()
        .iter()
        .map(|f| f.name())
        .chain(entity.links().iter().map(|l| l.name()));
    for name in names {
        if let Err(msg) = validate_name(name) {
            errs.add(msg);
        }
        if !seen.insert(name) {
            err!(errs, "duplicate field or link name '{name}'");
        }
    }

    for field in entity.fields() {
        if let FieldKind::EnumTitles { enum_type, .. } = field.kind()
            && !enums.contains(enum_type)
        {
            err!(errs, "field '{}' uses unknown enum '{enum_type}'", field.name());
        }
    }

    match entity.source() {
        EntitySource::Table(binding) => {
            if binding.table.is_empty() || binding.key_column.is_empty() {
                err!(errs, "table binding needs both a table and a key column");
            }
            for field in entity.fields() {
                for dep in field.dependencies() {
                    if entity.get_field(dep).is_none() {
                        err!(
                            errs,
                            "field '{}' depends on unknown field '{dep}'",
                            field.name()
                        );
                    }
                }
            }
            validate_acyclic(entity, errs);
        }
        EntitySource::Embedded(inner) => {
            for field in entity.fields() {
                if field.is_raw() {
                    err!(
                        errs,
                        "raw field '{}' is not allowed on an embedding entity",
                        field.name()
                    );
                }
                for dep in field.dependencies() {
                    if !inner.has_input(dep) {
                        err!(
                            errs,
                            "field '{}' depends on '{dep}', which embedded entity '{}' does not provide",
                            field.name(),
                            inner.name()
                        );
                    }
                }
            }

            let mut route = ErrorTree::new();
            validate_entity(inner, enums, &mut route);
            errs.merge_for(&format!("embedded:{}", inner.name()), route);
        }
    }
}

// Validate link targets, required inputs, and strategy/cardinality agreement.
fn validate_links(entity: &EntityModel, entity_names: &BTreeSet<&str>, errs: &mut ErrorTree) {
    for link in entity.links() {
        if !entity_names.contains(link.target()) {
            err!(
                errs,
                "link '{}' targets unknown entity '{}'",
                link.name(),
                link.target()
            );
        }
        if !entity.has_input(link.required_field()) {
            err!(
                errs,
                "link '{}' requires unknown field '{}'",
                link.name(),
                link.required_field()
            );
        }

        let expected = match link.strategy() {
            LinkStrategy::Association(_) => Cardinality::Many,
            LinkStrategy::ForeignKey => Cardinality::One,
        };
        if link.cardinality() != expected {
            err!(
                errs,
                "link '{}' has cardinality {} but its strategy resolves {expected}",
                link.name(),
                link.cardinality()
            );
        }
    }
}

// Reject dependency cycles between fields of one storage entity.
fn validate_acyclic(entity: &EntityModel, errs: &mut ErrorTree) {
    let mut state = BTreeMap::new();
    for field in entity.fields() {
        if visit(entity, field.name(), &mut state) {
            err!(errs, "field '{}' has a cyclic dependency", field.name());
        }
    }
}

// Returns true if a cycle is reachable from `name` that was not reported yet.
fn visit<'a>(entity: &'a EntityModel, name: &'a str, state: &mut BTreeMap<&'a str, Visit>) -> bool {
    match state.get(name) {
        Some(Visit::Done) => return false,
        Some(Visit::InProgress) => return true,
        None => {}
    }
    let Some(field) = entity.get_field(name) else {
        return false;
    };

    state.insert(name, Visit::InProgress);
    let mut cyclic = false;
    for dep in field.dependencies() {
        cyclic |= visit(entity, dep, state);
    }
    state.insert(name, Visit::Done);

    cyclic
}
