use super::*;
use crate::{
    enums::EnumRegistry,
    error::Error,
    model::{EntityModel, FieldModel, LinkModel, RootLink},
    obs::{CountingSink, NoopSink},
    store::{MemoryStore, SelectSpec, StoreError},
    test_fixtures::{self, EMPIRE, HOPE},
    types::{FieldType, Id},
    value::{Record, Value},
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn ids(values: &[i64]) -> BTreeSet<Id> {
    values.iter().copied().map(Id).collect()
}

fn inputs(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

fn climate_titles(optional: bool) -> FieldModel {
    FieldModel::enum_titles("climate", "climate", "climate", optional)
}

//
// fetch_fields
//

#[test]
fn fetch_fields_is_one_call_per_batch() {
    let store = test_fixtures::store();
    let planet = test_fixtures::planet_table();

    let records = fetch_fields(&store, &planet, &ids(&[1, 2, 3]), &["name", "climate"]).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(store.calls_for("planet"), 1);
    assert_eq!(records[&Id(2)].get("name"), Some(&Value::from("Alderaan")));
    assert_eq!(
        records[&Id(1)].get("climate"),
        Some(&Value::EnumSet(BTreeSet::from([1])))
    );
    assert_eq!(records[&Id(3)].get("climate"), Some(&Value::Null));
}

#[test]
fn fetch_fields_omits_missing_ids() {
    let store = test_fixtures::store();
    let planet = test_fixtures::planet_table();

    let records = fetch_fields(&store, &planet, &ids(&[1, 99]), &["name"]).unwrap();

    assert_eq!(records.keys().copied().collect::<Vec<_>>(), [Id(1)]);
}

#[test]
fn fetch_fields_skips_empty_batches() {
    let store = test_fixtures::store();
    let planet = test_fixtures::planet_table();

    let records = fetch_fields(&store, &planet, &BTreeSet::new(), &["name"]).unwrap();

    assert!(records.is_empty());
    assert_eq!(store.call_count(), 0);
}

#[test]
fn fetch_fields_rejects_unknown_names_before_io() {
    let store = test_fixtures::store();
    let planet = test_fixtures::planet_table();

    let err = fetch_fields(&store, &planet, &ids(&[1]), &["name", "mass"]).unwrap_err();

    assert!(matches!(err, Error::UnknownField { ref field, .. } if field == "mass"));
    assert_eq!(store.call_count(), 0);
}

#[test]
fn fetch_fields_needs_a_table() {
    let store = test_fixtures::store();
    let schema = test_fixtures::schema();
    let wrapper = schema.entity("planet").unwrap();

    let err = fetch_fields(&store, wrapper, &ids(&[1]), &[]).unwrap_err();

    assert!(matches!(err, Error::InvalidSelection { .. }));
}

#[test]
fn corrupt_enum_text_is_a_backend_error() {
    let store = test_fixtures::store();
    store
        .insert(
            "planet",
            vec![Value::Int(4), Value::from("Kamino"), Value::from("[oceans")],
        )
        .unwrap();
    let planet = test_fixtures::planet_table();

    let err = fetch_fields(&store, &planet, &ids(&[4]), &["climate"]).unwrap_err();

    assert!(matches!(
        err,
        Error::BackendUnavailable(StoreError::Corrupt { .. })
    ));
}

//
// resolve_link / resolve_root
//

#[test]
fn association_link_is_one_call_and_covers_every_key() {
    let store = test_fixtures::store();
    let feature = test_fixtures::feature_table();

    let targets = resolve_link(&store, &feature, "planets", &ids(&[101, 102, 103])).unwrap();

    let LinkTargets::Many(map) = &targets else {
        panic!("association links are to-many");
    };
    assert_eq!(map[&HOPE], [Id(1), Id(2)]);
    assert_eq!(map[&EMPIRE], [Id(3)]);
    assert!(map[&Id(103)].is_empty());
    assert_eq!(targets.target_ids(), ids(&[1, 2, 3]));
    assert_eq!(store.calls_for("feature_planet"), 1);
}

#[test]
fn association_link_skips_empty_batches() {
    let store = test_fixtures::store();
    let feature = test_fixtures::feature_table();

    let targets = resolve_link(&store, &feature, "planets", &BTreeSet::new()).unwrap();

    assert!(targets.is_empty());
    assert_eq!(store.call_count(), 0);
}

#[test]
fn unknown_link_is_reported() {
    let store = test_fixtures::store();
    let feature = test_fixtures::feature_table();

    let err = resolve_link(&store, &feature, "moons", &ids(&[101])).unwrap_err();

    assert!(matches!(err, Error::UnknownLink { .. }));
}

#[test]
fn foreign_key_link_maps_keys_without_io() {
    let store = test_fixtures::store();
    let character = EntityModel::table("character", "character", "id")
        .field(FieldModel::raw("id", FieldType::INT))
        .field(FieldModel::raw("home_planet_id", FieldType::OPT_INT))
        .link(LinkModel::foreign_key("home-planet", "planet", "home_planet_id"));

    let targets = resolve_link(&store, &character, "home-planet", &ids(&[1, 3])).unwrap();

    assert_eq!(
        targets,
        LinkTargets::One(BTreeMap::from([(Id(1), Some(Id(1))), (Id(3), Some(Id(3)))]))
    );
    assert_eq!(store.call_count(), 0);
}

#[test]
fn scan_root_lists_ids_in_store_order() {
    let store = test_fixtures::store();
    let root = RootLink::scan("features", "feature", "feature", "id");

    assert_eq!(resolve_root(&store, &root).unwrap(), [HOPE, EMPIRE]);
}

#[test]
fn custom_root_reads_through_the_store() {
    fn newest_feature(store: &dyn Store) -> Result<Vec<Id>, Error> {
        let rows = store.execute(&SelectSpec::new("feature", &["id"]))?;

        Ok(rows.last().and_then(|row| row[0].as_id()).into_iter().collect())
    }

    let store = test_fixtures::store();
    let root = RootLink::custom("latest", "feature", newest_feature);

    assert_eq!(resolve_root(&store, &root).unwrap(), [EMPIRE]);
}

//
// evaluate
//

#[test]
fn enum_titles_single_value() {
    let enums = test_fixtures::enums();
    let record = inputs(&[("climate", Value::EnumSet(BTreeSet::from([1])))]);

    let value = evaluate("planet", &climate_titles(true), &record, &enums).unwrap();

    assert_eq!(value, Value::from("Arid"));
}

#[test]
fn enum_titles_absent_is_null_or_empty() {
    let enums = test_fixtures::enums();
    let record = inputs(&[("climate", Value::Null)]);

    let optional = evaluate("planet", &climate_titles(true), &record, &enums).unwrap();
    let required = evaluate("planet", &climate_titles(false), &record, &enums).unwrap();

    assert_eq!(optional, Value::Null);
    assert_eq!(required, Value::from(""));
    assert_ne!(optional, required);
}

#[test]
fn enum_titles_unknown_value() {
    let enums = test_fixtures::enums();
    let record = inputs(&[("climate", Value::EnumSet(BTreeSet::from([9])))]);

    let err = evaluate("planet", &climate_titles(true), &record, &enums).unwrap_err();

    assert!(matches!(err, Error::UnknownEnumValue { .. }));
}

#[test]
fn enum_titles_reject_text_input() {
    let enums = test_fixtures::enums();
    let record = inputs(&[("climate", Value::from("arid"))]);

    let err = evaluate("planet", &climate_titles(true), &record, &enums).unwrap_err();

    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn missing_dependency_is_reported() {
    let enums = test_fixtures::enums();
    let field = FieldModel::passthrough("name", FieldType::TEXT);

    let err = evaluate("planet", &field, &Record::new(), &enums).unwrap_err();

    assert!(matches!(err, Error::MissingDependency { ref dependency, .. } if dependency == "name"));
}

#[test]
fn declared_types_do_not_reject_resolved_values() {
    fn shout(_: &[&Value]) -> Result<Value, Error> {
        Ok(Value::from("loud"))
    }

    let enums = test_fixtures::enums();
    let record = inputs(&[("name", Value::Null)]);
    let name = FieldModel::passthrough("name", FieldType::TEXT);
    let size = FieldModel::computed("size", FieldType::INT, &["name"], shout);

    assert_eq!(evaluate("planet", &name, &record, &enums).unwrap(), Value::Null);
    assert_eq!(
        evaluate("planet", &size, &record, &enums).unwrap(),
        Value::from("loud")
    );
}

#[test]
fn computed_fields_see_dependencies_in_declared_order() {
    fn episode_label(args: &[&Value]) -> Result<Value, Error> {
        match args {
            [Value::Text(title), Value::Int(n)] => Ok(Value::from(format!("{n}: {title}"))),
            _ => Ok(Value::Null),
        }
    }

    let enums = test_fixtures::enums();
    let field = FieldModel::computed("label", FieldType::OPT_TEXT, &["title", "num"], episode_label);
    let record = inputs(&[("num", Value::Int(4)), ("title", Value::from("Hope"))]);

    let value = evaluate("feature", &field, &record, &enums).unwrap();

    assert_eq!(value, Value::from("4: Hope"));
}

// titles no longer follow discriminant order: 1 "Zonal", 2 "Temperate", 3 "Tropical"
fn reordered_climate() -> EnumRegistry {
    test_fixtures::enums()
        .retitle("climate", "arid", "Zonal")
        .unwrap()
}

proptest! {
    #[test]
    fn enum_titles_ignore_input_order(values in prop::collection::vec(1i64..=3, 1..8)) {
        let enums = reordered_climate();
        let forward: BTreeSet<i64> = values.iter().copied().collect();
        let backward: BTreeSet<i64> = values.iter().rev().copied().collect();

        let a = enum_titles(&enums, "climate", &forward).unwrap();
        let b = enum_titles(&enums, "climate", &backward).unwrap();

        let mut titles = forward
            .iter()
            .map(|v| ["Zonal", "Temperate", "Tropical"][usize::try_from(v - 1).unwrap()])
            .collect::<Vec<_>>();
        titles.sort_unstable();
        let joined = titles.join(", ");
        prop_assert_eq!(a.as_deref(), Some(joined.as_str()));
        prop_assert_eq!(a, b);
    }
}

#[test]
fn titles_join_alphabetically_not_by_stored_value() {
    let enums = reordered_climate();
    let record = inputs(&[("climate", Value::EnumSet(BTreeSet::from([1, 2])))]);

    let value = evaluate("planet", &climate_titles(true), &record, &enums).unwrap();

    assert_eq!(value, Value::from("Temperate, Zonal"));
}

#[test]
fn temperate_tropical_joined_in_title_order() {
    let enums = test_fixtures::enums();

    let joined = enum_titles(&enums, "climate", &BTreeSet::from([3, 2])).unwrap();

    assert_eq!(joined.as_deref(), Some("Temperate, Tropical"));
}

//
// load_records
//

#[test]
fn wrapper_records_come_from_one_inner_batch() {
    let store = test_fixtures::store();
    let schema = test_fixtures::schema();
    let sink = CountingSink::new();
    let ctx = ResolveContext {
        store: &store,
        enums: schema.enums(),
        sink: &sink,
    };
    let planet = schema.entity("planet").unwrap();

    let records =
        load_records(ctx, planet, &ids(&[1, 2, 3]), &BTreeSet::from(["name", "climate"])).unwrap();

    assert_eq!(store.calls_for("planet"), 1);
    assert_eq!(sink.snapshot().field_batches_for("planet"), 1);
    assert_eq!(records[&Id(1)].get("climate"), Some(&Value::from("Arid")));
    assert_eq!(records[&Id(3)].get("climate"), Some(&Value::Null));
    assert_eq!(records[&Id(2)].len(), 2);
}

#[test]
fn inner_inputs_are_forwarded_for_link_keys() {
    let store = test_fixtures::store();
    let enums = test_fixtures::enums();
    let ctx = ResolveContext {
        store: &store,
        enums: &enums,
        sink: &NoopSink,
    };
    let inner = test_fixtures::planet_table();
    let wrapper = EntityModel::wrap("planet", &inner)
        .field(FieldModel::passthrough("name", FieldType::TEXT));

    let records =
        load_records(ctx, &wrapper, &ids(&[2]), &BTreeSet::from(["name", "id"])).unwrap();

    assert_eq!(records[&Id(2)].get("id"), Some(&Value::Int(2)));
    assert_eq!(records[&Id(2)].get("name"), Some(&Value::from("Alderaan")));
}

#[test]
fn load_records_rejects_unknown_names() {
    let store = MemoryStore::new();
    let enums = test_fixtures::enums();
    let ctx = ResolveContext {
        store: &store,
        enums: &enums,
        sink: &NoopSink,
    };
    let wrapper = EntityModel::wrap("planet", &test_fixtures::planet_table());

    let err = load_records(ctx, &wrapper, &ids(&[1]), &BTreeSet::from(["mass"])).unwrap_err();

    assert!(matches!(err, Error::UnknownField { .. }));
}
