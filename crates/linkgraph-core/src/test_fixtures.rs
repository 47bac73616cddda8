//! Small two-entity graph used across unit tests.
//!
//! features: 101 "Hope", 102 "Empire"
//! planets:  1 "Tatooine" {arid}, 2 "Alderaan" {temperate}, 3 "Hoth" (no climate)
//! feature_planet: (101,1) (101,2) (102,3)

use crate::{
    enums::{EnumDef, EnumRegistry},
    model::{Association, EntityModel, FieldModel, LinkModel, RootLink},
    schema::{Schema, compose_schema},
    store::{MemoryStore, encode_enum_set},
    types::{FieldType, Id},
    value::Value,
};
use std::{collections::BTreeSet, sync::Arc};

pub(crate) const HOPE: Id = Id(101);
pub(crate) const EMPIRE: Id = Id(102);

pub(crate) fn enums() -> EnumRegistry {
    EnumRegistry::new([EnumDef::new("climate")
        .variant(1, "arid", "Arid")
        .variant(2, "temperate", "Temperate")
        .variant(3, "tropical", "Tropical")])
    .unwrap()
}

pub(crate) fn feature_planet() -> Association {
    Association::new("feature_planet", "feature_id", "planet_id")
}

pub(crate) fn planet_table() -> Arc<EntityModel> {
    Arc::new(
        EntityModel::table("planet", "planet", "id")
            .field(FieldModel::raw("id", FieldType::INT))
            .field(FieldModel::raw("name", FieldType::TEXT))
            .field(FieldModel::raw_enum_set("climate", true)),
    )
}

pub(crate) fn feature_table() -> Arc<EntityModel> {
    Arc::new(
        EntityModel::table("feature", "feature", "id")
            .field(FieldModel::raw("id", FieldType::INT))
            .field(FieldModel::raw("title", FieldType::TEXT))
            .link(LinkModel::association("planets", "planet", feature_planet())),
    )
}

pub(crate) fn schema() -> Schema {
    let planet = EntityModel::wrap("planet", &planet_table())
        .field(FieldModel::passthrough("id", FieldType::INT))
        .field(FieldModel::passthrough("name", FieldType::TEXT))
        .field(FieldModel::enum_titles("climate", "climate", "climate", true))
        .link(LinkModel::association(
            "features",
            "feature",
            feature_planet().reversed(),
        ));
    let feature = EntityModel::wrap("feature", &feature_table())
        .field(FieldModel::passthrough("id", FieldType::INT))
        .field(FieldModel::passthrough("title", FieldType::TEXT))
        .link(LinkModel::association("planets", "planet", feature_planet()));

    compose_schema(
        [planet, feature],
        [
            RootLink::scan("features", "feature", "feature", "id"),
            RootLink::scan("planets", "planet", "planet", "id"),
        ],
        enums(),
    )
    .unwrap()
}

pub(crate) fn store() -> MemoryStore {
    let store = MemoryStore::new();
    store.create_table("feature", &["id", "title"]);
    store.create_table("planet", &["id", "name", "climate"]);
    store.create_table("feature_planet", &["feature_id", "planet_id"]);

    for (id, title) in [(HOPE, "Hope"), (EMPIRE, "Empire")] {
        store
            .insert("feature", vec![id.into(), Value::from(title)])
            .unwrap();
    }

    let planets = [
        (1, "Tatooine", Some(BTreeSet::from([1]))),
        (2, "Alderaan", Some(BTreeSet::from([2]))),
        (3, "Hoth", None),
    ];
    for (id, name, climate) in planets {
        let climate = climate.as_ref().map(encode_enum_set);
        store
            .insert("planet", vec![Value::Int(id), Value::from(name), Value::from(climate)])
            .unwrap();
    }

    for (feature, planet) in [(HOPE, 1), (HOPE, 2), (EMPIRE, 3)] {
        store
            .insert("feature_planet", vec![feature.into(), Value::Int(planet)])
            .unwrap();
    }

    store
}
