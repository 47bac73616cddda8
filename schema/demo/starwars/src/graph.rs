//! Storage-facing and display graphs over the demo tables.
//!
//! The storage graph exposes raw columns one-to-one. The display graph wraps
//! each storage entity, renames columns for presentation, and turns enum
//! discriminants into their titles.

use crate::enums::{self, CLIMATE, GENDER, TERRAIN};
use linkgraph::{Error, prelude::*};
use std::sync::Arc;

pub mod tables {
    pub const FEATURE: &str = "feature";
    pub const PLANET: &str = "planet";
    pub const CHARACTER: &str = "character";
    pub const STARSHIP: &str = "starship";
    pub const FEATURE_PLANET: &str = "feature_planet";
    pub const FEATURE_STARSHIP: &str = "feature_starship";
}

const DATE: FieldType = FieldType::optional(ScalarKind::Date);
const FLOAT: FieldType = FieldType::optional(ScalarKind::Float);

fn feature_planet() -> Association {
    Association::new(tables::FEATURE_PLANET, "feature_id", "planet_id")
}

fn feature_starship() -> Association {
    Association::new(tables::FEATURE_STARSHIP, "feature_id", "starship_id")
}

///
/// StorageGraph
///

pub struct StorageGraph {
    pub feature: Arc<EntityModel>,
    pub planet: Arc<EntityModel>,
    pub character: Arc<EntityModel>,
    pub starship: Arc<EntityModel>,
}

impl StorageGraph {
    #[must_use]
    pub fn new() -> Self {
        let feature = EntityModel::table("feature", tables::FEATURE, "id")
            .field(FieldModel::raw("id", FieldType::INT))
            .field(FieldModel::raw("title", FieldType::TEXT))
            .field(FieldModel::raw("director", FieldType::OPT_TEXT))
            .field(FieldModel::raw("producer", FieldType::OPT_TEXT))
            .field(FieldModel::raw("episode_num", FieldType::OPT_INT))
            .field(FieldModel::raw("release_date", DATE))
            .link(LinkModel::association("planets", "planet", feature_planet()))
            .link(LinkModel::association("starships", "starship", feature_starship()));

        let planet = EntityModel::table("planet", tables::PLANET, "id")
            .field(FieldModel::raw("id", FieldType::INT))
            .field(FieldModel::raw("name", FieldType::TEXT))
            .field(FieldModel::raw_enum_set("climate", true))
            .field(FieldModel::raw_enum_set("terrain", true))
            .link(LinkModel::association(
                "features",
                "feature",
                feature_planet().reversed(),
            ));

        let character = EntityModel::table("character", tables::CHARACTER, "id")
            .field(FieldModel::raw("id", FieldType::INT))
            .field(FieldModel::raw("name", FieldType::TEXT))
            .field(FieldModel::raw("gender", FieldType::OPT_INT))
            .field(FieldModel::raw("birth_year", FieldType::OPT_TEXT))
            .field(FieldModel::raw("home_planet_id", FieldType::OPT_INT))
            .link(LinkModel::foreign_key("home_planet", "planet", "home_planet_id"));

        let starship = EntityModel::table("starship", tables::STARSHIP, "id")
            .field(FieldModel::raw("id", FieldType::INT))
            .field(FieldModel::raw("name", FieldType::TEXT))
            .field(FieldModel::raw("model", FieldType::OPT_TEXT))
            .field(FieldModel::raw("crew", FieldType::OPT_INT))
            .field(FieldModel::raw("passengers", FieldType::OPT_INT))
            .field(FieldModel::raw("cargo_capacity", FLOAT))
            .field(FieldModel::raw("manufacturer", FieldType::OPT_TEXT))
            .field(FieldModel::raw("hyperdrive_rating", FLOAT))
            .field(FieldModel::raw_column("class_", "class", FieldType::OPT_TEXT))
            .link(LinkModel::association(
                "features",
                "feature",
                feature_starship().reversed(),
            ));

        Self {
            feature: Arc::new(feature),
            planet: Arc::new(planet),
            character: Arc::new(character),
            starship: Arc::new(starship),
        }
    }

    fn entities(&self) -> Vec<EntityModel> {
        [&self.feature, &self.planet, &self.character, &self.starship]
            .into_iter()
            .map(|e| EntityModel::clone(e))
            .collect()
    }
}

impl Default for StorageGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn roots() -> [RootLink; 4] {
    [
        RootLink::scan("planets", "planet", tables::PLANET, "id"),
        RootLink::scan("features", "feature", tables::FEATURE, "id"),
        RootLink::scan("characters", "character", tables::CHARACTER, "id"),
        RootLink::scan("starships", "starship", tables::STARSHIP, "id"),
    ]
}

/// Raw graph: every column as stored, enum sets still as discriminants.
pub fn storage_schema() -> Result<Schema, Error> {
    compose_schema(StorageGraph::new().entities(), roots(), enums::registry()?)
}

/// Presentation graph layered over the storage graph.
pub fn display_schema() -> Result<Schema, Error> {
    let storage = StorageGraph::new();

    let feature = EntityModel::wrap("feature", &storage.feature)
        .field(FieldModel::passthrough("id", FieldType::INT))
        .field(FieldModel::passthrough("title", FieldType::TEXT))
        .field(FieldModel::passthrough("director", FieldType::OPT_TEXT))
        .field(FieldModel::passthrough("producer", FieldType::OPT_TEXT))
        .field(FieldModel::alias("episode-num", "episode_num", FieldType::OPT_INT))
        .field(FieldModel::alias("release-date", "release_date", DATE))
        .link(LinkModel::association("planets", "planet", feature_planet()))
        .link(LinkModel::association("starships", "starship", feature_starship()));

    let planet = EntityModel::wrap("planet", &storage.planet)
        .field(FieldModel::passthrough("id", FieldType::INT))
        .field(FieldModel::passthrough("name", FieldType::TEXT))
        .field(FieldModel::enum_titles("climate", "climate", CLIMATE, true))
        .field(FieldModel::enum_titles("terrain", "terrain", TERRAIN, true))
        .link(LinkModel::association(
            "features",
            "feature",
            feature_planet().reversed(),
        ));

    let character = EntityModel::wrap("character", &storage.character)
        .field(FieldModel::passthrough("id", FieldType::INT))
        .field(FieldModel::passthrough("name", FieldType::TEXT))
        .field(FieldModel::enum_titles("gender", "gender", GENDER, true))
        .field(FieldModel::alias("birth-year", "birth_year", FieldType::OPT_TEXT))
        .link(LinkModel::foreign_key("home-planet", "planet", "home_planet_id"));

    let starship = EntityModel::wrap("starship", &storage.starship)
        .field(FieldModel::passthrough("id", FieldType::INT))
        .field(FieldModel::passthrough("name", FieldType::TEXT))
        .field(FieldModel::passthrough("model", FieldType::OPT_TEXT))
        .field(FieldModel::passthrough("crew", FieldType::OPT_INT))
        .field(FieldModel::passthrough("passengers", FieldType::OPT_INT))
        .field(FieldModel::alias("cargo-capacity", "cargo_capacity", FLOAT))
        .field(FieldModel::passthrough("manufacturer", FieldType::OPT_TEXT))
        .field(FieldModel::alias("hyperdrive-rating", "hyperdrive_rating", FLOAT))
        .field(FieldModel::alias("class", "class_", FieldType::OPT_TEXT))
        .link(LinkModel::association(
            "features",
            "feature",
            feature_starship().reversed(),
        ));

    compose_schema(
        [feature, planet, character, starship],
        roots(),
        enums::registry()?,
    )
}

/// Index page: every feature with its planets and their climates.
#[must_use]
pub fn index_request() -> Request {
    Request::new().root(
        "features",
        Selection::new().fields(&["title", "episode-num"]).link(
            "planets",
            Selection::new().fields(&["name", "climate"]),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_graphs_compose() {
        let storage = storage_schema().unwrap();
        let display = display_schema().unwrap();

        assert_eq!(storage.roots().count(), 4);
        assert_eq!(display.entities().count(), 4);
        assert!(display.entity("planet").unwrap().inner().is_some());
        assert!(storage.entity("planet").unwrap().inner().is_none());
    }

    #[test]
    fn display_links_mirror_storage_links() {
        let display = display_schema().unwrap();
        let character = display.entity("character").unwrap();
        let home = character.get_link("home-planet").unwrap();

        assert_eq!(home.cardinality(), Cardinality::One);
        assert_eq!(home.required_field(), "home_planet_id");
    }
}
