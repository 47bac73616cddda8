//! Deterministic demo rows.
//!
//! Ids come from one local `IdSequence` in declaration order:
//! planets 1..=7, features 8..=9, characters 10..=16, starships 17..=19.

use crate::{
    enums::{climate, gender, terrain},
    graph::tables,
};
use chrono::NaiveDate;
use linkgraph::core::{
    store::{MemoryStore, Row, StoreError, encode_enum_set},
    types::Id,
    value::Value,
};
use std::collections::BTreeSet;

///
/// IdSequence
///

#[derive(Debug)]
pub struct IdSequence {
    next: i64,
}

impl IdSequence {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    pub const fn next_id(&mut self) -> Id {
        let id = Id(self.next);
        self.next += 1;

        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

///
/// TableRows
/// One table's layout and its rows, in insertion order.
///

#[derive(Clone, Debug)]
pub struct TableRows {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Row>,
}

impl TableRows {
    const fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            table,
            columns,
            rows: Vec::new(),
        }
    }

    fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }
}

const FEATURE_COLUMNS: &[&str] = &[
    "id",
    "title",
    "director",
    "producer",
    "episode_num",
    "release_date",
];
const PLANET_COLUMNS: &[&str] = &["id", "name", "climate", "terrain"];
const CHARACTER_COLUMNS: &[&str] = &["id", "name", "gender", "birth_year", "home_planet_id"];
const STARSHIP_COLUMNS: &[&str] = &[
    "id",
    "name",
    "model",
    "crew",
    "passengers",
    "cargo_capacity",
    "manufacturer",
    "hyperdrive_rating",
    "class",
];

// empty sets are stored as NULL
fn enum_set(values: &[i64]) -> Value {
    if values.is_empty() {
        return Value::Null;
    }
    let set: BTreeSet<i64> = values.iter().copied().collect();

    Value::from(encode_enum_set(&set))
}

fn planet(id: Id, name: &str, climate: &[i64], terrain: &[i64]) -> Row {
    vec![id.into(), name.into(), enum_set(climate), enum_set(terrain)]
}

fn feature(
    id: Id,
    title: &str,
    director: &str,
    producer: &str,
    episode: i64,
    released: (i32, u32, u32),
) -> Row {
    let (y, m, d) = released;

    vec![
        id.into(),
        title.into(),
        director.into(),
        producer.into(),
        episode.into(),
        NaiveDate::from_ymd_opt(y, m, d).into(),
    ]
}

fn character(id: Id, name: &str, gender: i64, birth_year: &str, home: Option<Id>) -> Row {
    vec![id.into(), name.into(), gender.into(), birth_year.into(), home.into()]
}

///
/// Starship
///

struct Starship<'a> {
    name: &'a str,
    model: &'a str,
    crew: i64,
    passengers: Option<i64>,
    cargo_capacity: f64,
    manufacturer: &'a str,
    hyperdrive_rating: f64,
    class: &'a str,
}

impl Starship<'_> {
    fn row(&self, id: Id) -> Row {
        vec![
            id.into(),
            self.name.into(),
            self.model.into(),
            self.crew.into(),
            self.passengers.into(),
            self.cargo_capacity.into(),
            self.manufacturer.into(),
            self.hyperdrive_rating.into(),
            self.class.into(),
        ]
    }
}

fn link(from: Id, to: Id) -> Row {
    vec![from.into(), to.into()]
}

/// Every demo table with its complete rows.
#[must_use]
pub fn fixture_rows() -> Vec<TableRows> {
    let mut seq = IdSequence::new();

    let tatooine = seq.next_id();
    let alderaan = seq.next_id();
    let yavin_iv = seq.next_id();
    let hoth = seq.next_id();
    let dagobah = seq.next_id();
    let bespin = seq.next_id();
    let ord_mantell = seq.next_id();

    let planets = TableRows::new(tables::PLANET, PLANET_COLUMNS)
        .row(planet(tatooine, "Tatooine", &[climate::ARID], &[terrain::DESERT]))
        .row(planet(
            alderaan,
            "Alderaan",
            &[climate::TEMPERATE],
            &[terrain::GRASSLANDS, terrain::MOUNTAINS],
        ))
        .row(planet(
            yavin_iv,
            "Yavin IV",
            &[climate::TEMPERATE, climate::TROPICAL],
            &[terrain::GRASSLANDS, terrain::MOUNTAINS],
        ))
        .row(planet(hoth, "Hoth", &[], &[]))
        .row(planet(dagobah, "Dagobah", &[], &[]))
        .row(planet(bespin, "Bespin", &[], &[]))
        .row(planet(ord_mantell, "Ord Mantell", &[], &[]));

    let new_hope = seq.next_id();
    let empire = seq.next_id();

    let features = TableRows::new(tables::FEATURE, FEATURE_COLUMNS)
        .row(feature(
            new_hope,
            "A New Hope",
            "George Lucas",
            "Gary Kurtz, Rick McCallum",
            4,
            (1977, 5, 25),
        ))
        .row(feature(
            empire,
            "The Empire Strikes Back",
            "Irvin Kershner",
            "Gary Kutz, Rick McCallum",
            5,
            (1980, 5, 17),
        ));

    let feature_planets = [
        (new_hope, tatooine),
        (new_hope, alderaan),
        (new_hope, yavin_iv),
        (empire, hoth),
        (empire, dagobah),
        (empire, bespin),
        (empire, ord_mantell),
    ]
    .into_iter()
    .fold(
        TableRows::new(tables::FEATURE_PLANET, &["feature_id", "planet_id"]),
        |rows, (f, p)| rows.row(link(f, p)),
    );

    let people = [
        ("Luke Skywalker", gender::MALE, "19BBY", Some(tatooine)),
        ("Darth Vader", gender::MALE, "41.9BBY", Some(tatooine)),
        ("Leia Organa", gender::FEMALE, "19BBY", Some(alderaan)),
        ("Yoda", gender::MALE, "896BBY", None),
        ("Obi-Wan Kenobi", gender::MALE, "57BBY", None),
        ("Han Solo", gender::MALE, "29BBY", None),
        ("Chewbacca", gender::MALE, "200BBY", None),
    ];
    let mut characters = TableRows::new(tables::CHARACTER, CHARACTER_COLUMNS);
    for (name, gender, birth_year, home) in people {
        characters = characters.row(character(seq.next_id(), name, gender, birth_year, home));
    }

    let ships = [
        Starship {
            name: "Millennium Falcon",
            model: "YT-1300 light freighter",
            crew: 4,
            passengers: Some(6),
            cargo_capacity: 100_000.0,
            manufacturer: "Corellian Engineering Corporation",
            hyperdrive_rating: 0.5,
            class: "Light freighter",
        },
        Starship {
            name: "Death Star",
            model: "DS-1 Orbital Battle Station",
            crew: 342_953,
            passengers: Some(843_342),
            cargo_capacity: 1_000_000_000_000.0,
            manufacturer: "Imperial Department of Military Research, Sienar Fleet Systems",
            hyperdrive_rating: 4.0,
            class: "Deep Space Mobile Battlestation",
        },
        Starship {
            name: "Star Destroyer",
            model: "Imperial I-class Star Destroyer",
            crew: 47_060,
            passengers: None,
            cargo_capacity: 36_000_000.0,
            manufacturer: "Kuat Drive Yards",
            hyperdrive_rating: 2.0,
            class: "Star Destroyer",
        },
    ];
    let mut starships = TableRows::new(tables::STARSHIP, STARSHIP_COLUMNS);
    let mut feature_starships =
        TableRows::new(tables::FEATURE_STARSHIP, &["feature_id", "starship_id"]);
    for ship in &ships {
        let id = seq.next_id();
        starships = starships.row(ship.row(id));
        feature_starships = feature_starships.row(link(new_hope, id));
    }

    vec![
        features,
        planets,
        feature_planets,
        characters,
        starships,
        feature_starships,
    ]
}

/// Create every demo table in `store` and insert the fixture rows.
pub fn seed(store: &MemoryStore) -> Result<(), StoreError> {
    for table in fixture_rows() {
        store.create_table(table.table, table.columns);
        for row in table.rows {
            store.insert(table.table, row)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkgraph::core::store::{SelectSpec, Store};

    #[test]
    fn sequence_is_local_and_monotonic() {
        let mut a = IdSequence::new();
        let mut b = IdSequence::new();

        assert_eq!(a.next_id(), Id(1));
        assert_eq!(a.next_id(), Id(2));
        assert_eq!(b.next_id(), Id(1));
    }

    #[test]
    fn fixture_rows_are_deterministic() {
        let first = fixture_rows();
        let second = fixture_rows();

        assert_eq!(first.len(), 6);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.table, b.table);
            assert_eq!(a.rows, b.rows);
            assert!(a.rows.iter().all(|row| row.len() == a.columns.len()));
        }
    }

    #[test]
    fn ids_follow_declaration_order() {
        let rows = fixture_rows();
        let first_id = |table: &str| {
            rows.iter()
                .find(|t| t.table == table)
                .and_then(|t| t.rows.first())
                .and_then(|row| row[0].as_id())
        };

        assert_eq!(first_id(tables::PLANET), Some(Id(1)));
        assert_eq!(first_id(tables::FEATURE), Some(Id(8)));
        assert_eq!(first_id(tables::CHARACTER), Some(Id(10)));
        assert_eq!(first_id(tables::STARSHIP), Some(Id(17)));
    }

    #[test]
    fn seed_fills_every_table() {
        let store = MemoryStore::new();
        seed(&store).unwrap();

        let names = store
            .execute(&SelectSpec::new(tables::CHARACTER, &["name"]))
            .unwrap();
        assert_eq!(names.len(), 7);
        assert_eq!(names[2], vec![Value::from("Leia Organa")]);

        let links = store
            .execute(&SelectSpec::new(tables::FEATURE_STARSHIP, &["starship_id"]))
            .unwrap();
        assert_eq!(links.len(), 3);
    }
}
