use linkgraph::{Error, prelude::*};

pub const CLIMATE: &str = "climate";
pub const TERRAIN: &str = "terrain";
pub const GENDER: &str = "gender";

pub mod climate {
    pub const ARID: i64 = 1;
    pub const TEMPERATE: i64 = 2;
    pub const TROPICAL: i64 = 3;
}

pub mod terrain {
    pub const DESERT: i64 = 1;
    pub const GRASSLANDS: i64 = 2;
    pub const MOUNTAINS: i64 = 3;
}

pub mod gender {
    pub const MALE: i64 = 1;
    pub const FEMALE: i64 = 2;
}

/// Display registry for every demo enumeration.
pub fn registry() -> Result<EnumRegistry, Error> {
    EnumRegistry::new([
        EnumDef::new(CLIMATE)
            .variant(climate::ARID, "arid", "Arid")
            .variant(climate::TEMPERATE, "temperate", "Temperate")
            .variant(climate::TROPICAL, "tropical", "Tropical"),
        EnumDef::new(TERRAIN)
            .variant(terrain::DESERT, "desert", "Desert")
            .variant(terrain::GRASSLANDS, "grasslands", "Grasslands")
            .variant(terrain::MOUNTAINS, "mountains", "Mountains"),
        EnumDef::new(GENDER)
            .variant(gender::MALE, "male", "Male")
            .variant(gender::FEMALE, "female", "Female"),
    ])
}
