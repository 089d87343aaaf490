//! Backend-neutral records shared by the database and in-memory repositories.
//!
//! Handlers and the mapping layer only ever see these types; which backend a
//! record came from is invisible past the repository boundary.

/// A city and the points of interest it owns.
#[derive(Clone, Debug, PartialEq)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Populated only when the caller asked for children; empty otherwise.
    pub points_of_interest: Vec<PointOfInterest>,
}

/// A point of interest. Cannot outlive its owning city.
#[derive(Clone, Debug, PartialEq)]
pub struct PointOfInterest {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub city_id: i32,
}

pub struct SeedPointOfInterest {
    pub name: &'static str,
    pub description: &'static str,
}

pub struct SeedCity {
    pub name: &'static str,
    pub description: &'static str,
    pub points_of_interest: &'static [SeedPointOfInterest],
}

/// Fixture data. The durable store gets it once, when its city table is
/// empty; the in-memory store gets it on every process start.
pub const SAMPLE_CITIES: &[SeedCity] = &[
    SeedCity {
        name: "New York City",
        description: "The one with that big park.",
        points_of_interest: &[
            SeedPointOfInterest {
                name: "Central Park",
                description: "The most visited urban park in the United States.",
            },
            SeedPointOfInterest {
                name: "Empire State Building",
                description: "A 102-story skyscraper located in Midtown Manhattan.",
            },
        ],
    },
    SeedCity {
        name: "Antwerp",
        description: "The one with the cathedral that was never really finished.",
        points_of_interest: &[
            SeedPointOfInterest {
                name: "Cathedral of Our Lady",
                description: "A Gothic style cathedral, conceived by architects Jan and Pieter Appelmans.",
            },
            SeedPointOfInterest {
                name: "Antwerp Central Station",
                description: "The finest example of railway architecture in Belgium.",
            },
        ],
    },
    SeedCity {
        name: "Paris",
        description: "The one with that big tower.",
        points_of_interest: &[
            SeedPointOfInterest {
                name: "Eiffel Tower",
                description: "A wrought iron lattice tower on the Champ de Mars, named after engineer Gustave Eiffel.",
            },
            SeedPointOfInterest {
                name: "The Louvre",
                description: "The world's largest museum.",
            },
        ],
    },
];
