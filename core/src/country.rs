//! Country identifiers and their fixed historical attributes.
//!
//! `Country` is a key, not an entity: assignment to a player is unique per
//! session and immutable once made. The 1946 seed constants and the rivalry
//! pairs live here because they are properties of the countries themselves,
//! not of any one session.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Country {
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "USSR")]
    Ussr,
    France,
    China,
    India,
    Argentina,
}

impl Country {
    pub const ALL: [Country; 7] = [
        Country::Usa,
        Country::Uk,
        Country::Ussr,
        Country::France,
        Country::China,
        Country::India,
        Country::Argentina,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::Uk => "UK",
            Country::Ussr => "USSR",
            Country::France => "France",
            Country::China => "China",
            Country::India => "India",
            Country::Argentina => "Argentina",
        }
    }

    /// Historical unemployment rate entering 1946, in percent.
    pub fn initial_unemployment(self) -> f64 {
        match self {
            Country::Usa => 3.9,
            Country::Uk => 2.5,
            Country::Ussr => 0.0,
            Country::France => 4.5,
            Country::China => 6.0,
            Country::India => 7.0,
            Country::Argentina => 5.0,
        }
    }

    /// Historical inflation rate entering 1946, in percent.
    pub fn initial_inflation(self) -> f64 {
        match self {
            Country::Usa => 8.3,
            Country::Uk => 3.1,
            Country::Ussr => 0.0,
            Country::France => 50.0,
            Country::China => 300.0,
            Country::India => 20.0,
            Country::Argentina => 20.0,
        }
    }

    /// Fixed strategic rivalries: USA↔USSR, UK↔USSR, USSR↔France.
    /// Symmetric by definition.
    pub fn is_rival_of(self, other: Country) -> bool {
        matches!(
            (self, other),
            (Country::Usa, Country::Ussr)
                | (Country::Ussr, Country::Usa)
                | (Country::Uk, Country::Ussr)
                | (Country::Ussr, Country::Uk)
                | (Country::Ussr, Country::France)
                | (Country::France, Country::Ussr)
        )
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
