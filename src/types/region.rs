//! The closed set of geographies that take part in reconciliation: the fifty states,
//! the District of Columbia and the national aggregate.
//!
//! EIA labels the same area in several ways depending on the dataset ("USA-AL",
//! "ALABAMA", "U.S."), so every name coming from the API goes through [`normalize`]
//! before it becomes a table column.

use std::fmt;
use std::str::FromStr;

/// A geography reported by the EIA consumption dataset.
///
/// The declaration order of the state variants is the canonical reconciliation order
/// (alphabetical by name, the District of Columbia included). [`Region::UnitedStates`]
/// is the national total and comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Alabama,
    Alaska,
    Arizona,
    Arkansas,
    California,
    Colorado,
    Connecticut,
    Delaware,
    DistrictOfColumbia,
    Florida,
    Georgia,
    Hawaii,
    Idaho,
    Illinois,
    Indiana,
    Iowa,
    Kansas,
    Kentucky,
    Louisiana,
    Maine,
    Maryland,
    Massachusetts,
    Michigan,
    Minnesota,
    Mississippi,
    Missouri,
    Montana,
    Nebraska,
    Nevada,
    NewHampshire,
    NewJersey,
    NewMexico,
    NewYork,
    NorthCarolina,
    NorthDakota,
    Ohio,
    Oklahoma,
    Oregon,
    Pennsylvania,
    RhodeIsland,
    SouthCarolina,
    SouthDakota,
    Tennessee,
    Texas,
    Utah,
    Vermont,
    Virginia,
    Washington,
    WestVirginia,
    Wisconsin,
    Wyoming,
    UnitedStates,
}

/// Number of state-level regions (fifty states plus the District of Columbia).
pub const STATE_COUNT: usize = 51;

/// The fifty states and the District of Columbia in canonical order.
pub const STATES: [Region; STATE_COUNT] = [
    Region::Alabama,
    Region::Alaska,
    Region::Arizona,
    Region::Arkansas,
    Region::California,
    Region::Colorado,
    Region::Connecticut,
    Region::Delaware,
    Region::DistrictOfColumbia,
    Region::Florida,
    Region::Georgia,
    Region::Hawaii,
    Region::Idaho,
    Region::Illinois,
    Region::Indiana,
    Region::Iowa,
    Region::Kansas,
    Region::Kentucky,
    Region::Louisiana,
    Region::Maine,
    Region::Maryland,
    Region::Massachusetts,
    Region::Michigan,
    Region::Minnesota,
    Region::Mississippi,
    Region::Missouri,
    Region::Montana,
    Region::Nebraska,
    Region::Nevada,
    Region::NewHampshire,
    Region::NewJersey,
    Region::NewMexico,
    Region::NewYork,
    Region::NorthCarolina,
    Region::NorthDakota,
    Region::Ohio,
    Region::Oklahoma,
    Region::Oregon,
    Region::Pennsylvania,
    Region::RhodeIsland,
    Region::SouthCarolina,
    Region::SouthDakota,
    Region::Tennessee,
    Region::Texas,
    Region::Utah,
    Region::Vermont,
    Region::Virginia,
    Region::Washington,
    Region::WestVirginia,
    Region::Wisconsin,
    Region::Wyoming,
];

impl Region {
    /// Canonical label, used as the column name of a state table.
    pub fn name(self) -> &'static str {
        match self {
            Region::Alabama => "Alabama",
            Region::Alaska => "Alaska",
            Region::Arizona => "Arizona",
            Region::Arkansas => "Arkansas",
            Region::California => "California",
            Region::Colorado => "Colorado",
            Region::Connecticut => "Connecticut",
            Region::Delaware => "Delaware",
            Region::DistrictOfColumbia => "District of Columbia",
            Region::Florida => "Florida",
            Region::Georgia => "Georgia",
            Region::Hawaii => "Hawaii",
            Region::Idaho => "Idaho",
            Region::Illinois => "Illinois",
            Region::Indiana => "Indiana",
            Region::Iowa => "Iowa",
            Region::Kansas => "Kansas",
            Region::Kentucky => "Kentucky",
            Region::Louisiana => "Louisiana",
            Region::Maine => "Maine",
            Region::Maryland => "Maryland",
            Region::Massachusetts => "Massachusetts",
            Region::Michigan => "Michigan",
            Region::Minnesota => "Minnesota",
            Region::Mississippi => "Mississippi",
            Region::Missouri => "Missouri",
            Region::Montana => "Montana",
            Region::Nebraska => "Nebraska",
            Region::Nevada => "Nevada",
            Region::NewHampshire => "New Hampshire",
            Region::NewJersey => "New Jersey",
            Region::NewMexico => "New Mexico",
            Region::NewYork => "New York",
            Region::NorthCarolina => "North Carolina",
            Region::NorthDakota => "North Dakota",
            Region::Ohio => "Ohio",
            Region::Oklahoma => "Oklahoma",
            Region::Oregon => "Oregon",
            Region::Pennsylvania => "Pennsylvania",
            Region::RhodeIsland => "Rhode Island",
            Region::SouthCarolina => "South Carolina",
            Region::SouthDakota => "South Dakota",
            Region::Tennessee => "Tennessee",
            Region::Texas => "Texas",
            Region::Utah => "Utah",
            Region::Vermont => "Vermont",
            Region::Virginia => "Virginia",
            Region::Washington => "Washington",
            Region::WestVirginia => "West Virginia",
            Region::Wisconsin => "Wisconsin",
            Region::Wyoming => "Wyoming",
            Region::UnitedStates => "United States",
        }
    }

    /// Two-letter postal code ("US" for the national total).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Region::Alabama => "AL",
            Region::Alaska => "AK",
            Region::Arizona => "AZ",
            Region::Arkansas => "AR",
            Region::California => "CA",
            Region::Colorado => "CO",
            Region::Connecticut => "CT",
            Region::Delaware => "DE",
            Region::DistrictOfColumbia => "DC",
            Region::Florida => "FL",
            Region::Georgia => "GA",
            Region::Hawaii => "HI",
            Region::Idaho => "ID",
            Region::Illinois => "IL",
            Region::Indiana => "IN",
            Region::Iowa => "IA",
            Region::Kansas => "KS",
            Region::Kentucky => "KY",
            Region::Louisiana => "LA",
            Region::Maine => "ME",
            Region::Maryland => "MD",
            Region::Massachusetts => "MA",
            Region::Michigan => "MI",
            Region::Minnesota => "MN",
            Region::Mississippi => "MS",
            Region::Missouri => "MO",
            Region::Montana => "MT",
            Region::Nebraska => "NE",
            Region::Nevada => "NV",
            Region::NewHampshire => "NH",
            Region::NewJersey => "NJ",
            Region::NewMexico => "NM",
            Region::NewYork => "NY",
            Region::NorthCarolina => "NC",
            Region::NorthDakota => "ND",
            Region::Ohio => "OH",
            Region::Oklahoma => "OK",
            Region::Oregon => "OR",
            Region::Pennsylvania => "PA",
            Region::RhodeIsland => "RI",
            Region::SouthCarolina => "SC",
            Region::SouthDakota => "SD",
            Region::Tennessee => "TN",
            Region::Texas => "TX",
            Region::Utah => "UT",
            Region::Vermont => "VT",
            Region::Virginia => "VA",
            Region::Washington => "WA",
            Region::WestVirginia => "WV",
            Region::Wisconsin => "WI",
            Region::Wyoming => "WY",
            Region::UnitedStates => "US",
        }
    }

    pub fn is_national(self) -> bool {
        self == Region::UnitedStates
    }

    /// Position in [`STATES`], `None` for the national total.
    pub fn state_index(self) -> Option<usize> {
        if self.is_national() {
            None
        } else {
            Some(self as usize)
        }
    }

    /// Exact lookup by canonical label.
    pub fn from_name(name: &str) -> Option<Region> {
        STATES
            .iter()
            .copied()
            .chain(std::iter::once(Region::UnitedStates))
            .find(|region| region.name() == name)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a known region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized area name '{0}'")]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s).ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

/// Maps a raw EIA area name to its canonical region.
///
/// Accepts canonical labels and postal codes in any case, the `USA-XX` duoarea style
/// used by several EIA series and the usual spellings of the national total and the
/// District of Columbia. Areas that are not a state, DC or the nation (PAD districts,
/// census regions) return `None`.
pub fn normalize(raw_area_name: &str) -> Option<Region> {
    let upper = raw_area_name.trim().to_ascii_uppercase();
    let key = upper.strip_prefix("USA-").unwrap_or(upper.as_str());

    match key {
        "U.S." | "USA" | "U.S.A." | "UNITED STATES" | "UNITED STATES OF AMERICA"
        | "U.S. TOTAL" => return Some(Region::UnitedStates),
        "D.C." | "WASHINGTON, D.C." | "WASHINGTON D.C." | "WASHINGTON DC"
        | "DIST. OF COLUMBIA" => return Some(Region::DistrictOfColumbia),
        _ => {}
    }

    STATES
        .iter()
        .copied()
        .chain(std::iter::once(Region::UnitedStates))
        .find(|region| region.abbreviation() == key || region.name().eq_ignore_ascii_case(key))
}

/// The fifty states plus the District of Columbia, in reconciliation order.
pub fn canonical_state_list() -> &'static [Region; STATE_COUNT] {
    &STATES
}

/// Label of the national aggregate column.
pub fn national_label() -> &'static str {
    Region::UnitedStates.name()
}
