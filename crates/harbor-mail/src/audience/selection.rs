use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which identifier set drives the audience total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    City,
    Zip,
}

/// Waterfront subset used to approximate boat-access-only homeowners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaterwayType {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "intracoastal")]
    Intracoastal,
    #[serde(rename = "ocean-access")]
    OceanAccess,
}

impl WaterwayType {
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::All => 1.0,
            Self::Intracoastal => 0.6,
            Self::OceanAccess => 0.35,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Intracoastal => "intracoastal",
            Self::OceanAccess => "ocean-access",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Navigable Waterways",
            Self::Intracoastal => "Intracoastal",
            Self::OceanAccess => "Ocean-Access Canal",
        }
    }

    /// Scale one raw count, rounding to the nearest homeowner.
    pub fn apply(self, count: u64) -> u64 {
        (count as f64 * self.multiplier()).round() as u64
    }
}

impl fmt::Display for WaterwayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown waterway type '{0}' (expected all, intracoastal, or ocean-access)")]
pub struct UnknownWaterwayType(pub String);

impl FromStr for WaterwayType {
    type Err = UnknownWaterwayType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "intracoastal" => Ok(Self::Intracoastal),
            "ocean-access" | "ocean_access" => Ok(Self::OceanAccess),
            other => Err(UnknownWaterwayType(other.to_string())),
        }
    }
}

/// Per-session audience picks made in the explorer or the campaign wizard.
///
/// The request body of the audience total endpoint. `cities` and `zips` are
/// accepted for the selected sets; unrecognised keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudienceSelection {
    #[serde(default)]
    pub mode: SelectionMode,
    pub county: String,
    #[serde(default, alias = "cities")]
    pub selected_cities: BTreeSet<String>,
    #[serde(default, alias = "zips")]
    pub selected_zips: BTreeSet<String>,
    #[serde(default)]
    pub waterway: WaterwayType,
}

impl AudienceSelection {
    pub fn new(county: impl Into<String>, mode: SelectionMode) -> Self {
        Self {
            mode,
            county: county.into(),
            ..Self::default()
        }
    }

    pub fn with_waterway(mut self, waterway: WaterwayType) -> Self {
        self.waterway = waterway;
        self
    }

    /// Add the city when absent, remove it when present. Returns whether it is now selected.
    pub fn toggle_city(&mut self, city: &str) -> bool {
        toggle(&mut self.selected_cities, city)
    }

    /// Add the ZIP when absent, remove it when present. Returns whether it is now selected.
    pub fn toggle_zip(&mut self, zip_code: &str) -> bool {
        toggle(&mut self.selected_zips, zip_code)
    }

    /// Switching county drops every pick made under the previous one.
    pub fn change_county(&mut self, county: impl Into<String>) {
        self.county = county.into();
        self.selected_cities.clear();
        self.selected_zips.clear();
    }

    /// The identifiers consulted for the current mode.
    pub fn active_selection(&self) -> &BTreeSet<String> {
        match self.mode {
            SelectionMode::City => &self.selected_cities,
            SelectionMode::Zip => &self.selected_zips,
        }
    }

    /// Query-string form used to carry a selection into the wizard, e.g. `cities=Jupiter,Tequesta`.
    pub fn query_params(&self) -> Option<String> {
        let selected = self.active_selection();
        if selected.is_empty() {
            return None;
        }

        let key = match self.mode {
            SelectionMode::City => "cities",
            SelectionMode::Zip => "zips",
        };
        let joined = selected.iter().cloned().collect::<Vec<_>>().join(",");
        Some(format!("{key}={joined}"))
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

/// Split a comma-separated parameter, dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
