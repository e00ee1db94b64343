use serde::Serialize;
use std::collections::BTreeSet;

use super::coverage::{CityCoverage, CoverageResponse, ZipCoverage};
use super::selection::{AudienceSelection, SelectionMode, WaterwayType};
use crate::pricing::{meets_minimum, MINIMUM_PIECES};

/// Cities and ZIPs available inside one county.
#[derive(Debug, Clone, Default)]
pub struct CountyView<'a> {
    pub cities: Vec<&'a CityCoverage>,
    /// Sorted by descending count for display.
    pub zips: Vec<&'a ZipCoverage>,
}

impl<'a> CountyView<'a> {
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.zips.is_empty()
    }

    /// Plain sum of the selected cities' counts.
    pub fn city_total(&self, selected: &BTreeSet<String>) -> u64 {
        self.cities
            .iter()
            .filter(|city| selected.contains(&city.name))
            .map(|city| city.count)
            .sum()
    }

    /// Plain sum of the selected ZIP codes' counts.
    pub fn zip_total(&self, selected: &BTreeSet<String>) -> u64 {
        self.zips
            .iter()
            .filter(|zip| selected.contains(&zip.zip_code))
            .map(|zip| zip.count)
            .sum()
    }

    /// Sum of the selected cities after the waterway multiplier.
    ///
    /// Each city is scaled and rounded on its own before accumulating.
    pub fn waterway_city_total(&self, selected: &BTreeSet<String>, waterway: WaterwayType) -> u64 {
        self.cities
            .iter()
            .filter(|city| selected.contains(&city.name))
            .map(|city| waterway.apply(city.count))
            .sum()
    }

    /// ZIP codes whose prefix matches what the user has typed so far.
    pub fn zips_matching(&self, prefix: &str) -> Vec<&'a ZipCoverage> {
        let prefix = prefix.trim();
        self.zips
            .iter()
            .copied()
            .filter(|zip| zip.zip_code.starts_with(prefix))
            .collect()
    }
}

/// Reduces coverage data to a homeowner total for an [`AudienceSelection`].
#[derive(Debug, Clone, Copy)]
pub struct AudienceAggregator<'a> {
    coverage: &'a CoverageResponse,
}

impl<'a> AudienceAggregator<'a> {
    pub fn new(coverage: &'a CoverageResponse) -> Self {
        Self { coverage }
    }

    /// Exact, case-sensitive county lookup. Unknown counties yield an empty view.
    pub fn county_view(&self, county: &str) -> CountyView<'a> {
        let cities: Vec<&CityCoverage> = self
            .coverage
            .counties
            .iter()
            .find(|candidate| candidate.name == county)
            .map(|found| found.cities.iter().collect())
            .unwrap_or_default();

        let mut zips: Vec<&ZipCoverage> = self
            .coverage
            .zips
            .iter()
            .filter(|zip| zip.county == county)
            .collect();
        zips.sort_by(|a, b| b.count.cmp(&a.count));

        CountyView { cities, zips }
    }

    /// Running total for the selection. City mode applies the waterway
    /// multiplier per city (`all` leaves counts untouched); ZIP mode sums raw counts.
    pub fn total(&self, selection: &AudienceSelection) -> u64 {
        let view = self.county_view(&selection.county);
        match selection.mode {
            SelectionMode::City => {
                view.waterway_city_total(&selection.selected_cities, selection.waterway)
            }
            SelectionMode::Zip => view.zip_total(&selection.selected_zips),
        }
    }

    pub fn summarize(&self, selection: &AudienceSelection) -> AudienceSummary {
        let total = self.total(selection);
        tracing::debug!(
            county = %selection.county,
            mode = ?selection.mode,
            waterway = %selection.waterway,
            total,
            "aggregated audience"
        );

        AudienceSummary {
            county: selection.county.clone(),
            mode: selection.mode,
            waterway: selection.waterway,
            selected: selection.active_selection().len(),
            total,
            meets_minimum: meets_minimum(total),
            minimum_pieces: MINIMUM_PIECES,
        }
    }
}

/// Audience total plus the minimum-order gate the wizard applies to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudienceSummary {
    pub county: String,
    pub mode: SelectionMode,
    pub waterway: WaterwayType,
    pub selected: usize,
    pub total: u64,
    pub meets_minimum: bool,
    pub minimum_pieces: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audience::coverage::CountyCoverage;

    fn city(name: &str, count: u64) -> CityCoverage {
        CityCoverage {
            name: name.to_string(),
            count,
            zip_codes: Vec::new(),
        }
    }

    fn zip(zip_code: &str, county: &str, count: u64) -> ZipCoverage {
        ZipCoverage {
            zip_code: zip_code.to_string(),
            city: "Jupiter".to_string(),
            county: county.to_string(),
            count,
        }
    }

    fn coverage() -> CoverageResponse {
        CoverageResponse {
            counties: vec![CountyCoverage {
                name: "Palm Beach".to_string(),
                cities: vec![city("Jupiter", 3100), city("Tequesta", 4), city("Juno Beach", 4)],
            }],
            zips: vec![
                zip("33469", "Palm Beach", 8),
                zip("33458", "Palm Beach", 1850),
                zip("33301", "Broward", 2450),
            ],
        }
    }

    #[test]
    fn unknown_county_degrades_to_zero() {
        let data = coverage();
        let aggregator = AudienceAggregator::new(&data);
        assert!(aggregator.county_view("palm beach").is_empty());

        let mut selection = AudienceSelection::new("Martin", SelectionMode::City);
        selection.toggle_city("Jupiter");
        assert_eq!(aggregator.total(&selection), 0);
    }

    #[test]
    fn zip_view_is_sorted_and_filtered_by_county() {
        let data = coverage();
        let view = AudienceAggregator::new(&data).county_view("Palm Beach");
        let codes: Vec<&str> = view.zips.iter().map(|zip| zip.zip_code.as_str()).collect();
        assert_eq!(codes, vec!["33458", "33469"]);
        assert_eq!(view.zips_matching("3345").len(), 1);
    }

    #[test]
    fn waterway_rounding_happens_per_city() {
        let data = coverage();
        let aggregator = AudienceAggregator::new(&data);
        let mut selection = AudienceSelection::new("Palm Beach", SelectionMode::City)
            .with_waterway(WaterwayType::OceanAccess);
        selection.toggle_city("Tequesta");
        selection.toggle_city("Juno Beach");

        assert_eq!(aggregator.total(&selection), 2);
        assert_eq!(WaterwayType::OceanAccess.apply(8), 3);
    }

    #[test]
    fn only_the_active_set_counts() {
        let data = coverage();
        let aggregator = AudienceAggregator::new(&data);
        let mut selection = AudienceSelection::new("Palm Beach", SelectionMode::Zip);
        selection.toggle_city("Jupiter");
        selection.toggle_zip("33469");

        let summary = aggregator.summarize(&selection);
        assert_eq!(summary.total, 8);
        assert_eq!(summary.selected, 1);
        assert!(!summary.meets_minimum);
    }

    #[test]
    fn totals_never_shrink_as_selections_grow() {
        let data = coverage();
        let aggregator = AudienceAggregator::new(&data);
        let view = aggregator.county_view("Palm Beach");

        for waterway in [
            WaterwayType::All,
            WaterwayType::Intracoastal,
            WaterwayType::OceanAccess,
        ] {
            let mut selection =
                AudienceSelection::new("Palm Beach", SelectionMode::City).with_waterway(waterway);
            let mut previous = aggregator.total(&selection);
            for city in &view.cities {
                selection.toggle_city(&city.name);
                let total = aggregator.total(&selection);
                assert!(total >= previous, "{waterway} adding {}", city.name);
                previous = total;
            }

            let mut selection =
                AudienceSelection::new("Palm Beach", SelectionMode::Zip).with_waterway(waterway);
            let mut previous = aggregator.total(&selection);
            for zip in &view.zips {
                selection.toggle_zip(&zip.zip_code);
                let total = aggregator.total(&selection);
                assert!(total >= previous, "{waterway} adding {}", zip.zip_code);
                previous = total;
            }
            assert_eq!(previous, 1858);
        }
    }
}
