use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Homeowner count for one ZIP code within a city and county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub county: String,
    pub city: String,
    pub zip_code: String,
    pub homeowner_count: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CoverageImportError {
    #[error("failed to read coverage export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid coverage CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate coverage row for {county} / {city} / {zip_code}")]
    Duplicate {
        county: String,
        city: String,
        zip_code: String,
    },
}

/// Immutable reference dataset of homeowner counts.
#[derive(Debug, Clone, Default)]
pub struct CoverageDataset {
    records: Vec<CoverageRecord>,
}

impl CoverageDataset {
    /// Build a dataset, rejecting repeated `(county, city, zip_code)` keys.
    pub fn new(records: Vec<CoverageRecord>) -> Result<Self, CoverageImportError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            let key = (
                record.county.as_str(),
                record.city.as_str(),
                record.zip_code.as_str(),
            );
            if !seen.insert(key) {
                return Err(CoverageImportError::Duplicate {
                    county: record.county.clone(),
                    city: record.city.clone(),
                    zip_code: record.zip_code.clone(),
                });
            }
        }

        Ok(Self { records })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CoverageImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a `county,city,zip_code,homeowner_count` export.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CoverageImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<CoverageRecord>() {
            records.push(row?);
        }

        Self::new(records)
    }

    pub fn records(&self) -> &[CoverageRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_homeowners(&self) -> u64 {
        self.records.iter().map(|record| record.homeowner_count).sum()
    }

    /// Group rows into the county → city → ZIP shape served to the explorer.
    ///
    /// Rows are visited by descending homeowner count, so counties appear in
    /// order of their largest ZIP and each county's cities are sorted by total.
    pub fn response(&self) -> CoverageResponse {
        let mut ordered: Vec<&CoverageRecord> = self.records.iter().collect();
        ordered.sort_by(|a, b| b.homeowner_count.cmp(&a.homeowner_count));

        let mut counties: Vec<CountyCoverage> = Vec::new();
        let mut county_index: HashMap<&str, usize> = HashMap::new();
        let mut city_index: HashMap<(&str, &str), usize> = HashMap::new();

        for &record in &ordered {
            let county_slot = *county_index
                .entry(record.county.as_str())
                .or_insert_with(|| {
                    counties.push(CountyCoverage {
                        name: record.county.clone(),
                        cities: Vec::new(),
                    });
                    counties.len() - 1
                });
            let county = &mut counties[county_slot];

            let city_slot = *city_index
                .entry((record.county.as_str(), record.city.as_str()))
                .or_insert_with(|| {
                    county.cities.push(CityCoverage {
                        name: record.city.clone(),
                        count: 0,
                        zip_codes: Vec::new(),
                    });
                    county.cities.len() - 1
                });
            let city = &mut county.cities[city_slot];
            city.count += record.homeowner_count;
            city.zip_codes.push(record.zip_code.clone());
        }

        for county in &mut counties {
            county.cities.sort_by(|a, b| b.count.cmp(&a.count));
        }

        let zips = ordered
            .iter()
            .map(|record| ZipCoverage {
                zip_code: record.zip_code.clone(),
                city: record.city.clone(),
                county: record.county.clone(),
                count: record.homeowner_count,
            })
            .collect();

        CoverageResponse { counties, zips }
    }

    /// Homeowners per requested city, summed across every ZIP row for that city.
    pub fn count_by_cities(&self, cities: &[String]) -> CityCountBreakdown {
        let wanted: HashSet<&str> = cities.iter().map(String::as_str).collect();
        let mut breakdown = BTreeMap::new();
        let mut total = 0;

        for record in self
            .records
            .iter()
            .filter(|record| wanted.contains(record.city.as_str()))
        {
            *breakdown.entry(record.city.clone()).or_insert(0) += record.homeowner_count;
            total += record.homeowner_count;
        }

        CityCountBreakdown { total, breakdown }
    }

    /// Homeowners per requested ZIP code.
    pub fn count_by_zips(&self, zips: &[String]) -> ZipCountBreakdown {
        let wanted: HashSet<&str> = zips.iter().map(String::as_str).collect();
        let mut breakdown = BTreeMap::new();
        let mut total = 0;

        for record in self
            .records
            .iter()
            .filter(|record| wanted.contains(record.zip_code.as_str()))
        {
            breakdown.insert(
                record.zip_code.clone(),
                ZipCount {
                    city: record.city.clone(),
                    count: record.homeowner_count,
                },
            );
            total += record.homeowner_count;
        }

        ZipCountBreakdown { total, breakdown }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCoverage {
    pub name: String,
    pub count: u64,
    pub zip_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyCoverage {
    pub name: String,
    pub cities: Vec<CityCoverage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipCoverage {
    pub zip_code: String,
    pub city: String,
    pub county: String,
    pub count: u64,
}

/// Coverage feed consumed by the audience explorer and the campaign wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageResponse {
    pub counties: Vec<CountyCoverage>,
    pub zips: Vec<ZipCoverage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCountBreakdown {
    pub total: u64,
    pub breakdown: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZipCount {
    pub city: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZipCountBreakdown {
    pub total: u64,
    pub breakdown: BTreeMap<String, ZipCount>,
}
