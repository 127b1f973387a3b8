use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Columns that must be present in the source header, referenced by name.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "iso_code",
    "continent",
    "location",
    "date",
    "total_cases",
    "new_cases",
    "total_deaths",
    "new_deaths",
    "total_tests",
    "population",
    "hospital_beds_per_thousand",
    "median_age",
    "life_expectancy",
    "stringency_index",
];

/// Numeric columns of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalCases,
    TotalDeaths,
    NewCases,
    NewDeaths,
    TotalTests,
    Population,
    HospitalBedsPerThousand,
    MedianAge,
    LifeExpectancy,
    StringencyIndex,
}

impl Metric {
    /// The case and death counters that the loader zero-fills.
    pub const CORE: [Metric; 4] = [
        Metric::TotalCases,
        Metric::TotalDeaths,
        Metric::NewCases,
        Metric::NewDeaths,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Self::TotalCases => "total_cases",
            Self::TotalDeaths => "total_deaths",
            Self::NewCases => "new_cases",
            Self::NewDeaths => "new_deaths",
            Self::TotalTests => "total_tests",
            Self::Population => "population",
            Self::HospitalBedsPerThousand => "hospital_beds_per_thousand",
            Self::MedianAge => "median_age",
            Self::LifeExpectancy => "life_expectancy",
            Self::StringencyIndex => "stringency_index",
        }
    }

    /// Human label used on chart axes and hover cards.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalCases => "Total confirmed cases",
            Self::TotalDeaths => "Total deaths",
            Self::NewCases => "New confirmed cases",
            Self::NewDeaths => "New deaths",
            Self::TotalTests => "Total tests",
            Self::Population => "Population",
            Self::HospitalBedsPerThousand => "Hospitals beds per 1000",
            Self::MedianAge => "Median Age",
            Self::LifeExpectancy => "Life expectancy",
            Self::StringencyIndex => "Government stringency index (0-100)",
        }
    }
}

/// One row of the source table.
///
/// `ordinal` is the row's position in the region-filtered table and is the
/// tie-breaker whenever two rows of one entity share a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub ordinal: usize,
    pub location: String,
    pub iso_code: String,
    pub continent: String,
    pub date: NaiveDate,
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_cases: Option<f64>,
    pub new_deaths: Option<f64>,
    pub total_tests: Option<f64>,
    pub population: Option<f64>,
    pub hospital_beds_per_thousand: Option<f64>,
    pub median_age: Option<f64>,
    pub life_expectancy: Option<f64>,
    pub stringency_index: Option<f64>,
}

impl Observation {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TotalCases => self.total_cases,
            Metric::TotalDeaths => self.total_deaths,
            Metric::NewCases => self.new_cases,
            Metric::NewDeaths => self.new_deaths,
            Metric::TotalTests => self.total_tests,
            Metric::Population => self.population,
            Metric::HospitalBedsPerThousand => self.hospital_beds_per_thousand,
            Metric::MedianAge => self.median_age,
            Metric::LifeExpectancy => self.life_expectancy,
            Metric::StringencyIndex => self.stringency_index,
        }
    }

    fn metric_mut(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::TotalCases => &mut self.total_cases,
            Metric::TotalDeaths => &mut self.total_deaths,
            Metric::NewCases => &mut self.new_cases,
            Metric::NewDeaths => &mut self.new_deaths,
            Metric::TotalTests => &mut self.total_tests,
            Metric::Population => &mut self.population,
            Metric::HospitalBedsPerThousand => &mut self.hospital_beds_per_thousand,
            Metric::MedianAge => &mut self.median_age,
            Metric::LifeExpectancy => &mut self.life_expectancy,
            Metric::StringencyIndex => &mut self.stringency_index,
        }
    }

    /// Replace missing values of the given metrics with zero.
    pub fn zero_fill(&mut self, metrics: &[Metric]) {
        for metric in metrics {
            self.metric_mut(*metric).get_or_insert(0.0);
        }
    }

    pub fn has_all(&self, metrics: &[Metric]) -> bool {
        metrics.iter().all(|m| self.metric(*m).is_some())
    }

    /// Deaths per hundred cases, rounded to two decimals.
    ///
    /// Returns 0 when the ratio is not finite (no cases, or a missing counter).
    pub fn death_rate(&self) -> f64 {
        let deaths = self.total_deaths.unwrap_or(f64::NAN);
        let cases = self.total_cases.unwrap_or(f64::NAN);
        finite_or_zero(round_to(deaths / cases * 100.0, 2))
    }
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    /// A bare observation with only the case/death counters populated.
    pub fn obs(
        ordinal: usize,
        location: &str,
        iso_code: &str,
        day: &str,
        cases: f64,
        deaths: f64,
    ) -> Observation {
        Observation {
            ordinal,
            location: location.to_string(),
            iso_code: iso_code.to_string(),
            continent: "Europe".to_string(),
            date: date(day),
            total_cases: Some(cases),
            total_deaths: Some(deaths),
            new_cases: Some(0.0),
            new_deaths: Some(0.0),
            total_tests: None,
            population: None,
            hospital_beds_per_thousand: None,
            median_age: None,
            life_expectancy: None,
            stringency_index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::obs;
    use super::*;

    #[test]
    fn test_death_rate_rounds_to_two_places() {
        let row = obs(0, "Germany", "DEU", "2021-01-05", 150.0, 3.0);
        assert_eq!(row.death_rate(), 2.0);

        let row = obs(0, "Germany", "DEU", "2021-01-05", 3.0, 1.0);
        assert_eq!(row.death_rate(), 33.33);
    }

    #[test]
    fn test_death_rate_ties_round_to_even() {
        // 1 / 800 * 100 = 0.125 exactly
        let row = obs(0, "Germany", "DEU", "2021-01-05", 800.0, 1.0);
        assert_eq!(row.death_rate(), 0.12);

        // 3 / 800 * 100 = 0.375
        let row = obs(0, "Germany", "DEU", "2021-01-05", 800.0, 3.0);
        assert_eq!(row.death_rate(), 0.38);
    }

    #[test]
    fn test_death_rate_without_cases_is_zero() {
        let row = obs(0, "Vatican", "VAT", "2021-01-05", 0.0, 0.0);
        assert_eq!(row.death_rate(), 0.0);

        let mut row = obs(0, "Vatican", "VAT", "2021-01-05", 0.0, 0.0);
        row.total_cases = None;
        assert_eq!(row.death_rate(), 0.0);
    }

    #[test]
    fn test_zero_fill_only_touches_requested_metrics() {
        let mut row = obs(0, "Spain", "ESP", "2021-01-05", 10.0, 1.0);
        row.new_cases = None;
        row.total_tests = None;

        row.zero_fill(&Metric::CORE);

        assert_eq!(row.new_cases, Some(0.0));
        assert_eq!(row.total_tests, None);
        assert_eq!(row.total_cases, Some(10.0));
    }
}
