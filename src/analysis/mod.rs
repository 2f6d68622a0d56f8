/// Analysis layer: per-country aggregation and indicator regressions.
///
/// Pipeline:
/// ```text
///   base table ──filter──▶ filtered rows ──aggregate──▶ country summary
///                                │                          │
///                                ▼                          ├─fit(GDP)──────▶ RegressionResult
///                            map points                     └─fit(household)─▶ RegressionResult
/// ```
pub mod aggregate;
pub mod regression;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::filter::{filter_rows, FilterParams};
use crate::data::model::{Award, CountrySummary, Indicator, Restaurant};
use regression::{RegressionError, RegressionResult};

/// Aggregation plus one regression per indicator, all from the same rows.
#[derive(Debug, Clone)]
pub struct CountryReport {
    pub countries: Vec<CountrySummary>,
    pub gdp: Result<RegressionResult, RegressionError>,
    pub household: Result<RegressionResult, RegressionError>,
}

impl CountryReport {
    /// Aggregate once and fit both indicators against the shared summary.
    pub fn build(rows: &[Restaurant]) -> Self {
        let countries = aggregate::aggregate(rows);
        let gdp = regression::fit(&countries, Indicator::GdpPerCapita);
        let household = regression::fit(&countries, Indicator::HouseholdSpending);
        Self {
            countries,
            gdp,
            household,
        }
    }

    pub fn regression(&self, indicator: Indicator) -> &Result<RegressionResult, RegressionError> {
        match indicator {
            Indicator::GdpPerCapita => &self.gdp,
            Indicator::HouseholdSpending => &self.household,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    /// The filters matched no restaurant; nothing downstream was computed.
    Empty,
    Ready(CountryReport),
}

/// Everything the presentation layer renders for one set of filter parameters.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub filtered: Vec<Restaurant>,
    /// Whether the parameters constrained nothing (filtered == base table).
    pub unconstrained: bool,
    /// `filtered` restricted to what the map draws.
    pub map: Vec<MapPoint>,
    pub outcome: Outcome,
}

impl Analysis {
    pub fn report(&self) -> Option<&CountryReport> {
        match &self.outcome {
            Outcome::Ready(report) => Some(report),
            Outcome::Empty => None,
        }
    }
}

/// Run the full pipeline: filter → aggregate → regress (twice).
pub fn run(rows: &[Restaurant], params: &FilterParams) -> Analysis {
    let filtered = filter_rows(rows, params);
    let outcome = if filtered.is_empty() {
        Outcome::Empty
    } else {
        Outcome::Ready(CountryReport::build(&filtered))
    };

    log::debug!(
        "Pipeline: {} of {} restaurants matched, {} countries",
        filtered.len(),
        rows.len(),
        match &outcome {
            Outcome::Ready(report) => report.countries.len(),
            Outcome::Empty => 0,
        }
    );

    Analysis {
        map: map_points(&filtered),
        filtered,
        unconstrained: params.is_unconstrained(),
        outcome,
    }
}

// ---------------------------------------------------------------------------
// Map projection of the filtered rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub award: Option<Award>,
}

/// Restrict rows to what the map needs. Rows without coordinates are skipped.
pub fn map_points(rows: &[Restaurant]) -> Vec<MapPoint> {
    rows.iter()
        .filter_map(|r| {
            Some(MapPoint {
                name: r.name.clone(),
                latitude: r.latitude?,
                longitude: r.longitude?,
                award: r.award,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RegressionExport<'a> {
    #[serde(flatten)]
    result: Option<&'a RegressionResult>,
    countries: usize,
    error: Option<String>,
}

impl<'a> RegressionExport<'a> {
    fn new(fit: &'a Result<RegressionResult, RegressionError>, countries: usize) -> Self {
        match fit {
            Ok(result) => Self {
                result: Some(result),
                countries,
                error: None,
            },
            Err(e) => Self {
                result: None,
                countries,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Serialize)]
struct ReportExport<'a> {
    filters: &'a FilterParams,
    restaurants: usize,
    countries: &'a [CountrySummary],
    gdp_regression: RegressionExport<'a>,
    household_regression: RegressionExport<'a>,
}

/// Write the country table and both regression summaries as pretty JSON.
pub fn export_json(analysis: &Analysis, params: &FilterParams, path: &Path) -> Result<()> {
    let report = analysis
        .report()
        .context("nothing to export: the current filters match no restaurants")?;
    let n = report.countries.len();
    let export = ReportExport {
        filters: params,
        restaurants: analysis.filtered.len(),
        countries: &report.countries,
        gdp_regression: RegressionExport::new(&report.gdp, n),
        household_regression: RegressionExport::new(&report.household, n),
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &export)
        .context("writing JSON summary")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::AwardFilter;
    use crate::data::model::{Dataset, RawRecord};

    fn record(name: &str, country: &str, award: &str, gdp: f64, hh: f64) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            country: country.to_string(),
            award: Some(award.to_string()),
            price: Some("$$".to_string()),
            latitude: Some(10.0),
            longitude: Some(20.0),
            gdp_per_capita: Some(gdp),
            household_spending: Some(hh),
        }
    }

    fn two_country_table() -> Vec<Restaurant> {
        let mut records = vec![
            record("a1", "A", "1 Star", 10000.0, 500.0),
            record("a2", "A", "2 Stars", 10000.0, 500.0),
            record("a3", "A", "Bib Gourmand", 10000.0, 500.0),
        ];
        for i in 0..4 {
            records.push(record(&format!("b{i}"), "B", "1 Star", 20000.0, 1000.0));
        }
        records.push(record("b-bib", "B", "Bib Gourmand", 20000.0, 1000.0));
        Dataset::from_records(records).restaurants
    }

    #[test]
    fn test_end_to_end_two_countries() {
        let rows = two_country_table();
        let params = FilterParams {
            award: AwardFilter::Labels([Award::OneStar, Award::TwoStars].into()),
            ..Default::default()
        };
        let analysis = run(&rows, &params);
        assert!(!analysis.unconstrained);
        assert_eq!(analysis.filtered.len(), 6);

        let report = analysis.report().expect("rows matched");
        assert_eq!(
            report.countries,
            vec![
                CountrySummary {
                    country: "A".to_string(),
                    restaurant_count: 2,
                    gdp_per_capita: 10000.0,
                    household_spending: 500.0,
                },
                CountrySummary {
                    country: "B".to_string(),
                    restaurant_count: 4,
                    gdp_per_capita: 20000.0,
                    household_spending: 1000.0,
                },
            ]
        );

        let gdp = report.gdp.as_ref().unwrap();
        assert!((gdp.r_squared - 1.0).abs() < 1e-9);
        assert!((gdp.slope - 0.0002).abs() < 1e-12);
        assert!((gdp.predict(10000.0) - 2.0).abs() < 1e-9);

        let household = report.regression(Indicator::HouseholdSpending).as_ref().unwrap();
        assert!((household.correlation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_result_short_circuits() {
        let rows = two_country_table();
        let params = FilterParams {
            country_contains: "Z".to_string(),
            ..Default::default()
        };
        let analysis = run(&rows, &params);
        assert!(analysis.filtered.is_empty());
        assert!(analysis.map.is_empty());
        assert!(matches!(analysis.outcome, Outcome::Empty));
        assert!(analysis.report().is_none());
    }

    #[test]
    fn test_single_country_reports_insufficient_data() {
        let rows = two_country_table();
        let params = FilterParams {
            country_contains: "a".to_string(),
            ..Default::default()
        };
        let analysis = run(&rows, &params);
        let report = analysis.report().unwrap();
        assert_eq!(report.countries.len(), 1);
        assert_eq!(
            report.gdp,
            Err(RegressionError::InsufficientData { countries: 1 })
        );
    }

    #[test]
    fn test_unconstrained_run_keeps_everything() {
        let rows = two_country_table();
        let analysis = run(&rows, &FilterParams::default());
        assert!(analysis.unconstrained);
        assert_eq!(analysis.filtered, rows);
        assert_eq!(analysis.map.len(), rows.len());
    }

    #[test]
    fn test_map_points_skip_missing_coordinates() {
        let mut rows = two_country_table();
        rows[0].latitude = None;
        let points = map_points(&rows);
        assert_eq!(points.len(), rows.len() - 1);
        assert_eq!(points[0].name, "a2");
        assert_eq!(points[0].award, Some(Award::TwoStars));
    }

    #[test]
    fn test_export_json() {
        let rows = two_country_table();
        let params = FilterParams::default();
        let analysis = run(&rows, &params);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        export_json(&analysis, &params, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["restaurants"], 8);
        assert_eq!(value["countries"].as_array().unwrap().len(), 2);
        assert_eq!(value["gdp_regression"]["countries"], 2);
        assert!(value["gdp_regression"]["slope"].is_number());
    }

    #[test]
    fn test_export_writes_undefined_statistics_as_null() {
        // Both countries keep one restaurant: zero variance in the counts.
        let rows = Dataset::from_records(vec![
            record("x", "X", "1 Star", 10000.0, 500.0),
            record("y", "Y", "1 Star", 20000.0, 900.0),
        ])
        .restaurants;
        let params = FilterParams::default();
        let analysis = run(&rows, &params);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        export_json(&analysis, &params, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        for key in ["gdp_regression", "household_regression"] {
            assert!(value[key]["r_squared"].is_null());
            assert!(value[key]["correlation"].is_null());
            assert_eq!(value[key]["slope"], 0.0);
        }
    }

    #[test]
    fn test_export_refuses_empty_result() {
        let rows = two_country_table();
        let params = FilterParams {
            name_contains: "none".to_string(),
            ..Default::default()
        };
        let analysis = run(&rows, &params);
        let dir = tempfile::tempdir().unwrap();
        assert!(export_json(&analysis, &params, &dir.path().join("x.json")).is_err());
    }
}
