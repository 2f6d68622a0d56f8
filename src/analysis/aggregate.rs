use std::collections::BTreeMap;

use crate::data::model::{CountrySummary, Restaurant};

#[derive(Default)]
struct Accumulator {
    count: usize,
    gdp_sum: f64,
    household_sum: f64,
}

/// Group restaurants by country.
///
/// Output is sorted by country name. An empty input yields an empty table.
pub fn aggregate(rows: &[Restaurant]) -> Vec<CountrySummary> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for r in rows {
        let acc = groups.entry(r.country.as_str()).or_default();
        acc.count += 1;
        acc.gdp_sum += r.gdp_per_capita;
        acc.household_sum += r.household_spending;
    }

    groups
        .into_iter()
        .map(|(country, acc)| {
            let n = acc.count as f64;
            CountrySummary {
                country: country.to_string(),
                restaurant_count: acc.count,
                gdp_per_capita: acc.gdp_sum / n,
                household_spending: acc.household_sum / n,
            }
        })
        .collect()
}
