use serde::Serialize;
use thiserror::Error;

use crate::data::model::{CountrySummary, Indicator};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegressionError {
    #[error("no data to fit")]
    NoData,
    #[error("insufficient data: {countries} country, at least 2 needed")]
    InsufficientData { countries: usize },
}

/// One plotted observation: indicator value, restaurant count, country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Ordinary least-squares fit of restaurant count on one indicator.
///
/// `r_squared` and `correlation` are NaN when either variable has zero
/// variance; `slope` is 0 in that case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub indicator: Indicator,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub correlation: f64,
    #[serde(skip)]
    pub points: Vec<RegressionPoint>,
}

impl RegressionResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Fitted line across the observed x span, for plotting.
    pub fn line_span(&self) -> Option<[[f64; 2]; 2]> {
        let (lo, hi) = self
            .points
            .iter()
            .map(|p| p.x)
            .fold(None, |acc: Option<(f64, f64)>, x| match acc {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            })?;
        Some([[lo, self.predict(lo)], [hi, self.predict(hi)]])
    }

    pub fn is_degenerate(&self) -> bool {
        self.r_squared.is_nan() || self.correlation.is_nan()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn all_equal(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Fit `restaurant_count = slope * indicator + intercept` across countries.
///
/// Pure: the summary table is only read.
pub fn fit(
    summary: &[CountrySummary],
    indicator: Indicator,
) -> Result<RegressionResult, RegressionError> {
    match summary.len() {
        0 => return Err(RegressionError::NoData),
        1 => return Err(RegressionError::InsufficientData { countries: 1 }),
        _ => {}
    }

    let points: Vec<RegressionPoint> = summary
        .iter()
        .map(|s| RegressionPoint {
            x: indicator.value(s),
            y: s.restaurant_count as f64,
            label: s.country.clone(),
        })
        .collect();
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

    let x_mean = mean(&xs);
    let y_mean = mean(&ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(&ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let x_constant = all_equal(&xs);
    let y_constant = all_equal(&ys);

    let slope = if x_constant { 0.0 } else { sxy / sxx };
    let intercept = y_mean - slope * x_mean;

    let (r_squared, correlation) = if x_constant || y_constant {
        (f64::NAN, f64::NAN)
    } else {
        let ss_res: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(&x, &y)| {
                let residual = y - (slope * x + intercept);
                residual * residual
            })
            .sum();
        let r_squared = (1.0 - ss_res / syy).clamp(0.0, 1.0);
        let correlation = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
        (r_squared, correlation)
    };

    log::debug!(
        "Fitted {indicator} over {} countries: slope={slope:.6e}, R²={r_squared:.4}, r={correlation:.4}",
        points.len()
    );

    Ok(RegressionResult {
        indicator,
        slope,
        intercept,
        r_squared,
        correlation,
        points,
    })
}
