use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::analysis::{self, Analysis};
use crate::color::AwardColors;
use crate::data::filter::{AwardFilter, AwardType, FilterParams};
use crate::data::loader;
use crate::data::model::{Award, Dataset, InclusiveRange};

// ---------------------------------------------------------------------------
// Filter widgets' backing values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardMode {
    /// Multi-select of award labels.
    Labels,
    /// Award-type radio with star-count multi-select.
    ByType,
}

/// Everything the side panel edits. Both award selectors keep their values
/// while the other one is active.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPanel {
    pub name: String,
    pub country: String,
    pub award_mode: AwardMode,
    pub awards: BTreeSet<Award>,
    pub award_type: AwardType,
    pub star_counts: BTreeSet<u8>,
    pub price_enabled: bool,
    pub price: InclusiveRange<u32>,
    pub gdp: Option<InclusiveRange<f64>>,
    pub household: Option<InclusiveRange<f64>>,
    /// Dataset-wide spans; a slider left at its full span constrains nothing.
    gdp_span: Option<InclusiveRange<f64>>,
    household_span: Option<InclusiveRange<f64>>,
}

impl FilterPanel {
    /// Everything selected, ranges spanning the whole dataset.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            name: String::new(),
            country: String::new(),
            award_mode: AwardMode::Labels,
            awards: Award::ALL.into_iter().collect(),
            award_type: AwardType::Stars,
            star_counts: [1, 2, 3].into(),
            price_enabled: false,
            price: dataset.price_bounds(),
            gdp: dataset.gdp_bounds(),
            household: dataset.household_bounds(),
            gdp_span: dataset.gdp_bounds(),
            household_span: dataset.household_bounds(),
        }
    }

    pub fn to_params(&self) -> FilterParams {
        let award = match self.award_mode {
            // Every label ticked keeps rows with unrecognised awards too.
            AwardMode::Labels if self.awards.len() == Award::ALL.len() => {
                AwardFilter::Labels(BTreeSet::new())
            }
            AwardMode::Labels => AwardFilter::Labels(self.awards.clone()),
            AwardMode::ByType => AwardFilter::ByType {
                award_type: self.award_type,
                star_counts: self.star_counts.clone(),
            },
        };
        FilterParams {
            name_contains: self.name.clone(),
            country_contains: self.country.clone(),
            award,
            price_range: self.price_enabled.then_some(self.price),
            gdp_range: self.gdp.filter(|r| Some(*r) != self.gdp_span),
            household_spending_range: self.household.filter(|r| Some(*r) != self.household_span),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Restaurants,
    Countries,
    Regression,
    Map,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// Path the current dataset came from.
    pub data_path: Option<PathBuf>,

    /// Widget values; `None` until a dataset is loaded.
    pub panel: Option<FilterPanel>,

    /// Parameters behind `analysis`.
    pub applied: Option<FilterParams>,

    /// Pipeline output for `applied`.
    pub analysis: Option<Analysis>,

    pub tab: Tab,

    pub colors: AwardColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load a file, replacing the current dataset on success.
    ///
    /// Failures are reported through `status_message`; the previous dataset,
    /// if any, stays in place.
    pub fn open(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                self.data_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and run the pipeline once.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.panel = Some(FilterPanel::for_dataset(&dataset));
        self.dataset = Some(dataset);
        self.applied = None;
        self.status_message = None;
        self.refresh();
    }

    /// Re-run the pipeline if the panel changed since the last run.
    ///
    /// Returns whether it ran.
    pub fn refresh(&mut self) -> bool {
        let (Some(dataset), Some(panel)) = (&self.dataset, &self.panel) else {
            return false;
        };
        let params = panel.to_params();
        if self.applied.as_ref() == Some(&params) {
            return false;
        }
        self.analysis = Some(analysis::run(&dataset.restaurants, &params));
        self.applied = Some(params);
        true
    }

    /// Restore every filter to its initial value.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.panel = Some(FilterPanel::for_dataset(ds));
            self.refresh();
        }
    }

    pub fn visible_count(&self) -> usize {
        self.analysis.as_ref().map_or(0, |a| a.filtered.len())
    }

    /// Export the current summary; the outcome lands in `status_message`.
    pub fn export(&mut self, path: &Path) {
        let (Some(analysis), Some(params)) = (&self.analysis, &self.applied) else {
            return;
        };
        match analysis::export_json(analysis, params, path) {
            Ok(()) => {
                log::info!("Exported summary to {}", path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
