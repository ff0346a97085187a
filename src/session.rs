//! UI-independent state behind the chart: the series store, the current
//! filter parameters, and the status line.

use crate::error::{Error, Result, STATUS_LOADED};
use crate::functions;
use crate::importer;
use crate::models::{Curve, DateRange, FilterParams};
use crate::store::SeriesStore;
use std::path::Path;

/// Filtered series curves in selection order, followed by the function curve
/// when `params.function` names a registered function.
pub fn curves(store: &SeriesStore, params: &FilterParams) -> Vec<Curve> {
    let mut out: Vec<Curve> = store
        .filter(&params.range, &params.selected)
        .iter()
        .map(Curve::from_series)
        .collect();
    if let Some(curve) = params
        .function
        .as_deref()
        .and_then(|label| functions::sample(label, params.samples))
    {
        out.push(curve);
    }
    out
}

#[derive(Debug, Clone)]
pub struct Session {
    store: SeriesStore,
    params: FilterParams,
    status: String,
}

impl Session {
    /// Session over the demo data, every demo city selected, full date range.
    pub fn new(last_year: i32) -> Self {
        Self::with_store(SeriesStore::demo(last_year))
    }

    /// Session over `store` with every series selected and the full date range.
    pub fn with_store(store: SeriesStore) -> Self {
        let params = FilterParams {
            range: store.full_range().unwrap_or_else(DateRange::unbounded),
            selected: store.names().map(str::to_string).collect(),
            ..FilterParams::default()
        };
        Self {
            store,
            params,
            status: String::new(),
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Import a CSV file, replacing any series with the same name.
    ///
    /// On success the imported series is selected and the range is widened to
    /// the store's full range. The status line reports the outcome either way.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let path = path.as_ref();
        match self.store.import_file(path) {
            Ok(name) => {
                if !self.is_selected(&name) {
                    self.params.selected.push(name.clone());
                }
                self.reset_range();
                self.status = STATUS_LOADED.to_string();
                Ok(name)
            }
            Err(err) => {
                log::warn!("import of {} failed: {}", path.display(), err);
                self.status = err.status_message();
                Err(err)
            }
        }
    }

    /// Back to the full range without a function; clears the status line.
    pub fn reset(&mut self) {
        self.reset_range();
        self.params.function = None;
        self.status.clear();
    }

    /// Replace all series with the demo data and reset the selection.
    pub fn reset_to_demo(&mut self, last_year: i32) {
        self.store.reset_to_demo(last_year);
        self.params.selected = self.store.names().map(str::to_string).collect();
        self.reset();
    }

    fn reset_range(&mut self) {
        self.params.range = self
            .store
            .full_range()
            .unwrap_or_else(DateRange::unbounded);
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.params.range = range;
    }

    /// Set the range from user-typed bounds, parsed like the date column.
    pub fn set_range_text(&mut self, from: &str, to: &str) -> Result<()> {
        let parsed = importer::parse_date(from).zip(importer::parse_date(to));
        match parsed {
            Some((from, to)) => {
                self.params.range = DateRange::new(from, to);
                Ok(())
            }
            None => {
                let err = Error::DateRange(format!("cannot read range {:?} .. {:?}", from, to));
                self.status = err.status_message();
                Err(err)
            }
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.params.selected.iter().any(|s| s == name)
    }

    pub fn set_selected(&mut self, name: &str, selected: bool) {
        if selected && !self.is_selected(name) {
            self.params.selected.push(name.to_string());
        } else if !selected {
            self.params.selected.retain(|s| s != name);
        }
    }

    pub fn toggle(&mut self, name: &str) {
        let selected = self.is_selected(name);
        self.set_selected(name, !selected);
    }

    /// Replace the selection, keeping the given order.
    pub fn select_only<S: AsRef<str>>(&mut self, names: &[S]) {
        self.params.selected.clear();
        for name in names {
            self.set_selected(name.as_ref(), true);
        }
    }

    /// Select a function by label; `None`, the placeholder, or an unknown
    /// label leaves the chart without a function curve.
    pub fn set_function(&mut self, label: Option<&str>) {
        self.params.function = label
            .filter(|l| *l != functions::NO_FUNCTION)
            .map(str::to_string);
    }

    pub fn set_samples(&mut self, samples: usize) {
        self.params.samples = samples;
    }

    pub fn curves(&self) -> Vec<Curve> {
        curves(&self.store, &self.params)
    }
}
