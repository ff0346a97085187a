use crate::error::Result;
use crate::importer;
use crate::models::{DateRange, Series, TimePoint};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::path::Path;

/// First year of the demo series.
pub const DEMO_FIRST_YEAR: i32 = 1875;

/// In-memory series keyed by name. `import` and `reset_to_demo` are the only
/// ways to change its contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesStore {
    series: BTreeMap<String, Series>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the four demo cities, yearly from 1875 to `last_year`.
    pub fn demo(last_year: i32) -> Self {
        let mut store = Self::new();
        store.reset_to_demo(last_year);
        store
    }

    /// Insert `points` under `name`, replacing any series of the same name.
    pub fn import(&mut self, name: impl Into<String>, points: Vec<TimePoint>) {
        let name = name.into();
        self.series.insert(name.clone(), Series::new(name, points));
    }

    /// Load a CSV file and import it. Returns the inferred series name.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let series = importer::load_series(path)?;
        let name = series.name.clone();
        log::info!("imported {} points as {:?}", series.points.len(), name);
        self.import(series.name, series.points);
        Ok(name)
    }

    /// Drop everything and load the demo series.
    pub fn reset_to_demo(&mut self, last_year: i32) {
        self.series.clear();
        for (name, base, modulo, offset, step) in [
            ("Lausanne", 1100, 23, 11, 20),
            ("Lugano", 1200, 19, 9, 25),
            ("Zürich", 1000, 17, 8, 18),
            ("Davos", 900, 13, 6, 22),
        ] {
            let points = (DEMO_FIRST_YEAR..=last_year)
                .filter_map(|y| {
                    let ts = NaiveDate::from_ymd_opt(y, 1, 1)?.and_time(NaiveTime::MIN);
                    let value = base + (y % modulo - offset) * step;
                    Some(TimePoint::new(ts, Some(f64::from(value))))
                })
                .collect();
            self.import(name, points);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.values()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// `[earliest, latest]` timestamp over all series; `None` when there is no point.
    pub fn full_range(&self) -> Option<DateRange> {
        let all = self.series.values().flat_map(|s| s.points.iter());
        let (min, max) = all.fold(None, |acc, p| match acc {
            None => Some((p.timestamp, p.timestamp)),
            Some((lo, hi)) => Some((lo.min(p.timestamp), hi.max(p.timestamp))),
        })?;
        Some(DateRange::new(min, max))
    }

    /// Points of each selected series inside `range` (inclusive).
    ///
    /// Results follow the selection order; unknown and repeated names are skipped.
    pub fn filter<S: AsRef<str>>(&self, range: &DateRange, selected: &[S]) -> Vec<Series> {
        let mut out: Vec<Series> = Vec::new();
        for name in selected {
            let name = name.as_ref();
            if out.iter().any(|s| s.name == name) {
                continue;
            }
            if let Some(series) = self.series.get(name) {
                let points = series
                    .points
                    .iter()
                    .filter(|p| range.contains(p.timestamp))
                    .copied()
                    .collect();
                out.push(Series::new(name, points));
            }
        }
        out
    }
}
