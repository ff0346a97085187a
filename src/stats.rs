use crate::models::Series;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Summary statistics for one series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub total: Option<f64>,
}

/// Compute statistics per series, in input order.
pub fn summarize(series: &[Series]) -> Vec<Summary> {
    series.iter().map(summarize_one).collect()
}

pub fn summarize_one(series: &Series) -> Summary {
    let mut vals: Vec<f64> = series.points.iter().filter_map(|p| p.value).collect();
    let missing = series.points.len() - vals.len();
    vals.sort_by(f64::total_cmp);

    let count = vals.len();
    let min = vals.first().copied();
    let max = vals.last().copied();
    let total = (count > 0).then(|| vals.iter().sum::<f64>());
    let mean = total.map(|t| t / count as f64);
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };

    Summary {
        name: series.name.clone(),
        count,
        missing,
        first: series.first_timestamp(),
        last: series.last_timestamp(),
        min,
        max,
        mean,
        median,
        total,
    }
}
