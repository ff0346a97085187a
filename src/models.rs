use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One timestamped observation. A missing value is `None`, never a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

impl TimePoint {
    pub fn new(timestamp: NaiveDateTime, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

/// A named series, points ordered by ascending timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<TimePoint>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<TimePoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.points.last().map(|p| p.timestamp)
    }
}

/// Inclusive date-time range. Bounds are swapped on construction when reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl DateRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        if from > to {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    /// Range covering every representable timestamp.
    pub fn unbounded() -> Self {
        Self {
            from: NaiveDateTime::MIN,
            to: NaiveDateTime::MAX,
        }
    }

    /// Range between two calendar days, both taken at midnight.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Self {
        Self::new(from.and_time(NaiveTime::MIN), to.and_time(NaiveTime::MIN))
    }

    pub fn from(&self) -> NaiveDateTime {
        self.from
    }

    pub fn to(&self) -> NaiveDateTime {
        self.to
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.from && ts <= self.to
    }
}

/// Everything a redraw needs to know about the user's selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    pub range: DateRange,
    /// Series names in display order.
    pub selected: Vec<String>,
    /// Label of the overlaid function, if any.
    pub function: Option<String>,
    /// Number of samples for the function curve.
    pub samples: usize,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            range: DateRange::unbounded(),
            selected: Vec::new(),
            function: None,
            samples: crate::functions::DEFAULT_SAMPLES,
        }
    }
}

/// What a chart curve was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    /// Precipitation series; x is an OLE-Automation date serial.
    Series,
    /// Sampled auxiliary function; x is the function argument.
    Function,
}

/// Chart-ready curve: `(x, y)` pairs where `y = None` is a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub name: String,
    pub kind: CurveKind,
    pub points: Vec<(f64, Option<f64>)>,
}

impl Curve {
    pub fn from_series(series: &Series) -> Self {
        Self {
            name: series.name.clone(),
            kind: CurveKind::Series,
            points: series
                .points
                .iter()
                .map(|p| (to_oa_date(p.timestamp), p.value))
                .collect(),
        }
    }

    /// Contiguous runs of present values; a gap ends the current run.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        for &(x, y) in &self.points {
            match y {
                Some(y) if y.is_finite() => current.push((x, y)),
                _ => {
                    if !current.is_empty() {
                        out.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

/// OLE-Automation serial of 1970-01-01.
const OA_UNIX_EPOCH: f64 = 25_569.0;
const MS_PER_DAY: f64 = 86_400_000.0;
/// Serial bounds of 0100-01-01 and 9999-12-31 23:59:59.
const OA_MIN: f64 = -657_435.0;
const OA_MAX: f64 = 2_958_466.0;

/// Days since 1899-12-30, fractional for the time of day.
pub fn to_oa_date(ts: NaiveDateTime) -> f64 {
    OA_UNIX_EPOCH + ts.and_utc().timestamp_millis() as f64 / MS_PER_DAY
}

/// Inverse of [`to_oa_date`], rounded to the millisecond.
pub fn from_oa_date(serial: f64) -> Result<NaiveDateTime> {
    if !serial.is_finite() || !(OA_MIN..OA_MAX).contains(&serial) {
        return Err(Error::DateRange(format!("serial {} is not a valid date", serial)));
    }
    let ms = ((serial - OA_UNIX_EPOCH) * MS_PER_DAY).round() as i64;
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| Error::DateRange(format!("serial {} is not a valid date", serial)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn oa_serials_match_known_days() {
        assert_eq!(to_oa_date(ymd(1899, 12, 30)), 0.0);
        assert_eq!(to_oa_date(ymd(1900, 1, 1)), 2.0);
        assert_eq!(to_oa_date(ymd(2000, 1, 1)), 36_526.0);
        let noon = ymd(2000, 1, 1) + chrono::TimeDelta::hours(12);
        assert_eq!(to_oa_date(noon), 36_526.5);
        assert_eq!(from_oa_date(36_526.5).unwrap(), noon);
    }

    #[test]
    fn oa_out_of_range_is_date_range_error() {
        assert!(matches!(from_oa_date(f64::NAN), Err(Error::DateRange(_))));
        assert!(matches!(from_oa_date(1.0e9), Err(Error::DateRange(_))));
    }

    #[test]
    fn segments_split_on_gaps() {
        let c = Curve {
            name: "x".into(),
            kind: CurveKind::Series,
            points: vec![
                (0.0, Some(1.0)),
                (1.0, Some(2.0)),
                (2.0, None),
                (3.0, Some(3.0)),
                (4.0, None),
            ],
        };
        assert_eq!(
            c.segments(),
            vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(3.0, 3.0)]]
        );
    }

    #[test]
    fn reversed_range_is_swapped() {
        let r = DateRange::new(ymd(2000, 1, 1), ymd(1900, 1, 1));
        assert_eq!(r.from(), ymd(1900, 1, 1));
        assert_eq!(r.to(), ymd(2000, 1, 1));
        assert!(r.contains(ymd(1950, 6, 1)));
    }
}
