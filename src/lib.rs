//! precip_rs
//!
//! Import MeteoSwiss precipitation CSV exports, filter them by city and date
//! range, and chart them. Pairs with the `precip` CLI and the `precip-gui`
//! desktop app.
//!
//! ### Features
//! - Tolerant CSV import: delimiter sniffing, accent-insensitive headers,
//!   French-Swiss and invariant number/date parsing, station code lookup
//! - In-memory series store with date-range and city filters
//! - Canned function overlays (`x^2`, `sin(x)`, ...)
//! - Summary statistics and SVG/PNG line charts
//!
//! ### Example
//! ```no_run
//! use precip_rs::{DateRange, SeriesStore};
//! use chrono::NaiveDate;
//!
//! let mut store = SeriesStore::new();
//! let name = store.import_file("zurich.csv")?;
//! let range = DateRange::from_dates(
//!     NaiveDate::from_ymd_opt(1950, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(),
//! );
//! let filtered = store.filter(&range, &[name]);
//! println!("{:#?}", precip_rs::stats::summarize(&filtered));
//! # Ok::<(), precip_rs::Error>(())
//! ```

pub mod error;
pub mod functions;
pub mod importer;
pub mod models;
pub mod session;
pub mod stats;
pub mod store;
pub mod viz;

pub use error::{Error, Result};
pub use models::{Curve, CurveKind, DateRange, FilterParams, Series, TimePoint};
pub use session::Session;
pub use store::SeriesStore;
