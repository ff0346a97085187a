//! MeteoSwiss-style CSV import.
//!
//! Files are read as ISO-8859-1, the delimiter is sniffed from the first
//! [`SNIFF_CHARS`] characters, and headers are matched case- and
//! accent-insensitively against `Ville`, `Date et heure` and
//! `Précipitations (mm)`. Rows with an unparsable date are dropped; an
//! unparsable precipitation cell becomes a point without value.

use crate::error::{Error, Result};
use crate::models::{Series, TimePoint};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Number of leading characters inspected by [`detect_delimiter`].
pub const SNIFF_CHARS: usize = 2048;

/// Candidate delimiters, in tie-break order.
pub const DELIMITERS: [char; 3] = [';', ',', '\t'];

pub const HEADER_CITY: &str = "ville";
pub const HEADER_DATE: &str = "date et heure";
pub const HEADER_PRECIPITATION: &str = "precipitations (mm)";

/// Station codes found in the city column.
static CITY_CODES: [(&str, &str); 5] = [
    ("LSN", "Lausanne"),
    ("LUG", "Lugano"),
    ("ZRH", "Zürich"),
    ("DAV", "Davos"),
    ("DVS", "Davos"),
];

/// Read `path` and parse it into a named series.
///
/// The series is named after the first non-blank city cell, or the file stem
/// when the file has no city column.
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<Series> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let text = decode_latin1(&bytes);
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_series(&text, &fallback)
}

/// ISO-8859-1: every byte is the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parse already decoded file contents. `fallback_name` is used when no city
/// value is present.
pub fn parse_series(text: &str, fallback_name: &str) -> Result<Series> {
    let delimiter = detect_delimiter(text)?;

    let mut lines = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty());

    let header = match lines.next() {
        Some(line) => read_record(line, delimiter)?,
        None => None,
    }
    .ok_or_else(|| Error::Format("file has no header line".into()))?;
    let headers: Vec<String> = header.iter().map(normalize_header).collect();

    let idx_city = column_index(&headers, HEADER_CITY);
    let (idx_date, idx_prec) = match (
        column_index(&headers, HEADER_DATE),
        column_index(&headers, HEADER_PRECIPITATION),
    ) {
        (Some(d), Some(p)) => (d, p),
        _ => {
            return Err(Error::Format(
                "missing mandatory columns (Date et heure and/or Précipitations (mm))".into(),
            ));
        }
    };
    log::debug!(
        "delimiter {:?}, columns: city={:?} date={} precipitation={}",
        delimiter,
        idx_city,
        idx_date,
        idx_prec
    );

    let required = idx_date.max(idx_prec);
    let mut city: Option<String> = None;
    let mut points = Vec::new();
    let mut dropped = 0usize;

    for line in lines {
        let Some(record) = read_record(line, delimiter)? else {
            continue;
        };

        if city.is_none()
            && let Some(value) = idx_city
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        {
            city = Some(value.to_string());
        }

        if record.len() <= required {
            continue;
        }
        match parse_date(&record[idx_date]) {
            Some(ts) => points.push(TimePoint::new(ts, parse_value(&record[idx_prec]))),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("dropped {} rows with an unparsable date", dropped);
    }

    // Stable: rows sharing a timestamp keep their file order.
    points.sort_by_key(|p| p.timestamp);

    let name = city
        .map(|c| guess_city_name(&c))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| fallback_name.to_string());

    Ok(Series::new(name, points))
}

/// Split one line into cells. Each line gets its own reader, so an unbalanced
/// quote ends with its line.
fn read_record(line: &str, delimiter: char) -> Result<Option<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    Ok(reader.records().next().transpose()?)
}

/// Most frequent of `;`, `,`, `\t` among the first [`SNIFF_CHARS`] characters.
pub fn detect_delimiter(text: &str) -> Result<char> {
    let mut counts = [0usize; DELIMITERS.len()];
    for c in text.chars().take(SNIFF_CHARS) {
        if let Some(i) = DELIMITERS.iter().position(|d| *d == c) {
            counts[i] += 1;
        }
    }

    let mut best: Option<usize> = None;
    for (i, &n) in counts.iter().enumerate() {
        if n > 0 && best.is_none_or(|b| n > counts[b]) {
            best = Some(i);
        }
    }
    best.map(|i| DELIMITERS[i])
        .ok_or_else(|| Error::Format("unknown delimiter".into()))
}

/// Trim, lower-case and strip diacritics, e.g. `"PRÉCIPITATIONS (MM)"` →
/// `"precipitations (mm)"`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !is_combining_mark(*c))
        .map(fold_diacritic)
        .collect()
}

fn column_index(headers: &[String], target: &str) -> Option<usize> {
    headers.iter().position(|h| h == target)
}

fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// Base letter of a precomposed lower-case letter. Letters without a
/// canonical decomposition (`ø`, `æ`, `ß`, ...) are kept.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// Map a station code to its city name; unknown values are returned trimmed.
pub fn guess_city_name(code_or_name: &str) -> String {
    let key = code_or_name.trim();
    CITY_CODES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(key))
        .map(|(_, city)| city.to_string())
        .unwrap_or_else(|| key.to_string())
}

// ---------------------------------------------------------------------------
// Dates

const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";
const DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

static FR_CH_DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{1,2})[./-](\d{1,2})[./-](\d{4}|\d{2})(?:\s+(\d{1,2}):(\d{2})(?::(\d{2}))?)?$",
    )
    .expect("valid day-first date regex")
});

static ISO_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})[T ](\d{1,2}):(\d{2})(?::(\d{2}))?$")
        .expect("valid ISO date-time regex")
});

/// Parse a date cell.
///
/// Exact formats are tried first (`dd.MM.yyyy HH:mm`, `dd.MM.yyyy`,
/// `yyyy-MM-dd`, `yyyy`), then the French-Swiss day-first forms
/// `d.M.yyyy [H:mm[:ss]]` (separators `.`, `/` or `-`), `d.M.yy` (`00`–`49` →
/// 20xx, `50`–`99` → 19xx) and ISO `yyyy-MM-ddTHH:mm[:ss]`. Years outside
/// 1..=9999 are rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_exact_date(s)
        .or_else(|| parse_fr_ch_date(s))
        .filter(|ts| (1..=9999).contains(&ts.year()))
}

fn parse_exact_date(s: &str) -> Option<NaiveDateTime> {
    if has_four_digit_year(s, DATE_TIME_FORMAT)
        && let Ok(ts) = NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT)
    {
        return Some(ts);
    }
    for fmt in DATE_FORMATS {
        if has_four_digit_year(s, fmt)
            && let Ok(d) = NaiveDate::parse_from_str(s, fmt)
        {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.and_time(NaiveTime::MIN));
    }
    None
}

/// chrono's `%Y` also takes short years; the exact formats want `yyyy`.
fn has_four_digit_year(s: &str, fmt: &str) -> bool {
    let token = if fmt.starts_with("%Y") {
        s.split('-').next()
    } else {
        s.split(['.', ' ']).nth(2)
    };
    token.is_some_and(|t| t.len() == 4 && t.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_fr_ch_date(s: &str) -> Option<NaiveDateTime> {
    if let Some(caps) = FR_CH_DAY_FIRST.captures(s) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = match &caps[3] {
            y if y.len() == 2 => {
                let short: i32 = y.parse().ok()?;
                if short < 50 { 2000 + short } else { 1900 + short }
            }
            y => y.parse().ok()?,
        };
        let time = time_from_captures(caps.get(4), caps.get(5), caps.get(6))?;
        return NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(time));
    }
    if let Some(caps) = ISO_DATE_TIME.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        let time = time_from_captures(caps.get(4), caps.get(5), caps.get(6))?;
        return NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(time));
    }
    None
}

fn time_from_captures(
    hour: Option<regex::Match<'_>>,
    minute: Option<regex::Match<'_>>,
    second: Option<regex::Match<'_>>,
) -> Option<NaiveTime> {
    let field = |m: Option<regex::Match<'_>>| -> Option<u32> {
        match m {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    NaiveTime::from_hms_opt(field(hour)?, field(minute)?, field(second)?)
}

// ---------------------------------------------------------------------------
// Numbers

struct NumberFormat {
    decimal: char,
    groups: &'static [char],
}

const FR_CH: NumberFormat = NumberFormat {
    decimal: ',',
    groups: &[' ', '\u{a0}', '\u{202f}', '\'', '\u{2019}'],
};

const INVARIANT: NumberFormat = NumberFormat {
    decimal: '.',
    groups: &[','],
};

/// Parse a precipitation cell: French-Swiss conventions first (`1 234,5`),
/// then invariant ones (`1,234.5`). Non-finite results are rejected.
pub fn parse_value(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_number(s, &FR_CH).or_else(|| parse_number(s, &INVARIANT))
}

fn parse_number(s: &str, fmt: &NumberFormat) -> Option<f64> {
    let (negative, body) = split_sign(s)?;

    let mut normalized = String::with_capacity(body.len());
    let mut digits = false;
    let mut seen_decimal = false;
    let mut seen_exponent = false;
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '0'..='9' => {
                normalized.push(c);
                digits = true;
            }
            c if c == fmt.decimal && !seen_decimal && !seen_exponent => {
                normalized.push('.');
                seen_decimal = true;
            }
            c if fmt.groups.contains(&c) && digits && !seen_decimal && !seen_exponent => {}
            'e' | 'E' if digits && !seen_exponent => {
                seen_exponent = true;
                normalized.push('e');
                if let Some(&sign) = chars.peek()
                    && matches!(sign, '+' | '-')
                {
                    normalized.push(sign);
                    chars.next();
                }
            }
            _ => return None,
        }
    }
    if !digits {
        return None;
    }

    let v: f64 = normalized.parse().ok()?;
    let v = if negative { -v } else { v };
    v.is_finite().then_some(v)
}

/// Leading/trailing sign or parentheses. Returns (negative, unsigned body).
fn split_sign(s: &str) -> Option<(bool, &str)> {
    if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        return Some((true, inner.trim()));
    }
    let leading = s.chars().next().filter(|c| matches!(c, '+' | '-'));
    let trailing = s.chars().last().filter(|c| matches!(c, '+' | '-'));
    match (leading, trailing) {
        (Some(_), Some(_)) if s.len() > 1 => None,
        (Some(sign), _) => Some((sign == '-', s[1..].trim_start())),
        (None, Some(sign)) => Some((sign == '-', s[..s.len() - 1].trim_end())),
        (None, None) => Some((false, s)),
    }
}
