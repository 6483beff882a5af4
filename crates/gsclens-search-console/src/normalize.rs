//! Row normalizer: converts raw `searchAnalytics` rows into [`Record`]s.
//!
//! Validation happens here, at the boundary. A row whose key list does not
//! match the requested dimensions is rejected immediately rather than
//! producing a half-filled record.

use chrono::NaiveDate;
use gsclens_core::{Dataset, Dimension, QueryWindow, Record};

use crate::error::GscError;
use crate::types::RawRow;

/// Parses a `"YYYY-MM-DD"` date string into a [`NaiveDate`].
///
/// Returns `None` if the string does not match the expected format.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Converts an optional wire count into a non-negative integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

fn rate(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

fn position(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Normalizes one raw row given the dimensions it was requested with, in order.
///
/// Missing counts default to `0`, missing rates to `0.0`. Keys for dimensions
/// that a [`Record`] does not carry (country, device) are accepted and dropped.
///
/// # Errors
///
/// - [`GscError::MalformedRow`] if the key count differs from the dimension count.
/// - [`GscError::MalformedDate`] if a `date` key is not `YYYY-MM-DD`.
pub fn normalize_row(row: &RawRow, dimensions: &[Dimension]) -> Result<Record, GscError> {
    if row.keys.len() != dimensions.len() {
        return Err(GscError::MalformedRow {
            expected: dimensions.len(),
            actual: row.keys.len(),
        });
    }

    let mut record = Record {
        date: None,
        query: None,
        page: None,
        clicks: count(row.clicks),
        impressions: count(row.impressions),
        ctr: rate(row.ctr),
        position: position(row.position),
    };

    for (dimension, key) in dimensions.iter().zip(&row.keys) {
        match dimension {
            Dimension::Date => {
                let date = parse_date(key).ok_or_else(|| GscError::MalformedDate(key.clone()))?;
                record.date = Some(date);
            }
            Dimension::Query => record.query = Some(key.clone()),
            Dimension::Page => record.page = Some(key.clone()),
            Dimension::Country | Dimension::Device => {}
        }
    }

    Ok(record)
}

/// Normalizes a full response into a [`Dataset`] bound to `window`.
///
/// # Errors
///
/// Fails on the first malformed row (see [`normalize_row`]) or with
/// [`GscError::OutOfWindow`] if a dated row falls outside the window.
pub fn normalize_rows(rows: &[RawRow], window: &QueryWindow) -> Result<Dataset, GscError> {
    let records = rows
        .iter()
        .map(|row| {
            let record = normalize_row(row, &window.dimensions)?;
            if let Some(date) = record.date {
                if !window.contains(date) {
                    return Err(GscError::OutOfWindow {
                        date,
                        start: window.start_date,
                        end: window.end_date,
                    });
                }
            }
            Ok(record)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::new(window.clone(), records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(keys: &[&str], clicks: f64, impressions: f64, ctr: f64, position: f64) -> RawRow {
        RawRow {
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
            clicks: Some(clicks),
            impressions: Some(impressions),
            ctr: Some(ctr),
            position: Some(position),
        }
    }

    fn window(dimensions: Vec<Dimension>) -> QueryWindow {
        QueryWindow::new(
            "https://example.com/",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            dimensions,
        )
        .unwrap()
    }

    #[test]
    fn parse_date_valid() {
        let d = parse_date("2025-03-15");
        assert_eq!(d, Some(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
    }

    #[test]
    fn parse_date_invalid() {
        assert_eq!(parse_date("15/03/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn normalize_row_maps_keys_in_order() {
        let row = raw(
            &["2025-01-05", "running shoes", "https://example.com/shoes"],
            12.0,
            340.0,
            0.035,
            4.2,
        );
        let record =
            normalize_row(&row, &[Dimension::Date, Dimension::Query, Dimension::Page]).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 1, 5));
        assert_eq!(record.query.as_deref(), Some("running shoes"));
        assert_eq!(record.page.as_deref(), Some("https://example.com/shoes"));
        assert_eq!(record.clicks, 12);
        assert_eq!(record.impressions, 340);
        assert!((record.ctr - 0.035).abs() < 1e-12);
        assert!((record.position - 4.2).abs() < 1e-12);
    }

    #[test]
    fn normalize_row_defaults_missing_metrics() {
        let row = RawRow {
            keys: vec!["shoes".to_string()],
            clicks: None,
            impressions: None,
            ctr: None,
            position: None,
        };
        let record = normalize_row(&row, &[Dimension::Query]).unwrap();
        assert_eq!(record.clicks, 0);
        assert_eq!(record.impressions, 0);
        assert_eq!(record.ctr, 0.0);
        assert_eq!(record.position, 0.0);
    }

    #[test]
    fn normalize_row_rejects_key_count_mismatch() {
        let row = raw(&["shoes"], 1.0, 10.0, 0.1, 3.0);
        let err = normalize_row(&row, &[Dimension::Date, Dimension::Query]).unwrap_err();
        assert!(matches!(
            err,
            GscError::MalformedRow {
                expected: 2,
                actual: 1
            }
        ));
        assert!(err.is_malformed_row());
    }

    #[test]
    fn normalize_row_rejects_bad_date() {
        let row = raw(&["yesterday"], 1.0, 10.0, 0.1, 3.0);
        let err = normalize_row(&row, &[Dimension::Date]).unwrap_err();
        assert!(matches!(err, GscError::MalformedDate(ref s) if s == "yesterday"));
    }

    #[test]
    fn normalize_row_ignores_uncarried_dimensions() {
        let row = raw(&["ita", "MOBILE", "scarpe"], 2.0, 20.0, 0.1, 6.0);
        let record = normalize_row(
            &row,
            &[Dimension::Country, Dimension::Device, Dimension::Query],
        )
        .unwrap();
        assert_eq!(record.query.as_deref(), Some("scarpe"));
        assert_eq!(record.date, None);
        assert_eq!(record.page, None);
    }

    #[test]
    fn normalize_row_clamps_out_of_range_metrics() {
        let row = raw(&["shoes"], -3.0, 10.4, 1.7, -1.0);
        let record = normalize_row(&row, &[Dimension::Query]).unwrap();
        assert_eq!(record.clicks, 0);
        assert_eq!(record.impressions, 10);
        assert_eq!(record.ctr, 1.0);
        assert_eq!(record.position, 0.0);
    }

    #[test]
    fn normalize_rows_builds_dataset_for_window() {
        let w = window(vec![Dimension::Date]);
        let rows = vec![
            raw(&["2025-01-01"], 5.0, 50.0, 0.1, 3.0),
            raw(&["2025-01-02"], 7.0, 70.0, 0.1, 3.0),
        ];
        let ds = normalize_rows(&rows, &w).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.total_clicks(), 12);
        assert_eq!(ds.window(), Some(&w));
    }

    #[test]
    fn normalize_rows_rejects_date_outside_window() {
        let w = window(vec![Dimension::Date]);
        let rows = vec![raw(&["2025-02-01"], 5.0, 50.0, 0.1, 3.0)];
        let err = normalize_rows(&rows, &w).unwrap_err();
        assert!(matches!(err, GscError::OutOfWindow { .. }));
    }

    #[test]
    fn normalize_rows_empty_is_empty_dataset() {
        let w = window(vec![Dimension::Query]);
        let ds = normalize_rows(&[], &w).unwrap();
        assert!(ds.is_empty());
    }
}
