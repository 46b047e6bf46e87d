//! Summary statistics over a collected CSV file.

use std::fmt::Write as _;
use std::path::Path;

use crate::persist::PersistResult;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); needs at least two values.
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(column: &str, values: &[f64], missing: usize) -> Self {
        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std_dev = match mean {
            Some(m) if count > 1 => {
                let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (count - 1) as f64;
                Some(var.sqrt())
            }
            _ => None,
        };
        Self {
            column: column.to_string(),
            count,
            missing,
            mean,
            std_dev,
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
        }
    }
}

/// One summary per column, in file order. Empty or non-numeric fields count as missing.
pub fn summarize(path: &Path) -> PersistResult<Vec<ColumnSummary>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    let mut missing = vec![0usize; headers.len()];

    for row in reader.records() {
        let row = row?;
        for (i, field) in row.iter().enumerate().take(headers.len()) {
            match field.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => values[i].push(v),
                _ => missing[i] += 1,
            }
        }
    }

    Ok(headers
        .iter()
        .zip(values.iter().zip(missing))
        .map(|(name, (vals, miss))| ColumnSummary::from_values(name, vals, miss))
        .collect())
}

pub fn render_table(summaries: &[ColumnSummary]) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |x| format!("{x:.6}"));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>8} {:>8} {:>16} {:>16} {:>16} {:>16}",
        "column", "count", "missing", "mean", "std", "min", "max"
    );
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<16} {:>8} {:>8} {:>16} {:>16} {:>16} {:>16}",
            s.column,
            s.count,
            s.missing,
            fmt(s.mean),
            fmt(s.std_dev),
            fmt(s.min),
            fmt(s.max)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::SlippageRecord;
    use crate::persist::{CsvSink, PersistError, RecordSink, CSV_COLUMNS};

    fn record(bid: f64, buy: Option<f64>) -> SlippageRecord {
        SlippageRecord {
            best_bid: Some(bid),
            best_ask: Some(bid + 1.0),
            spread: Some(1.0),
            buy_slippage: buy,
            sell_slippage: None,
            depth_slippage: Some(0.5),
            timestamp: 1.0,
        }
    }

    #[test]
    fn test_from_values() {
        let s = ColumnSummary::from_values("x", &[1.0, 2.0, 3.0, 4.0], 1);
        assert_eq!(s.count, 4);
        assert_eq!(s.missing, 1);
        assert_eq!(s.mean, Some(2.5));
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(4.0));
        assert!((s.std_dev.unwrap() - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_from_values_empty_and_single() {
        let empty = ColumnSummary::from_values("x", &[], 3);
        assert_eq!((empty.mean, empty.std_dev, empty.min), (None, None, None));
        let single = ColumnSummary::from_values("x", &[7.0], 0);
        assert_eq!(single.mean, Some(7.0));
        assert_eq!(single.std_dev, None);
    }

    #[test]
    fn test_summarize_collected_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvSink::new(&path);
        sink.append(&[record(100.0, Some(0.2)), record(102.0, None)], true).unwrap();
        sink.append(&[record(104.0, Some(0.4))], false).unwrap();

        let summaries = summarize(&path).unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(names, CSV_COLUMNS.to_vec());

        let bid = &summaries[0];
        assert_eq!(bid.count, 3);
        assert_eq!(bid.mean, Some(102.0));

        let buy = &summaries[3];
        assert_eq!(buy.count, 2);
        assert_eq!(buy.missing, 1);
        assert!((buy.mean.unwrap() - 0.3).abs() < 1e-12);

        let sell = &summaries[4];
        assert_eq!(sell.count, 0);
        assert_eq!(sell.missing, 3);

        let table = render_table(&summaries);
        assert!(table.lines().next().unwrap().starts_with("column"));
        assert_eq!(table.lines().count(), 8);
    }

    #[test]
    fn test_summarize_missing_file() {
        let err = summarize(Path::new("/no/such/slippage.csv")).unwrap_err();
        assert!(matches!(err, PersistError::Csv(_)));
    }
}
