use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Observation;
use crate::store::Dataset;

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total_rows: usize,
    pub regions: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub metric_totals: BTreeMap<String, f64>,
    /// Cells with no value, per metric.
    pub missing_values: BTreeMap<String, usize>,
}

impl DatasetSummary {
    pub fn detailed_summary(&self) -> String {
        let mut out = String::new();
        out.push_str("Dataset Summary\n");
        out.push_str("===============\n");
        out.push_str(&format!("Rows:    {}\n", self.total_rows));
        out.push_str(&format!("Regions: {}\n", self.regions));
        match self.date_range {
            Some((first, last)) => {
                let days = (last - first).num_days() + 1;
                out.push_str(&format!("Dates:   {first} to {last} ({days} days)\n"));
            }
            None => out.push_str("Dates:   none\n"),
        }

        out.push_str("\nMetric totals:\n");
        for (metric, total) in &self.metric_totals {
            let missing = self.missing_values.get(metric).copied().unwrap_or(0);
            out.push_str(&format!("  {metric:<12} {total:>14.0}  ({missing} missing)\n"));
        }
        out
    }
}

pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze<R: Observation>(&self, dataset: &Dataset<R>) -> DatasetSummary {
        let mut metric_totals = BTreeMap::new();
        let mut missing_values = BTreeMap::new();

        for metric in R::METRICS {
            let (total, missing) = dataset
                .rows()
                .iter()
                .fold((0.0, 0usize), |(total, missing), row| match row.metric(metric) {
                    Some(v) => (total + v, missing),
                    None => (total, missing + 1),
                });
            metric_totals.insert(metric.to_string(), total);
            missing_values.insert(metric.to_string(), missing);
        }

        DatasetSummary {
            total_rows: dataset.len(),
            regions: dataset.regions().count(),
            date_range: dataset.date_range(),
            metric_totals,
            missing_values,
        }
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
