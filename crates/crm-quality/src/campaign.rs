//! Campaign performance metrics.
//!
//! ROI and conversion rate are derived per campaign record. A zero or
//! missing denominator yields 0 rather than "undefined", which keeps the
//! figures printable but can hide a campaign whose cost was never recorded.

use crate::config::ConfigValidationError;
use crate::error::Result;
use crate::record::{Record, RecordBatch};
use serde::{Deserialize, Serialize};

/// Default number of campaigns returned by a name search.
pub const DEFAULT_CAMPAIGN_MATCHES: usize = 5;

/// Campaign field names as exported by the CRM.
pub mod fields {
    pub const NAME: &str = "Name";
    pub const STATUS: &str = "Status";
    pub const ACTUAL_COST: &str = "ActualCost";
    pub const BUDGETED_COST: &str = "BudgetedCost";
    pub const AMOUNT_WON: &str = "AmountWonOpportunities";
    pub const LEADS: &str = "NumberOfLeads";
    pub const CONVERTED_LEADS: &str = "NumberOfConvertedLeads";
    pub const OPPORTUNITIES: &str = "NumberOfOpportunities";
}

/// Derived performance figures of one campaign, both in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub roi: f64,
    pub conversion_rate: f64,
}

impl CampaignMetrics {
    pub fn from_record(record: &Record) -> Self {
        Self {
            roi: roi(record),
            conversion_rate: conversion_rate(record),
        }
    }
}

/// `100 * (won - cost) / cost`; 0 without a non-zero cost or any won amount.
pub fn roi(record: &Record) -> f64 {
    let (Ok(cost), Ok(won)) = (
        record.number(fields::ACTUAL_COST),
        record.number(fields::AMOUNT_WON),
    ) else {
        return 0.0;
    };

    if cost == 0.0 {
        return 0.0;
    }
    100.0 * (won - cost) / cost
}

/// `100 * converted / leads`; 0 without a non-zero lead count.
pub fn conversion_rate(record: &Record) -> f64 {
    let Ok(leads) = record.number(fields::LEADS) else {
        return 0.0;
    };
    if leads == 0.0 {
        return 0.0;
    }

    let converted = record.number(fields::CONVERTED_LEADS).unwrap_or(0.0);
    100.0 * converted / leads
}

/// Display-ready view of one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub name: String,
    pub status: String,
    pub actual_cost: f64,
    pub budgeted_cost: f64,
    pub revenue_won: f64,
    pub leads: f64,
    pub converted_leads: f64,
    pub opportunities: f64,
    pub metrics: CampaignMetrics,
}

impl CampaignSummary {
    /// Absent numeric fields are shown as 0 and an absent status as "N/A".
    pub fn from_record(record: &Record) -> Self {
        let number = |field: &str| record.number(field).unwrap_or(0.0);

        Self {
            name: record.text(fields::NAME).unwrap_or_default().to_string(),
            status: record.text(fields::STATUS).unwrap_or("N/A").to_string(),
            actual_cost: number(fields::ACTUAL_COST),
            budgeted_cost: number(fields::BUDGETED_COST),
            revenue_won: number(fields::AMOUNT_WON),
            leads: number(fields::LEADS),
            converted_leads: number(fields::CONVERTED_LEADS),
            opportunities: number(fields::OPPORTUNITIES),
            metrics: CampaignMetrics::from_record(record),
        }
    }
}

/// Campaigns whose name contains `query` (case-insensitive), in batch order.
pub fn find_campaigns(batch: &RecordBatch, query: &str, max: usize) -> Result<Vec<CampaignSummary>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(ConfigValidationError::EmptyCampaignQuery.into());
    }

    Ok(batch
        .iter()
        .filter(|r| {
            r.text(fields::NAME)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .take(max)
        .map(CampaignSummary::from_record)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn campaign(name: &str, cost: Option<f64>, won: Option<f64>) -> Record {
        Record::new()
            .with(fields::NAME, name)
            .with(fields::ACTUAL_COST, cost)
            .with(fields::AMOUNT_WON, won)
    }

    #[test]
    fn test_roi() {
        assert_eq!(roi(&campaign("c", Some(1000.0), Some(3000.0))), 200.0);
        assert_eq!(roi(&campaign("c", Some(1000.0), Some(500.0))), -50.0);
        assert_eq!(roi(&campaign("c", Some(1000.0), Some(0.0))), -100.0);
    }

    #[test]
    fn test_roi_zero_cost_reports_zero() {
        assert_eq!(roi(&campaign("c", Some(0.0), Some(5000.0))), 0.0);
        assert_eq!(roi(&campaign("c", Some(0.0), Some(0.0))), 0.0);
        assert_eq!(roi(&campaign("c", None, Some(5000.0))), 0.0);
        assert_eq!(roi(&campaign("c", Some(1000.0), None)), 0.0);
    }

    #[test]
    fn test_conversion_rate() {
        let record = Record::new()
            .with(fields::LEADS, 200.0)
            .with(fields::CONVERTED_LEADS, 50.0);
        assert_eq!(conversion_rate(&record), 25.0);

        let no_leads = Record::new()
            .with(fields::LEADS, 0.0)
            .with(fields::CONVERTED_LEADS, 5.0);
        assert_eq!(conversion_rate(&no_leads), 0.0);
        assert_eq!(conversion_rate(&Record::new()), 0.0);

        let nothing_converted = Record::new().with(fields::LEADS, 40.0);
        assert_eq!(conversion_rate(&nothing_converted), 0.0);
    }

    #[test]
    fn test_summary_defaults() {
        let summary = CampaignSummary::from_record(&campaign("Spring Launch", None, None));
        assert_eq!(summary.name, "Spring Launch");
        assert_eq!(summary.status, "N/A");
        assert_eq!(summary.actual_cost, 0.0);
        assert_eq!(
            summary.metrics,
            CampaignMetrics {
                roi: 0.0,
                conversion_rate: 0.0
            }
        );
    }

    #[test]
    fn test_find_campaigns() {
        let batch = RecordBatch::new(
            "Campaign",
            vec![
                campaign("Spring Launch 2024", Some(1000.0), Some(4000.0)),
                campaign("Winter Webinar", Some(200.0), None),
                campaign("spring follow-up", None, None),
                Record::new().with(fields::STATUS, "Planned"),
            ],
        );

        let found = find_campaigns(&batch, "SPRING", DEFAULT_CAMPAIGN_MATCHES).unwrap();
        let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Spring Launch 2024", "spring follow-up"]);
        assert_eq!(found[0].metrics.roi, 300.0);

        assert_eq!(find_campaigns(&batch, "spring", 1).unwrap().len(), 1);
        assert!(find_campaigns(&batch, "autumn", 5).unwrap().is_empty());
    }

    #[test]
    fn test_find_campaigns_rejects_empty_query() {
        let err = find_campaigns(&RecordBatch::empty("Campaign"), "   ", 5).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
