//! Plain-text rendering of scan and campaign results.

use crate::campaign::CampaignSummary;
use crate::scan::ScanReport;
use std::fmt;

/// Line shown when a scan finds nothing.
pub const NO_ISSUES_MESSAGE: &str = "No data quality issues detected!";

const RULE_WIDTH: usize = 80;

/// Render a scan report for a terminal or chat message.
pub fn render_scan_report(report: &ScanReport) -> String {
    ScanReportText(report).to_string()
}

/// Render campaign search results.
pub fn render_campaigns(query: &str, campaigns: &[CampaignSummary]) -> String {
    if campaigns.is_empty() {
        return format!("No campaigns found matching '{}'", query);
    }
    CampaignsText { query, campaigns }.to_string()
}

struct ScanReportText<'a>(&'a ScanReport);

impl fmt::Display for ScanReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "DATA QUALITY SCAN ({})", report.generated_at)?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;

        for object in &report.objects {
            write!(
                f,
                "{:<16} {:>6} records  {:>3} issue(s)",
                object.object_type, object.records_scanned, object.issue_count
            )?;
            if object.truncated {
                write!(f, "  (truncated)")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        if report.is_clean() {
            writeln!(f, "{NO_ISSUES_MESSAGE}")?;
        } else {
            writeln!(f, "Issues:")?;
            for (object_type, _, issue) in report.issues.issues() {
                writeln!(f, "  - [{}] {}: {}", issue.severity, object_type, issue.message)?;
                if let Some(samples) = &issue.sample_values {
                    let shown: Vec<String> = samples.iter().map(|v| format_amount(*v)).collect();
                    writeln!(f, "      e.g. {}", shown.join(", "))?;
                }
            }
        }
        writeln!(f)?;

        writeln!(
            f,
            "Overall Data Quality Score: {} ({})",
            report.quality_score, report.band
        )?;
        let rate = &report.issue_rate;
        writeln!(
            f,
            "Issue rate (unweighted, separate from the score): {:.1}% ({} of {} records, naive score {:.1})",
            rate.percentage, rate.total_issue_count, rate.total_records, rate.naive_score
        )?;
        write!(f, "{rule}")
    }
}

struct CampaignsText<'a> {
    query: &'a str,
    campaigns: &'a [CampaignSummary],
}

impl fmt::Display for CampaignsText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Campaign Analytics: {}", self.query)?;

        for campaign in self.campaigns {
            writeln!(f)?;
            writeln!(f, "{}", "-".repeat(40))?;
            writeln!(f, "Campaign:        {}", campaign.name)?;
            writeln!(f, "Status:          {}", campaign.status)?;
            writeln!(f, "Actual Cost:     {}", format_currency(campaign.actual_cost))?;
            writeln!(f, "Budgeted Cost:   {}", format_currency(campaign.budgeted_cost))?;
            writeln!(f, "Revenue Won:     {}", format_currency(campaign.revenue_won))?;
            writeln!(f, "ROI:             {:.1}%", campaign.metrics.roi)?;
            writeln!(f, "Conversion Rate: {:.1}%", campaign.metrics.conversion_rate)?;
            writeln!(f, "Leads:           {}", format_amount(campaign.leads))?;
            write!(f, "Opportunities:   {}", format_amount(campaign.opportunities))?;
        }
        Ok(())
    }
}

/// `1234567.891` -> `$1,234,567.89`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Whole numbers without a fractional part, everything else with two decimals.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::CampaignMetrics;
    use crate::config::ThresholdConfig;
    use crate::quality::QualityScorer;
    use crate::scan::{IssueRate, ObjectSummary};
    use crate::types::{Issue, IssueMap, IssueSet, Severity};
    use pretty_assertions::assert_eq;

    fn report(issues: IssueSet, records: usize) -> ScanReport {
        let quality_score = QualityScorer::score(&issues);
        ScanReport {
            generated_at: "2024-07-01 12:00:00".to_string(),
            thresholds: ThresholdConfig::default(),
            objects: vec![ObjectSummary {
                object_type: "Account".to_string(),
                records_scanned: records,
                truncated: false,
                issue_count: issues.issue_count(),
            }],
            issue_rate: IssueRate::compute(&issues, records),
            band: quality_score.band(),
            quality_score,
            issues,
        }
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-2500.0), "-$2,500.00");
    }

    #[test]
    fn test_clean_report_says_so() {
        let text = render_scan_report(&report(IssueSet::new(), 12));
        assert!(text.contains(NO_ISSUES_MESSAGE));
        assert!(text.contains("Overall Data Quality Score: 100.0 (A)"));
    }

    #[test]
    fn test_report_layout() {
        let mut scan = report(IssueSet::new(), 12);
        scan.objects[0].truncated = true;
        let text = render_scan_report(&scan);

        let rule = "=".repeat(RULE_WIDTH);
        assert!(text.starts_with(&format!("{rule}\nDATA QUALITY SCAN (2024-07-01 12:00:00)\n{rule}\n")));
        assert!(text.ends_with(&rule));
        assert!(text.contains("Account              12 records    0 issue(s)  (truncated)\n"));
    }

    #[test]
    fn test_issue_lines_and_separate_rate() {
        let mut map = IssueMap::new();
        map.insert(
            "missing_phone".to_string(),
            Issue::new(Severity::High, 3, 30.0, "30.0% of accounts missing Phone"),
        );
        let mut issues = IssueSet::new();
        issues.insert("Account", map);

        let text = render_scan_report(&report(issues, 10));

        assert!(text.contains("  - [HIGH] Account: 30.0% of accounts missing Phone"));
        assert!(text.contains("Overall Data Quality Score: 80.0 (C)"));
        assert!(text.contains("Issue rate (unweighted, separate from the score): 30.0% (3 of 10 records, naive score 70.0)"));
        assert!(!text.contains(NO_ISSUES_MESSAGE));
    }

    #[test]
    fn test_render_campaigns() {
        let summary = CampaignSummary {
            name: "Spring Launch".to_string(),
            status: "Completed".to_string(),
            actual_cost: 1000.0,
            budgeted_cost: 1500.0,
            revenue_won: 4000.0,
            leads: 200.0,
            converted_leads: 50.0,
            opportunities: 12.0,
            metrics: CampaignMetrics {
                roi: 300.0,
                conversion_rate: 25.0,
            },
        };

        let text = render_campaigns("spring", std::slice::from_ref(&summary));
        assert!(text.starts_with("Campaign Analytics: spring"));
        assert!(text.contains("Revenue Won:     $4,000.00"));
        assert!(text.contains("ROI:             300.0%"));
        assert!(text.contains("Conversion Rate: 25.0%"));
        assert!(text.ends_with("Opportunities:   12"));

        let both = render_campaigns("spring", &[summary.clone(), summary]);
        assert_eq!(both.matches(&"-".repeat(40)).count(), 2);
        assert!(!both.ends_with('\n'));

        assert_eq!(
            render_campaigns("autumn", &[]),
            "No campaigns found matching 'autumn'"
        );
    }
}
