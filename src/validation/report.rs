/*!
 * Aggregated validation summary and report writers.
 *
 * A `ValidationSummary` is built from per-file reports and rendered either
 * as a Markdown document for reviewers or as JSON for tooling.
 */

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};

use crate::file_utils::FileManager;

use super::service::{FileReport, Rule, Violation};

/// Files listed in the Markdown ranking
const TOP_FILES: usize = 20;

/// Sample violations shown in the Markdown report
const SAMPLE_VIOLATIONS: usize = 50;

/// Sample violations taken from a single file
const SAMPLES_PER_FILE: usize = 10;

/// Display width for file names in tables
const MAX_NAME_WIDTH: usize = 60;

/// Per-rule totals across all files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub count: usize,
    pub auto_fixable: usize,
    pub affected_files: usize,
}

impl RuleSummary {
    pub fn manual(&self) -> usize {
        self.count - self.auto_fixable
    }
}

/// Totals across every validated file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_files: usize,
    pub total_cues: usize,
    pub total_violations: usize,
    pub files_with_violations: usize,
    pub files_clean: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_auto_fixable: usize,
    /// Keyed by rule code
    pub violations_by_rule: BTreeMap<String, RuleSummary>,
}

impl ValidationSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self {
            total_files: reports.len(),
            ..Default::default()
        };

        for report in reports {
            summary.total_cues += report.total_cues;
            summary.total_violations += report.violation_count();
            summary.total_errors += report.error_count();
            summary.total_warnings += report.warning_count();
            summary.total_auto_fixable += report.auto_fixable_count();
            if report.is_clean() {
                summary.files_clean += 1;
            } else {
                summary.files_with_violations += 1;
            }

            let mut rules_in_file: Vec<Rule> = Vec::new();
            for violation in &report.violations {
                let entry = summary
                    .violations_by_rule
                    .entry(violation.rule.code().to_string())
                    .or_default();
                entry.count += 1;
                if violation.auto_fixable {
                    entry.auto_fixable += 1;
                }
                if !rules_in_file.contains(&violation.rule) {
                    rules_in_file.push(violation.rule);
                    entry.affected_files += 1;
                }
            }
        }

        summary
    }

    /// Violations that need a human
    pub fn manual_count(&self) -> usize {
        self.total_violations - self.total_auto_fixable
    }

    /// Rules ordered by descending count, then by code
    pub fn rules_by_count(&self) -> Vec<(&str, &RuleSummary)> {
        let mut rules: Vec<(&str, &RuleSummary)> = self
            .violations_by_rule
            .iter()
            .map(|(code, data)| (code.as_str(), data))
            .collect();
        rules.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        rules
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole.max(1) as f64 * 100.0
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_WIDTH {
        name.to_string()
    } else {
        let head: String = name.chars().take(MAX_NAME_WIDTH).collect();
        format!("{}...", head)
    }
}

// @struct: JSON shape of one file in the machine-readable report
#[derive(Serialize)]
struct JsonFileEntry<'a> {
    file: String,
    total_cues: usize,
    violation_count: usize,
    error_count: usize,
    warning_count: usize,
    auto_fixable_count: usize,
    violations: &'a [Violation],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a ValidationSummary,
    files: Vec<JsonFileEntry<'a>>,
}

/// Renders and writes validation reports
pub struct ReportWriter;

impl ReportWriter {
    /// Markdown report with summary tables, samples and recommendations
    pub fn markdown(reports: &[FileReport], summary: &ValidationSummary, generated: DateTime<Local>) -> String {
        let mut md = String::new();

        md.push_str("# Caption Style Validation Report\n\n");
        md.push_str(&format!("**Generated:** {}\n\n", generated.format("%Y-%m-%d %H:%M:%S")));

        md.push_str("## Executive Summary\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Total Files Analyzed | {} |\n", summary.total_files));
        md.push_str(&format!("| Total Cues | {} |\n", summary.total_cues));
        md.push_str(&format!(
            "| Files with Violations | {} ({:.1}%) |\n",
            summary.files_with_violations,
            percent(summary.files_with_violations, summary.total_files)
        ));
        md.push_str(&format!("| Clean Files | {} |\n", summary.files_clean));
        md.push_str(&format!("| Total Violations | {} |\n", summary.total_violations));
        md.push_str(&format!("| Errors (Critical) | {} |\n", summary.total_errors));
        md.push_str(&format!("| Warnings | {} |\n", summary.total_warnings));
        md.push_str(&format!(
            "| **Auto-Fixable** | **{}** ({:.1}%) |\n",
            summary.total_auto_fixable,
            percent(summary.total_auto_fixable, summary.total_violations)
        ));
        md.push_str(&format!("| Manual Review Needed | {} |\n\n", summary.manual_count()));

        let rules = summary.rules_by_count();

        md.push_str("## Violations by Rule\n\n");
        md.push_str("| Rule | Count | Auto-Fixable | Manual | Affected Files |\n");
        md.push_str("|------|-------|--------------|--------|----------------|\n");
        for (code, data) in &rules {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                code,
                data.count,
                data.auto_fixable,
                data.manual(),
                data.affected_files
            ));
        }
        md.push('\n');

        md.push_str("## Rule Descriptions & Fix Strategies\n\n");
        for rule in Rule::ALL {
            if let Some(data) = summary.violations_by_rule.get(rule.code()) {
                md.push_str(&format!("### {}\n\n", rule.code()));
                md.push_str(&format!("**Description:** {}\n\n", rule.description()));
                md.push_str(&format!("**Fix Strategy:** {}\n\n", rule.fix_strategy()));
                md.push_str(&format!("**Occurrences:** {}\n\n", data.count));
            }
        }

        md.push_str(&format!("## Top {} Files by Violation Count\n\n", TOP_FILES));
        md.push_str("| File | Cues | Violations | Errors | Auto-Fix |\n");
        md.push_str("|------|------|------------|--------|----------|\n");
        let mut ranked: Vec<&FileReport> = reports.iter().filter(|r| !r.is_clean()).collect();
        ranked.sort_by(|a, b| b.violation_count().cmp(&a.violation_count()));
        for report in ranked.iter().take(TOP_FILES) {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                truncate_name(&report.file_name()),
                report.total_cues,
                report.violation_count(),
                report.error_count(),
                report.auto_fixable_count()
            ));
        }
        md.push('\n');

        md.push_str(&format!("## Sample Violations (First {})\n\n", SAMPLE_VIOLATIONS));
        let samples = reports
            .iter()
            .flat_map(|r| r.violations.iter().take(SAMPLES_PER_FILE).map(move |v| (r, v)))
            .take(SAMPLE_VIOLATIONS);
        for (report, v) in samples {
            md.push_str(&format!("### [{}] {} - Cue #{}\n\n", v.rule, report.file_name(), v.cue_index));
            md.push_str(&format!("- **Message:** {}\n", v.message));
            md.push_str(&format!("- **Severity:** {}\n", v.severity));
            if let Some(line) = v.line_number {
                md.push_str(&format!("- **Line:** {}\n", line));
            }
            if let Some(current) = &v.current_value {
                md.push_str(&format!("- **Current:** {}\n", current));
            }
            if let Some(limit) = &v.limit_value {
                md.push_str(&format!("- **Limit:** {}\n", limit));
            }
            md.push_str(&format!("- **Auto-fixable:** {}\n", if v.auto_fixable { "Yes" } else { "No" }));
            if let Some(suggestion) = &v.fix_suggestion {
                md.push_str(&format!("- **Suggestion:** {}\n", suggestion));
            }
            md.push('\n');
        }

        md.push_str("## Recommendations\n\n");
        if summary.total_auto_fixable > 0 {
            md.push_str("### Phase 1: Auto-Fix\n\n");
            md.push_str(&format!(
                "**{} violations** can be fixed automatically with `subreflow fix`:\n\n",
                summary.total_auto_fixable
            ));
            for (code, data) in rules.iter().filter(|(_, d)| d.auto_fixable > 0) {
                md.push_str(&format!("- **{}:** {} auto-fixable instances\n", code, data.auto_fixable));
            }
            md.push('\n');
        }
        if summary.manual_count() > 0 {
            md.push_str("### Phase 2: Manual Review\n\n");
            md.push_str(&format!("**{} violations** require manual intervention:\n\n", summary.manual_count()));
            for (code, data) in rules.iter().filter(|(_, d)| d.manual() > 0) {
                md.push_str(&format!("- **{}:** {} instances need manual review\n", code, data.manual()));
            }
            md.push('\n');
        }
        if summary.total_violations == 0 {
            md.push_str("No violations found.\n");
        }

        md
    }

    /// Machine-readable report with the summary and every violation
    pub fn json(reports: &[FileReport], summary: &ValidationSummary) -> Result<String> {
        let files = reports
            .iter()
            .map(|r| JsonFileEntry {
                file: r.path.display().to_string(),
                total_cues: r.total_cues,
                violation_count: r.violation_count(),
                error_count: r.error_count(),
                warning_count: r.warning_count(),
                auto_fixable_count: r.auto_fixable_count(),
                violations: &r.violations,
            })
            .collect();

        serde_json::to_string_pretty(&JsonReport { summary, files }).context("Failed to serialize validation report")
    }

    pub fn write_markdown<P: AsRef<Path>>(path: P, reports: &[FileReport], summary: &ValidationSummary) -> Result<()> {
        let content = Self::markdown(reports, summary, Local::now());
        FileManager::write_to_file(&path, &content)?;
        info!("Markdown report: {}", path.as_ref().display());
        Ok(())
    }

    pub fn write_json<P: AsRef<Path>>(path: P, reports: &[FileReport], summary: &ValidationSummary) -> Result<()> {
        let content = Self::json(reports, summary)?;
        FileManager::write_to_file(&path, &content)?;
        info!("JSON report: {}", path.as_ref().display());
        Ok(())
    }
}
