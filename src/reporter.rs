use crate::models::{SeoReport, SeoSection};
use anyhow::Result;
use colored::*;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    pub fn print_text_report(report: &SeoReport) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "Seoscribe - SEO Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!(
            "{}: {}",
            "Analyzed URL".bright_white().bold(),
            report.analyzed_url
        );
        println!();

        Self::print_section(&report.on_page_analysis);
        Self::print_section(&report.off_page_analysis);

        // Overall summary
        println!(
            "{}",
            report.overall_summary.title.bright_yellow().bold().underline()
        );
        println!();

        if !report.overall_summary.strengths.is_empty() {
            println!("  {}", "Strengths".bright_green().bold());
            for strength in &report.overall_summary.strengths {
                println!("    + {}", strength);
            }
            println!();
        }

        if !report.overall_summary.weaknesses.is_empty() {
            println!("  {}", "Weaknesses".bright_red().bold());
            for weakness in &report.overall_summary.weaknesses {
                println!("    - {}", weakness);
            }
            println!();
        }

        let mut recommendations = report.overall_summary.top_recommendations.clone();
        recommendations.sort_by_key(|r| r.priority);

        if !recommendations.is_empty() {
            println!("  {}", "Top Recommendations".bright_white().bold());
            for rec in &recommendations {
                println!(
                    "    {} {}",
                    format!("[{}]", rec.priority).bright_cyan(),
                    rec.action.bright_white()
                );
                println!("        {}", rec.reasoning.dimmed());
            }
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    fn print_section(section: &SeoSection) {
        println!("{}", section.title.bright_yellow().bold().underline());
        println!("  {}", section.introduction.dimmed());
        println!();

        for factor in &section.factors {
            println!("  {}", factor.factor_name.bright_white().bold());
            println!("    Observation:    {}", factor.current_observation);
            println!("    Why it matters: {}", factor.importance.dimmed());
            println!(
                "    Recommendation: {}",
                factor.recommendation.bright_green()
            );
            println!();
        }
    }

    pub fn save_json_report(report: &SeoReport, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(&SavedReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            report,
        })?;
        let mut file = File::create(filename)?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct SavedReport<'a> {
    generated_at: String,
    report: &'a SeoReport,
}
