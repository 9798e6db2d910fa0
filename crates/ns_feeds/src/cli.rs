use clap::{Args, Subcommand};
use ns_core::{Result, ScanReport};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

use crate::pipeline::ScanPipeline;

/// A duration written like `90`, `30m`, `1h15m30s` or `1d`. Bare numbers are seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3_600),
        'd' => Some(86_400),
        _ => None,
    }
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let overflow = || format!("Duration too large: {}", s.trim());
        let mut total: u64 = 0;
        let mut pending: Option<u64> = None;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if let Some(digit) = c.to_digit(10) {
                let value = pending
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(digit)))
                    .ok_or_else(overflow)?;
                pending = Some(value);
                continue;
            }

            let factor = unit_seconds(c).ok_or_else(|| format!("Invalid duration unit: {}", c))?;
            let amount = pending
                .take()
                .ok_or_else(|| format!("Unit {} is missing its number", c))?;
            let seconds = amount.checked_mul(factor).ok_or_else(overflow)?;
            total = total.checked_add(seconds).ok_or_else(overflow)?;
        }

        // a trailing bare number counts as seconds
        if let Some(seconds) = pending {
            total = total.checked_add(seconds).ok_or_else(overflow)?;
        } else if !s.chars().any(|c| c.is_ascii_digit()) {
            return Err("Duration must include a number".to_string());
        }

        if total == 0 {
            return Err("Duration must be positive".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(subcommand)]
    pub command: ScanCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScanCommands {
    /// Run one scan, or keep scanning on an interval
    Run {
        /// Repeat with this interval (e.g. 1h, 30m, 1d, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
        /// Print the full report as JSON instead of a digest
        #[arg(long)]
        json: bool,
    },
    /// List the configured search terms
    Terms,
}

pub async fn handle_command(args: ScanArgs, pipeline: &ScanPipeline) -> Result<()> {
    match args.command {
        ScanCommands::Run { interval: None, json } => {
            let report = pipeline.run_scan().await?;
            print_report(&report, json)?;
        }
        ScanCommands::Run { interval: Some(interval), json } => {
            info!("Running in periodic mode with {}s interval", interval.0.as_secs());
            loop {
                match pipeline.run_scan().await {
                    Ok(report) => print_report(&report, json)?,
                    Err(e) => error!("Error during scan: {}", e),
                }
                info!("Waiting {}s before next scan", interval.0.as_secs());
                tokio::time::sleep(interval.0).await;
            }
        }
        ScanCommands::Terms => {
            println!("Search terms:");
            for term in &pipeline.config().search_terms {
                println!("  {}", term);
            }
        }
    }
    Ok(())
}

fn print_report(report: &ScanReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("🗞️  Scan {} at {}", report.scan_id, report.scan_time.to_rfc3339());
    for summary in &report.summary {
        println!(
            "  {:<32} {:>7.3}  ({} articles)",
            summary.keyword, summary.avg_sentiment, summary.article_count
        );
    }
    let top: Vec<String> = report
        .word_cloud
        .iter()
        .take(10)
        .map(|k| format!("{} ({})", k.word, k.count))
        .collect();
    if !top.is_empty() {
        println!("  Top words: {}", top.join(", "));
    }
    println!("  {} articles total", report.total_count);
    Ok(())
}
