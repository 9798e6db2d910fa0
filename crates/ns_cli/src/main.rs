use chrono::{Duration, Utc};
use clap::Parser;
use ns_core::{KeywordHistory, Result, ScanConfig, ScanStorage, SearchTerm};
use ns_feeds::cli::{handle_command, ScanArgs};
use ns_feeds::logging::init_logging;
use ns_feeds::{GoogleNewsSource, ScanManager, ScanPipeline};
use ns_sentiment::{HeadlineAnalyzer, KeywordExtractor};
use ns_web::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Energy news sentiment scanner", long_about = None)]
pub struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, default_value = "sqlite")]
    storage: String,
    /// SQLite database file
    #[arg(long, default_value = ns_storage::backends::sqlite::DEFAULT_DB_PATH)]
    database: String,
    /// JSON scan config; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Search term to monitor instead of the configured ones (repeatable)
    #[arg(long = "term")]
    terms: Vec<String>,
    #[arg(long, default_value = ns_sentiment::models::DEFAULT_SCORER, help = "Sentiment scorer. Available scorers: lexicon (default), neutral")]
    scorer: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the dashboard and JSON API
    Serve {
        #[arg(long, default_value = "0.0.0.0:5000")]
        addr: String,
    },
    /// Run scans from the command line
    Scan(ScanArgs),
    /// Per-keyword sentiment of recent scans
    History {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Per-keyword statistics across every stored scan
    Trends,
}

fn load_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::default(),
    };
    if !cli.terms.is_empty() {
        config = config.with_terms(cli.terms.iter().map(|t| SearchTerm::new(t.as_str())).collect());
    }
    config.validate()?;
    Ok(config)
}

fn build_pipeline(cli: &Cli, config: ScanConfig, storage: Arc<dyn ScanStorage>) -> Result<ScanPipeline> {
    let scorer = ns_sentiment::create_scorer(&cli.scorer)?;
    info!("🧠 Sentiment scorer ready: {}", scorer.name());
    let source = GoogleNewsSource::new(config.fetch_timeout())?;
    let extractor = KeywordExtractor::new(config.keyword_limit);
    let manager = ScanManager::new(Arc::new(source), HeadlineAnalyzer::new(scorer), Arc::new(config));
    Ok(ScanPipeline::new(manager, extractor, storage))
}

async fn print_history(storage: &dyn ScanStorage, days: u32) -> Result<()> {
    let since = Utc::now() - Duration::days(i64::from(days));
    let history = KeywordHistory::from_rows(storage.query_history(since).await?);
    if history.is_empty() {
        println!("No scans in the last {} days", days);
        return Ok(());
    }
    for keyword in history.keywords() {
        println!("{}", keyword);
        for point in history.get(&keyword).unwrap_or_default() {
            println!(
                "  {}  {:>7.3}  ({} articles)",
                point.scan_time.to_rfc3339(),
                point.avg_sentiment,
                point.article_count
            );
        }
    }
    Ok(())
}

async fn print_trends(storage: &dyn ScanStorage) -> Result<()> {
    let summary = storage.query_history_summary().await?;
    println!("📈 {} scans stored", summary.total_scans);
    for trend in &summary.summary {
        println!(
            "  {:<32} {:>7.3}  over {} scans ({} .. {})",
            trend.keyword,
            trend.overall_avg,
            trend.scan_count,
            trend.first_scan.format("%Y-%m-%d %H:%M"),
            trend.last_scan.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    info!("📋 Monitoring {} search terms", config.search_terms.len());

    let storage = ns_storage::create_storage(&cli.storage, Some(&cli.database)).await?;
    if cli.storage.eq_ignore_ascii_case("sqlite") {
        info!("💾 Using database {}", cli.database);
    }

    match &cli.command {
        Commands::Serve { addr } => {
            let pipeline = build_pipeline(&cli, config, storage)?;
            ns_web::serve(AppState::new(Arc::new(pipeline)), addr).await?;
        }
        Commands::Scan(args) => {
            let pipeline = build_pipeline(&cli, config, storage)?;
            handle_command(args.clone(), &pipeline).await?;
        }
        Commands::History { days } => print_history(storage.as_ref(), *days).await?,
        Commands::Trends => print_trends(storage.as_ref()).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "ns", "--storage", "memory", "--term", "Lithium", "--term", "Uranium", "history", "--days", "3",
        ])
        .unwrap();
        assert_eq!(cli.storage, "memory");
        assert_eq!(cli.terms, vec!["Lithium", "Uranium"]);
        assert_eq!(cli.scorer, "lexicon");
        assert!(matches!(cli.command, Commands::History { days: 3 }));
    }

    #[test]
    fn test_parse_scan_run() {
        let cli = Cli::try_parse_from(["ns", "scan", "run", "--interval", "30m"]).unwrap();
        assert_eq!(cli.storage, "sqlite");
        assert!(matches!(cli.command, Commands::Scan(_)));
    }

    #[test]
    fn test_terms_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            serde_json::json!({ "search_terms": ["Hydrogen"], "entries_per_term": 5 })
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["ns", "--config", path.as_str(), "trends"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.search_terms, vec![SearchTerm::new("Hydrogen")]);
        assert_eq!(config.entries_per_term, 5);

        let cli = Cli::try_parse_from(["ns", "--config", path.as_str(), "--term", "Solar", "trends"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.search_terms, vec![SearchTerm::new("Solar")]);
        assert_eq!(config.entries_per_term, 5);
    }

    #[test]
    fn test_blank_term_is_rejected() {
        let cli = Cli::try_parse_from(["ns", "--term", " ", "trends"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[tokio::test]
    async fn test_history_and_trends_on_empty_store() {
        let storage = ns_storage::create_storage("memory", None).await.unwrap();
        print_history(storage.as_ref(), 7).await.unwrap();
        print_trends(storage.as_ref()).await.unwrap();
    }
}
