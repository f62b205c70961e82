mod render;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vca_core::{AppConfig, Platform, PlatformFilter};
use vca_dashboard::{
    Dashboard, DashboardSettings, FileStore, NoticeReceiver, OperationOutcome, ScrapeForm,
};
use vca_gateway::{ContentGateway, ContentQuery, HttpGateway};

#[derive(Debug, Parser)]
#[command(name = "vca-cli")]
#[command(about = "Viral content dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stored content, optionally filtered
    List {
        /// Platform to show (reddit, youtube, google, bing or all)
        #[arg(long, default_value = "all")]
        platform: PlatformFilter,
        /// Minimum viral score
        #[arg(long, default_value_t = 0.0)]
        min_score: f64,
    },
    /// Full-text search over stored content, ignoring filters
    Search { query: String },
    /// Highest-scoring content
    Top {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Trigger a scrape and reload once it settles
    Scrape {
        /// Platform to scrape; repeat for several
        #[arg(long = "platform")]
        platforms: Vec<Platform>,
        /// Comma-separated keywords (defaults to "viral, trending")
        #[arg(long, default_value = "")]
        keywords: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Subject used to pick a default subreddit
        #[arg(long, default_value = "tech")]
        subject: String,
        /// Explicit subreddit, overriding the subject default
        #[arg(long)]
        subreddit: Option<String>,
        /// Search engine time range, e.g. "week"
        #[arg(long)]
        time_range: Option<String>,
    },
    /// Request AI analysis for one or more items, concurrently
    Analyze {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Request a content brief for one or more items, concurrently
    Brief {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Toggle the saved state of an item
    Save { id: String },
    /// Show saved item ids
    Saved,
    /// Export saved items as JSON into the export directory
    Export,
    /// Check the content service
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vca_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("vca-cli ready; run with --help to list commands");
        return Ok(());
    };

    let gateway: Arc<dyn ContentGateway> = Arc::new(HttpGateway::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?);
    tracing::debug!(env = %config.env, base_url = %config.api_base_url, "gateway configured");

    run(command, &config, gateway).await
}

async fn run(
    command: Commands,
    config: &AppConfig,
    gateway: Arc<dyn ContentGateway>,
) -> anyhow::Result<()> {
    match command {
        Commands::Top { limit } => {
            let items = gateway.top_content(limit).await?;
            render::print_items(&items, &std::collections::BTreeSet::new());
            return Ok(());
        }
        Commands::Health => {
            let status = gateway.health().await?;
            println!("content service: {status}");
            return Ok(());
        }
        _ => {}
    }

    let storage = Arc::new(FileStore::new(&config.state_dir));
    let (dashboard, mut notices) =
        Dashboard::new(gateway, storage, DashboardSettings::from_config(config));
    dashboard.restore_selection();

    match command {
        Commands::List {
            platform,
            min_score,
        } => {
            dashboard
                .controller()
                .set_filter(ContentQuery {
                    platform,
                    min_viral_score: min_score,
                })
                .await;
            print_listing(&dashboard);
        }
        Commands::Search { query } => {
            dashboard.controller().search(&query).await;
            print_listing(&dashboard);
        }
        Commands::Scrape {
            platforms,
            keywords,
            limit,
            subject,
            subreddit,
            time_range,
        } => {
            let form = ScrapeForm {
                platforms,
                raw_keywords: keywords,
                limit,
                subreddit_subject: subject,
                subreddit_override: subreddit,
                time_range,
            };
            let result = dashboard.scraper().build_and_submit(&form).await;
            print_notices(&mut notices);
            let receipt = result?;
            receipt.refresh.await?;
            print_listing(&dashboard);
        }
        Commands::Analyze { ids } => run_analyses(&dashboard, &ids).await,
        Commands::Brief { ids } => run_briefs(&dashboard, &ids).await,
        Commands::Save { id } => {
            if dashboard.toggle_saved(&id) {
                println!("saved {id}");
            } else {
                println!("removed {id}");
            }
        }
        Commands::Saved => {
            let saved = dashboard.selection().all();
            if saved.is_empty() {
                println!("no saved items; use `save <id>` to add one");
            }
            for id in saved {
                println!("{id}");
            }
        }
        Commands::Export => {
            dashboard.controller().reload().await;
            let document = dashboard.export_saved(chrono::Utc::now().date_naive());
            let path = document.write_to(&config.export_dir)?;
            println!(
                "exported {} items to {}",
                document.item_count,
                path.display()
            );
        }
        Commands::Top { .. } | Commands::Health => {}
    }

    print_notices(&mut notices);
    Ok(())
}

fn print_listing(dashboard: &Dashboard) {
    let controller = dashboard.controller();
    render::print_items(&controller.items(), &dashboard.selection().all());
    println!();
    render::print_stats(&controller.stats());
}

fn print_notices(notices: &mut NoticeReceiver) {
    while let Ok(notice) = notices.try_recv() {
        println!("{}", notice.message());
    }
}

async fn run_analyses(dashboard: &Dashboard, ids: &[String]) {
    let requests = ids.iter().map(|id| async move {
        let outcome = dashboard.request_analysis(id).await;
        if outcome == OperationOutcome::Completed {
            if let Some((current, analysis)) = dashboard.current_analysis() {
                if current == *id {
                    print_payload(id, analysis.as_value());
                }
            }
        }
    });
    futures::future::join_all(requests).await;
}

async fn run_briefs(dashboard: &Dashboard, ids: &[String]) {
    let requests = ids.iter().map(|id| async move {
        let outcome = dashboard.request_brief(id).await;
        if outcome == OperationOutcome::Completed {
            if let Some((current, brief)) = dashboard.current_brief() {
                if current == *id {
                    print_payload(id, brief.as_value());
                }
            }
        }
    });
    futures::future::join_all(requests).await;
}

fn print_payload(id: &str, value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("== {id} ==\n{text}"),
        Err(e) => tracing::warn!(id, error = %e, "failed to render payload"),
    }
}
