use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use listsync::{
    InMemoryRecordService, ManagerConfig, ManagerFactory, ManagerOptions, PagingPolicy,
    PaginatedManager, Replace,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// One page at a time
    Paged,
    /// "Load more" accumulation
    Stack,
    /// Replace-mode paging that backfills after removals
    Backfill,
    /// Unpaged lookup list
    Full,
}

#[derive(Parser)]
#[command(name = "listsync-demo")]
#[command(about = "Drive a list manager against an in-memory record service")]
struct Cli {
    /// Records to seed
    #[arg(long, default_value_t = 52)]
    records: usize,
    /// Rows per page
    #[arg(long, default_value_t = 25)]
    rows: usize,
    #[arg(long, value_enum, default_value_t = Mode::Stack)]
    mode: Mode,
    /// Paging configuration as JSON, e.g. '{"page_no_key":"p"}'
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(raw) => ManagerConfig::from_json(raw).context("invalid --config")?,
        None => ManagerConfig::default(),
    }
    .rows_per_page(cli.rows);
    let factory = ManagerFactory::new(config).context("invalid paging configuration")?;

    let service = Arc::new(InMemoryRecordService::new("id").with_paging_keys(factory.config()));
    service
        .seed(
            (0..cli.records)
                .map(|i| json!({"title": format!("record {}", i + 1)}))
                .collect(),
        )
        .await;

    match cli.mode {
        Mode::Paged => {
            let mut manager = factory.paged::<Value, _>(service, "id", ManagerOptions::new());
            manager.initialize().await?;
            loop {
                print_page(manager.page_no(), manager.page_count(), &manager.list());
                if !manager.has_more() {
                    break;
                }
                manager.set_page_no(manager.page_no() as i64 + 1).await?;
            }
        }
        Mode::Stack => {
            let mut manager = factory.stack::<Value, _>(service, "id", ManagerOptions::new());
            manager.initialize().await?;
            print_page(manager.page_no(), manager.page_count(), &manager.list());
            while manager.load_more().await? {
                println!(
                    "loaded page {}/{}: {} of {} records visible",
                    manager.page_no(),
                    manager.page_count(),
                    manager.len(),
                    manager.count()
                );
            }
        }
        Mode::Backfill => {
            let mut manager: PaginatedManager<Value, _, Replace> = factory.paginated(
                service.clone(),
                "id",
                ManagerOptions::new(),
                PagingPolicy::backfilling(),
            );
            manager.initialize().await?;
            print_page(manager.page_no(), manager.page_count(), &manager.list());
            while let Some(first) = manager.list().into_iter().next() {
                let searches = service.search_calls();
                manager.remove(&first).await?;
                let refreshed = service.search_calls() > searches;
                println!(
                    "removed {} -> {} visible{}",
                    first["id"],
                    manager.len(),
                    if refreshed { " (refreshed)" } else { "" }
                );
            }
        }
        Mode::Full => {
            let mut manager = factory.full_list::<Value, _>(service, "id", ManagerOptions::new());
            manager.load_data().await?;
            print_page(1, 1, &manager.list());
        }
    }

    Ok(())
}

fn print_page(page_no: usize, page_count: usize, list: &[Value]) {
    let ids: Vec<String> = list.iter().map(|record| record["id"].to_string()).collect();
    println!("page {}/{}: [{}]", page_no, page_count, ids.join(", "));
}
