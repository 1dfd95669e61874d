//! Ticketdock Demo
//!
//! Runs the browse-page search against the configured backend:
//! - Restores the persisted session into the auth context
//! - Loads the first page of active listings
//! - Loads one more page
//!
//! # Usage
//!
//! ```bash
//! # .env or environment
//! export TICKETDOCK_BACKEND_URL=https://<project>.example.co
//! export TICKETDOCK_ANON_KEY=<anon key>
//!
//! # Optional filters
//! export TICKETDOCK_DEMO_CATEGORY=Music
//! export TICKETDOCK_DEMO_QUERY=jazz
//!
//! cargo run --bin ticketdock-demo
//! ```

use anyhow::Context;
use marketplace::gateway::BackendGateway;
use marketplace::search::{FilterChange, SearchAction, SearchEnvironment, SearchReducer, SearchState};
use marketplace::{AppConfig, AuthContext, AuthStatus, TracingNotifier};
use std::sync::Arc;
use std::time::Duration;
use ticketdock_backend::BackendClient;
use ticketdock_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WAIT: Duration = Duration::from_secs(30);

type SearchStore = Store<
    SearchState,
    SearchAction,
    SearchEnvironment<BackendGateway>,
    SearchReducer<BackendGateway>,
>;

async fn print_page(store: &SearchStore, heading: &str) {
    let (rows, total, has_more, error) = store
        .state(|s| {
            let rows: Vec<String> = s
                .listings
                .iter()
                .map(|row| {
                    format!(
                        "{:<40} {:>10}  {} left  {}",
                        row.event.title,
                        row.listing.price,
                        row.listing.available_quantity,
                        row.event.date.format("%Y-%m-%d")
                    )
                })
                .collect();
            (rows, s.total_count, s.has_more, s.error.clone())
        })
        .await;

    println!("\n{heading}");
    if let Some(error) = error {
        println!("   ✗ {error}");
        return;
    }
    for row in &rows {
        println!("   {row}");
    }
    println!("   {} shown of {total} (more: {has_more})", rows.len());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env().context("loading configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
    ticketdock_runtime::metrics::describe_store_metrics();

    println!("\n🎫 ============================================");
    println!("   Ticketdock - Browse Demo");
    println!("============================================");

    let client = BackendClient::new(config.backend()?).context("building backend client")?;
    let gateway = Arc::new(BackendGateway::new(client, config.storage_bucket.clone()));

    let auth = AuthContext::new(Arc::clone(&gateway));
    match auth.init().await {
        AuthStatus::SignedIn(user) => {
            println!("Signed in as {}", user.email.as_deref().unwrap_or("(no email)"));
        },
        AuthStatus::SignedOut | AuthStatus::Initializing => println!("Browsing as a guest"),
    }

    let env = SearchEnvironment::new(Arc::clone(&gateway), Arc::new(TracingNotifier));
    let store: SearchStore = Store::new(SearchState::default(), SearchReducer::new(), env);

    let mut changes = vec![FilterChange::PageSize(config.page_size)];
    if let Ok(category) = std::env::var("TICKETDOCK_DEMO_CATEGORY") {
        changes.push(FilterChange::Category(category));
    }
    if let Ok(query) = std::env::var("TICKETDOCK_DEMO_QUERY") {
        changes.push(FilterChange::Query(query));
    }

    let mut handle = store.send(SearchAction::UpdateFilters(changes)).await?;
    handle.wait_with_timeout(WAIT).await?;
    print_page(&store, "1️⃣  First page").await;

    if store.state(SearchState::can_load_more).await {
        let mut handle = store.send(SearchAction::LoadMore).await?;
        handle.wait_with_timeout(WAIT).await?;
        print_page(&store, "2️⃣  After loading more").await;
    }

    store.shutdown(Duration::from_secs(5)).await?;
    println!("\n✓ Done");
    Ok(())
}
