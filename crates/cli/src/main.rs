//! `groupnav` binary: preview the grouped navigation from a listing, or
//! run the synchronization controller against a scripted host shell.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use groupnav_api::AdminClient;
use groupnav_engine::{NavStore, group_content_types, normalize};
use groupnav_host::{DriverConfig, RouteTracker, SyncController, spawn_sync};
use groupnav_host::sim::HostSimulator;
use groupnav_render::renderer_for;
use groupnav_types::{ContentKind, NavConfig, NavTemplate, Permission, RawContentType};

#[derive(Parser)]
#[command(name = "groupnav", about = "Grouped content-type navigation for a CMS admin panel")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize and group a content-type listing, printing the tree.
    Preview {
        /// Read the raw listing from a JSON file instead of the live
        /// admin API.
        #[arg(long)]
        listing: Option<PathBuf>,
        /// Delimiter override; defaults to the remote config, then " | ".
        #[arg(long)]
        delimiter: Option<String>,
        /// Template override (accordion, v5, plain).
        #[arg(long)]
        template: Option<NavTemplate>,
    },
    /// Drive the sync controller against a scripted in-memory host and
    /// print a reconciliation transcript.
    Simulate {
        /// Template to render with.
        #[arg(long, default_value = "accordion")]
        template: NavTemplate,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Preview {
            listing,
            delimiter,
            template,
        } => run_preview(listing, delimiter, template).await,
        Command::Simulate { template } => run_simulate(template).await,
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn run_preview(
    listing: Option<PathBuf>,
    delimiter: Option<String>,
    template: Option<NavTemplate>,
) -> Result<()> {
    let (raw, permissions, remote_config) = match listing {
        Some(path) => {
            let raw = load_listing_file(&path)?;
            // No live host: fail-open with an empty permission set.
            (raw, Vec::new(), NavConfig::default())
        }
        None => {
            let client = AdminClient::new_from_env()?;
            if !client.probe_enabled().await {
                bail!("grouped navigation is disabled: config endpoint is unreachable");
            }
            let raw = client.fetch_content_types().await.context("listing fetch failed")?;
            let permissions = match client.fetch_permissions().await {
                Ok(permissions) => permissions,
                Err(error) => {
                    // Fail-open: an unrelated permission failure must not
                    // empty the preview.
                    tracing::warn!(%error, "permission fetch failed; showing all content types");
                    Vec::new()
                }
            };
            let remote_config = NavConfig::resolve(&client.fetch_config().await);
            (raw, permissions, remote_config)
        }
    };

    let delimiter = delimiter.unwrap_or(remote_config.delimiter);
    let template = template.unwrap_or(remote_config.template);

    let descriptors = normalize(&delimiter, &raw);
    let groups = group_content_types(&descriptors, &permissions);

    println!("template: {template}");
    for group in &groups {
        println!("{}", group.name);
        for item in &group.items {
            let kind = match item.kind {
                ContentKind::Collection => "collection",
                ContentKind::Single => "single",
            };
            println!("  {} ({}) -> {}", item.display_name, kind, item.href);
        }
    }
    Ok(())
}

fn load_listing_file(path: &PathBuf) -> Result<Vec<RawContentType>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))?;
    let records = match &payload {
        serde_json::Value::Array(records) => records.clone(),
        serde_json::Value::Object(object) => object
            .get("data")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .with_context(|| format!("{} holds neither an array nor a data wrapper", path.display()))?,
        _ => bail!("{} holds neither an array nor a data wrapper", path.display()),
    };
    records
        .into_iter()
        .map(|record| serde_json::from_value(record).context("malformed content-type record"))
        .collect()
}

/// Raw records matching the labels the simulated host renders natively.
fn demo_listing() -> Vec<RawContentType> {
    serde_json::from_value(serde_json::json!([
        { "uid": "api::post.post", "kind": "collectionType", "info": { "displayName": "[2] Blog | Post" } },
        { "uid": "api::category.category", "kind": "collectionType", "info": { "displayName": "Blog | Category" } },
        { "uid": "api::settings.settings", "kind": "singleType", "info": { "displayName": "Settings" } }
    ]))
    .expect("demo listing must deserialize")
}

async fn run_simulate(template: NavTemplate) -> Result<()> {
    let sim = HostSimulator::new();
    let store = NavStore::new();
    let permissions: Vec<Permission> = Vec::new();
    store.refresh(normalize(" | ", &demo_listing()), permissions);

    let route = RouteTracker::new("/content-manager");
    let controller = SyncController::new(store, route.clone(), renderer_for(template));
    let handle = spawn_sync(sim.dom(), controller, DriverConfig::default());

    let settle = Duration::from_millis(250);

    tokio::time::sleep(settle).await;
    println!("== mounted ==\n{}", sim.describe());

    route.navigate("/content-manager/collection-types/api::post.post");
    tokio::time::sleep(settle).await;
    println!("== after navigation to Post ==\n{}", sim.describe());

    sim.type_in_filter("cat");
    tokio::time::sleep(settle).await;
    println!("== host filter active ==\n{}", sim.describe());

    sim.type_in_filter("");
    tokio::time::sleep(settle).await;
    println!("== host filter cleared ==\n{}", sim.describe());

    sim.wipe_injected();
    tokio::time::sleep(settle).await;
    println!("== after host wiped the injected subtree ==\n{}", sim.describe());

    sim.rerender_host_nav();
    tokio::time::sleep(settle).await;
    println!("== after full host re-render ==\n{}", sim.describe());

    handle.shutdown().await;
    Ok(())
}
