//! Export the node picker options, per-category marker layers, and the full
//! street network.
//!
//! Writes three JSON files to `--out-dir` (default `output/lima/`):
//!   - `node_options.json` — `[{key, label, category}, …]`
//!   - `node_layers.json`  — `{principal: [...], secondary: [...], unknown: [...]}`
//!
//! Run with: `cargo run -p lima --bin export_nodes`

mod tables;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde_json::{Map, Value, json};
use tracing::info;

use sp_core::NodeCategory;

use tables::{TableArgs, init_logging};

#[derive(Parser, Debug)]
#[command(about = "Export node options, category layers, and street segments for the map")]
struct Cli {
    #[command(flatten)]
    tables: TableArgs,

    #[arg(long, default_value = "output/lima")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let service = cli.tables.load_service()?;

    fs::create_dir_all(&cli.out_dir)?;

    // ── node_options.json ─────────────────────────────────────────────────────
    let options = service.node_options();
    let path = cli.out_dir.join("node_options.json");
    fs::write(&path, serde_json::to_string_pretty(&options)?)?;
    info!(path = %path.display(), nodes = options.len(), "wrote node options");

    // ── node_layers.json ──────────────────────────────────────────────────────
    let mut layers = Map::new();
    for category in NodeCategory::ALL {
        let points: Vec<Value> = service
            .category_layer(category)
            .into_iter()
            .map(|(key, pos)| json!({ "node_id": key, "x": pos.x, "y": pos.y }))
            .collect();
        info!(%category, nodes = points.len(), "layer");
        layers.insert(category.as_str().to_owned(), Value::Array(points));
    }
    let path = cli.out_dir.join("node_layers.json");
    fs::write(&path, serde_json::to_string_pretty(&Value::Object(layers))?)?;
    info!(path = %path.display(), "wrote node layers");

    // ── network_edges.json ────────────────────────────────────────────────────
    let edges = service.edge_layer();
    let path = cli.out_dir.join("network_edges.json");
    fs::write(&path, serde_json::to_string_pretty(&edges)?)?;
    info!(path = %path.display(), edges = edges.len(), "wrote network edges");

    Ok(())
}
