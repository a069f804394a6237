//! Shortest path between two nodes (or two map points) of the Lima street
//! network, written as a JSON polyline for the map layer.
//!
//! Run with:
//! `cargo run -p lima -- --length-columns --edges lima_streets_edges_2.csv --from 264712 --to 264980`

mod tables;

use std::fs;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{info, warn};

use sp_core::{NodeKey, Position};

use tables::{TableArgs, init_logging};

#[derive(Parser, Debug)]
#[command(about = "Shortest path over the Lima street graph")]
struct Cli {
    #[command(flatten)]
    tables: TableArgs,

    /// Source node id.
    #[arg(long, requires = "to")]
    from: Option<i64>,

    /// Target node id.
    #[arg(long, requires = "from")]
    to: Option<i64>,

    /// Source map point `x,y` (lon,lat); snapped to the nearest node.
    #[arg(long, value_parser = parse_point, requires = "to_point", conflicts_with = "from")]
    from_point: Option<Position>,

    /// Target map point `x,y` (lon,lat).
    #[arg(long, value_parser = parse_point, requires = "from_point")]
    to_point: Option<Position>,

    /// Write the result here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_point(s: &str) -> Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {s:?}"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("x: {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("y: {e}"))?;
    Ok(Position::new(x, y))
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let service = cli.tables.load_service()?;
    let graph = service.graph();
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "street graph ready");

    let result = match (cli.from, cli.to, cli.from_point, cli.to_point) {
        (Some(from), Some(to), _, _) => service.query_path(NodeKey(from), NodeKey(to)),
        (_, _, Some(a), Some(b)) => service.query_between_points(a, b),
        _ => bail!("give either --from/--to or --from-point/--to-point"),
    };

    if result.found {
        info!(
            hops = result.len().saturating_sub(1),
            weight = result.total_weight,
            length_m = result.geometric_length_m(),
            "shortest path"
        );
    } else {
        warn!(miss = ?result.miss, "no path between the selected nodes");
    }

    let json = serde_json::to_string_pretty(&result)?;
    match &cli.out {
        Some(path) => {
            fs::write(path, &json)?;
            info!(path = %path.display(), "wrote path");
        }
        None => println!("{json}"),
    }
    Ok(())
}
