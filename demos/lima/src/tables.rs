//! Shared CLI arguments and graph loading for the Lima street network.
//!
//! Both `lima` (path queries) and `export_nodes` (the map layers sidecar)
//! call this.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing_subscriber::EnvFilter;

use sp_query::{GraphSources, LoaderConfig, QueryService, load_graph};

#[derive(Args, Debug)]
pub struct TableArgs {
    /// Node table (`node_id, x, y[, type]`).
    #[arg(long, default_value = "lima_streets_nodes.csv")]
    pub nodes: PathBuf,

    /// Edge table.
    #[arg(long, default_value = "lima_streets_edges.csv")]
    pub edges: PathBuf,

    /// Optional classification table joined onto the nodes.
    #[arg(long)]
    pub classified: Option<PathBuf>,

    /// JSON file with `LoaderConfig` column names.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use the `u, v, length` edge columns instead of `node1, node2, distance`.
    #[arg(long)]
    pub length_columns: bool,

    /// Override the edge weight column.
    #[arg(long)]
    pub weight_column: Option<String>,
}

impl TableArgs {
    pub fn loader_config(&self) -> Result<LoaderConfig> {
        let mut cfg = match &self.config {
            Some(path) => LoaderConfig::from_json_path(path)
                .with_context(|| format!("reading loader config {}", path.display()))?,
            None if self.length_columns => LoaderConfig::length(),
            None => LoaderConfig::distance(),
        };
        if let Some(col) = &self.weight_column {
            cfg = cfg.with_weight_column(col.clone());
        }
        Ok(cfg)
    }

    /// Load the tables once and wrap the graph in a service.
    pub fn load_service(&self) -> Result<QueryService> {
        let cfg = self.loader_config()?;
        let sources = GraphSources {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            classification: self.classified.clone(),
        };
        let graph = load_graph(&sources, &cfg).context("building street graph")?;
        Ok(QueryService::new(graph))
    }
}

/// `RUST_LOG`-driven subscriber, `info` by default.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
