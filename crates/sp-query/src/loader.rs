//! CSV loaders for node, edge, and classification tables.
//!
//! # CSV format
//!
//! Column names come from [`LoaderConfig`]; the defaults are shown.
//!
//! ```csv
//! node_id,x,y
//! 264712,-77.0428,-12.0464
//! 264713,-77.0411,-12.0471
//! ```
//!
//! ```csv
//! node1,node2,distance
//! 264712,264713,187.4
//! ```
//!
//! The node table may carry an inline `type` column.  Alternatively a
//! separate classification table supplies it:
//!
//! - if that table has the node-id column, rows are joined **by id**;
//! - otherwise row *i* classifies node row *i* (**positional** join), which
//!   is how the classification export is laid out (`x, y, type`).
//!
//! Empty cells load as `None` and are reported by [`crate::build_graph`];
//! cells that are present but unparsable fail here with `MalformedInput`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{info, warn};

use sp_graph::StreetGraph;

use crate::record::{EdgeRecord, NodeRecord};
use crate::{LoaderConfig, QueryError, QueryResult, build_graph};

// ── Public API ────────────────────────────────────────────────────────────────

/// Where the three tables live.  `classification` is optional.
#[derive(Clone, Debug)]
pub struct GraphSources {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub classification: Option<PathBuf>,
}

/// Category labels from a classification table, ready to join onto nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    ById(HashMap<i64, Option<String>>),
    Positional(Vec<Option<String>>),
}

/// Load all tables and build the graph in one go.
pub fn load_graph(sources: &GraphSources, cfg: &LoaderConfig) -> QueryResult<StreetGraph> {
    cfg.validate()?;

    let mut nodes = load_nodes_csv(&sources.nodes, cfg)?;
    if let Some(path) = &sources.classification {
        let classification = load_classification_csv(path, cfg)?;
        let summary = apply_classification(&mut nodes, &classification);
        info!(matched = summary.matched, unclassified = summary.unclassified, "joined classification");
    }
    let edges = load_edges_csv(&sources.edges, cfg)?;

    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        weight_column = %cfg.weight_column,
        "loaded street tables"
    );
    build_graph(&nodes, &edges)
}

pub fn load_nodes_csv(path: &Path, cfg: &LoaderConfig) -> QueryResult<Vec<NodeRecord>> {
    load_nodes_reader(File::open(path)?, cfg)
}

/// Like [`load_nodes_csv`] but accepts any `Read` source.
pub fn load_nodes_reader<R: Read>(reader: R, cfg: &LoaderConfig) -> QueryResult<Vec<NodeRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let id_col = require_column(&headers, &cfg.node_id_column, "nodes")?;
    let x_col = require_column(&headers, &cfg.x_column, "nodes")?;
    let y_col = require_column(&headers, &cfg.y_column, "nodes")?;
    let category_col = find_column(&headers, &cfg.category_column);

    let mut out = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let at = location("nodes", &row);
        out.push(NodeRecord {
            node_id: parse_key(&row, id_col, &cfg.node_id_column, &at)?,
            x: parse_f64(&row, x_col, &cfg.x_column, &at)?,
            y: parse_f64(&row, y_col, &cfg.y_column, &at)?,
            category: category_col.and_then(|c| cell(&row, c)).map(str::to_owned),
        });
    }
    Ok(out)
}

pub fn load_edges_csv(path: &Path, cfg: &LoaderConfig) -> QueryResult<Vec<EdgeRecord>> {
    load_edges_reader(File::open(path)?, cfg)
}

/// Like [`load_edges_csv`] but accepts any `Read` source.
pub fn load_edges_reader<R: Read>(reader: R, cfg: &LoaderConfig) -> QueryResult<Vec<EdgeRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let u_col = require_column(&headers, &cfg.edge_source_column, "edges")?;
    let v_col = require_column(&headers, &cfg.edge_target_column, "edges")?;
    let w_col = require_column(&headers, &cfg.weight_column, "edges")?;

    let mut out = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let at = location("edges", &row);
        out.push(EdgeRecord {
            u: parse_key(&row, u_col, &cfg.edge_source_column, &at)?,
            v: parse_key(&row, v_col, &cfg.edge_target_column, &at)?,
            weight: parse_f64(&row, w_col, &cfg.weight_column, &at)?,
        });
    }
    Ok(out)
}

pub fn load_classification_csv(path: &Path, cfg: &LoaderConfig) -> QueryResult<Classification> {
    load_classification_reader(File::open(path)?, cfg)
}

/// Read a classification table.  Joined by id when it has the node-id
/// column, positionally otherwise.
pub fn load_classification_reader<R: Read>(reader: R, cfg: &LoaderConfig) -> QueryResult<Classification> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let label_col = require_column(&headers, &cfg.category_column, "classification")?;

    match find_column(&headers, &cfg.node_id_column) {
        Some(id_col) => {
            let mut by_id = HashMap::new();
            for result in csv_reader.records() {
                let row = result?;
                let at = location("classification", &row);
                let Some(id) = parse_key(&row, id_col, &cfg.node_id_column, &at)? else {
                    return Err(QueryError::malformed(at, &cfg.node_id_column, "is missing"));
                };
                by_id.insert(id, cell(&row, label_col).map(str::to_owned));
            }
            Ok(Classification::ById(by_id))
        }
        None => {
            let mut labels = Vec::new();
            for result in csv_reader.records() {
                let row = result?;
                labels.push(cell(&row, label_col).map(str::to_owned));
            }
            Ok(Classification::Positional(labels))
        }
    }
}

/// Outcome of [`apply_classification`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassificationSummary {
    /// Records that received a label (possibly empty) from the table.
    pub matched: usize,
    /// Records left without any label after the join, inline ones included.
    pub unclassified: usize,
}

/// Join classification labels onto node records, overriding any inline
/// label.
///
/// By id, nodes without a row keep their inline label.  Positionally, row
/// *i* labels node *i* and nodes past the end of the table lose their inline
/// label: the table is the sole source of categories for the whole file.
pub fn apply_classification(
    nodes: &mut [NodeRecord],
    classification: &Classification,
) -> ClassificationSummary {
    let mut matched = 0usize;
    match classification {
        Classification::ById(by_id) => {
            for node in nodes.iter_mut() {
                if let Some(label) = node.node_id.and_then(|id| by_id.get(&id)) {
                    node.category = label.clone();
                    matched += 1;
                }
            }
        }
        Classification::Positional(labels) => {
            if labels.len() != nodes.len() {
                warn!(
                    nodes = nodes.len(),
                    labels = labels.len(),
                    "classification row count differs from node count; extra nodes stay unknown"
                );
            }
            for (i, node) in nodes.iter_mut().enumerate() {
                node.category = labels.get(i).cloned().flatten();
            }
            matched = labels.len().min(nodes.len());
        }
    }

    let unclassified = nodes.iter().filter(|n| n.category.is_none()).count();
    if unclassified > 0 {
        warn!(unclassified, "nodes without a category label");
    }
    ClassificationSummary { matched, unclassified }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn require_column(headers: &StringRecord, name: &str, table: &str) -> QueryResult<usize> {
    find_column(headers, name)
        .ok_or_else(|| QueryError::malformed(format!("{table} header"), name, "column is missing"))
}

fn location(table: &str, row: &StringRecord) -> String {
    match row.position() {
        Some(pos) => format!("{table} line {}", pos.line()),
        None => table.to_owned(),
    }
}

/// Trimmed cell contents; `None` when absent or empty.
fn cell(row: &StringRecord, col: usize) -> Option<&str> {
    row.get(col).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(row: &StringRecord, col: usize, field: &str, at: &str) -> QueryResult<Option<f64>> {
    cell(row, col)
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| QueryError::malformed(at, field, format!("expected a number, got {s:?}")))
        })
        .transpose()
}

/// Node identifiers are integers, but exports sometimes write them as
/// `264712.0`; an integral float is accepted.
fn parse_key(row: &StringRecord, col: usize, field: &str, at: &str) -> QueryResult<Option<i64>> {
    cell(row, col)
        .map(|s| {
            s.parse::<i64>().or_else(|_| match s.parse::<f64>() {
                Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(QueryError::malformed(at, field, format!("expected an integer id, got {s:?}"))),
            })
        })
        .transpose()
}
