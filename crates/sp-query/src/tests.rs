//! Unit tests for sp-query.

#[cfg(test)]
mod helpers {
    use crate::{EdgeRecord, NodeRecord};

    pub fn abcd_records() -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
        let nodes = vec![
            NodeRecord::new(1, -77.030, -12.040).with_category("principal"),
            NodeRecord::new(2, -77.029, -12.040).with_category("secundario"),
            NodeRecord::new(3, -77.029, -12.039),
            NodeRecord::new(4, -77.028, -12.039),
            NodeRecord::new(5, -77.000, -12.000),
        ];
        let edges = vec![
            EdgeRecord::new(1, 2, 1.0),
            EdgeRecord::new(2, 3, 2.0),
            EdgeRecord::new(1, 3, 5.0),
            EdgeRecord::new(3, 4, 1.0),
        ];
        (nodes, edges)
    }
}

// ── build_graph ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use sp_core::{NodeCategory, NodeKey};
    use sp_graph::GraphError;

    use super::helpers::abcd_records;
    use crate::{EdgeRecord, NodeRecord, QueryError, build_graph};

    #[test]
    fn builds_with_default_category() {
        let (nodes, edges) = abcd_records();
        let g = build_graph(&nodes, &edges).unwrap();
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.category(NodeKey(1)).unwrap(), NodeCategory::Principal);
        assert_eq!(g.category(NodeKey(2)).unwrap(), NodeCategory::Secondary);
        assert_eq!(g.category(NodeKey(3)).unwrap(), NodeCategory::Unknown);
    }

    #[test]
    fn negative_weight_aborts_build() {
        let (nodes, mut edges) = abcd_records();
        edges.push(EdgeRecord::new(4, 5, -1.0));
        let err = build_graph(&nodes, &edges).unwrap_err();
        assert!(matches!(err, QueryError::Graph(GraphError::InvalidWeight { weight, .. }) if weight == -1.0));
    }

    #[test]
    fn missing_node_field_is_malformed() {
        let (mut nodes, edges) = abcd_records();
        nodes.push(NodeRecord { node_id: Some(6), x: None, y: Some(0.0), category: None });
        match build_graph(&nodes, &edges).unwrap_err() {
            QueryError::MalformedInput { location, field, .. } => {
                assert_eq!(location, "node record 5");
                assert_eq!(field, "x");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_node_id_is_malformed() {
        let nodes = vec![NodeRecord { node_id: None, x: Some(0.0), y: Some(0.0), category: None }];
        assert!(matches!(
            build_graph(&nodes, &[]),
            Err(QueryError::MalformedInput { field, .. }) if field == "node_id"
        ));
    }

    #[test]
    fn non_finite_coordinate_is_malformed() {
        let nodes = vec![NodeRecord::new(1, f64::NAN, 0.0)];
        assert!(matches!(build_graph(&nodes, &[]), Err(QueryError::MalformedInput { .. })));
    }

    #[test]
    fn missing_edge_weight_is_malformed() {
        let (nodes, mut edges) = abcd_records();
        edges.push(EdgeRecord { u: Some(1), v: Some(4), weight: None });
        assert!(matches!(
            build_graph(&nodes, &edges),
            Err(QueryError::MalformedInput { field, .. }) if field == "weight"
        ));
    }

    #[test]
    fn dangling_edge_aborts_build() {
        let (nodes, mut edges) = abcd_records();
        edges.push(EdgeRecord::new(1, 99, 1.0));
        assert!(matches!(
            build_graph(&nodes, &edges),
            Err(QueryError::Graph(GraphError::UnknownNode(NodeKey(99))))
        ));
    }

    #[test]
    fn duplicate_ids_last_write_wins() {
        let nodes = vec![
            NodeRecord::new(7, 0.0, 0.0).with_category("principal"),
            NodeRecord::new(7, 1.0, 2.0),
        ];
        let g = build_graph(&nodes, &[]).unwrap();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.position(NodeKey(7)).unwrap().y, 2.0);
        assert_eq!(g.category(NodeKey(7)).unwrap(), NodeCategory::Unknown);
    }
}

// ── query_path ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod query {
    use sp_core::{NodeKey, Position};

    use super::helpers::abcd_records;
    use crate::{EdgeRecord, NodeRecord, PathMiss, PathResult, build_graph, query_path};

    #[test]
    fn huge_finite_weights_still_found() {
        let nodes = vec![
            NodeRecord::new(1, 0.0, 0.0),
            NodeRecord::new(2, 1.0, 0.0),
            NodeRecord::new(3, 2.0, 0.0),
        ];
        let edges = vec![EdgeRecord::new(1, 2, f64::MAX), EdgeRecord::new(2, 3, f64::MAX)];
        let g = build_graph(&nodes, &edges).unwrap();
        let r = query_path(&g, NodeKey(1), NodeKey(3));
        assert!(r.found);
        assert_eq!(r.nodes, vec![NodeKey(1), NodeKey(2), NodeKey(3)]);
        assert_eq!(r.miss, None);
    }

    #[test]
    fn weighted_shortest_path() {
        let (nodes, edges) = abcd_records();
        let g = build_graph(&nodes, &edges).unwrap();
        let r = query_path(&g, NodeKey(1), NodeKey(4));
        assert!(r.found);
        assert_eq!(r.nodes, vec![NodeKey(1), NodeKey(2), NodeKey(3), NodeKey(4)]);
        assert_eq!(r.total_weight, 4.0);
        assert_eq!(r.positions.len(), 4);
        assert_eq!(r.positions[0], Position::new(-77.030, -12.040));
        assert_eq!(r.miss, None);
    }

    #[test]
    fn same_node_is_single_element() {
        let (nodes, edges) = abcd_records();
        let g = build_graph(&nodes, &edges).unwrap();
        let r = query_path(&g, NodeKey(3), NodeKey(3));
        assert!(r.found);
        assert_eq!(r.nodes, vec![NodeKey(3)]);
        assert_eq!(r.total_weight, 0.0);
        assert_eq!(r.geometric_length_m(), 0.0);
    }

    #[test]
    fn disconnected_is_not_found() {
        let (nodes, edges) = abcd_records();
        let g = build_graph(&nodes, &edges).unwrap();
        let r = query_path(&g, NodeKey(1), NodeKey(5));
        assert!(!r.found);
        assert!(r.is_empty());
        assert_eq!(r.miss, Some(PathMiss::NoPath));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let (nodes, edges) = abcd_records();
        let g = build_graph(&nodes, &edges).unwrap();
        let r = query_path(&g, NodeKey(1), NodeKey(404));
        assert_eq!(r, PathResult::not_found(PathMiss::UnknownNode { node: NodeKey(404) }));
    }

    #[test]
    fn polyline_and_midpoint() {
        let (nodes, edges) = abcd_records();
        let g = build_graph(&nodes, &edges).unwrap();
        let r = query_path(&g, NodeKey(1), NodeKey(3));
        let (xs, ys) = r.polyline();
        assert_eq!(xs, vec![-77.030, -77.029, -77.029]);
        assert_eq!(ys, vec![-12.040, -12.040, -12.039]);
        assert_eq!(r.midpoint(), Some(Position::new(-77.029, -12.040)));
        // Two ~100 m hops at this latitude.
        let len = r.geometric_length_m();
        assert!(len > 150.0 && len < 300.0, "got {len}");
    }

    #[test]
    fn serializes_for_plotting_layer() {
        let (nodes, edges) = abcd_records();
        let g = build_graph(&nodes, &edges).unwrap();
        let found = serde_json::to_value(query_path(&g, NodeKey(3), NodeKey(4))).unwrap();
        assert_eq!(found["found"], true);
        assert_eq!(found["nodes"], serde_json::json!([3, 4]));
        assert!(found.get("miss").is_none());

        let missing = serde_json::to_value(query_path(&g, NodeKey(3), NodeKey(9))).unwrap();
        assert_eq!(missing["found"], false);
        assert_eq!(missing["miss"]["kind"], "unknown_node");
        assert_eq!(missing["miss"]["node"], 9);
    }
}

// ── QueryService ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod service {
    use sp_core::{NodeCategory, NodeKey, Position};
    use sp_graph::StreetGraph;

    use super::helpers::abcd_records;
    use crate::{PathMiss, QueryService, build_graph};

    fn service() -> QueryService {
        let (nodes, edges) = abcd_records();
        QueryService::new(build_graph(&nodes, &edges).unwrap())
    }

    #[test]
    fn query_through_service() {
        let svc = service();
        let r = svc.query_path(NodeKey(4), NodeKey(1));
        assert_eq!(r.nodes, vec![NodeKey(4), NodeKey(3), NodeKey(2), NodeKey(1)]);
    }

    #[test]
    fn between_points_snaps_to_nearest_nodes() {
        let svc = service();
        let r = svc.query_between_points(Position::new(-77.0301, -12.0401), Position::new(-77.0279, -12.0389));
        assert!(r.found);
        assert_eq!(r.nodes.first(), Some(&NodeKey(1)));
        assert_eq!(r.nodes.last(), Some(&NodeKey(4)));
    }

    #[test]
    fn between_points_on_empty_graph() {
        let svc = QueryService::new(StreetGraph::empty());
        let r = svc.query_between_points(Position::new(0.0, 0.0), Position::new(1.0, 1.0));
        assert_eq!(r.miss, Some(PathMiss::EmptyGraph));
    }

    #[test]
    fn batch_keeps_order() {
        let svc = service();
        let results = svc.query_batch(&[(NodeKey(1), NodeKey(4)), (NodeKey(1), NodeKey(5)), (NodeKey(2), NodeKey(2))]);
        let found: Vec<bool> = results.iter().map(|r| r.found).collect();
        assert_eq!(found, vec![true, false, true]);
        assert_eq!(results[0].total_weight, 4.0);
    }

    #[test]
    fn node_options_sorted_with_labels() {
        let svc = service();
        let opts = svc.node_options();
        assert_eq!(opts.len(), 5);
        assert!(opts.windows(2).all(|w| w[0].key < w[1].key));
        assert_eq!(opts[0].label, "1");
        assert_eq!(opts[0].category, NodeCategory::Principal);
    }

    #[test]
    fn category_layers() {
        let svc = service();
        let principal = svc.category_layer(NodeCategory::Principal);
        assert_eq!(principal, vec![(NodeKey(1), Position::new(-77.030, -12.040))]);
        assert_eq!(svc.category_layer(NodeCategory::Secondary).len(), 1);
        assert_eq!(svc.category_layer(NodeCategory::Unknown).len(), 3);
    }

    #[test]
    fn edge_layer_draws_each_street_once() {
        let svc = service();
        let layer = svc.edge_layer();
        assert_eq!(layer.len(), 4);
        let seg = layer
            .iter()
            .find(|s| (s.from, s.to) == (NodeKey(3), NodeKey(4)))
            .unwrap();
        assert_eq!(seg.start, Position::new(-77.029, -12.039));
        assert_eq!(seg.end, Position::new(-77.028, -12.039));
        assert_eq!(seg.weight, 1.0);
        assert!(QueryService::new(StreetGraph::empty()).edge_layer().is_empty());
    }

    #[test]
    fn clones_share_graph() {
        let svc = service();
        let other = svc.clone();
        assert!(std::ptr::eq(svc.graph(), other.graph()));
    }
}

// ── Loader & config ───────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use sp_core::{NodeCategory, NodeKey};

    use crate::{
        Classification, ClassificationSummary, GraphSources, LoaderConfig, NodeRecord, QueryError,
        apply_classification, load_classification_reader, load_edges_reader, load_graph,
        load_nodes_reader, query_path,
    };

    const NODES_CSV: &str = "\
node_id,x,y
1,-77.030,-12.040
2,-77.029,-12.040
3,-77.029,-12.039
4,-77.028,-12.039
";

    const EDGES_DISTANCE_CSV: &str = "\
node1,node2,distance
1,2,1.0
2,3,2.0
1,3,5.0
3,4,1.0
";

    const EDGES_LENGTH_CSV: &str = "\
u,v,length,name
1,2,1.0,Jr. Lampa
2,3,2.0,Jr. Lampa
1,3,5.0,Av. Abancay
3,4,1.0,Jr. Ucayali
";

    #[test]
    fn nodes_without_type_column() {
        let nodes = load_nodes_reader(Cursor::new(NODES_CSV), &LoaderConfig::default()).unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].node_id, Some(1));
        assert_eq!(nodes[0].x, Some(-77.030));
        assert_eq!(nodes[0].category, None);
    }

    #[test]
    fn nodes_with_inline_type_and_blank_cells() {
        let csv = "node_id,x,y,type\n1,0.5,1.5,principal\n2,,2.0,\n3.0,1.0,1.0,secundario\n";
        let nodes = load_nodes_reader(Cursor::new(csv), &LoaderConfig::default()).unwrap();
        assert_eq!(nodes[0].category.as_deref(), Some("principal"));
        assert_eq!(nodes[1].x, None);
        assert_eq!(nodes[1].category, None);
        assert_eq!(nodes[2].node_id, Some(3));
    }

    #[test]
    fn unparsable_cell_is_malformed() {
        let csv = "node_id,x,y\n1,abc,2.0\n";
        match load_nodes_reader(Cursor::new(csv), &LoaderConfig::default()).unwrap_err() {
            QueryError::MalformedInput { location, field, .. } => {
                assert_eq!(location, "nodes line 2");
                assert_eq!(field, "x");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_malformed() {
        let err = load_edges_reader(Cursor::new(EDGES_LENGTH_CSV), &LoaderConfig::distance()).unwrap_err();
        assert!(matches!(err, QueryError::MalformedInput { field, .. } if field == "node1"));
    }

    #[test]
    fn both_weight_column_variants() {
        let a = load_edges_reader(Cursor::new(EDGES_DISTANCE_CSV), &LoaderConfig::distance()).unwrap();
        let b = load_edges_reader(Cursor::new(EDGES_LENGTH_CSV), &LoaderConfig::length()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[3].weight, Some(1.0));
    }

    #[test]
    fn custom_weight_column() {
        let csv = "node1,node2,travel_m\n1,2,12.5\n";
        let cfg = LoaderConfig::default().with_weight_column("travel_m");
        let edges = load_edges_reader(Cursor::new(csv), &cfg).unwrap();
        assert_eq!(edges[0].weight, Some(12.5));
    }

    #[test]
    fn positional_classification() {
        let mut nodes = load_nodes_reader(Cursor::new(NODES_CSV), &LoaderConfig::default()).unwrap();
        let csv = "x,y,type\n-77.030,-12.040,principal\n-77.029,-12.040,\n-77.029,-12.039,carretera\n";
        let c = load_classification_reader(Cursor::new(csv), &LoaderConfig::default()).unwrap();
        assert!(matches!(c, Classification::Positional(ref v) if v.len() == 3));
        let summary = apply_classification(&mut nodes, &c);
        assert_eq!(summary, ClassificationSummary { matched: 3, unclassified: 2 });
        assert_eq!(nodes[0].category.as_deref(), Some("principal"));
        assert_eq!(nodes[1].category, None);
        assert_eq!(nodes[2].category.as_deref(), Some("carretera"));
        assert_eq!(nodes[3].category, None);
    }

    #[test]
    fn classification_by_id() {
        let mut nodes = load_nodes_reader(Cursor::new(NODES_CSV), &LoaderConfig::default()).unwrap();
        let csv = "node_id,type\n4,principal\n2,secundario\n99,principal\n";
        let c = load_classification_reader(Cursor::new(csv), &LoaderConfig::default()).unwrap();
        let summary = apply_classification(&mut nodes, &c);
        assert_eq!(summary, ClassificationSummary { matched: 2, unclassified: 2 });
        assert_eq!(nodes[3].category.as_deref(), Some("principal"));
        assert_eq!(nodes[1].category.as_deref(), Some("secundario"));
        assert_eq!(nodes[0].category, None);
    }

    #[test]
    fn short_positional_table_clears_tail_labels() {
        let mut nodes = vec![
            NodeRecord::new(1, 0.0, 0.0).with_category("principal"),
            NodeRecord::new(2, 1.0, 0.0).with_category("principal"),
        ];
        let c = Classification::Positional(vec![Some("secundario".to_owned())]);
        let summary = apply_classification(&mut nodes, &c);
        let labels: Vec<Option<&str>> = nodes.iter().map(|n| n.category.as_deref()).collect();
        assert_eq!(labels, vec![Some("secundario"), None]);
        assert_eq!(summary, ClassificationSummary { matched: 1, unclassified: 1 });
    }

    #[test]
    fn by_id_keeps_inline_labels_of_unlisted_nodes() {
        let mut nodes = vec![
            NodeRecord::new(1, 0.0, 0.0).with_category("principal"),
            NodeRecord::new(2, 1.0, 0.0).with_category("secundario"),
            NodeRecord::new(3, 2.0, 0.0),
        ];
        let by_id = [(3, Some("carretera".to_owned()))].into_iter().collect();
        let summary = apply_classification(&mut nodes, &Classification::ById(by_id));
        assert_eq!(summary, ClassificationSummary { matched: 1, unclassified: 0 });
        assert_eq!(nodes[0].category.as_deref(), Some("principal"));
        assert_eq!(nodes[2].category.as_deref(), Some("carretera"));
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let cfg = LoaderConfig::from_json_str(r#"{"weight_column": "length"}"#).unwrap();
        assert_eq!(cfg.weight_column, "length");
        assert_eq!(cfg.edge_source_column, "node1");
        assert_eq!(cfg.node_id_column, "node_id");
    }

    #[test]
    fn config_rejects_empty_and_colliding_columns() {
        assert!(matches!(
            LoaderConfig::from_json_str(r#"{"weight_column": " "}"#),
            Err(QueryError::Config(_))
        ));
        assert!(matches!(
            LoaderConfig::default().with_edge_columns("u", "u").validate(),
            Err(QueryError::Config(_))
        ));
        assert!(matches!(LoaderConfig::from_json_str("not json"), Err(QueryError::Json(_))));
    }

    #[test]
    fn load_graph_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::File::create(&path).unwrap().write_all(body.as_bytes()).unwrap();
            path
        };
        let sources = GraphSources {
            nodes: write("nodes.csv", NODES_CSV),
            edges: write("edges.csv", EDGES_LENGTH_CSV),
            classification: Some(write("classified.csv", "x,y,type\n0,0,principal\n0,0,secundario\n")),
        };
        let cfg_path = write("loader.json", r#"{"edge_source_column":"u","edge_target_column":"v","weight_column":"length"}"#);
        let cfg = LoaderConfig::from_json_path(&cfg_path).unwrap();

        let g = load_graph(&sources, &cfg).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.category(NodeKey(1)).unwrap(), NodeCategory::Principal);
        assert_eq!(g.category(NodeKey(2)).unwrap(), NodeCategory::Secondary);
        assert_eq!(g.category(NodeKey(4)).unwrap(), NodeCategory::Unknown);
        assert_eq!(query_path(&g, NodeKey(1), NodeKey(4)).total_weight, 4.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let sources = GraphSources {
            nodes: "/nonexistent/nodes.csv".into(),
            edges: "/nonexistent/edges.csv".into(),
            classification: None,
        };
        assert!(matches!(load_graph(&sources, &LoaderConfig::default()), Err(QueryError::Io(_))));
    }
}
