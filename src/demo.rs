// Demo workspace: a realistic operator run exercising every built-in renderer
//
// Loaded with `vizdeck --demo`. Time series referenced here are synthesized
// by the data source, except `00A1`, which is embedded inline.
//
// What the demo shows:
// - a table whose row headers link to time series (Enter drills into a curve)
//   and whose bucket cell links to a stored result
// - a time-series list with drill-down keys
// - a percentage above 100% (warning bar)
// - a result type with no dedicated renderer (falls back to Raw)
// - a correlation dataset picked up by a contributed renderer when present

use crate::viz::OperatorParameter;
use crate::workspace::{ResultEntry, Workspace};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

fn result(name: &str, result_type: &str, value: Value) -> ResultEntry {
    ResultEntry {
        name: name.to_string(),
        result_type: result_type.to_string(),
        value,
    }
}

fn flights() -> Value {
    json!([
        {"tsuid": "00A1", "funcId": "Flid1_VIB2"},
        {"tsuid": "00A2", "funcId": "Flid1_VIB3"},
        {"tsuid": "00B7", "funcId": "Flid2_VIB2"},
        {"tsuid": "00B8"}
    ])
}

fn discretized_matrix() -> Value {
    json!({
        "table_desc": {
            "title": "Discretized matrix",
            "desc": "Bucket boundaries per flight"
        },
        "headers": {
            "col": {"data": ["funcId", "metric", "min_B1", "max_B1", "min_B2", "max_B2"]},
            "row": {
                "data": [null, "Flid1_VIB2", "Flid1_VIB3", "Flid2_VIB2"],
                "default_links": {"type": "ts_list", "context": "raw"},
                "links": [
                    {"val": [{"tsuid": "00A1", "funcId": "Flid1_VIB2"}]},
                    {"val": [{"tsuid": "00A2", "funcId": "Flid1_VIB3"}]},
                    {"val": [{"tsuid": "00B7", "funcId": "Flid2_VIB2"}]}
                ]
            }
        },
        "content": {
            "cells": [
                ["VIB2", -50.0, 12.1, 12.1, 21.0],
                ["VIB3", -5.0, 3.2, 3.2, 8.9],
                ["VIB2", -48.5, 11.7, 11.7, 19.4]
            ],
            "links": [
                [null, {"type": "bucket_ts", "val": "B1", "context": "processdata"}, null, null, null],
                [null, null, null, null, null],
                [null, null, null, null, null]
            ]
        }
    })
}

fn correlation_matrix() -> Value {
    json!({
        "table_desc": {"title": "Pearson correlation", "desc": "Per flight, period 3600 s"},
        "headers": {
            "col": {"data": ["", "VIB2", "VIB3"]},
            "row": {"data": [null, "VIB2", "VIB3"]}
        },
        "content": {
            "cells": [[1.0, 0.82], [0.82, 1.0]]
        }
    })
}

/// The workspace shown by `--demo`
pub fn demo_workspace() -> Workspace {
    let mut inputs = Map::new();
    inputs.insert("ds".to_string(), json!("Portfolio"));
    inputs.insert("ts_list".to_string(), flights());

    let mut series = BTreeMap::new();
    series.insert(
        "00A1".to_string(),
        (0..120)
            .map(|i| {
                let t = 1_500_000_000_000 + i * 60_000;
                let v = (i as f64 / 8.0).sin() * 10.0 + i as f64 / 12.0;
                (t, v)
            })
            .collect(),
    );

    Workspace {
        operator: "Correlation (demo)".to_string(),
        inputs,
        parameters: vec![
            OperatorParameter {
                name: "period".to_string(),
                kind: Some("number".to_string()),
                value: json!(3600),
            },
            OperatorParameter {
                name: "context".to_string(),
                kind: Some("metadata".to_string()),
                value: json!("FlightIdentifier"),
            },
        ],
        results: vec![
            result("Discretized matrix", "table", discretized_matrix()),
            result("Flights", "ts_list", flights()),
            result("Bucket", "ts_bucket", json!([{"tsuid": "00A1", "funcId": "Flid1_VIB2"}])),
            result("Quality", "percentage", json!(1.073)),
            result("Dataset", "ds_name", json!("Portfolio")),
            result(
                "Notes",
                "text",
                json!(["3 flights analysed", "1 series missing a functional id"]),
            ),
            result("Correlation", "correlation_dataset", correlation_matrix()),
            result(
                "Clusters",
                "kmeans_mds",
                json!({"C1": {"centroid": [0.1, 0.4], "members": ["00A1", "00B7"]}}),
            ),
        ],
        series,
        stored_results: BTreeMap::from([(
            "B1".to_string(),
            json!([
                {"tsuid": "00A1", "funcId": "Flid1_VIB2"},
                {"tsuid": "00B7", "funcId": "Flid2_VIB2"}
            ]),
        )]),
    }
}
