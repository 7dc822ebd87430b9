// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetsync::db::SqliteDocumentStore;
use budgetsync::identity::LocalIdentityChannel;
use budgetsync::models::{Identity, NewTransaction, TxType};
use budgetsync::store::TransactionStore;
use budgetsync::{SyncContext, cli, commands::exporter};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

fn store_with_one() -> (LocalIdentityChannel, TransactionStore) {
    let channel = LocalIdentityChannel::signed_in(Identity::new("u1"));
    let remote = Arc::new(SqliteDocumentStore::open_in_memory().unwrap());
    let ctx = SyncContext::new(Arc::new(channel.clone()), remote);
    let store = TransactionStore::connect(&ctx);
    store
        .add(NewTransaction {
            date: "2025-01-02".to_string(),
            description: "Corner Shop".to_string(),
            amount: Decimal::new(1234, 2),
            category: "Groceries".to_string(),
            r#type: TxType::Expenditure,
        })
        .unwrap();
    (channel, store)
}

fn export_args(format: &str, out: &str) -> clap::ArgMatches {
    cli::build_cli().get_matches_from([
        "budgetsync",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ])
}

#[test]
fn export_transactions_streams_pretty_json() {
    let (_channel, store) = store_with_one();
    let id = store.get()[0].id.clone();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = export_args("json", &out_str);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&store, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": id,
                "date": "2025-01-02",
                "description": "Corner Shop",
                "amount": "12.34",
                "category": "Groceries",
                "type": "expenditure"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv() {
    let (_channel, store) = store_with_one();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = export_args("csv", &out_str);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&store, export_m).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "description", "amount", "category", "type"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][3], "12.34");
    assert_eq!(&rows[0][5], "expenditure");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let (_channel, store) = store_with_one();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = export_args("xml", &out_str);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&store, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}
