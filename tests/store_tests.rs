// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use budgetsync::error::SyncError;
use budgetsync::identity::LocalIdentityChannel;
use budgetsync::models::{BudgetPatch, Identity, NewBudget, NewTransaction, TxType};
use budgetsync::store::{BalanceStore, BudgetStore, TransactionStore};
use budgetsync::{Phase, Stores};
use common::{FakeRemote, context, dec, doc, signed_in, tx_doc};
use std::sync::{Arc, Mutex};

const U1_TX: &str = "users/u1/transactions";
const U2_TX: &str = "users/u2/transactions";

fn new_tx(date: &str) -> NewTransaction {
    NewTransaction {
        date: date.to_string(),
        description: "Coffee".to_string(),
        amount: dec(4),
        category: "Food".to_string(),
        r#type: TxType::Expenditure,
    }
}

#[test]
fn signed_out_store_is_loaded_and_empty() {
    let channel = LocalIdentityChannel::new();
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));

    assert_eq!(store.phase(), Phase::NoIdentity);
    assert!(store.loaded());
    assert!(store.get().is_empty());
    assert_eq!(remote.subscription_count(), 0);
}

#[test]
fn sign_in_subscribes_then_snapshot_activates() {
    let channel = LocalIdentityChannel::new();
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));

    channel.sign_in(Identity::new("u1")).unwrap();
    assert_eq!(remote.subscription_paths(), vec![U1_TX.to_string()]);
    assert_eq!(store.phase(), Phase::Subscribing);
    assert!(!store.loaded());

    remote.deliver_to(
        U1_TX,
        vec![
            tx_doc("b", "2024-03-12", 10, "expenditure"),
            tx_doc("a", "2024-03-10", 20, "income"),
        ],
    );
    assert_eq!(store.phase(), Phase::Active);
    assert!(store.loaded());
    let ids: Vec<String> = store.get().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(store.get()[1].r#type, TxType::Income);
}

#[test]
fn switching_identity_closes_before_opening() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    remote.deliver_to(U1_TX, vec![tx_doc("a", "2024-03-10", 20, "income")]);

    channel.sign_in(Identity::new("u2")).unwrap();

    assert_eq!(
        remote.events(),
        vec![
            format!("open {U1_TX}"),
            format!("close {U1_TX}"),
            format!("open {U2_TX}"),
        ]
    );
    assert!(!remote.is_open(0));
    assert!(store.get().is_empty());
    assert!(!store.loaded());
    assert_eq!(store.identity().map(|i| i.uid), Some("u2".to_string()));
}

#[test]
fn late_snapshot_from_previous_identity_is_dropped() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    channel.sign_in(Identity::new("u2")).unwrap();

    remote.deliver(0, vec![tx_doc("stale", "2024-01-01", 99, "income")]);
    remote.fail(0, "stale failure");

    assert!(store.get().is_empty());
    assert_eq!(store.phase(), Phase::Subscribing);
    assert!(store.last_error().is_none());

    remote.deliver_to(U2_TX, vec![tx_doc("fresh", "2024-02-01", 5, "income")]);
    assert_eq!(store.get()[0].id, "fresh");
}

#[test]
fn sign_out_resets_before_returning() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    remote.deliver_to(U1_TX, vec![tx_doc("a", "2024-03-10", 20, "income")]);
    assert_eq!(store.len(), 1);

    channel.sign_out().unwrap();

    assert!(store.is_empty());
    assert!(store.loaded());
    assert_eq!(store.phase(), Phase::NoIdentity);
    assert_eq!(remote.open_subscriptions(), 0);
}

#[test]
fn subscription_error_keeps_last_snapshot() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    remote.deliver_to(U1_TX, vec![tx_doc("a", "2024-03-10", 20, "income")]);

    remote.fail(0, "permission denied");

    assert_eq!(store.phase(), Phase::Error);
    assert_eq!(store.len(), 1);
    assert!(store.loaded());
    assert!(store.last_error().unwrap().contains("permission denied"));
}

#[test]
fn error_before_first_snapshot_still_marks_loaded() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = BudgetStore::connect(&context(&channel, &remote));

    remote.fail(0, "offline");

    assert!(store.loaded());
    assert!(store.get().is_empty());
    assert_eq!(store.phase(), Phase::Error);
}

#[test]
fn writes_without_identity_fail_without_remote_call() {
    let channel = LocalIdentityChannel::new();
    let remote = FakeRemote::new();
    let ctx = context(&channel, &remote);
    let txs = TransactionStore::connect(&ctx);
    let budgets = BudgetStore::connect(&ctx);
    let balance = BalanceStore::connect(&ctx);

    assert!(matches!(
        txs.add(new_tx("2024-03-10")),
        Err(SyncError::Unauthenticated)
    ));
    assert!(matches!(budgets.remove("b1"), Err(SyncError::Unauthenticated)));
    assert!(matches!(balance.set(dec(5)), Err(SyncError::Unauthenticated)));
    assert!(remote.writes().is_empty());
}

#[test]
fn add_does_not_touch_local_list() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    remote.deliver_to(U1_TX, vec![]);

    let id = store.add(new_tx("2024-03-10")).unwrap();

    assert!(store.is_empty());
    let writes = remote.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].op, "create");
    assert_eq!(writes[0].path, format!("{U1_TX}/{id}"));
    assert!(writes[0].fields.contains_key("createdAt"));
}

#[test]
fn invalid_date_is_rejected_before_writing() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));

    let err = store.add(new_tx("10/03/2024")).unwrap_err();
    assert!(matches!(err, SyncError::InvalidDate(_)));
    assert!(remote.writes().is_empty());
}

#[test]
fn remote_rejection_surfaces_as_write_error() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = BudgetStore::connect(&context(&channel, &remote));
    remote.fail_writes(true);

    let err = store
        .add(NewBudget {
            category: "Food".to_string(),
            amount: dec(300),
            spent: dec(0),
            start_date: "2024-03-01".to_string(),
            end_date: "2024-03-31".to_string(),
        })
        .unwrap_err();
    match err {
        SyncError::Write { path, .. } => assert!(path.starts_with("users/u1/budgets")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn budget_update_sends_only_patched_fields() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = BudgetStore::connect(&context(&channel, &remote));

    store
        .update(
            "b1",
            BudgetPatch {
                amount: Some(dec(450)),
                ..Default::default()
            },
        )
        .unwrap();
    store.remove("b1").unwrap();

    let writes = remote.writes();
    assert_eq!(writes[0].op, "update");
    assert_eq!(writes[0].path, "users/u1/budgets/b1");
    assert_eq!(writes[0].fields.keys().collect::<Vec<_>>(), vec!["amount"]);
    assert_eq!(writes[1].op, "delete");
    assert_eq!(writes[1].path, "users/u1/budgets/b1");
}

#[test]
fn destroy_is_idempotent_and_stops_following_identity() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    assert_eq!(channel.listener_count(), 1);

    store.destroy();
    store.destroy();

    assert_eq!(channel.listener_count(), 0);
    assert_eq!(remote.open_subscriptions(), 0);
    assert_eq!(store.phase(), Phase::Unbound);

    channel.sign_in(Identity::new("u2")).unwrap();
    assert_eq!(remote.subscription_count(), 1);
}

#[test]
fn dropping_stores_closes_everything() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let stores = Stores::connect(&context(&channel, &remote));
    assert_eq!(remote.open_subscriptions(), 4);

    drop(stores);

    assert_eq!(remote.open_subscriptions(), 0);
    assert_eq!(channel.listener_count(), 0);
}

#[test]
fn loaded_turns_true_once_per_session() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _h = store
        .loaded_signal()
        .subscribe(move |v: &bool| sink.lock().unwrap().push(*v));

    remote.deliver_to(U1_TX, vec![]);
    remote.deliver_to(U1_TX, vec![tx_doc("a", "2024-03-10", 1, "income")]);
    channel.sign_in(Identity::new("u2")).unwrap();
    remote.deliver_to(U2_TX, vec![]);

    assert_eq!(*seen.lock().unwrap(), vec![false, true, false, true]);
}

#[test]
fn subscribers_see_reset_then_new_snapshot() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    remote.deliver_to(U1_TX, vec![tx_doc("a", "2024-03-10", 1, "income")]);

    let lengths = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lengths);
    let _h = store.subscribe(move |items| sink.lock().unwrap().push(items.len()));

    channel.sign_in(Identity::new("u2")).unwrap();
    remote.deliver_to(
        U2_TX,
        vec![
            tx_doc("x", "2024-03-11", 1, "income"),
            tx_doc("y", "2024-03-10", 1, "income"),
        ],
    );

    assert_eq!(*lengths.lock().unwrap(), vec![1, 0, 2]);
}

#[test]
fn clear_empties_until_next_snapshot() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = TransactionStore::connect(&context(&channel, &remote));
    remote.deliver_to(U1_TX, vec![tx_doc("a", "2024-03-10", 1, "income")]);

    store.clear();
    assert!(store.is_empty());
    assert!(remote.is_open(0));

    remote.deliver_to(U1_TX, vec![tx_doc("a", "2024-03-10", 1, "income")]);
    assert_eq!(store.len(), 1);
}

#[test]
fn balance_follows_user_document() {
    let channel = signed_in("u1");
    let remote = FakeRemote::new();
    let store = BalanceStore::connect(&context(&channel, &remote));
    assert_eq!(store.get(), dec(0));

    remote.deliver_doc(
        "users/u1",
        Some(doc("u1", &[("balance", budgetsync::document::FieldValue::Integer(250))])),
    );
    assert_eq!(store.get(), dec(250));
    assert!(store.loaded());

    remote.deliver_doc("users/u1", None);
    assert_eq!(store.get(), dec(0));

    store.set(dec(75)).unwrap();
    let writes = remote.writes();
    assert_eq!(writes[0].op, "set");
    assert_eq!(writes[0].path, "users/u1");
}
