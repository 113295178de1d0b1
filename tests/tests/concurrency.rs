//! Concurrent mutation of one store.

use std::sync::{Arc, Barrier};
use std::thread;

use strata_tests::prelude::*;

const THREADS: usize = 8;

fn store() -> Arc<ConfigStore> {
    test_api(false).unwrap().store().clone()
}

#[test]
fn test_racing_system_creates_one_winner() {
    // GIVEN threads creating objects with the same exclusive name
    let store = store();
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let store = store.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let (type_name, values) = if i % 2 == 0 {
                    ("cfg::Subclass1", values! { "name" => "shared", "sub1" => "a" })
                } else {
                    ("cfg::Subclass2", values! { "name" => "shared", "sub2" => "b" })
                };
                let type_id = store.graph().type_id(type_name).unwrap();
                barrier.wait();
                store.create_instance(type_id, ScopeKey::System, values)
            })
        })
        .collect();

    // WHEN they all finish
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // THEN exactly one succeeded and the rest saw the violation
    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, StoreError::ConstraintViolation { .. })));
    let base = store.graph().type_id("cfg::Base").unwrap();
    assert_eq!(store.instances_of(base, ScopeKey::System).len(), 1);
}

#[test]
fn test_sessions_do_not_interfere() {
    let store = store();
    let handles: Vec<_> = (1..=THREADS as u64)
        .map(|n| {
            let store = store.clone();
            thread::spawn(move || {
                let session = SessionId::new(n);
                let type_id = store.graph().type_id("cfg::TestSessionConfig").unwrap();
                for i in 0..20i64 {
                    store
                        .set_scalar_property(
                            store.root(),
                            "query_timeout_ms",
                            Some(Value::Int(n as i64 * 100 + i)),
                            ScopeKey::Session(session),
                            Origin::Client,
                        )
                        .unwrap();
                }
                // Same name in every session; each partition has its own population
                let id = store
                    .create_instance(type_id, ScopeKey::Session(session), values! { "name" => "mine" })
                    .unwrap();
                store
                    .link_instances(store.root(), ScopeKey::Session(session), "sessobj", id)
                    .unwrap();
                (session, id)
            })
        })
        .collect();

    for handle in handles {
        let (session, id) = handle.join().unwrap();
        assert_eq!(
            store.setting(ScopeKey::Session(session), "query_timeout_ms"),
            Some(Value::Int(session.raw() as i64 * 100 + 19))
        );
        assert_eq!(store.linked(store.root(), "sessobj", session), vec![id]);
    }
    assert_eq!(store.session_count(), THREADS);
    assert_eq!(store.setting(ScopeKey::System, "query_timeout_ms"), None);
}

#[test]
fn test_teardown_races_mutations() {
    let store = store();
    let session = SessionId::new(1);
    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let store = store.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            for i in 0..200i64 {
                store
                    .set_scalar_property(
                        store.root(),
                        "query_timeout_ms",
                        Some(Value::Int(i)),
                        ScopeKey::Session(session),
                        Origin::Client,
                    )
                    .unwrap();
            }
        })
    };
    let closer = {
        let store = store.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..200 {
                store.teardown_session(session);
            }
        })
    };

    writer.join().unwrap();
    closer.join().unwrap();

    // Whatever survived is either nothing or the writer's last value
    match store.setting(ScopeKey::Session(session), "query_timeout_ms") {
        None => {}
        Some(value) => assert_eq!(value, Value::Int(199)),
    }
    store.teardown_session(session);
    assert_eq!(store.session_count(), 0);
}

#[test]
fn test_parallel_readers_see_system_value() {
    let api = Arc::new(test_api(false).unwrap());
    api.set("query_timeout_ms", Some(Value::Int(77)), Scope::System, SessionId::new(1))
        .unwrap();

    let handles: Vec<_> = (0..THREADS as u64)
        .map(|n| {
            let api = api.clone();
            thread::spawn(move || api.get("query_timeout_ms", SessionId::new(n + 100)).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Value::Int(77));
    }
}
