use finder::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn descriptor(select: &str, filter: &str, order: &str, limit: u64, values: Vec<Value>) -> QueryDescriptor {
    QueryDescriptor {
        select: select.into(),
        filter: filter.into(),
        order: order.into(),
        limit,
        offset: 0,
        values,
    }
}

#[test]
fn test_documented_descriptors() {
    let cases: Vec<(&str, Vec<Value>, QueryDescriptor)> = vec![
        ("findAll", vec![], descriptor("*", "", "", 0, vec![])),
        ("findOneById", vec![2.into()], descriptor("*", "id=?", "", 1, vec![2.into()])),
        (
            "findIdNameByNameAndStatus",
            vec!["mike".into(), "active".into()],
            descriptor("id,name", "name=? AND status=?", "", 0, vec!["mike".into(), "active".into()]),
        ),
        ("findAllOrderedByIdAsc", vec![], descriptor("*", "", "id asc", 0, vec![])),
        (
            "findOneByEmail",
            vec!["a@b.com".into()],
            descriptor("*", "email=?", "", 1, vec!["a@b.com".into()]),
        ),
        (
            "findIdNameEmailByNameOrderedByIdAsc",
            vec!["mike".into()],
            descriptor("id,name,email", "name=?", "id asc", 0, vec!["mike".into()]),
        ),
    ];

    for (name, args, expected) in cases {
        assert_eq!(compile(name, args).unwrap(), expected, "{name}");
    }
}

#[test]
fn test_compile_is_repeatable() {
    let first = compile("findOneByNameAndEmail", vec!["mike".into(), "m@b.com".into()]).unwrap();
    let second = compile("findOneByNameAndEmail", vec!["mike".into(), "m@b.com".into()]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_grammar_failures() {
    assert!(matches!(
        compile("findAllXyz", vec![]),
        Err(FinderError::UnknownFindMethod(token)) if token == "xyz"
    ));
    assert!(matches!(
        compile("findOrderedId", vec![]),
        Err(FinderError::MalformedOrderedClause)
    ));
    assert!(matches!(
        compile("findall", vec![]),
        Err(FinderError::NotAFinderMethod(_))
    ));
}

#[test]
fn test_by_and_asymmetry() {
    // `by` keeps collecting fields; `and` takes exactly one.
    let by = compile("findByNameStatusEmail", vec![]).unwrap();
    assert_eq!(by.filter, "name=? AND status=? AND email=?");

    let and = compile("findByNameAndStatusEmail", vec![]).unwrap();
    assert_eq!(and.filter, "name=? AND status=?");
}

#[test]
fn test_finder_over_memory_store() {
    let store = MemoryStore::new();
    for row in [
        json!({"id": 1, "name": "anna", "status": "active"}),
        json!({"id": 2, "name": "mike", "status": "active"}),
        json!({"id": 3, "name": "mike", "status": "banned"}),
    ] {
        store.insert_json("users", row).unwrap();
    }
    let users = Finder::new("users", store);

    let found = users
        .call("findIdByNameOrderedByIdDesc", vec!["mike".into()])
        .unwrap();
    let ids: Vec<serde_json::Value> = found.into_records().into_iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(3), json!(2)]);

    assert!(matches!(
        users.call("findOneByName", vec![]),
        Err(FinderError::BindMismatch { expected: 1, got: 0 })
    ));
}

#[test]
fn test_concurrent_calls() {
    let store = MemoryStore::new();
    for id in 0..10 {
        store.insert_json("items", json!({"id": id, "group": id % 2})).unwrap();
    }
    let items = Arc::new(Finder::new("items", store));

    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let items = Arc::clone(&items);
            thread::spawn(move || {
                let found = items.call("findAllByGroup", vec![(i % 2).into()]).unwrap();
                found.into_records().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 5);
    }
}

#[test]
fn test_sql_rendering() {
    let query = compile("findOneByEmail", vec!["a@b.com".into()]).unwrap();
    assert_eq!(
        query.on("users").with_placeholder(Placeholder::Dollar).to_sql().unwrap(),
        "SELECT * FROM users WHERE email = $1 LIMIT 1"
    );
}
