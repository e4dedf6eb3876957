//! String-keyed operations over JSON records.

use rstest::rstest;
use serde_json::{json, Value};

use listtree::json::{
    collect_expanded_keys, flatten_tree, list_to_tree, order_by_field, records_from_value, sort_tree,
    try_list_to_tree,
};
use listtree::util::testing;
use listtree::PartialFieldConfig;

fn load(name: &str) -> Vec<Value> {
    let text = std::fs::read_to_string(testing::resource_path(name)).unwrap();
    records_from_value(serde_json::from_str(&text).unwrap()).unwrap()
}

fn ids(nodes: &[Value]) -> Vec<Value> {
    nodes.iter().map(|n| n["id"].clone()).collect()
}

#[test]
fn given_flat_records_when_building_then_nests_by_parent_id() {
    testing::init_test_setup();
    let records = json!([
        {"id": "1", "parentId": "0"},
        {"id": "2", "parentId": "1"},
        {"id": "3", "parentId": "1"},
        {"id": "4", "parentId": "2"},
        {"id": "5", "parentId": "0"}
    ]);

    let forest = list_to_tree(records.as_array().unwrap(), None);

    assert_eq!(ids(&forest), vec![json!("1"), json!("5")]);
    assert_eq!(ids(forest[0]["children"].as_array().unwrap()), vec![json!("2"), json!("3")]);
    assert_eq!(forest[0]["children"][0]["children"][0]["id"], json!("4"));
    assert_eq!(forest[1]["children"], json!([]));
}

#[test]
fn given_custom_field_names_when_building_then_uses_them() {
    let records = json!([
        {"key": 1, "parent": 0, "title": "Root"},
        {"key": 2, "parent": 1, "title": "Child"}
    ]);
    let config = PartialFieldConfig::new().id("key").pid("parent").children("subs");

    let forest = list_to_tree(records.as_array().unwrap(), Some(&config));

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0]["subs"].as_array().unwrap().len(), 1);
    assert_eq!(forest[0]["subs"][0]["title"], json!("Child"));
    assert!(forest[0].get("children").is_none());
}

#[test]
fn given_partial_config_when_building_then_other_fields_use_defaults() {
    let records = json!([
        {"id": 1},
        {"id": 2, "owner": 1}
    ]);
    let config = PartialFieldConfig::new().pid("owner");

    let forest = list_to_tree(records.as_array().unwrap(), Some(&config));

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0]["children"][0]["id"], json!(2));
}

#[rstest]
#[case(json!({"id": 2, "parentId": 0}))]
#[case(json!({"id": 2, "parentId": "0"}))]
#[case(json!({"id": 2, "parentId": null}))]
#[case(json!({"id": 2}))]
#[case(json!({"id": 2, "parentId": 42}))]
fn given_root_marker_or_unknown_parent_when_building_then_record_is_root(#[case] record: Value) {
    let records = vec![json!({"id": 0}), json!({"id": "0"}), record];

    let forest = list_to_tree(&records, None);

    assert_eq!(forest.len(), 3);
    assert_eq!(forest[2]["id"], json!(2));
}

#[test]
fn given_mixed_number_and_string_ids_when_building_then_they_do_not_match() {
    let records = json!([
        {"id": 1},
        {"id": 2, "parentId": "1"}
    ]);

    let forest = list_to_tree(records.as_array().unwrap(), None);

    assert_eq!(forest.len(), 2);
}

#[test]
fn given_existing_children_field_when_building_then_it_is_replaced() {
    let records = json!([
        {"id": 1, "children": ["stale"]},
        {"id": 2, "parentId": 1}
    ]);

    let forest = list_to_tree(records.as_array().unwrap(), None);

    assert_eq!(forest[0]["children"], json!([{"id": 2, "parentId": 1, "children": []}]));
}

#[test]
fn given_input_when_building_then_input_is_untouched() {
    let records = load("departments.json");
    let before = records.clone();

    let _ = list_to_tree(&records, None);

    assert_eq!(records, before);
}

#[test]
fn given_nested_forest_when_flattening_then_yields_pre_order() {
    let forest = load("forest.json");

    let flat = flatten_tree(&forest, None);

    assert_eq!(
        ids(&flat),
        vec![json!("1"), json!("2"), json!("4"), json!("3"), json!("5")]
    );
    // nodes keep their children arrays
    assert_eq!(flat[0]["children"].as_array().unwrap().len(), 2);
}

#[test]
fn given_built_forest_when_flattening_and_rebuilding_then_forest_is_reproduced() {
    let records = load("departments.json");
    let forest = list_to_tree(&records, None);

    let flat = flatten_tree(&forest, None);
    assert_eq!(flat.len(), records.len());

    let rebuilt = list_to_tree(&flat, None);
    assert_eq!(rebuilt, forest);
}

#[test]
fn given_forest_when_collecting_two_levels_then_excludes_depth_three() {
    let forest = load("forest.json");

    let keys = collect_expanded_keys(&forest, 2, None);

    assert_eq!(keys, vec!["1", "2", "3", "5"]);
}

#[rstest]
#[case(0)]
#[case(-1)]
fn given_non_positive_depth_when_collecting_then_empty(#[case] depth: i64) {
    let forest = load("forest.json");

    assert!(collect_expanded_keys(&forest, depth, None).is_empty());
}

#[test]
fn given_numeric_and_missing_ids_when_collecting_then_keys_are_stringified() {
    let forest = json!([
        {"id": 7, "children": [{"id": 1.0}, {"name": "no id"}]},
        {"id": null}
    ]);

    let keys = collect_expanded_keys(forest.as_array().unwrap(), 2, None);

    assert_eq!(keys, vec!["7", "1", "undefined", "null"]);
}

#[test]
fn given_order_field_when_sorting_then_every_level_is_ordered() {
    let records = load("departments.json");
    let mut forest = list_to_tree(&records, None);

    let sorted = sort_tree(&mut forest, order_by_field("order"), None);

    assert_eq!(ids(sorted), vec![json!("5"), json!("1")]);
    assert_eq!(
        ids(sorted[1]["children"].as_array().unwrap()),
        vec![json!("3"), json!("2")]
    );
}

#[test]
fn given_duplicates_when_building_strictly_then_fails() {
    let records = load("broken.json");

    let err = try_list_to_tree(&records, None).unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("duplicate identifier '4'"), "{msg}");
    assert!(msg.contains("cycle"), "{msg}");
    assert!(!msg.contains("99"), "unknown parents are not fatal: {msg}");
}

#[test]
fn given_cycle_when_building_leniently_then_members_are_dropped() {
    let records = load("broken.json");

    let forest = list_to_tree(&records, None);

    let flat = flatten_tree(&forest, None);
    let seen = ids(&flat);
    assert!(!seen.contains(&json!(2)));
    assert!(!seen.contains(&json!(3)));
    assert!(seen.contains(&json!(5)));
}

#[test]
fn given_duplicate_ids_when_building_leniently_then_last_record_is_placed_at_each_occurrence() {
    let records = json!([
        {"id": 1},
        {"id": 2},
        {"id": 3, "parentId": 1, "v": "first"},
        {"id": 3, "parentId": 2, "v": "last"},
        {"id": 4, "parentId": 3}
    ]);

    let forest = list_to_tree(records.as_array().unwrap(), None);

    assert_eq!(ids(&forest), vec![json!(1), json!(2)]);
    for root in &forest {
        let children = root["children"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["v"], json!("last"));
        assert_eq!(ids(children[0]["children"].as_array().unwrap()), vec![json!(4)]);
    }
}

#[test]
fn given_duplicates_under_one_parent_when_building_leniently_then_winner_repeats() {
    let records = json!([
        {"id": 1},
        {"id": 2, "parentId": 1, "v": "a"},
        {"id": 2, "parentId": 1, "v": "b"}
    ]);

    let forest = list_to_tree(records.as_array().unwrap(), None);

    let children = forest[0]["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|c| c["v"] == json!("b")));
}

#[test]
fn given_equal_sort_keys_when_sorting_then_input_order_is_kept() {
    let records = json!([
        {"id": "r"},
        {"id": "a", "parentId": "r", "order": 1},
        {"id": "b", "parentId": "r", "order": 0},
        {"id": "c", "parentId": "r", "order": 1},
        {"id": "d", "parentId": "r", "order": 0},
        {"id": "e", "parentId": "r"},
        {"id": "f", "parentId": "r", "order": 0}
    ]);
    let mut forest = list_to_tree(records.as_array().unwrap(), None);

    let sorted = sort_tree(&mut forest, order_by_field("order"), None);

    assert_eq!(
        ids(sorted[0]["children"].as_array().unwrap()),
        vec![json!("b"), json!("d"), json!("f"), json!("a"), json!("c"), json!("e")]
    );
}
