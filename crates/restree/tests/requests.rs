//! End-to-end request dispatch over the demo document.

mod common;

use common::{demo_root, service};
use restree::codec;
use restree::Status;

#[test]
fn read_root_matches_a_pristine_instance() {
    let svc = service();
    let pristine = codec::encode_string(&demo_root());
    for path in ["", "/", "//"] {
        let response = svc.handle("GET", path, "");
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.body, pristine);
    }
}

#[test]
fn read_scalar_members() {
    let svc = service();
    assert_eq!(svc.handle("GET", "integer", "").body, "0");
    assert_eq!(svc.handle("GET", "boolean", "").body, "false");
    assert_eq!(svc.handle("GET", "text", "").body, r#""text""#);
    assert_eq!(svc.handle("GET", "null_text", "").body, "null");
}

#[test]
fn read_nested_member() {
    let svc = service();
    assert_eq!(svc.handle("GET", "nested", "").body, r#"{"a":1,"b":0}"#);
    assert_eq!(svc.handle("GET", "nested/a", "").body, "1");
}

#[test]
fn read_through_null_is_not_found() {
    let svc = service();
    let response = svc.handle("GET", "null_nested/a", "");
    assert_eq!(response.status, Status::NotFound);
}

#[test]
fn read_malformed_segment_is_a_server_error() {
    let svc = service();
    assert_eq!(svc.handle("GET", "@", "").status, Status::Error);
}

#[test]
fn read_missing_member_is_not_found() {
    let svc = service();
    assert_eq!(svc.handle("GET", "missing", "").status, Status::NotFound);
}

#[test]
fn read_containers() {
    let svc = service();
    assert_eq!(svc.handle("GET", "array", "").body, "[1,2]");
    assert_eq!(svc.handle("GET", "list", "").body, "[1,2]");
    assert_eq!(svc.handle("GET", "dictionary", "").body, r#"{"0":1,"1":2}"#);
}

#[test]
fn read_container_elements() {
    let svc = service();
    assert_eq!(svc.handle("GET", "array/1", "").body, "2");
    assert_eq!(svc.handle("GET", "list/1", "").body, "2");
    // integer-keyed map: "1" addresses the key 1, not the string "1"
    assert_eq!(svc.handle("GET", "dictionary/1", "").body, "2");
}

#[test]
fn read_out_of_range_index_is_not_found() {
    let svc = service();
    assert_eq!(svc.handle("GET", "list/9", "").status, Status::NotFound);
    assert_eq!(svc.handle("GET", "array/9", "").status, Status::NotFound);
    assert_eq!(svc.handle("GET", "dictionary/9", "").status, Status::NotFound);
}

#[test]
fn read_unparsable_index_is_a_server_error() {
    let svc = service();
    assert_eq!(svc.handle("GET", "list/x", "").status, Status::Error);
    assert_eq!(svc.handle("GET", "dictionary/x", "").status, Status::Error);
}

#[test]
fn create_on_null_member() {
    let svc = service();
    let response = svc.handle("POST", "null_nested", r#"{"a":1,"b":0}"#);
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body, "");
    assert_eq!(svc.handle("GET", "null_nested", "").body, r#"{"a":1,"b":0}"#);
}

#[test]
fn append_to_list_grows_by_one() {
    let svc = service();
    let response = svc.handle("POST", "list", "5");
    assert_eq!(response.status, Status::Ok);
    assert_eq!(svc.handle("GET", "list", "").body, "[1,2,5]");
}

#[test]
fn append_to_populated_member_is_a_conflict() {
    let svc = service();
    assert_eq!(
        svc.handle("POST", "nested", r#"{"a":1,"b":0}"#).status,
        Status::Conflict
    );
    assert_eq!(svc.handle("POST", "integer", "5").status, Status::Conflict);
}

#[test]
fn append_to_sequence_is_a_server_error() {
    let svc = service();
    assert_eq!(svc.handle("POST", "array", "5").status, Status::Error);
}

#[test]
fn post_to_absent_map_key_upserts() {
    let svc = service();
    assert_eq!(svc.handle("POST", "dictionary/7", "9").status, Status::Ok);
    assert_eq!(svc.handle("GET", "dictionary/7", "").body, "9");
}

#[test]
fn replace_then_read_round_trips() {
    let svc = service();
    assert_eq!(svc.handle("PUT", "integer", "5").status, Status::Ok);
    assert_eq!(svc.handle("GET", "integer", "").body, "5");

    assert_eq!(svc.handle("PUT", "boolean", "TRUE").status, Status::Ok);
    assert_eq!(svc.handle("GET", "boolean", "").body, "true");
}

#[test]
fn replace_string_takes_the_body_verbatim() {
    let svc = service();
    assert_eq!(svc.handle("PUT", "text", "plain text").status, Status::Ok);
    assert_eq!(svc.handle("GET", "text", "").body, r#""plain text""#);
}

#[test]
fn replace_list_element() {
    let svc = service();
    assert_eq!(svc.handle("PUT", "list/0", "9").status, Status::Ok);
    assert_eq!(svc.handle("GET", "list", "").body, "[9,2]");
}

#[test]
fn replace_out_of_range_slot_is_a_server_error() {
    let svc = service();
    assert_eq!(svc.handle("PUT", "list/9", "1").status, Status::Error);
}

#[test]
fn replace_map_entry_upserts() {
    let svc = service();
    assert_eq!(svc.handle("PUT", "dictionary/5", "6").status, Status::Ok);
    assert_eq!(svc.handle("GET", "dictionary/5", "").body, "6");
}

#[test]
fn replace_whole_record_member() {
    let svc = service();
    assert_eq!(
        svc.handle("PUT", "nested", r#"{"b":9}"#).status,
        Status::Ok
    );
    // absent members come from the shape defaults
    assert_eq!(svc.handle("GET", "nested", "").body, r#"{"a":1,"b":9}"#);
}

#[test]
fn replace_overflowing_scalar_reports_the_range() {
    let svc = service();
    let response = svc.handle("PUT", "integer", "99999999999");
    assert_eq!(response.status, Status::Error);
    assert!(response.body.contains("-2147483648..=2147483647"), "{}", response.body);
    assert!(response.body.contains("99999999999"), "{}", response.body);
}

#[test]
fn replace_malformed_scalar_names_the_type() {
    let svc = service();
    let response = svc.handle("PUT", "integer", "five");
    assert_eq!(response.status, Status::Error);
    assert!(response.body.contains("i32"), "{}", response.body);
}

#[test]
fn replace_root_is_a_server_error() {
    let svc = service();
    assert_eq!(svc.handle("PUT", "", "{}").status, Status::Error);
    assert_eq!(svc.handle("DELETE", "/", "").status, Status::Error);
}

#[test]
fn delete_list_element_preserves_order() {
    let svc = service();
    assert_eq!(svc.handle("DELETE", "list/0", "").status, Status::Ok);
    assert_eq!(svc.handle("GET", "list", "").body, "[2]");
}

#[test]
fn delete_record_member_resets_to_null() {
    let svc = service();
    assert_eq!(svc.handle("DELETE", "nested", "").status, Status::Ok);
    assert_eq!(svc.handle("GET", "nested", "").body, "null");
}

#[test]
fn delete_map_entry() {
    let svc = service();
    assert_eq!(svc.handle("DELETE", "dictionary/0", "").status, Status::Ok);
    assert_eq!(svc.handle("GET", "dictionary", "").body, r#"{"1":2}"#);
    // absent key: still ok
    assert_eq!(svc.handle("DELETE", "dictionary/42", "").status, Status::Ok);
}

#[test]
fn delete_sequence_element_is_a_server_error() {
    let svc = service();
    assert_eq!(svc.handle("DELETE", "array/0", "").status, Status::Error);
}

#[test]
fn merge_subset_leaves_other_members_alone() {
    let svc = service();
    assert_eq!(
        svc.handle("PATCH", "nested", r#"{"b":5}"#).status,
        Status::Ok
    );
    assert_eq!(svc.handle("GET", "nested", "").body, r#"{"a":1,"b":5}"#);
}

#[test]
fn merge_onto_null_member_is_not_found() {
    let svc = service();
    let response = svc.handle("PATCH", "null_nested", r#"{"b":5}"#);
    assert_eq!(response.status, Status::NotFound);
    assert!(
        response.body.contains("cannot merge into absent resource"),
        "{}",
        response.body
    );
    // and it never vivifies through this entry point
    assert_eq!(svc.handle("GET", "null_nested", "").body, "null");
}

#[test]
fn merge_list_element() {
    let svc = service();
    assert_eq!(
        svc.handle("PATCH", "list_of_objects/0", r#"{"b":7}"#).status,
        Status::Ok
    );
    assert_eq!(
        svc.handle("GET", "list_of_objects", "").body,
        r#"[{"a":1,"b":7}]"#
    );
}

#[test]
fn merge_vivifies_nested_null_members() {
    let svc = service();
    assert_eq!(
        svc.handle("PATCH", "", r#"{"null_nested":{"b":3}}"#).status,
        Status::Ok
    );
    assert_eq!(svc.handle("GET", "null_nested", "").body, r#"{"a":1,"b":3}"#);
}

#[test]
fn merge_onto_array_always_appends() {
    let svc = service();
    assert_eq!(svc.handle("PATCH", "", r#"{"list":[9]}"#).status, Status::Ok);
    assert_eq!(svc.handle("GET", "list", "").body, "[1,2,9]");
}

#[test]
fn merge_map_upserts_entries() {
    let svc = service();
    assert_eq!(
        svc.handle("PATCH", "dictionary", r#"{"5":7}"#).status,
        Status::Ok
    );
    assert_eq!(svc.handle("GET", "dictionary/5", "").body, "7");
}

#[test]
fn merge_with_scalar_payload_is_a_server_error() {
    let svc = service();
    assert_eq!(svc.handle("PATCH", "nested", "5").status, Status::Error);
}

#[test]
fn merge_with_unparsable_body_is_a_server_error() {
    let svc = service();
    assert_eq!(svc.handle("PATCH", "nested", "{not json").status, Status::Error);
}

#[test]
fn failed_merge_leaves_the_graph_untouched() {
    let svc = service();
    let before = svc.handle("GET", "nested", "").body;
    let response = svc.handle("PATCH", "nested", r#"{"b":2,"a":"no"}"#);
    assert_eq!(response.status, Status::Error);
    assert_eq!(svc.handle("GET", "nested", "").body, before);
}

#[test]
fn unknown_verb_is_a_server_error() {
    let svc = service();
    let response = svc.handle("BREW", "integer", "");
    assert_eq!(response.status, Status::Error);
    assert!(response.body.contains("unknown verb"), "{}", response.body);
}

#[test]
fn mutation_responses_have_empty_bodies() {
    let svc = service();
    assert_eq!(svc.handle("PUT", "integer", "5").body, "");
    assert_eq!(svc.handle("POST", "list", "5").body, "");
    assert_eq!(svc.handle("DELETE", "list/0", "").body, "");
    assert_eq!(svc.handle("PATCH", "nested", r#"{"b":1}"#).body, "");
}
