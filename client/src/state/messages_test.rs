use super::*;

const T1: &str = "2024-05-01T10:00:00Z";
const T2: &str = "2024-05-01T10:01:00Z";
const T3: &str = "2024-05-01T10:02:00Z";

fn msg(id: &str, ts: Option<&str>, content: &str) -> Message {
    Message {
        id: id.to_owned(),
        chat_id: "c1".to_owned(),
        sender: "u1".to_owned(),
        content: content.to_owned(),
        timestamp: ts.map(str::to_owned),
        read: false,
    }
}

fn patch(id: &str, ts: Option<&str>, content: &str) -> MessagePatch {
    MessagePatch {
        id: id.to_owned(),
        chat_id: Some("c1".to_owned()),
        sender: Some("u1".to_owned()),
        content: Some(content.to_owned()),
        timestamp: ts.map(str::to_owned),
        read: None,
    }
}

fn ids(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.id.as_str()).collect()
}

// =============================================================
// Timestamp preservation
// =============================================================

#[test]
fn null_timestamp_keeps_known_one() {
    let prev = vec![msg("m1", Some(T1), "a")];
    let merged = merge_batch(&prev, &[patch("m1", None, "a")], "c1").expect("merged");
    assert_eq!(merged, vec![msg("m1", Some(T1), "a")]);
}

#[test]
fn supplied_timestamp_overrides_known_one() {
    let prev = vec![msg("m1", Some(T1), "a")];
    let merged = merge_batch(&prev, &[patch("m1", Some(T2), "a")], "c1").expect("merged");
    assert_eq!(merged[0].timestamp.as_deref(), Some(T2));
}

#[test]
fn unknown_record_without_timestamp_stays_without() {
    let merged = merge_batch(&[], &[patch("m1", None, "a")], "c1").expect("merged");
    assert_eq!(merged[0].timestamp, None);
}

#[test]
fn absent_fields_fall_back_to_prior_record() {
    let mut prior = msg("m1", Some(T1), "hello");
    prior.read = true;
    let sparse = MessagePatch {
        id: "m1".to_owned(),
        ..MessagePatch::default()
    };
    let merged = merge_record(Some(&prior), &sparse, "c1");
    assert_eq!(merged, prior);
}

#[test]
fn incoming_fields_win_over_prior() {
    let prior = msg("m1", Some(T1), "hello");
    let mut edit = patch("m1", None, "hello (edited)");
    edit.read = Some(true);
    let merged = merge_record(Some(&prior), &edit, "c1");
    assert_eq!(merged.content, "hello (edited)");
    assert!(merged.read);
    assert_eq!(merged.timestamp.as_deref(), Some(T1));
}

// =============================================================
// Ordering
// =============================================================

#[test]
fn output_is_sorted_for_every_input_permutation() {
    let records = [patch("a", Some(T1), "1"), patch("b", Some(T2), "2"), patch("c", Some(T3), "3")];
    let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    for order in orders {
        let batch: Vec<MessagePatch> = order.iter().map(|&i| records[i].clone()).collect();
        let merged = merge_batch(&[], &batch, "c1").expect("merged");
        assert_eq!(ids(&merged), vec!["a", "b", "c"], "order {order:?}");
    }
}

#[test]
fn equal_timestamps_keep_batch_order() {
    let batch = vec![patch("z", Some(T1), "1"), patch("a", Some(T1), "2"), patch("m", Some(T1), "3")];
    let merged = merge_batch(&[], &batch, "c1").expect("merged");
    assert_eq!(ids(&merged), vec!["z", "a", "m"]);
}

#[test]
fn malformed_timestamps_sort_first_without_panicking() {
    let batch = vec![patch("good", Some(T1), "1"), patch("bad", Some("not a date"), "2"), patch("none", None, "3")];
    let merged = merge_batch(&[], &batch, "c1").expect("merged");
    assert_eq!(ids(&merged), vec!["bad", "none", "good"]);
}

// =============================================================
// Batch semantics
// =============================================================

#[test]
fn batch_is_a_full_snapshot_of_the_chat() {
    let prev = vec![msg("m1", Some(T1), "a"), msg("m2", Some(T2), "b")];
    let merged = merge_batch(&prev, &[patch("m2", None, "b")], "c1").expect("merged");
    assert_eq!(ids(&merged), vec!["m2"]);
    assert_eq!(merged[0].timestamp.as_deref(), Some(T2));
}

#[test]
fn records_for_other_chats_are_dropped() {
    let mut foreign = patch("x1", Some(T1), "elsewhere");
    foreign.chat_id = Some("c2".to_owned());
    let merged = merge_batch(&[], &[foreign, patch("m1", Some(T2), "here")], "c1").expect("merged");
    assert_eq!(ids(&merged), vec!["m1"]);
}

#[test]
fn batch_without_active_chat_records_leaves_view_alone() {
    let mut foreign = patch("x1", Some(T1), "elsewhere");
    foreign.chat_id = Some("c2".to_owned());
    let prev = vec![msg("m1", Some(T1), "a")];
    assert_eq!(merge_batch(&prev, &[foreign], "c1"), None);
}

#[test]
fn empty_batch_empties_the_chat() {
    let prev = vec![msg("m1", Some(T1), "a")];
    assert_eq!(merge_batch(&prev, &[], "c1"), Some(Vec::new()));
}

#[test]
fn duplicate_ids_in_one_batch_collapse() {
    let batch = vec![patch("m1", Some(T1), "first"), patch("m2", Some(T2), "other"), patch("m1", None, "second")];
    let merged = merge_batch(&[], &batch, "c1").expect("merged");
    assert_eq!(ids(&merged), vec!["m1", "m2"]);
    assert_eq!(merged[0].content, "second");
    assert_eq!(merged[0].timestamp.as_deref(), Some(T1));
}

#[test]
fn record_without_chat_id_is_attributed_to_active_chat() {
    let mut bare = patch("m1", Some(T1), "a");
    bare.chat_id = None;
    let merged = merge_batch(&[], &[bare], "c1").expect("merged");
    assert_eq!(merged[0].chat_id, "c1");
}

// =============================================================
// Day grouping
// =============================================================

#[test]
fn group_by_day_splits_on_calendar_boundaries() {
    let utc = FixedOffset::east_opt(0).expect("offset");
    let messages = vec![
        msg("a", Some("2024-05-01T22:00:00Z"), "1"),
        msg("b", Some("2024-05-01T23:00:00Z"), "2"),
        msg("c", Some("2024-05-02T08:00:00Z"), "3"),
    ];
    let groups = group_by_day(&messages, utc);
    assert_eq!(groups.len(), 2);
    assert_eq!(ids(&groups[0].messages), vec!["a", "b"]);
    assert_eq!(groups[1].day, NaiveDate::from_ymd_opt(2024, 5, 2).expect("date"));
}
