use super::*;
use chrono::TimeZone;

use crate::store::DEFAULT_SEED;

fn seeded() -> Store {
    Store::from_seed_json(DEFAULT_SEED).expect("default seed parses")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).single().expect("valid time")
}

#[test]
fn friend_rows_join_user_records() {
    let store = seeded();
    let friends = store.friends("u-marco").expect("friends");
    let names: Vec<&str> = friends.iter().map(|f| f.username.as_str()).collect();
    assert_eq!(names, vec!["Giulia Verdi", "Luigi Bianchi"]);
    assert!(friends.iter().all(|f| f.friendship_status == FriendStatus::Active));
}

#[test]
fn pending_requests_list_the_senders() {
    let store = seeded();
    let requests = store.friend_requests("u-luigi").expect("requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, "u-giulia");
    assert_eq!(requests[0].friendship_status, FriendStatus::Pending);
}

#[test]
fn accept_links_both_sides_and_clears_request() {
    let mut store = seeded();
    store.accept_friend_request("u-giulia", "u-luigi", now()).expect("accept");

    let luigi = store.user("u-luigi").expect("luigi");
    assert!(luigi.friend_requests.is_empty());
    assert_eq!(luigi.friends["u-giulia"].status, FriendStatus::Active);
    assert_eq!(
        store.user("u-giulia").expect("giulia").friends["u-luigi"].since.as_deref(),
        Some("2026-10-16T12:00:00.000Z")
    );
}

#[test]
fn reject_only_removes_the_request() {
    let mut store = seeded();
    store.reject_friend_request("u-giulia", "u-luigi").expect("reject");
    let luigi = store.user("u-luigi").expect("luigi");
    assert!(luigi.friend_requests.is_empty());
    assert!(!luigi.friends.contains_key("u-giulia"));
}

#[test]
fn answering_a_missing_request_is_not_found() {
    let mut store = seeded();
    assert!(matches!(
        store.accept_friend_request("u-marco", "u-luigi", now()),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.reject_friend_request("u-marco", "u-giulia"),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn send_request_checks_self_and_existing_friendship() {
    let mut store = seeded();
    assert!(matches!(
        store.send_friend_request("u-marco", "u-marco"),
        Err(StoreError::Invalid(_))
    ));
    assert!(matches!(
        store.send_friend_request("u-marco", "u-luigi"),
        Err(StoreError::Conflict(_))
    ));
    assert!(matches!(
        store.send_friend_request("u-marco", "ghost"),
        Err(StoreError::NotFound(_))
    ));

    store.send_friend_request("u-luigi", "u-giulia").expect("send");
    assert_eq!(
        store.user("u-giulia").expect("giulia").friend_requests.get("u-luigi").map(String::as_str),
        Some("pending")
    );
}
