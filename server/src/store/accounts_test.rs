use super::*;

use crate::store::DEFAULT_SEED;

fn seeded() -> Store {
    Store::from_seed_json(DEFAULT_SEED).expect("default seed parses")
}

fn register(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_owned(),
        password: password.to_owned(),
        username: "Anna Neri".to_owned(),
    }
}

#[test]
fn seeded_accounts_can_log_in() {
    let store = seeded();
    let resp = store.login("Marco.Rossi@example.com ", "password1").expect("login");
    assert_eq!(resp.local_id, "u-marco");
    assert_eq!(resp.email, "marco.rossi@example.com");
}

#[test]
fn wrong_password_or_unknown_email_is_unauthorized() {
    let store = seeded();
    assert_eq!(store.login("marco.rossi@example.com", "nope"), Err(StoreError::Unauthorized));
    assert_eq!(store.login("who@example.com", "password1"), Err(StoreError::Unauthorized));
}

#[test]
fn new_accounts_log_in_only_after_verification() {
    let mut store = seeded();
    let uid = store.create_user(&register("anna@example.com", "secret1")).expect("create");
    assert_eq!(store.user(&uid).expect("user").status, STATUS_OFFLINE);
    assert_eq!(store.login("anna@example.com", "secret1"), Err(StoreError::Unauthorized));

    store.verify_user("anna@example.com").expect("verify");
    assert_eq!(store.login("anna@example.com", "secret1").expect("login").local_id, uid);
}

#[test]
fn registration_validates_input_and_uniqueness() {
    let mut store = seeded();
    assert!(matches!(store.create_user(&register("no-at-sign", "secret1")), Err(StoreError::Invalid(_))));
    assert!(matches!(store.create_user(&register("a@b.it", "12345")), Err(StoreError::Invalid(_))));
    assert!(matches!(
        store.create_user(&register("marco.rossi@example.com", "secret1")),
        Err(StoreError::Conflict(_))
    ));
}

#[test]
fn status_and_logout_update_presence() {
    let mut store = seeded();
    store.set_status("u-marco", "online").expect("status");
    assert_eq!(store.user("u-marco").expect("marco").status, "online");

    store.logout("marco.rossi@example.com").expect("logout");
    assert_eq!(store.user("u-marco").expect("marco").status, STATUS_OFFLINE);

    assert!(matches!(store.set_status("u-marco", "  "), Err(StoreError::Invalid(_))));
    assert!(matches!(store.logout("ghost@example.com"), Err(StoreError::NotFound(_))));
}
