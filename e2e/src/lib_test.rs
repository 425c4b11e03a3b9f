use super::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn config_defaults_to_dev_seed_accounts() {
    let cfg = E2eConfig::from_lookup(lookup(&[]));
    assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
    assert_eq!(cfg.sender.email, "marco.rossi@example.com");
    assert_eq!(cfg.receiver.email, "luigi.bianchi@example.com");
    assert_eq!(cfg.chat_id, DEFAULT_CHAT_ID);
}

#[test]
fn config_overrides_and_ignores_blanks() {
    let cfg = E2eConfig::from_lookup(lookup(&[
        ("E2E_BASE_URL", "https://chat.test"),
        ("E2E_RECEIVER_PASSWORD", "hunter2"),
        ("E2E_CHAT_ID", "  "),
    ]));
    assert_eq!(cfg.base_url, "https://chat.test");
    assert_eq!(cfg.receiver.password, "hunter2");
    assert_eq!(cfg.chat_id, DEFAULT_CHAT_ID);
}

#[test]
fn ws_url_follows_http_scheme() {
    assert_eq!(ws_url("http://127.0.0.1:8080/").expect("url"), "ws://127.0.0.1:8080/api/ws");
    assert_eq!(ws_url("https://chat.test").expect("url"), "wss://chat.test/api/ws");
    assert!(matches!(ws_url("chat.test"), Err(E2eError::InvalidBaseUrl(_))));
}
