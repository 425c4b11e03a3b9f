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
fn defaults_when_unset() {
    let cfg = Config::from_lookup(lookup(&[])).expect("config");
    assert_eq!(cfg, Config { port: DEFAULT_PORT, seed_path: None });
}

#[test]
fn reads_port_and_seed_path() {
    let cfg = Config::from_lookup(lookup(&[("PORT", " 9090 "), ("SEED_PATH", "/tmp/seed.json")])).expect("config");
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.seed_path, Some(PathBuf::from("/tmp/seed.json")));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = Config::from_lookup(lookup(&[("PORT", ""), ("SEED_PATH", "  ")])).expect("config");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.seed_path, None);
}

#[test]
fn bad_port_is_an_error() {
    let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).expect_err("bad port");
    assert!(matches!(err, ConfigError::InvalidPort(ref raw) if raw == "eighty"));
}

#[test]
fn bundled_seed_loads_without_a_path() {
    let cfg = Config { port: DEFAULT_PORT, seed_path: None };
    let store = cfg.load_store().expect("store");
    assert!(store.user("u-marco").is_ok());
}

#[test]
fn missing_seed_file_reports_its_path() {
    let cfg = Config { port: DEFAULT_PORT, seed_path: Some(PathBuf::from("/definitely/not/here.json")) };
    let err = cfg.load_store().expect_err("missing file");
    assert!(err.to_string().contains("/definitely/not/here.json"));
}
