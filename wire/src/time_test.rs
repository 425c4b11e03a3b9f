use super::*;

#[test]
fn missing_and_garbage_sort_as_epoch() {
    assert_eq!(sort_key(None), 0);
    assert_eq!(sort_key(Some("garbage")), 0);
    assert_eq!(sort_key(Some("1970-01-01T00:00:01Z")), 1000);
}

#[test]
fn offsets_normalize_to_utc() {
    let a = sort_key(Some("2024-05-01T12:00:00+02:00"));
    let b = sort_key(Some(" 2024-05-01T10:00:00Z "));
    assert_eq!(a, b);
}
