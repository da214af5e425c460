use js_param_miner::filter::is_valid;

#[test]
fn filter_accepts_plain_paths() {
    assert!(is_valid("/login"));
    assert!(is_valid("/api/v1/users"));
}

#[test]
fn filter_rejects_blacklisted_and_short() {
    assert!(!is_valid("a,b"));
    assert!(!is_valid("/"));
    assert!(!is_valid("/search?q=1"));
    assert!(!is_valid("/favicon.ico"));
    assert!(!is_valid("/a/./b"));
}

#[test]
fn filter_is_stable_across_calls() {
    for s in ["/login", "a,b", "/", "/x.svg", "/ok/path"] {
        assert_eq!(is_valid(s), is_valid(s));
    }
}
