//! Tests for NillableDuration parsing, formatting and serde

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::NillableDuration;
use std::time::Duration;

#[test]
fn test_parse_single_unit() {
    assert_eq!(
        "30s".parse::<NillableDuration>().unwrap(),
        NillableDuration::from_secs(30)
    );
    assert_eq!(
        "5m".parse::<NillableDuration>().unwrap(),
        NillableDuration::from_secs(300)
    );
    assert_eq!(
        "2h".parse::<NillableDuration>().unwrap(),
        NillableDuration::from_secs(7200)
    );
}

#[test]
fn test_parse_multi_unit() {
    assert_eq!(
        "1h30m".parse::<NillableDuration>().unwrap(),
        NillableDuration::from_secs(5400)
    );
    assert_eq!(
        "1h2m3s".parse::<NillableDuration>().unwrap(),
        NillableDuration::from_secs(3723)
    );
}

#[test]
fn test_parse_never() {
    let parsed: NillableDuration = "Never".parse().unwrap();
    assert!(parsed.is_never());
    assert_eq!(parsed, NillableDuration(None));
}

#[test]
fn test_parse_zero_is_set() {
    let parsed: NillableDuration = "0s".parse().unwrap();
    assert!(!parsed.is_never());
    assert_eq!(parsed, NillableDuration::zero());
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("".parse::<NillableDuration>().is_err());
    assert!("30".parse::<NillableDuration>().is_err()); // missing unit
    assert!("s30".parse::<NillableDuration>().is_err());
    assert!("30x".parse::<NillableDuration>().is_err());
    assert!("never".parse::<NillableDuration>().is_err()); // case-sensitive
    assert!("1h 30m".parse::<NillableDuration>().is_err());
}

#[test]
fn test_display() {
    assert_eq!(NillableDuration(None).to_string(), "Never");
    assert_eq!(NillableDuration::zero().to_string(), "0s");
    assert_eq!(NillableDuration::from_secs(30).to_string(), "30s");
    assert_eq!(NillableDuration::from_secs(5400).to_string(), "1h30m");
    assert_eq!(NillableDuration::from_secs(3723).to_string(), "1h2m3s");
    assert_eq!(NillableDuration::from_secs(18000).to_string(), "5h");
}

#[test]
fn test_serde_round_trip() {
    for value in [
        NillableDuration(None),
        NillableDuration::zero(),
        NillableDuration::from_secs(90),
        NillableDuration(Some(Duration::from_secs(3600))),
    ] {
        let json = serde_json::to_string(&value).unwrap();
        let back: NillableDuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value, "round trip through {}", json);
    }
}

#[test]
fn test_serde_wire_format() {
    assert_eq!(
        serde_json::to_string(&NillableDuration::from_secs(300)).unwrap(),
        "\"5m\""
    );
    assert_eq!(
        serde_json::to_string(&NillableDuration(None)).unwrap(),
        "\"Never\""
    );
    let parsed: NillableDuration = serde_json::from_str("\"90s\"").unwrap();
    assert_eq!(parsed, NillableDuration::from_secs(90));
}

#[test]
fn test_deserialize_rejects_invalid() {
    assert!(serde_json::from_str::<NillableDuration>("\"later\"").is_err());
    assert!(serde_json::from_str::<NillableDuration>("30").is_err());
}
