#![cfg(feature = "serde")]

use dynstring::DynString;

#[test]
fn test_json_roundtrip() {
    let s = DynString::from_slice(b"hello");
    let json = serde_json::to_string(&s).unwrap();
    let back: DynString = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn test_json_roundtrip_binary() {
    let s = DynString::from_slice(b"\x00\x01\xff\x00");
    let json = serde_json::to_string(&s).unwrap();
    let back: DynString = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
    assert_eq!(back.len(), 4);
}

#[test]
fn test_json_from_string() {
    let s: DynString = serde_json::from_str("\"abc\"").unwrap();
    assert_eq!(s, b"abc");
}

#[test]
fn test_json_from_number_array() {
    let s: DynString = serde_json::from_str("[104, 105]").unwrap();
    assert_eq!(s, b"hi");
}
