use core::fmt::Write;
use dynstring::DynString;

#[test]
fn test_split() {
    let tokens = DynString::split(b"a,b,,c", b",");
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0], b"a");
    assert_eq!(tokens[1], b"b");
    assert_eq!(tokens[2], b""); // empty pieces are kept
    assert_eq!(tokens[3], b"c");
}

#[test]
fn test_split_multibyte_separator() {
    let tokens = DynString::split(b"foo--bar--baz", b"--");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], b"foo");
    assert_eq!(tokens[1], b"bar");
    assert_eq!(tokens[2], b"baz");
}

#[test]
fn test_split_edges() {
    // leading and trailing separators yield empty pieces
    let tokens = DynString::split(b",x,", b",");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], b"");
    assert_eq!(tokens[1], b"x");
    assert_eq!(tokens[2], b"");

    // no separator present: one piece, the whole input
    let tokens = DynString::split(b"whole", b";");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0], b"whole");

    // empty input: one empty piece
    let tokens = DynString::split(b"", b",");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0], b"");
}

#[test]
fn test_split_binary() {
    let tokens = DynString::split(b"a\0b\0c", b"\0");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], b"a");
    assert_eq!(tokens[2], b"c");
}

#[test]
#[should_panic(expected = "non-empty separator")]
fn test_split_empty_separator_panics() {
    let _ = DynString::split(b"abc", b"");
}

#[test]
fn test_join() {
    let sep = DynString::from_slice(b", ");
    let parts: [&[u8]; 3] = [b"a", b"b", b"c"];
    assert_eq!(sep.join(parts), b"a, b, c");

    // single item: no separator emitted
    let one: [&[u8]; 1] = [b"solo"];
    assert_eq!(sep.join(one), b"solo");

    // empty iterator: empty string
    let none: [&[u8]; 0] = [];
    assert_eq!(sep.join(none), b"");
}

#[test]
fn test_join_item_types() {
    let sep = DynString::from_slice(b"-");
    assert_eq!(sep.join([b'a', b'b', b'c']), b"a-b-c");
    assert_eq!(sep.join([b"ab", b"cd"]), b"ab-cd");
    let owned = [DynString::from_slice(b"x"), DynString::from_slice(b"y")];
    assert_eq!(sep.join(&owned), b"x-y");
    assert_eq!(sep.join(vec![vec![1u8], vec![2u8]]), &[1u8, b'-', 2u8][..]);
}

#[test]
fn test_join_long_iterator() {
    // more items than one reservation block
    let sep = DynString::from_slice(b",");
    let items: Vec<&[u8]> = (0..20).map(|_| b"i".as_slice()).collect();
    let joined = sep.join(items);
    assert_eq!(joined.len(), 20 + 19);
}

#[test]
fn test_split_join_inverse() {
    let original = b"alpha;beta;;gamma";
    let tokens = DynString::split(original, b";");
    let sep = DynString::from_slice(b";");
    assert_eq!(sep.join(&tokens), &original[..]);
}

#[test]
fn test_split_args() {
    let tokens = DynString::split_args(b"  set  key  \"hello world\"  ").unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], b"set");
    assert_eq!(tokens[1], b"key");
    assert_eq!(tokens[2], b"hello world");
}

#[test]
fn test_split_args_escapes() {
    let tokens = DynString::split_args(b"\"\\x41\\x62\" \"\\n\\r\\t\\a\\b\" \"\\\\ \\\"\"").unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], b"Ab");
    assert_eq!(tokens[1], b"\n\r\t\x07\x08");
    assert_eq!(tokens[2], b"\\ \"");

    // an unknown escape is the escaped byte itself
    let tokens = DynString::split_args(b"\"\\q\"").unwrap();
    assert_eq!(tokens[0], b"q");

    // \x without two hex digits falls back to the plain escape
    let tokens = DynString::split_args(b"\"\\xzz\"").unwrap();
    assert_eq!(tokens[0], b"xzz");
}

#[test]
fn test_split_args_single_quotes() {
    let tokens = DynString::split_args(b"'single quoted' 'don\\'t'").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], b"single quoted");
    assert_eq!(tokens[1], b"don't");

    // escapes other than \' are literal inside single quotes
    let tokens = DynString::split_args(b"'a\\nb'").unwrap();
    assert_eq!(tokens[0], b"a\\nb");
}

#[test]
fn test_split_args_rejects_malformed() {
    // unterminated quotes
    assert!(DynString::split_args(b"\"unbalanced").is_none());
    assert!(DynString::split_args(b"'unbalanced").is_none());
    // a closing quote must be followed by whitespace or the end
    assert!(DynString::split_args(b"\"a\"b").is_none());
    assert!(DynString::split_args(b"'a'b").is_none());
}

#[test]
fn test_split_args_blank_input() {
    assert_eq!(DynString::split_args(b"").unwrap().len(), 0);
    assert_eq!(DynString::split_args(b"   \t \x0b \r\n ").unwrap().len(), 0);
}

#[test]
fn test_split_args_vertical_tab_separates() {
    // C's isspace accepts vertical tab
    let tokens = DynString::split_args(b"a\x0bb").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], b"a");
    assert_eq!(tokens[1], b"b");
}

#[test]
fn test_split_args_zero_byte_separates() {
    let tokens = DynString::split_args(b"one\0two").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], b"one");
    assert_eq!(tokens[1], b"two");
}

#[test]
fn test_trim() {
    let s = DynString::from_slice(b"xxhello worldyx").trim(b"xy");
    assert_eq!(s, b"hello world");

    // characters from the set inside the string are kept
    let s = DynString::from_slice(b"--a-b--").trim(b"-");
    assert_eq!(s, b"a-b");

    // everything trimmed away
    let s = DynString::from_slice(b"   ").trim(b" ");
    assert_eq!(s.len(), 0);
    assert_eq!(s.available(), 3);

    // nothing to trim
    let s = DynString::from_slice(b"abc").trim(b"xyz");
    assert_eq!(s, b"abc");
}

#[test]
fn test_trim_never_relocates() {
    let s = DynString::from_slice(b"  padded  ");
    let ptr = s.as_ptr();
    let s = s.trim(b" ");
    assert_eq!(s.as_ptr(), ptr);
    assert_eq!(s, b"padded");
}

#[test]
fn test_map_bytes() {
    let s = DynString::from_slice(b"hello").map_bytes(b"ho", b"0\0");
    assert_eq!(s, b"\0ell0");
    assert_eq!(s.len(), 5); // embedded zero does not truncate
}

#[test]
#[should_panic(expected = "equal length")]
fn test_map_bytes_length_mismatch_panics() {
    let _ = DynString::from_slice(b"abc").map_bytes(b"ab", b"x");
}

#[test]
fn test_from_int() {
    assert_eq!(DynString::from_int(0), b"0");
    assert_eq!(DynString::from_int(42), b"42");
    assert_eq!(DynString::from_int(-7), b"-7");
    assert_eq!(DynString::from_int(i64::MAX), b"9223372036854775807");
    assert_eq!(DynString::from_int(i64::MIN), b"-9223372036854775808");
}

#[test]
fn test_append_fmt() {
    let s = DynString::from_slice(b"x=").append_fmt(format_args!("{}/{}", 3, 4));
    assert_eq!(s, b"x=3/4");
}

#[test]
fn test_write_macro() {
    let mut s = DynString::new();
    write!(s, "{}-{:02}", "id", 7).unwrap();
    assert_eq!(s, b"id-07");
}

#[test]
fn test_append_repr() {
    let s = DynString::from_slice(b"repr: ").append_repr(b"a\n\"b\"\\\x01\xff");
    assert_eq!(s, b"repr: \"a\\n\\\"b\\\"\\\\\\x01\\xff\"");
    let s = DynString::new().append_repr(b"\x07\x08\t\r");
    assert_eq!(s, b"\"\\a\\b\\t\\r\"");
}

#[test]
fn test_debug_format() {
    let s = DynString::from_slice(b"ab\0\n\"\\\x7f");
    assert_eq!(format!("{:?}", s), "b\"ab\\x00\\n\\\"\\\\\\x7f\"");
}

#[test]
fn test_collect_bytes() {
    let s: DynString = (b'a'..=b'e').collect();
    assert_eq!(s, b"abcde");
    let v = vec![1u8, 2, 3];
    let s: DynString = v.iter().collect();
    assert_eq!(s, &[1u8, 2, 3][..]);
}

#[test]
fn test_collect_slices() {
    let parts: Vec<&[u8]> = vec![b"ab", b"", b"cd", b"e"];
    let s: DynString = parts.into_iter().collect();
    assert_eq!(s, b"abcde");

    let owned = vec![
        DynString::from_slice(b"one"),
        DynString::from_slice(b"two"),
    ];
    let s: DynString = owned.into_iter().collect();
    assert_eq!(s, b"onetwo");

    // more items than one reservation block
    let many: Vec<&[u8]> = (0..30).map(|_| b"z".as_slice()).collect();
    let s: DynString = many.into_iter().collect();
    assert_eq!(s.len(), 30);
}
