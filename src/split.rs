use alloc::vec::Vec;
use crate::DynString;

// token separators for split_args, matching C's isspace (which also
// accepts vertical tab, unlike is_ascii_whitespace). C line parsing
// stops at NUL; a slice is length delimited, so a zero byte separates
// tokens like whitespace does.
#[inline]
fn is_sep(c: u8) -> bool {
    c.is_ascii_whitespace() || c == 0x0b || c == 0
}

#[inline]
fn hex_digit_to_int(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl DynString {
    /// Splits s on every occurrence of the separator sequence. Each
    /// piece is an independently owned DynString; empty pieces
    /// between adjacent separators are kept. Dropping the Vec
    /// releases every piece.
    ///
    /// Panics when sep is empty.
    pub fn split(s: &[u8], sep: &[u8]) -> Vec<DynString> {
        assert!(!sep.is_empty(), "split requires a non-empty separator");
        let mut tokens = Vec::new();
        let mut start = 0;
        let mut j = 0;
        while j + sep.len() <= s.len() {
            if &s[j..j + sep.len()] == sep {
                tokens.push(DynString::from_slice(&s[start..j]));
                j += sep.len();
                start = j;
            } else {
                j += 1;
            }
        }
        tokens.push(DynString::from_slice(&s[start..]));
        tokens
    }

    /// Splits a command line into whitespace-separated tokens. Tokens
    /// may be double quoted, with \xHH hex escapes and the usual
    /// \n \r \t \a \b escapes, or single quoted, where only \' is
    /// special. A closing quote must be followed by whitespace or the
    /// end of the input.
    ///
    /// Returns None on unbalanced quotes or a trailing escape, and
    /// Some(vec![]) for blank input.
    pub fn split_args(line: &[u8]) -> Option<Vec<DynString>> {
        let mut tokens = Vec::new();
        let mut p = 0;
        loop {
            while p < line.len() && is_sep(line[p]) {
                p += 1;
            }
            if p == line.len() {
                return Some(tokens);
            }
            let mut current = DynString::new();
            let mut inq = false; // inside double quotes
            let mut insq = false; // inside single quotes
            loop {
                if inq {
                    if p == line.len() {
                        return None; // unterminated quotes
                    }
                    if line[p] == b'\\' && p + 3 < line.len() && line[p + 1] == b'x' {
                        if let (Some(hi), Some(lo)) =
                            (hex_digit_to_int(line[p + 2]), hex_digit_to_int(line[p + 3]))
                        {
                            current = current.append(&[(hi << 4) | lo]);
                            p += 4;
                            continue;
                        }
                    }
                    if line[p] == b'\\' && p + 1 < line.len() {
                        let c = match line[p + 1] {
                            b'n' => b'\n',
                            b'r' => b'\r',
                            b't' => b'\t',
                            b'b' => 0x08,
                            b'a' => 0x07,
                            c => c,
                        };
                        current = current.append(&[c]);
                        p += 2;
                    } else if line[p] == b'"' {
                        // closing quote must be followed by a separator
                        if p + 1 < line.len() && !is_sep(line[p + 1]) {
                            return None;
                        }
                        p += 1;
                        break;
                    } else {
                        current = current.append(&line[p..p + 1]);
                        p += 1;
                    }
                } else if insq {
                    if p == line.len() {
                        return None; // unterminated quotes
                    }
                    if line[p] == b'\\' && p + 1 < line.len() && line[p + 1] == b'\'' {
                        current = current.append(b"'");
                        p += 2;
                    } else if line[p] == b'\'' {
                        if p + 1 < line.len() && !is_sep(line[p + 1]) {
                            return None;
                        }
                        p += 1;
                        break;
                    } else {
                        current = current.append(&line[p..p + 1]);
                        p += 1;
                    }
                } else {
                    if p == line.len() || is_sep(line[p]) {
                        break;
                    }
                    match line[p] {
                        b'"' => inq = true,
                        b'\'' => insq = true,
                        c => current = current.append(&[c]),
                    }
                    p += 1;
                }
            }
            tokens.push(current);
        }
    }
}

#[test]
fn test_split_basic() {
    let tokens = DynString::split(b"a,b,c", b",");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], b"a");
    assert_eq!(tokens[1], b"b");
    assert_eq!(tokens[2], b"c");
}

#[test]
fn test_split_args_plain() {
    let tokens = DynString::split_args(b"set key value").unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], b"set");
    assert_eq!(tokens[1], b"key");
    assert_eq!(tokens[2], b"value");
}
