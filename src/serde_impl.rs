use alloc::fmt;
use serde::de::{Deserialize, Deserializer, Error, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::DynString;

impl Serialize for DynString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self)
    }
}

struct DynStringVisitor;

impl<'de> Visitor<'de> for DynStringVisitor {
    type Value = DynString;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a byte string")
    }

    fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<DynString, E> {
        Ok(DynString::from_slice(v))
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<DynString, E> {
        Ok(DynString::from_slice(v.as_bytes()))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<DynString, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut s = DynString::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(b) = seq.next_element::<u8>()? {
            s.push_slice(&[b]);
        }
        Ok(s)
    }
}

impl<'de> Deserialize<'de> for DynString {
    fn deserialize<D>(deserializer: D) -> Result<DynString, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_byte_buf(DynStringVisitor)
    }
}
