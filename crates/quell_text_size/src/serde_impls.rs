//! Serde support: `TextSize` serializes as a bare integer, `TextRange` as a
//! `[start, end]` pair.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeTuple, Serializer};

use crate::{TextRange, TextSize};

impl Serialize for TextSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_u32().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TextSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(TextSize::new)
    }
}

impl Serialize for TextRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.start())?;
        tuple.serialize_element(&self.end())?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for TextRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (start, end) = <(TextSize, TextSize)>::deserialize(deserializer)?;
        if start > end {
            return Err(de::Error::custom(format!(
                "invalid range {start:?}..{end:?}"
            )));
        }
        Ok(TextRange::new(start, end))
    }
}
