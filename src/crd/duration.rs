//! Go-style duration strings for CRD fields
//!
//! `consolidateAfter` and `expireAfter` are serialized as duration strings
//! like `"30s"` or `"1h30m"`, with `"Never"` meaning "no duration set".
//! A zero duration (`"0s"`) is distinct from `"Never"` and is used by the
//! disruption policy mapping as an explicit "no extra wait" sentinel.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Spelling of the unset value on the wire
const NEVER: &str = "Never";

/// A duration that may be unset
///
/// `None` serializes as `"Never"`; `Some(d)` serializes as a Go-style
/// duration string built from hours, minutes and seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NillableDuration(pub Option<Duration>);

/// Error for duration strings that are neither `"Never"` nor a valid
/// `<number><unit>` sequence with units `s`, `m`, `h`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid duration {0:?}: expected e.g. \"30s\", \"1h30m\" or \"Never\"")]
pub struct InvalidDuration(String);

impl NillableDuration {
    /// The explicit zero duration (`"0s"`)
    pub fn zero() -> Self {
        NillableDuration(Some(Duration::ZERO))
    }

    /// A set duration of whole seconds
    pub fn from_secs(secs: u64) -> Self {
        NillableDuration(Some(Duration::from_secs(secs)))
    }

    /// True when no duration is set (`"Never"`)
    pub fn is_never(&self) -> bool {
        self.0.is_none()
    }
}

/// Parse a `<number><unit>` sequence into a duration
///
/// Units are `s`, `m` and `h`; segments accumulate, so `"1h30m"` is valid.
/// A bare number without a unit is not.
fn parse_segments(input: &str) -> Option<Duration> {
    let mut rest = input;
    let mut total: u64 = 0;

    if rest.is_empty() {
        return None;
    }
    while !rest.is_empty() {
        let split = rest.find(|c: char| !c.is_ascii_digit())?;
        if split == 0 {
            return None;
        }
        let value: u64 = rest[..split].parse().ok()?;
        let per_unit: u64 = match rest.as_bytes()[split] {
            b's' => 1,
            b'm' => 60,
            b'h' => 3600,
            _ => return None,
        };
        total = total.checked_add(value.checked_mul(per_unit)?)?;
        rest = &rest[split + 1..];
    }
    Some(Duration::from_secs(total))
}

impl FromStr for NillableDuration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == NEVER {
            return Ok(NillableDuration(None));
        }
        parse_segments(s)
            .map(|d| NillableDuration(Some(d)))
            .ok_or_else(|| InvalidDuration(s.to_string()))
    }
}

impl fmt::Display for NillableDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = match self.0 {
            None => return f.write_str(NEVER),
            Some(d) => d,
        };
        let total = duration.as_secs();
        if total == 0 {
            return f.write_str("0s");
        }
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        if hours > 0 {
            write!(f, "{}h", hours)?;
        }
        if minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        if seconds > 0 {
            write!(f, "{}s", seconds)?;
        }
        Ok(())
    }
}

impl Serialize for NillableDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NillableDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl JsonSchema for NillableDuration {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("NillableDuration")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^(([0-9]+(s|m|h))+|Never)$"
        })
    }
}

#[cfg(test)]
#[path = "duration_test.rs"]
mod tests;
