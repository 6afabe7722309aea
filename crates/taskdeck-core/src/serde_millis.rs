#![forbid(unsafe_code)]

//! Serialize [`Duration`] fields as whole milliseconds.
//!
//! Config files say `snap_back_ms = 200` rather than `{ secs, nanos }`.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Timing {
//!     #[serde(with = "taskdeck_core::serde_millis")]
//!     snap_back: Duration,
//! }
//! ```

use serde::{Deserialize, Deserializer, Serializer};
use web_time::Duration;

pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis().min(u128::from(u64::MAX)) as u64)
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    u64::deserialize(d).map(Duration::from_millis)
}
