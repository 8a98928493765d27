// ── Worker domain type ──

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::algorithm::Algorithm;
use super::field::{Field, RigKey};

/// A daemon-managed unit binding one device to its running algorithms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Worker {
    pub id: RigKey,
    pub device_id: RigKey,
    pub device_uuid: Field<String>,
    /// Per-worker algorithm speeds keyed by algorithm id.
    ///
    /// `Unavailable` when the response carried no algorithm list, which is
    /// not the same as an empty map.
    #[serde(serialize_with = "serialize_algorithms")]
    pub algorithms: Field<IndexMap<RigKey, Algorithm>>,
}

impl Worker {
    pub fn algorithm(&self, id: i64) -> Option<&Algorithm> {
        self.algorithms.get()?.get(&Field::Available(id))
    }
}

/// JSON object keys must be strings, so the nested map is emitted as a list.
fn serialize_algorithms<S: Serializer>(
    algorithms: &Field<IndexMap<RigKey, Algorithm>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match algorithms {
        Field::Available(map) => serializer.collect_seq(map.values()),
        Field::Unavailable => serializer.serialize_none(),
    }
}
