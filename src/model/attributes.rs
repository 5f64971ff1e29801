//! Attributes — the open string-to-string map on nodes and edges.

use hashbrown::HashMap;

/// A map of attribute names to values. Insertion order is irrelevant.
pub type Attributes = HashMap<String, String>;

/// Build an `Attributes` map from `(key, value)` pairs.
pub fn attrs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
