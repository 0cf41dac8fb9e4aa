//! Rows keyed by a store-allocated surrogate id

use serde::{Deserialize, Serialize};

/// A record together with the surrogate key the store allocated for it
///
/// Days, vehicles, location points and border trips have no natural single
/// column key. Their ids come from the store's sequence at commit time and
/// are never supplied by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: i64,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(id: i64, record: T) -> Self {
        Self { id, record }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Stored<U> {
        Stored {
            id: self.id,
            record: f(self.record),
        }
    }
}
