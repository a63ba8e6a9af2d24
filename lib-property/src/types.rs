use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use lib_types::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub image_ref: Vec<u8>,
    pub doc_ref: Vec<u8>,
    /// Month starts with a recorded rent payment
    #[serde(default)]
    pub rent_months: BTreeSet<Timestamp>,
}

impl PropertyRecord {
    pub fn new(image_ref: Vec<u8>, doc_ref: Vec<u8>) -> Self {
        Self {
            image_ref,
            doc_ref,
            rent_months: BTreeSet::new(),
        }
    }

    pub fn rent_paid_for(&self, month: Timestamp) -> bool {
        self.rent_months.contains(&month)
    }
}
