//! Property metadata registry
//!
//! Stores opaque image and document references per property and the months
//! in which rent was paid against it. The ledger never reads these blobs.

pub mod memory;
pub mod types;

pub use memory::InMemoryPropertyRegistry;
pub use types::PropertyRecord;

use anyhow::Result;
use lib_types::{PropertyId, Timestamp};

/// Registry interface the ledger depends on
///
/// Implementations must be safe to share between threads.
pub trait PropertyRegistry: Send + Sync {
    /// Store or replace the blobs for a property. Returns the previous record.
    fn put_property(
        &self,
        property_id: PropertyId,
        image_ref: Vec<u8>,
        doc_ref: Vec<u8>,
    ) -> Result<Option<PropertyRecord>>;

    fn get_property(&self, property_id: &PropertyId) -> Result<Option<PropertyRecord>>;

    fn contains(&self, property_id: &PropertyId) -> Result<bool> {
        Ok(self.get_property(property_id)?.is_some())
    }

    /// Record that rent for `month` was paid against `property_id`
    ///
    /// Unknown properties are accepted and ignored. Returns whether a record
    /// was tagged.
    fn tag(&self, property_id: &PropertyId, month: Timestamp) -> Result<bool>;

    fn len(&self) -> Result<usize>;
}
