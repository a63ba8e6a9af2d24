//! In-memory registry for tests and single-process deployments

use anyhow::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use lib_types::{PropertyId, Timestamp};

use crate::types::PropertyRecord;
use crate::PropertyRegistry;

/// Thread-safe map shared through `Arc<RwLock<..>>`; clones see the same data
#[derive(Clone, Debug, Default)]
pub struct InMemoryPropertyRegistry {
    records: Arc<RwLock<BTreeMap<PropertyId, PropertyRecord>>>,
}

impl InMemoryPropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyRegistry for InMemoryPropertyRegistry {
    fn put_property(
        &self,
        property_id: PropertyId,
        image_ref: Vec<u8>,
        doc_ref: Vec<u8>,
    ) -> Result<Option<PropertyRecord>> {
        let mut records = self.records.write();
        let mut record = PropertyRecord::new(image_ref, doc_ref);
        if let Some(existing) = records.get(&property_id) {
            record.rent_months = existing.rent_months.clone();
        }
        Ok(records.insert(property_id, record))
    }

    fn get_property(&self, property_id: &PropertyId) -> Result<Option<PropertyRecord>> {
        Ok(self.records.read().get(property_id).cloned())
    }

    fn tag(&self, property_id: &PropertyId, month: Timestamp) -> Result<bool> {
        let mut records = self.records.write();
        match records.get_mut(property_id) {
            Some(record) => {
                record.rent_months.insert(month);
                Ok(true)
            }
            None => {
                debug!(?property_id, month, "rent tag for unknown property ignored");
                Ok(false)
            }
        }
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let registry = InMemoryPropertyRegistry::new();
        let id = PropertyId::from_label("lot-7");

        assert!(registry.put_property(id, b"img".to_vec(), b"doc".to_vec()).unwrap().is_none());
        let record = registry.get_property(&id).unwrap().unwrap();
        assert_eq!(record.image_ref, b"img");
        assert_eq!(record.doc_ref, b"doc");
        assert!(registry.contains(&id).unwrap());
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn test_tags_survive_blob_replacement() {
        let registry = InMemoryPropertyRegistry::new();
        let id = PropertyId::from_label("lot-7");
        registry.put_property(id, vec![1], vec![2]).unwrap();

        assert!(registry.tag(&id, 1_661_990_400).unwrap());
        let previous = registry.put_property(id, vec![3], vec![4]).unwrap().unwrap();
        assert!(previous.rent_paid_for(1_661_990_400));

        let record = registry.get_property(&id).unwrap().unwrap();
        assert_eq!(record.image_ref, vec![3]);
        assert!(record.rent_paid_for(1_661_990_400));
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let registry = InMemoryPropertyRegistry::new();
        assert!(!registry.tag(&PropertyId::from_label("nowhere"), 0).unwrap());
        assert_eq!(registry.len().unwrap(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = InMemoryPropertyRegistry::new();
        let shared = registry.clone();
        registry.put_property(PropertyId::from_label("a"), vec![], vec![]).unwrap();
        assert_eq!(shared.len().unwrap(), 1);
    }
}
