use std::collections::HashMap;

use super::{DisplayInfo, DisplayNameDirectory};
use crate::config::KnownAddress;

/// Display names served from configuration, keyed by lowercased address.
#[derive(Debug, Default)]
pub struct KnownAddressDirectory {
    entries: HashMap<String, DisplayInfo>,
}

impl KnownAddressDirectory {
    pub fn new(known_addresses: &[KnownAddress]) -> Self {
        let entries = known_addresses
            .iter()
            .map(|known| {
                (
                    known.address.to_lowercase(),
                    DisplayInfo {
                        name: known.name.clone(),
                        image_url: known.image_url.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DisplayNameDirectory for KnownAddressDirectory {
    fn lookup(&self, address: &str) -> Option<DisplayInfo> {
        self.entries.get(&address.to_lowercase()).cloned()
    }
}
