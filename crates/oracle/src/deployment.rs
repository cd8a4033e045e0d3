//! Deployment registry — maps ilk identifiers to their pip (price feed)
//! contract addresses.
//!
//! Loaded from a JSON file supplied by the operator:
//!
//! ```json
//! {
//!   "ilks": {
//!     "ETH-A": { "pip": "0x81FE72B5A8d1A857d176C3E7d5Bd2679A9B85763" },
//!     "BAT-A": { "pip": "0xB4eb54AF9Cc7882DF0121d26c5b97E802915ABe6" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use alloy::primitives::Address;
use serde::Deserialize;

use vaults_common::error::AppError;

/// Per-ilk deployment addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IlkDeployment {
    /// The OSM/pip contract serving this ilk's price feed
    pub pip: Address,
}

/// The set of known ilks and their contract addresses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deployment {
    ilks: BTreeMap<String, IlkDeployment>,
}

impl Deployment {
    /// Parse a deployment from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json)
            .map_err(|e| AppError::Decode(format!("invalid deployment JSON: {e}")))
    }

    /// Load a deployment from a JSON file on disk.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// All known ilk identifiers, sorted.
    pub fn ilk_ids(&self) -> Vec<String> {
        self.ilks.keys().cloned().collect()
    }

    /// The pip address for an ilk, if the ilk is known.
    pub fn pip(&self, ilk: &str) -> Option<Address> {
        self.ilks.get(ilk).map(|d| d.pip)
    }

    pub fn len(&self) -> usize {
        self.ilks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ilks.is_empty()
    }
}
