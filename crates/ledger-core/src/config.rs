//! Driver configuration.
//!
//! ```
//! use lisk_ledger_core::LedgerConfig;
//!
//! let config: LedgerConfig = serde_json::from_str(r#"{ "chunk_size": 128 }"#).unwrap();
//! assert!(config.validate().is_ok());
//! assert_eq!(LedgerConfig::default().chunk_size, 240);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::MAX_CHUNK_SIZE;
use crate::protocol::exchange::validate_chunk_size;

/// Settings for a [`LiskLedger`](crate::LiskLedger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Bytes per append; `1..=240`. Leave at 240 unless the transport
    /// cannot carry full frames.
    pub chunk_size: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            chunk_size: MAX_CHUNK_SIZE,
        }
    }
}

impl LedgerConfig {
    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) for a
    /// chunk size outside `1..=240`.
    pub fn validate(&self) -> Result<()> {
        validate_chunk_size(self.chunk_size)
    }
}
