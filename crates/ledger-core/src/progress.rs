//! Progress notifications for long exchanges.
//!
//! Signing a large transaction takes one round trip per chunk; a UI can
//! follow along by attaching a [`ProgressObserver`]. All hooks default to
//! doing nothing, so an observer implements only what it needs.
//!
//! # Example
//!
//! ```
//! use lisk_ledger_core::progress::ProgressObserver;
//!
//! #[derive(Default)]
//! struct BytesSent(usize);
//!
//! impl ProgressObserver for BytesSent {
//!     fn on_chunk_processed(&mut self, chunk: &[u8]) {
//!         self.0 += chunk.len();
//!     }
//! }
//! ```

/// Receives notifications while an exchange runs.
///
/// `on_start` fires once before the start phase, `on_chunk_processed` once per
/// verified chunk, `on_end` once after finalize succeeds. A failing exchange
/// stops notifying at the point of failure.
pub trait ProgressObserver {
    /// The exchange is about to start.
    fn on_start(&mut self) {}

    /// A chunk was accepted and its checksums verified.
    fn on_chunk_processed(&mut self, _chunk: &[u8]) {}

    /// The exchange completed.
    fn on_end(&mut self) {}
}

/// The default observer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}
