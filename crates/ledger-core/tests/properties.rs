//! Property tests for chunking, the CRC chain and path derivation.

// Silence unused crate dependency warnings for test binary
use crc as _;
use hex as _;
use log as _;
use serde as _;
use serde_json as _;
use thiserror as _;

mod common;

use common::SimulatedDevice;
use lisk_ledger_core::path::HARDENED;
use lisk_ledger_core::protocol::ins;
use lisk_ledger_core::{DerivedPath, LedgerAccount, LiskLedger};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunks_reassemble(
        payload in proptest::collection::vec(any::<u8>(), 0..2048),
        chunk_size in 1usize..=240,
    ) {
        let device = SimulatedDevice::with_fixed_reply(vec![vec![0x01]]);
        let mut ledger = LiskLedger::with_chunk_size(device, chunk_size).unwrap();

        let fields = ledger.exchange(&payload).unwrap();
        prop_assert_eq!(fields, vec![vec![0x01]]);

        let device = ledger.transport();
        prop_assert_eq!(device.append_count(), payload.len().div_ceil(chunk_size));
        prop_assert_eq!(device.calls.len(), device.append_count() + 2);
        prop_assert_eq!(device.calls.first().map(|a| a.ins()), Some(ins::START));
        prop_assert_eq!(device.calls.last().map(|a| a.ins()), Some(ins::FINALIZE));
        prop_assert_eq!(&device.payloads[0], &payload);
    }

    #[test]
    fn corrupted_chunk_always_detected(
        len in 1usize..1200,
        chunk_size in 1usize..=240,
        at in any::<proptest::sample::Index>(),
        prev in any::<bool>(),
    ) {
        let chunks = len.div_ceil(chunk_size);
        let at = at.index(chunks);
        // The first chunk's previous CRC is zero on both sides; flipping it
        // is still a mismatch.
        let device = if prev {
            SimulatedDevice::with_fixed_reply(vec![]).with_corrupt_prev_at(at)
        } else {
            SimulatedDevice::with_fixed_reply(vec![]).with_corrupt_crc_at(at)
        };
        let mut ledger = LiskLedger::with_chunk_size(device, chunk_size).unwrap();

        let err = ledger.exchange(vec![0x5Au8; len]).unwrap_err();
        prop_assert!(err.is_integrity());
        prop_assert_eq!(ledger.transport().append_count(), at + 1);
        prop_assert!(ledger.transport().payloads.is_empty());
    }

    #[test]
    fn path_is_deterministic(account in 0u32..HARDENED) {
        let a = LedgerAccount::new(account).unwrap().derive_path();
        let b = LedgerAccount::new(account).unwrap().derive_path();

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.len(), 12);
        prop_assert_eq!(a.elements(), vec![44 | HARDENED, 134 | HARDENED, account | HARDENED]);
        prop_assert_eq!(&a.to_string().parse::<DerivedPath>().unwrap(), &a);
    }

    #[test]
    fn coin_index_never_changes_path(account in 0u32..HARDENED, coin in 0u32..HARDENED) {
        let plain = LedgerAccount::new(account).unwrap();
        let with_coin = plain.with_coin_index(coin).unwrap();

        prop_assert_eq!(plain.derive_path(), with_coin.derive_path());
    }

    #[test]
    fn out_of_range_account_rejected(account in HARDENED..=u32::MAX) {
        prop_assert!(LedgerAccount::new(account).is_err());
    }
}
