//! Status words returned by the Lisk Ledger application.
//!
//! | SW     | Meaning                                 |
//! |--------|-----------------------------------------|
//! | `9000` | Success                                 |
//! | `6803` | Payload larger than the app can buffer  |
//! | `6985` | Request rejected on the device          |
//! | `6A80` | Invalid data                            |
//! | `6A81` | Unknown command                         |
//! | `6E00` | Class not supported                     |
//! | `9802` | Exchange continued without a start      |

/// Success.
pub const SW_OK: u16 = 0x9000;

/// The announced payload does not fit the device implementation.
pub const SW_PAYLOAD_TOO_BIG: u16 = 0x6803;

/// The user rejected the request on the device.
pub const SW_REJECTED: u16 = 0x6985;

/// The device could not parse the payload.
pub const SW_INVALID_DATA: u16 = 0x6A80;

/// The payload opcode is unknown to the device.
pub const SW_UNKNOWN_COMMAND: u16 = 0x6A81;

/// The command class is not supported (wrong app open).
pub const SW_CLA_NOT_SUPPORTED: u16 = 0x6E00;

/// An append or finalize arrived without a preceding start.
pub const SW_NOT_INITIALIZED: u16 = 0x9802;

/// Returns a short name for a status word.
#[must_use]
pub const fn describe(status: u16) -> &'static str {
    match status {
        SW_OK => "OK",
        SW_PAYLOAD_TOO_BIG => "PAYLOAD_TOO_BIG",
        SW_REJECTED => "Condition of use not satisfied (denied by the user?)",
        SW_INVALID_DATA => "Invalid data received",
        SW_UNKNOWN_COMMAND => "UNKNOWN_ERROR",
        SW_CLA_NOT_SUPPORTED => "CLA_NOT_SUPPORTED",
        SW_NOT_INITIALIZED => "CODE_NOT_INITIALIZED",
        _ => "UNKNOWN_STATUS",
    }
}
