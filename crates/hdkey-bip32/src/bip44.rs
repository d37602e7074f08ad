//! BIP44 derivation paths.
//!
//! Path structure: m / purpose' / coin_type' / account' / change / address_index

#![forbid(unsafe_code)]

use crate::path::{DerivationPath, HARDENED};

/// BIP44 purpose constant.
pub const PURPOSE: u32 = 44;

/// Bitcoin coin type (SLIP-0044).
pub const BITCOIN_COIN_TYPE: u32 = 0;

/// Ethereum coin type (SLIP-0044).
pub const ETHEREUM_COIN_TYPE: u32 = 60;

/// Build m/44'/coin_type'/account'/change/address_index.
pub fn bip44_path(coin_type: u32, account: u32, change: u32, address_index: u32) -> DerivationPath {
    DerivationPath::from(vec![
        HARDENED | PURPOSE,   // 44'
        HARDENED | coin_type, // coin_type'
        HARDENED | account,   // account'
        change,               // change (not hardened)
        address_index,        // address_index (not hardened)
    ])
}

/// Account-level path m/44'/coin_type'/account'.
///
/// The extended public key at this level can derive every receive and change
/// address without the private key.
pub fn bip44_account_path(coin_type: u32, account: u32) -> DerivationPath {
    DerivationPath::from(vec![
        HARDENED | PURPOSE,
        HARDENED | coin_type,
        HARDENED | account,
    ])
}
