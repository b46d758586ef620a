// file: src/utils/mod.rs
// version: 2.1.0
// guid: 6d8f5821-90e7-4f49-86fc-b9d0179e5d72

//! Utility modules

pub mod crypto;

pub use crypto::{
    generate_passphrase, DeviceIdentity, DeviceKeyGenerator, Ed25519KeyGenerator, KeyGenerator,
    KeyPair, RsaKeyGenerator,
};
