// file: src/utils/crypto.rs
// version: 2.1.0
// guid: 89b13d2c-4e9d-4746-afb1-b8b9fe8445a3

//! Device identity material: the key passphrase and the key pair written to
//! the configuration directory.

use crate::config::{KeyAlgorithm, RegistrationSettings};
use crate::error::{Result, WelcomeError};
use base64::Engine;
use ed25519_dalek::SigningKey;
use pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding, PrivateKeyInfo};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

/// Number of random bytes behind a generated passphrase
pub const PASSPHRASE_BYTES: usize = 32;

const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

/// Generate a secure random hex string from `length` random bytes
pub fn generate_hex_string(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate the passphrase protecting the device private key
pub fn generate_passphrase() -> String {
    generate_hex_string(PASSPHRASE_BYTES)
}

/// SHA-256 fingerprint of a PEM encoded public key, for logs
pub fn public_key_fingerprint(public_pem: &[u8]) -> String {
    let digest = Sha256::digest(public_pem);
    format!(
        "SHA256:{}",
        base64::engine::general_purpose::STANDARD_NO_PAD.encode(digest)
    )
}

/// PEM encoded key material as written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: Vec<u8>,
    pub public_key: Vec<u8>,
}

/// The device's identity once key generation has completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
    pub passphrase: String,
}

impl DeviceIdentity {
    pub fn new(keys: KeyPair, passphrase: impl Into<String>) -> Self {
        Self {
            public_key: keys.public_key,
            private_key: keys.private_key,
            passphrase: passphrase.into(),
        }
    }

    pub fn fingerprint(&self) -> String {
        public_key_fingerprint(&self.public_key)
    }
}

/// Key generation capability.
///
/// Implementations write both keys to the given paths and return the bytes
/// they wrote. The private key must be protected with `passphrase`.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self, passphrase: &str, private_path: &Path, public_path: &Path) -> Result<KeyPair>;
}

/// RSA keys: private key as encrypted PKCS#8 PEM, public key as PKCS#1 PEM
/// (`RSA PUBLIC KEY`). This is the format the registration server expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaKeyGenerator {
    pub key_size: usize,
    pub public_exponent: u64,
}

impl RsaKeyGenerator {
    pub const DEFAULT_KEY_SIZE: usize = 4096;
    pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

    pub fn new(key_size: usize, public_exponent: u64) -> Self {
        Self {
            key_size,
            public_exponent,
        }
    }
}

impl Default for RsaKeyGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY_SIZE, Self::DEFAULT_PUBLIC_EXPONENT)
    }
}

impl KeyGenerator for RsaKeyGenerator {
    fn generate(&self, passphrase: &str, private_path: &Path, public_path: &Path) -> Result<KeyPair> {
        debug!(
            "Generating {}-bit RSA key (e = {})",
            self.key_size, self.public_exponent
        );
        let exponent = BigUint::from(self.public_exponent);
        let private_key = RsaPrivateKey::new_with_exp(&mut OsRng, self.key_size, &exponent)
            .map_err(|e| WelcomeError::key(format!("Failed to generate RSA key: {}", e)))?;

        let private_pem = private_key
            .to_pkcs8_encrypted_pem(OsRng, passphrase.as_bytes(), LineEnding::LF)
            .map_err(|e| WelcomeError::key(format!("Failed to encrypt private key: {}", e)))?;
        let public_pem = RsaPublicKey::from(&private_key)
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| WelcomeError::key(format!("Failed to encode public key: {}", e)))?;

        write_private_key(private_path, private_pem.as_bytes())?;
        std::fs::write(public_path, public_pem.as_bytes())?;
        debug!(
            "Wrote key pair to {} and {}",
            private_path.display(),
            public_path.display()
        );

        Ok(KeyPair {
            private_key: private_pem.as_bytes().to_vec(),
            public_key: public_pem.into_bytes(),
        })
    }
}

/// Ed25519 keys: private key as encrypted PKCS#8 PEM, public key as SPKI PEM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ed25519KeyGenerator;

impl KeyGenerator for Ed25519KeyGenerator {
    fn generate(&self, passphrase: &str, private_path: &Path, public_path: &Path) -> Result<KeyPair> {
        let signing_key = SigningKey::generate(&mut OsRng);

        let der = signing_key
            .to_pkcs8_der()
            .map_err(|e| WelcomeError::key(format!("Failed to encode private key: {}", e)))?;
        let info = PrivateKeyInfo::try_from(der.as_bytes())
            .map_err(|e| WelcomeError::key(format!("Failed to parse private key: {}", e)))?;
        let encrypted = info
            .encrypt(OsRng, passphrase.as_bytes())
            .map_err(|e| WelcomeError::key(format!("Failed to encrypt private key: {}", e)))?;
        let private_pem = encrypted
            .to_pem(ENCRYPTED_PRIVATE_KEY_LABEL, LineEnding::LF)
            .map_err(|e| WelcomeError::key(format!("Failed to PEM encode private key: {}", e)))?;

        let public_pem = signing_key
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| WelcomeError::key(format!("Failed to encode public key: {}", e)))?;

        write_private_key(private_path, private_pem.as_bytes())?;
        std::fs::write(public_path, public_pem.as_bytes())?;
        debug!(
            "Wrote key pair to {} and {}",
            private_path.display(),
            public_path.display()
        );

        Ok(KeyPair {
            private_key: private_pem.as_bytes().to_vec(),
            public_key: public_pem.into_bytes(),
        })
    }
}

/// The generator selected by `key_algorithm` in the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKeyGenerator {
    Rsa(RsaKeyGenerator),
    Ed25519(Ed25519KeyGenerator),
}

impl DeviceKeyGenerator {
    pub fn from_settings(settings: &RegistrationSettings) -> Self {
        match settings.key_algorithm {
            KeyAlgorithm::Rsa => Self::Rsa(RsaKeyGenerator::new(settings.key_size, settings.public_exponent)),
            KeyAlgorithm::Ed25519 => Self::Ed25519(Ed25519KeyGenerator),
        }
    }
}

impl KeyGenerator for DeviceKeyGenerator {
    fn generate(&self, passphrase: &str, private_path: &Path, public_path: &Path) -> Result<KeyPair> {
        match self {
            Self::Rsa(rsa) => rsa.generate(passphrase, private_path, public_path),
            Self::Ed25519(ed25519) => ed25519.generate(passphrase, private_path, public_path),
        }
    }
}

fn write_private_key(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents)?;

    // Owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }

    Ok(())
}
