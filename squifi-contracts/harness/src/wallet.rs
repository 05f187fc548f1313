//! Signing identity used to pay for and sign transactions.
//!
//! Keypair files use the layout the Solana toolchain writes: a JSON array of
//! 64 bytes, the 32-byte secret seed followed by the 32-byte public key.

use crate::error::{HarnessError, Result};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::RngCore as _;
use std::path::Path;

#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

impl Wallet {
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let bytes: Vec<u8> = serde_json::from_str(&content)?;
        if bytes.len() != 64 {
            return Err(HarnessError::wallet(format!(
                "{}: expected 64 bytes, found {}",
                path.display(),
                bytes.len()
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let wallet = Self::from_seed(seed);
        if wallet.signing_key.verifying_key().as_bytes()[..] != bytes[32..] {
            return Err(HarnessError::wallet(format!(
                "{}: public key does not match secret key",
                path.display()
            )));
        }
        tracing::debug!(pubkey = %wallet.pubkey(), "loaded wallet");
        Ok(wallet)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut bytes = Vec::with_capacity(64);
        bytes.extend_from_slice(&self.signing_key.to_bytes());
        bytes.extend_from_slice(self.signing_key.verifying_key().as_bytes());
        std::fs::write(path, serde_json::to_string(&bytes)?)?;
        Ok(())
    }

    /// Base58 public key.
    pub fn pubkey(&self) -> String {
        bs58::encode(self.signing_key.verifying_key().as_bytes()).into_string()
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

/// Checks `signature` over `message` against a base58 public key.
pub fn verify(pubkey: &str, message: &[u8], signature: &[u8]) -> bool {
    let Ok(key_bytes) = bs58::decode(pubkey).into_vec() else {
        return false;
    };
    let Ok(key_bytes) = <[u8; 32]>::try_from(key_bytes.as_slice()) else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    key.verify(message, &Signature::from_bytes(&sig_bytes)).is_ok()
}
