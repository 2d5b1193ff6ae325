//! Maker signature verification.
//!
//! Authenticity is checked along one of two paths:
//!
//! 1. **Direct**: the signer address doubles as an ed25519 verifying key,
//!    and the 64-byte signature must verify over the order digest.
//! 2. **Delegated**: signers registered with a [`SignatureDelegate`]
//!    (custodial vaults, multisig wallets, anything that cannot produce a
//!    plain ed25519 signature) are asked whether the digest is authorized
//!    for that identity instead.
//!
//! The verifier holds no mutable settlement state. Registering a delegate
//! is configuration, done once at startup by the embedder.

use std::collections::HashMap;

use agora_types::{Address, AgoraError, MakerOrder, OrderSignature, Result};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Validity callback for identities that do not hold an ed25519 key.
pub trait SignatureDelegate {
    /// Returns `true` if `digest` is an authorized order digest for
    /// `signer`. The raw signature bytes are passed through untouched so
    /// delegates can run their own scheme over them.
    fn is_valid(&self, signer: Address, digest: &[u8; 32], signature: &[u8]) -> bool;
}

/// Checker for maker order authenticity.
#[derive(Default)]
pub struct SignatureVerifier {
    delegates: HashMap<Address, Box<dyn SignatureDelegate>>,
}

impl SignatureVerifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            delegates: HashMap::new(),
        }
    }

    /// Route `signer` through `delegate` instead of direct key verification.
    pub fn register_delegate(&mut self, signer: Address, delegate: Box<dyn SignatureDelegate>) {
        self.delegates.insert(signer, delegate);
    }

    #[must_use]
    pub fn has_delegate(&self, signer: Address) -> bool {
        self.delegates.contains_key(&signer)
    }

    /// Verify `signature` over the digest of `order`.
    ///
    /// A signer with a registered delegate is never checked against the
    /// direct path, even if its address happens to be a valid key.
    pub fn verify(&self, order: &MakerOrder, signature: &OrderSignature) -> Result<()> {
        let digest = order.digest();
        if let Some(delegate) = self.delegates.get(&order.signer) {
            if delegate.is_valid(order.signer, &digest, signature.as_bytes()) {
                return Ok(());
            }
            return Err(AgoraError::DelegatedValidationFailed {
                signer: order.signer,
            });
        }
        Self::verify_direct(order.signer, &digest, signature)
    }

    fn verify_direct(signer: Address, digest: &[u8; 32], signature: &OrderSignature) -> Result<()> {
        let key = VerifyingKey::from_bytes(signer.as_bytes()).map_err(|_| {
            AgoraError::SignatureInvalid {
                reason: "signer address is not a valid ed25519 key".to_string(),
            }
        })?;
        let raw: [u8; 64] =
            signature
                .as_bytes()
                .try_into()
                .map_err(|_| AgoraError::SignatureInvalid {
                    reason: format!(
                        "expected 64 signature bytes, got {}",
                        signature.as_bytes().len()
                    ),
                })?;
        let sig = Signature::from_bytes(&raw);
        key.verify(digest, &sig)
            .map_err(|_| AgoraError::SignatureInvalid {
                reason: "ed25519 verification failed".to_string(),
            })
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing {
    //! Deterministic signers for tests.

    use agora_types::{Address, MakerOrder, OrderSignature};
    use ed25519_dalek::{Signer, SigningKey};

    /// An ed25519 keypair derived from a one-byte seed.
    pub struct TestSigner {
        key: SigningKey,
        pub address: Address,
    }

    impl TestSigner {
        #[must_use]
        pub fn from_seed(seed: u8) -> Self {
            let key = SigningKey::from_bytes(&[seed; 32]);
            let address = Address(key.verifying_key().to_bytes());
            Self { key, address }
        }

        /// Sign the order digest the way a real maker would.
        #[must_use]
        pub fn sign(&self, order: &MakerOrder) -> OrderSignature {
            OrderSignature(self.key.sign(&order.digest()).to_bytes().to_vec())
        }
    }
}
