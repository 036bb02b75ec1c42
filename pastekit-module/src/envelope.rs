//! Passphrase envelope for sealed pastes
//!
//! The module treats sealing as an opaque service behind [`Envelope`]. The
//! shipped [`Sha256Envelope`] splits a passphrase key into a cipher key and a
//! MAC key, encrypts with an HMAC-SHA256 counter keystream and authenticates
//! with an HMAC-SHA256 tag. Output is lower-case hex so it can travel as text.
//!
//! Sealed format (before hex encoding):
//! ```text
//! Offset  Size  Field
//! ──────────────────────────────────
//! 0x00    16    nonce
//! 0x10    n     ciphertext
//! 0x10+n  32    tag = HMAC(mac_key, nonce || ciphertext)
//! ```

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const NONCE_LEN: usize = 16;
pub const TAG_LEN: usize = 32;

const KEY_DOMAIN: &[u8] = b"pastekit-envelope-key";
const CIPHER_LABEL: &[u8] = b"cipher";
const MAC_LABEL: &[u8] = b"mac";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("Sealed text is not valid hex")]
    Encoding,

    #[error("Sealed text too short: {0} bytes")]
    Truncated(usize),

    #[error("Wrong passphrase or corrupted message")]
    Authentication,

    #[error("Invalid MAC key length")]
    KeyLength,
}

/// Seal / open a message under a passphrase
pub trait Envelope {
    /// Seal `message`; `nonce` must be fresh for every call
    fn seal(
        &self,
        passphrase: &[u8],
        message: &[u8],
        nonce: [u8; NONCE_LEN],
    ) -> Result<Vec<u8>, EnvelopeError>;

    /// Recover the message sealed by [`Envelope::seal`]
    fn open(&self, passphrase: &[u8], sealed: &[u8]) -> Result<Vec<u8>, EnvelopeError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Envelope;

struct Keys {
    cipher: [u8; 32],
    mac: [u8; 32],
}

fn mac_with(key: &[u8]) -> Result<HmacSha256, EnvelopeError> {
    <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| EnvelopeError::KeyLength)
}

fn prf(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 32], EnvelopeError> {
    let mut mac = mac_with(key)?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().into())
}

impl Sha256Envelope {
    fn keys(passphrase: &[u8]) -> Result<Keys, EnvelopeError> {
        let mut hasher = Sha256::new();
        hasher.update(KEY_DOMAIN);
        hasher.update(passphrase);
        let master = hasher.finalize();
        Ok(Keys {
            cipher: prf(&master, &[CIPHER_LABEL])?,
            mac: prf(&master, &[MAC_LABEL])?,
        })
    }

    fn apply_keystream(
        key: &[u8; 32],
        nonce: &[u8],
        data: &mut [u8],
    ) -> Result<(), EnvelopeError> {
        for (block, chunk) in data.chunks_mut(32).enumerate() {
            let stream = prf(key, &[nonce, &(block as u64).to_le_bytes()])?;
            for (byte, k) in chunk.iter_mut().zip(stream.iter()) {
                *byte ^= k;
            }
        }
        Ok(())
    }

    fn tag_mac(
        key: &[u8; 32],
        nonce: &[u8],
        ciphertext: &[u8],
    ) -> Result<HmacSha256, EnvelopeError> {
        let mut mac = mac_with(key)?;
        mac.update(nonce);
        mac.update(ciphertext);
        Ok(mac)
    }
}

impl Envelope for Sha256Envelope {
    fn seal(
        &self,
        passphrase: &[u8],
        message: &[u8],
        nonce: [u8; NONCE_LEN],
    ) -> Result<Vec<u8>, EnvelopeError> {
        let keys = Self::keys(passphrase)?;
        let mut body = message.to_vec();
        Self::apply_keystream(&keys.cipher, &nonce, &mut body)?;
        let tag = Self::tag_mac(&keys.mac, &nonce, &body)?.finalize().into_bytes();

        let mut raw = Vec::with_capacity(NONCE_LEN + body.len() + TAG_LEN);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&body);
        raw.extend_from_slice(&tag);
        Ok(hex::encode(raw).into_bytes())
    }

    fn open(&self, passphrase: &[u8], sealed: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        let raw = hex::decode(sealed).map_err(|_| EnvelopeError::Encoding)?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(EnvelopeError::Truncated(raw.len()));
        }

        let (nonce, rest) = raw.split_at(NONCE_LEN);
        let (body, tag) = rest.split_at(rest.len() - TAG_LEN);
        let keys = Self::keys(passphrase)?;

        Self::tag_mac(&keys.mac, nonce, body)?
            .verify_slice(tag)
            .map_err(|_| EnvelopeError::Authentication)?;

        let mut message = body.to_vec();
        Self::apply_keystream(&keys.cipher, nonce, &mut message)?;
        Ok(message)
    }
}
