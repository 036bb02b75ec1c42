//! Host session
//!
//! A [`Session`] owns exclusive access to a [`Boundary`] and sequences every
//! exchange as encode, call, decode, reset. A parse hands back a
//! [`PendingPaste`] that mutably borrows the session, so no other request can
//! be encoded until the pending result has been decoded (or dropped), and
//! both paths end with the arena reset.

use pastekit_spec::{normalize_newlines, split_header, Boundary, Paste, NULL_PTR};
use tracing::debug;

use crate::decoder::RecordReader;
use crate::error::{HostError, Result};
use crate::request::{encode_cstr, encode_pair};

pub struct Session<'b, B: Boundary + ?Sized> {
    boundary: &'b mut B,
    two_d_images: bool,
}

impl<'b, B: Boundary + ?Sized> Session<'b, B> {
    pub fn new(boundary: &'b mut B) -> Self {
        Session {
            boundary,
            two_d_images: false,
        }
    }

    /// Request flat 2-D sprite paths instead of 3-D renders
    pub fn with_two_d_images(mut self, two_d_images: bool) -> Self {
        self.two_d_images = two_d_images;
        self
    }

    /// Reseed the module's cosmetic randomness
    pub fn seed(&mut self, seed: u64) {
        self.boundary.init(seed);
    }

    /// Send `text` to the module for parsing
    pub fn parse(&mut self, text: &str) -> Result<PendingPaste<'_, B>> {
        let request = encode_cstr(&mut *self.boundary, text.as_bytes())?;
        let paste_ptr = self
            .boundary
            .parse(request.ptr, request.len, self.two_d_images);
        if paste_ptr == NULL_PTR {
            self.boundary.reset();
            return Err(HostError::NullResult("parse"));
        }
        Ok(PendingPaste {
            boundary: &mut *self.boundary,
            paste_ptr,
            decoded: false,
        })
    }

    /// Parse and decode in one step
    pub fn parse_paste(&mut self, text: &str) -> Result<Paste> {
        Ok(self.parse(text)?.decode())
    }

    /// Parse a payload recovered from a sealed paste
    ///
    /// The metadata header is split off on the host; only the body crosses
    /// the boundary.
    pub fn parse_framed(&mut self, text: &str) -> Result<Paste> {
        let text = normalize_newlines(text);
        let (meta, body) = split_header(&text);
        let mut paste = self.parse_paste(body)?;
        if let Some(meta) = meta {
            paste.apply_metadata(meta);
        }
        Ok(paste)
    }

    /// Number of blocks in `text` that parse as creatures
    pub fn validate(&mut self, text: &str) -> Result<usize> {
        let request = encode_cstr(&mut *self.boundary, text.as_bytes())?;
        let count = self.boundary.validate(request.ptr, request.len);
        self.boundary.reset();
        usize::try_from(count).map_err(|_| HostError::NullResult("validate"))
    }

    /// Seal `message` under `passphrase`
    pub fn seal(&mut self, passphrase: &str, message: &str) -> Result<String> {
        let request = encode_pair(&mut *self.boundary, passphrase.as_bytes(), message.as_bytes())?;
        let ok = self
            .boundary
            .seal(request.ptr, request.first_len, request.second_len);
        let result = if ok {
            self.take_result("seal")
        } else {
            Err(HostError::NullResult("seal"))
        };
        self.boundary.reset();
        result
    }

    /// Open a message produced by [`Session::seal`]
    ///
    /// A wrong passphrase yields the retryable [`HostError::Decryption`].
    pub fn open(&mut self, passphrase: &str, sealed: &str) -> Result<String> {
        let request = encode_pair(&mut *self.boundary, passphrase.as_bytes(), sealed.as_bytes())?;
        let ok = self
            .boundary
            .open(request.ptr, request.first_len, request.second_len);
        let result = if ok {
            self.take_result("open")
        } else {
            debug!("open rejected by module");
            Err(HostError::Decryption)
        };
        self.boundary.reset();
        result
    }

    /// Open a sealed paste and parse its framed payload
    pub fn open_paste(&mut self, passphrase: &str, sealed: &str) -> Result<Paste> {
        let payload = self.open(passphrase, sealed)?;
        self.parse_framed(&payload)
    }

    /// Copy the published result out of module memory
    fn take_result(&self, operation: &'static str) -> Result<String> {
        let ptr = self.boundary.result_ptr();
        if ptr == NULL_PTR {
            return Err(HostError::NullResult(operation));
        }
        let len = self.boundary.result_len();
        let start = ptr as usize;
        let bytes = self
            .boundary
            .memory()
            .get(start..start + len as usize)
            .ok_or(HostError::NullResult(operation))?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// A parsed paste still living in module memory
///
/// Must be decoded before the session can be used again. Dropping it without
/// decoding still releases the module arena.
pub struct PendingPaste<'s, B: Boundary + ?Sized> {
    boundary: &'s mut B,
    paste_ptr: u32,
    decoded: bool,
}

impl<'s, B: Boundary + ?Sized> PendingPaste<'s, B> {
    /// Module address of the paste record
    pub fn ptr(&self) -> u32 {
        self.paste_ptr
    }

    /// Copy the paste out of module memory, then release it and reset the arena
    pub fn decode(mut self) -> Paste {
        let paste = RecordReader::new(self.boundary.memory()).read_paste(self.paste_ptr);
        self.release();
        paste
    }

    fn release(&mut self) {
        if !self.decoded {
            self.boundary.destroy(self.paste_ptr);
            self.boundary.reset();
            self.decoded = true;
        }
    }
}

impl<'s, B: Boundary + ?Sized> Drop for PendingPaste<'s, B> {
    fn drop(&mut self) {
        if !self.decoded {
            debug!(paste_ptr = self.paste_ptr, "pending paste dropped without decode");
        }
        self.release();
    }
}
