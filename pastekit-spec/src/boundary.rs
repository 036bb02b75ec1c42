//! # Boundary ABI
//!
//! The exported-function surface of the compute module. Every argument and
//! return value is a raw 32-bit scalar, exactly what crosses a sandbox
//! boundary; structured values only ever travel through linear memory in the
//! layout described by [`crate::layout`].
//!
//! Host-side code must go through this trait and the module's memory view; it
//! never reaches into module state directly.

/// Functions exported by the compute module
pub trait Boundary {
    /// Seed the module's cosmetic randomness
    fn init(&mut self, seed: u64);

    /// Reserve `len` bytes in the arena; returns 0 when memory is exhausted
    fn allocate(&mut self, len: u32) -> u32;

    /// Release an allocation (only the most recent one is actually reclaimed)
    fn free(&mut self, ptr: u32, len: u32);

    /// Drop every arena allocation, invalidating all outstanding pointers
    fn reset(&mut self);

    /// Parse the UTF-8 text at `ptr..ptr+len`; returns a Paste record pointer, 0 on failure
    fn parse(&mut self, ptr: u32, len: u32, two_d_images: bool) -> u32;

    /// Release a Paste returned by [`Boundary::parse`]
    fn destroy(&mut self, paste_ptr: u32);

    /// Count creature sets in the text at `ptr..ptr+len`; -1 on invalid input
    fn validate(&mut self, ptr: u32, len: u32) -> i32;

    /// Seal the message that follows a `pass_len`-byte passphrase at `ptr`
    ///
    /// On success the sealed text is published through
    /// [`Boundary::result_ptr`] / [`Boundary::result_len`].
    fn seal(&mut self, ptr: u32, pass_len: u32, msg_len: u32) -> bool;

    /// Inverse of [`Boundary::seal`]; false on a wrong passphrase or corrupt input
    fn open(&mut self, ptr: u32, pass_len: u32, msg_len: u32) -> bool;

    /// Pointer of the last published result
    fn result_ptr(&self) -> u32;

    /// Byte length of the last published result
    fn result_len(&self) -> u32;

    /// Read view of linear memory
    fn memory(&self) -> &[u8];

    /// Write view of linear memory
    fn memory_mut(&mut self) -> &mut [u8];
}
