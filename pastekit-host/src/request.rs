//! Request encoding
//!
//! Host input reaches the module as null-terminated bytes in one fresh arena
//! allocation. A two-part request (passphrase, then payload) shares a single
//! allocation so the export can take one pointer and two lengths.

use pastekit_spec::{Boundary, NULL_PTR};
use tracing::trace;

use crate::error::{HostError, Result};

/// A single encoded argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub ptr: u32,
    /// Byte length, excluding the terminator
    pub len: u32,
}

/// Two arguments laid out back to back in one allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRequest {
    pub ptr: u32,
    pub first_len: u32,
    pub second_len: u32,
}

fn length(bytes: &[u8]) -> Result<u32> {
    u32::try_from(bytes.len()).map_err(|_| HostError::RequestTooLarge(bytes.len()))
}

/// Allocate `parts` + NUL in the module and copy them in order
fn write_parts<B: Boundary + ?Sized>(boundary: &mut B, parts: &[&[u8]]) -> Result<u32> {
    let total: usize = parts.iter().map(|p| p.len()).sum::<usize>() + 1;
    let size = u32::try_from(total).map_err(|_| HostError::RequestTooLarge(total))?;

    let ptr = boundary.allocate(size);
    if ptr == NULL_PTR {
        return Err(HostError::Allocation(size));
    }

    let memory = boundary.memory_mut();
    let start = ptr as usize;
    let region = memory
        .get_mut(start..start + total)
        .ok_or(HostError::MemoryWrite { address: ptr, len: size })?;

    let mut at = 0;
    for part in parts {
        region[at..at + part.len()].copy_from_slice(part);
        at += part.len();
    }
    region[at] = 0;

    trace!(ptr, size, "request encoded");
    Ok(ptr)
}

/// Encode `bytes` as a C string in module memory
pub fn encode_cstr<B: Boundary + ?Sized>(boundary: &mut B, bytes: &[u8]) -> Result<Request> {
    let len = length(bytes)?;
    let ptr = write_parts(boundary, &[bytes])?;
    Ok(Request { ptr, len })
}

/// Encode `first` immediately followed by `second` in one allocation
pub fn encode_pair<B: Boundary + ?Sized>(
    boundary: &mut B,
    first: &[u8],
    second: &[u8],
) -> Result<PairRequest> {
    let first_len = length(first)?;
    let second_len = length(second)?;
    let ptr = write_parts(boundary, &[first, second])?;
    Ok(PairRequest {
        ptr,
        first_len,
        second_len,
    })
}
