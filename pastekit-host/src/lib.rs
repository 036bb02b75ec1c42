//! # Pastekit Host
//!
//! The caller's side of the paste boundary.
//!
//! The host never touches module state directly: it encodes requests into
//! module memory, calls the [`Boundary`](pastekit_spec::Boundary) exports and
//! copies results back out with [`RecordReader`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use pastekit_host::Session;
//!
//! let mut session = Session::new(&mut module);
//! let paste = session.parse("Gengar @ Choice Scarf\n- Shadow Ball")?.decode();
//! assert_eq!(paste.creature_count(), 1);
//! ```

pub mod decoder;
pub mod error;
pub mod request;
pub mod session;

pub use decoder::RecordReader;
pub use error::{HostError, Result};
pub use request::{encode_cstr, encode_pair, PairRequest, Request};
pub use session::{PendingPaste, Session};
