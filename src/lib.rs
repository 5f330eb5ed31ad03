//! DynString, a binary-safe dynamic byte string with amortized,
//! size-aware growth.
//!
//! A DynString stores its bookkeeping and its payload in one
//! allocation: a small header holding the used length and the free
//! capacity sits immediately before the payload bytes, and the
//! externally visible handle points at the payload, never at the
//! header. A zero terminator always follows the content; it is not
//! counted in the length, so content may contain embedded zero bytes
//! and the length field stays authoritative.
//!
//! ```text
//! | len | free | payload bytes ......... | 0 |
//!               ^ the handle points here
//! ```
//!
//! Length and free-capacity queries are O(1) header reads. When an
//! operation needs more room than the free capacity provides, the
//! block is reallocated under a size-dependent policy: below 1 MiB
//! the new capacity is double the required length, so a string built
//! by repeated appends relocates O(log n) times; from 1 MiB up the
//! block grows by a flat 1 MiB, capping the wasted space where
//! doubling would waste unbounded memory. [`MAX_PREALLOC`] is the
//! cutoff.
//!
//! Any operation that may relocate the block takes the string by
//! value and returns the one valid handle going forward:
//!
//! ```
//! use dynstring::DynString;
//!
//! let s = DynString::from_slice(b"hello");
//! let s = s.append(b",world");
//! assert_eq!(s, b"hello,world");
//! let s = s.shrink_to_fit();
//! assert_eq!(s.available(), 0);
//! ```
//!
//! Holding on to a stale handle across a relocating call is therefore
//! a compile error, not a latent dangling pointer. In-place entry
//! points that cannot invalidate other handles (`push_slice`,
//! `reserve`, `+=`) take `&mut self` instead.
//!
//! There is no recoverable error path: allocation failure aborts the
//! process and impossible size requests panic. The type is not
//! internally synchronized; `&mut` exclusivity is the only mutation
//! guard.

#![no_std]

extern crate alloc;

mod raw;
mod string;
mod split;
mod join;
mod fromiter;
#[cfg(feature = "serde")]
mod serde_impl;

pub use raw::MAX_PREALLOC;
pub use string::DynString;
pub use join::Joinable;
pub use join::JoinableBuf;
