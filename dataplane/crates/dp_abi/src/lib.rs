//! Identifiers and flags shared by every dataplane pipeline stage.
//!
//! Nothing in here allocates, blocks or fails except the checked
//! constructors, which return [`IndexError`]. Index allocation lives in
//! `dp_index`; the per-packet record that carries these values lives in
//! `dp_packet`.

#![no_std]

mod egress;
mod error;
mod flags;
mod index;

pub use egress::*;
pub use error::*;
pub use flags::*;
pub use index::*;
