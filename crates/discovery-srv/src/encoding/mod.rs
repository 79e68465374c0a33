//! Response encoding.
//!
//! Consoles expect a single XML document per request; see [`xml`].

pub mod xml;

pub use xml::{encode_result, FALLBACK_BODY};
