//! Fixed-point money handling.
//!
//! All settlement arithmetic runs on integer cents; this module owns the
//! conversion at the boundary.

pub mod converter;

#[cfg(test)]
mod props;

pub use converter::MoneyConverter;
