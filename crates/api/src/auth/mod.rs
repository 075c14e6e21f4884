//! Authentication primitives.
//!
//! Tokens are issued by the external auth service; this crate only
//! validates them. [`jwt`] also exposes token generation for tests and
//! local tooling.

pub mod jwt;
