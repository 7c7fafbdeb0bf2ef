//! Core types, trait definitions and client flows for greetbook.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store and identity provider are reached only through the traits in
//! [`store`] and [`identity`], so the same flows drive the terminal client
//! and the tests.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod flow;
pub mod greeting;
pub mod identity;
pub mod legacy;
pub mod store;
pub mod visitor;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod memory;
