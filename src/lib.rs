//! Authentication conformance harness.
//!
//! POSTs a declarative suite of calls at an RPC-style backend and checks that
//! public endpoints answer without credentials while protected ones reject
//! missing, invalid and mismatched sessions.

pub mod cli;
pub mod collections;
pub mod environment;
pub mod error;
pub mod http;
pub mod testing;
