//! Server runtime
//!
//! Accept loop and connection bootstrap.

pub mod core;

pub use core::Server;
