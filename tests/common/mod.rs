//! Integration test common infrastructure.
//!
//! Provides a gateway process driven by a scripted bridge, and an IRC
//! client for asserting on what the gateway sends.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
