//! Inbound adapters translating external requests into domain calls.
//!
//! HTTP handlers live under [`http`]. The `sync-recurring` binary drives the
//! same domain port directly.

pub mod http;
