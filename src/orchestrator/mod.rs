//! # Orchestrator client seam.
//!
//! The orchestrator itself — session placement, matchmaking backfill, fleet
//! scaling, wire protocol — is an external, host-operated service. This
//! module only defines the contract the bridge depends on:
//! [`OrchestratorClient`], implemented in production by a thin wrapper around
//! the vendor server SDK and in tests by a mock.

mod client;

pub use client::{ClientRef, OrchestratorClient};
