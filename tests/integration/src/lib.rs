//! End-to-end tests for the Proof-of-Listen core
//!
//! This test suite validates:
//! - Ceremony → parameter → prove → verify flows
//! - The public-signal contract across the JSON wire format
//! - Reward-gateway admission on top of verified sessions
//! - Parameter binding between proofs and their ceremony

pub mod test_utils;

#[cfg(test)]
mod ceremony_tests;

#[cfg(test)]
mod gateway_tests;

#[cfg(test)]
mod listen_flow_tests;
