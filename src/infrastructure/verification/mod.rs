//! Image verification infrastructure

mod simulated_verifier;

pub use simulated_verifier::{SimulatedImageVerifier, SIMULATED_METHOD};
