//! Image verification domain

mod entity;
mod verifier;

pub use entity::{
    ImageAnalysis, ImageQuality, ImageSignals, ImageVerification, LightingConsistency,
    ReverseImageSearch, VerificationRecord, VerificationStats, VerificationStatus,
};
pub use verifier::ImageVerifier;

#[cfg(test)]
pub use verifier::MockImageVerifier;
