//! Simulated image forensics

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::domain::verification::{
    ImageAnalysis, ImageQuality, ImageSignals, ImageVerification, ImageVerifier,
    LightingConsistency, ReverseImageSearch,
};
use crate::domain::DomainError;

/// Method label recorded on every verification
pub const SIMULATED_METHOD: &str = "gemini_ai";

/// Draws random forensic signals in place of an AI vision model
#[derive(Debug, Default, Clone)]
pub struct SimulatedImageVerifier;

impl SimulatedImageVerifier {
    pub fn new() -> Self {
        Self
    }

    fn draw_signals() -> ImageSignals {
        let mut rng = rand::thread_rng();

        ImageSignals {
            authenticity_score: rng.gen_range(0.0..100.0),
            manipulation_detected: rng.gen_bool(0.2),
            disaster_context: rng.gen_bool(0.7),
            confidence: rng.gen_range(60.0..100.0),
            analysis: ImageAnalysis {
                image_quality: if rng.gen_bool(0.8) {
                    ImageQuality::Good
                } else {
                    ImageQuality::Poor
                },
                lighting_consistency: if rng.gen_bool(0.85) {
                    LightingConsistency::Consistent
                } else {
                    LightingConsistency::Inconsistent
                },
                metadata_intact: rng.gen_bool(0.9),
                reverse_image_search: if rng.gen_bool(0.1) {
                    ReverseImageSearch::FoundElsewhere
                } else {
                    ReverseImageSearch::Unique
                },
            },
        }
    }
}

#[async_trait]
impl ImageVerifier for SimulatedImageVerifier {
    async fn verify(&self, image_url: &str) -> Result<ImageVerification, DomainError> {
        if image_url.trim().is_empty() {
            return Err(DomainError::validation("image_url must not be empty"));
        }

        let verification = ImageVerification::from_signals(Self::draw_signals(), SIMULATED_METHOD);

        debug!(
            image_url = %image_url,
            status = %verification.verification_status.as_str(),
            score = verification.authenticity_score,
            "Image analyzed"
        );

        Ok(verification)
    }
}
