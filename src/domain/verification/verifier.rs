//! Image verifier trait

use async_trait::async_trait;

use super::ImageVerification;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Judges whether an image is authentic and disaster-related
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageVerifier: Send + Sync {
    async fn verify(&self, image_url: &str) -> Result<ImageVerification, DomainError>;
}
