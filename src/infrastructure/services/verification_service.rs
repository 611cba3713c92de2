//! Verification service - cached image checks and their recorded history

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::cache::key::image_verification_key;
use crate::domain::cache::CachePolicy;
use crate::domain::storage::Storage;
use crate::domain::verification::VerificationStats;
use crate::domain::{
    DomainError, ImageVerification, ImageVerifier, Report, User, VerificationRecord,
    VerificationStatus,
};
use crate::infrastructure::cache::CacheManager;

use super::DisasterService;

/// Verdicts are cached for two hours
pub const VERIFICATION_TTL_SECS: i64 = 7200;
pub const MAX_BATCH_SIZE: usize = 10;
pub const DEFAULT_FLAGGED_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyImageResult {
    pub disaster_id: String,
    pub image_url: String,
    pub report_id: Option<String>,
    pub verification: ImageVerification,
    pub verified_by: String,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItemResult {
    pub image_url: String,
    pub verification: Option<ImageVerification>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchVerifyResult {
    pub disaster_id: String,
    pub total_images: usize,
    pub successful_verifications: usize,
    pub failed_verifications: usize,
    pub results: Vec<BatchItemResult>,
    pub verified_by: String,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResult {
    pub disaster_id: String,
    pub verification_stats: VerificationStats,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedImage {
    pub id: String,
    pub image_url: String,
    pub verification_status: VerificationStatus,
    pub authenticity_score: f64,
    pub confidence: f64,
    pub reason: String,
    pub flagged_at: DateTime<Utc>,
    pub verified_by: String,
}

impl From<VerificationRecord> for FlaggedImage {
    fn from(record: VerificationRecord) -> Self {
        Self {
            verification_status: record.status(),
            authenticity_score: record.verification.authenticity_score,
            confidence: record.verification.confidence,
            reason: record.verification.context_analysis,
            flagged_at: record.verified_at,
            id: record.id,
            image_url: record.image_url,
            verified_by: record.verified_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedResult {
    pub disaster_id: String,
    pub flagged_images: Vec<FlaggedImage>,
    /// Flagged images in total, before the limit
    pub count: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone)]
pub struct VerificationService {
    records: Arc<dyn Storage<VerificationRecord>>,
    reports: Arc<dyn Storage<Report>>,
    disasters: Arc<DisasterService>,
    verifier: Arc<dyn ImageVerifier>,
    cache: Arc<CacheManager>,
}

impl std::fmt::Debug for VerificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationService")
            .field("records", &self.records)
            .field("reports", &self.reports)
            .finish_non_exhaustive()
    }
}

impl VerificationService {
    pub fn new(
        records: Arc<dyn Storage<VerificationRecord>>,
        reports: Arc<dyn Storage<Report>>,
        disasters: Arc<DisasterService>,
        verifier: Arc<dyn ImageVerifier>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            records,
            reports,
            disasters,
            verifier,
            cache,
        }
    }

    /// Verifies one image, attaching the verdict to the report when given
    pub async fn verify(
        &self,
        disaster_id: &str,
        image_url: &str,
        report_id: Option<String>,
        user: &User,
    ) -> Result<VerifyImageResult, DomainError> {
        if image_url.trim().is_empty() {
            return Err(DomainError::validation("image_url is required"));
        }

        self.disasters.get_required(disaster_id).await?;

        let verification = self.verify_cached(image_url).await?;
        info!(
            disaster_id = %disaster_id,
            status = %verification.verification_status,
            "Image verified"
        );

        if let Some(report_id) = report_id.as_deref() {
            self.attach_to_report(disaster_id, report_id, &verification)
                .await;
        }

        self.record(
            disaster_id,
            image_url,
            report_id.clone(),
            verification.clone(),
            user,
        )
        .await?;

        Ok(VerifyImageResult {
            disaster_id: disaster_id.to_string(),
            image_url: image_url.to_string(),
            report_id,
            verification,
            verified_by: user.id.clone(),
            message: "Image verification completed",
        })
    }

    /// Verifies up to ten images; individual failures do not fail the batch
    pub async fn verify_batch(
        &self,
        disaster_id: &str,
        image_urls: &[String],
        user: &User,
    ) -> Result<BatchVerifyResult, DomainError> {
        if image_urls.is_empty() {
            return Err(DomainError::validation("image_urls array is required"));
        }
        if image_urls.len() > MAX_BATCH_SIZE {
            return Err(DomainError::validation(format!(
                "Maximum {} images can be verified at once",
                MAX_BATCH_SIZE
            )));
        }

        self.disasters.get_required(disaster_id).await?;

        let mut results = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            let outcome = match self.verify_cached(url).await {
                Ok(verification) => self
                    .record(disaster_id, url, None, verification.clone(), user)
                    .await
                    .map(|_| verification),
                Err(e) => Err(e),
            };

            results.push(match outcome {
                Ok(verification) => BatchItemResult {
                    image_url: url.clone(),
                    verification: Some(verification),
                    success: true,
                    error: None,
                },
                Err(e) => {
                    error!(image_url = %url, error = %e, "Error verifying image");
                    BatchItemResult {
                        image_url: url.clone(),
                        verification: None,
                        success: false,
                        error: Some("Verification failed".to_string()),
                    }
                }
            });
        }

        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;
        info!(
            disaster_id = %disaster_id,
            successful,
            failed,
            "Batch verification finished"
        );

        Ok(BatchVerifyResult {
            disaster_id: disaster_id.to_string(),
            total_images: image_urls.len(),
            successful_verifications: successful,
            failed_verifications: failed,
            results,
            verified_by: user.id.clone(),
            verified_at: Utc::now(),
        })
    }

    pub async fn stats(&self, disaster_id: &str) -> Result<StatsResult, DomainError> {
        self.disasters.get_required(disaster_id).await?;

        let records = self.records_for(disaster_id).await?;

        Ok(StatsResult {
            disaster_id: disaster_id.to_string(),
            verification_stats: VerificationStats::from_records(&records),
            last_updated: Utc::now(),
        })
    }

    /// Flagged verdicts, newest first
    pub async fn flagged(
        &self,
        disaster_id: &str,
        limit: usize,
    ) -> Result<FlaggedResult, DomainError> {
        self.disasters.get_required(disaster_id).await?;

        let mut flagged: Vec<VerificationRecord> = self
            .records_for(disaster_id)
            .await?
            .into_iter()
            .filter(|r| r.status() == VerificationStatus::Flagged)
            .collect();
        flagged.sort_by(|a, b| b.verified_at.cmp(&a.verified_at));

        let count = flagged.len();
        Ok(FlaggedResult {
            disaster_id: disaster_id.to_string(),
            flagged_images: flagged.into_iter().take(limit).map(Into::into).collect(),
            count,
            last_updated: Utc::now(),
        })
    }

    async fn verify_cached(&self, image_url: &str) -> Result<ImageVerification, DomainError> {
        let (verification, outcome) = self
            .cache
            .fetch_through(
                &image_verification_key(image_url),
                CachePolicy::ttl(VERIFICATION_TTL_SECS),
                || self.verifier.verify(image_url),
            )
            .await?;

        if outcome.is_hit() {
            debug!(image_url = %image_url, "Using cached image verification");
        }

        Ok(verification)
    }

    async fn record(
        &self,
        disaster_id: &str,
        image_url: &str,
        report_id: Option<String>,
        verification: ImageVerification,
        user: &User,
    ) -> Result<VerificationRecord, DomainError> {
        let record =
            VerificationRecord::new(disaster_id, image_url, report_id, verification, &user.id);
        self.records.insert(record).await
    }

    async fn records_for(&self, disaster_id: &str) -> Result<Vec<VerificationRecord>, DomainError> {
        self.records
            .find(&|r: &VerificationRecord| r.disaster_id == disaster_id)
            .await
    }

    /// Report updates are best effort
    async fn attach_to_report(
        &self,
        disaster_id: &str,
        report_id: &str,
        verification: &ImageVerification,
    ) {
        let report = match self.reports.get(report_id).await {
            Ok(Some(report)) if report.disaster_id == disaster_id => report,
            Ok(_) => {
                warn!(report_id = %report_id, disaster_id = %disaster_id, "Report not found for verification");
                return;
            }
            Err(e) => {
                error!(report_id = %report_id, error = %e, "Error loading report for verification");
                return;
            }
        };

        let mut report = report;
        report.attach_verification(verification.clone());

        match self.reports.replace(report).await {
            Ok(_) => info!(
                report_id = %report_id,
                status = %verification.verification_status,
                "Report updated with verification status"
            ),
            Err(e) => error!(report_id = %report_id, error = %e, "Error updating report with verification"),
        }
    }
}
