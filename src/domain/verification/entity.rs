//! Image verification results and records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::storage::Record;

/// Outcome of an authenticity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Flagged,
    Unrelated,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Flagged => "flagged",
            Self::Unrelated => "unrelated",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageQuality {
    Good,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingConsistency {
    Consistent,
    Inconsistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReverseImageSearch {
    Unique,
    FoundElsewhere,
}

/// Forensic signals behind a verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub image_quality: ImageQuality,
    pub lighting_consistency: LightingConsistency,
    pub metadata_intact: bool,
    pub reverse_image_search: ReverseImageSearch,
}

/// Raw scores produced by an image analyzer
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSignals {
    /// 0 to 100
    pub authenticity_score: f64,
    pub manipulation_detected: bool,
    pub disaster_context: bool,
    /// 60 to 100
    pub confidence: f64,
    pub analysis: ImageAnalysis,
}

/// Verdict for one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVerification {
    pub authenticity_score: f64,
    pub manipulation_detected: bool,
    pub disaster_context: bool,
    pub confidence: f64,
    pub analysis: ImageAnalysis,
    pub context_analysis: String,
    pub verification_status: VerificationStatus,
    pub verified_at: DateTime<Utc>,
    pub verification_method: String,
}

impl ImageVerification {
    /// Classifies raw signals
    ///
    /// Manipulation wins over everything, then missing disaster context,
    /// then the authenticity score (above 80 verified, above 50 pending).
    pub fn from_signals(signals: ImageSignals, method: impl Into<String>) -> Self {
        let (status, context) = if signals.manipulation_detected {
            (
                VerificationStatus::Flagged,
                "Potential image manipulation detected. Signs of digital alteration found in pixel analysis.",
            )
        } else if !signals.disaster_context {
            (
                VerificationStatus::Unrelated,
                "Image does not appear to show disaster-related content. May be unrelated to reported incident.",
            )
        } else if signals.authenticity_score > 80.0 {
            (
                VerificationStatus::Verified,
                "Image appears authentic and shows disaster-related content. High confidence in verification.",
            )
        } else if signals.authenticity_score > 50.0 {
            (
                VerificationStatus::Pending,
                "Image shows some signs of authenticity but requires manual review for final verification.",
            )
        } else {
            (
                VerificationStatus::Rejected,
                "Low authenticity score. Image may be manipulated or unrelated to disaster context.",
            )
        };

        Self {
            authenticity_score: signals.authenticity_score,
            manipulation_detected: signals.manipulation_detected,
            disaster_context: signals.disaster_context,
            confidence: signals.confidence,
            analysis: signals.analysis,
            context_analysis: context.to_string(),
            verification_status: status,
            verified_at: Utc::now(),
            verification_method: method.into(),
        }
    }
}

/// A stored verification, used for stats and the flagged list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: String,
    pub disaster_id: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    pub verification: ImageVerification,
    pub verified_by: String,
    pub verified_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn new(
        disaster_id: impl Into<String>,
        image_url: impl Into<String>,
        report_id: Option<String>,
        verification: ImageVerification,
        verified_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            disaster_id: disaster_id.into(),
            image_url: image_url.into(),
            report_id,
            verified_at: verification.verified_at,
            verification,
            verified_by: verified_by.into(),
        }
    }

    pub fn status(&self) -> VerificationStatus {
        self.verification.verification_status
    }
}

impl Record for VerificationRecord {
    const COLLECTION: &'static str = "verifications";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.verified_at
    }
}

/// Aggregates over a disaster's recorded verifications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationStats {
    pub total_images_verified: usize,
    pub verified_count: usize,
    pub flagged_count: usize,
    pub pending_count: usize,
    pub rejected_count: usize,
    pub unrelated_count: usize,
    pub average_authenticity_score: Option<f64>,
    pub average_confidence: Option<f64>,
    pub verification_methods: BTreeMap<String, usize>,
}

impl VerificationStats {
    pub fn from_records(records: &[VerificationRecord]) -> Self {
        let mut stats = Self {
            total_images_verified: records.len(),
            ..Default::default()
        };

        if records.is_empty() {
            return stats;
        }

        let mut score_sum = 0.0;
        let mut confidence_sum = 0.0;

        for record in records {
            match record.status() {
                VerificationStatus::Verified => stats.verified_count += 1,
                VerificationStatus::Flagged => stats.flagged_count += 1,
                VerificationStatus::Pending => stats.pending_count += 1,
                VerificationStatus::Rejected => stats.rejected_count += 1,
                VerificationStatus::Unrelated => stats.unrelated_count += 1,
            }

            score_sum += record.verification.authenticity_score;
            confidence_sum += record.verification.confidence;

            *stats
                .verification_methods
                .entry(record.verification.verification_method.clone())
                .or_default() += 1;
        }

        let n = records.len() as f64;
        stats.average_authenticity_score = Some(score_sum / n);
        stats.average_confidence = Some(confidence_sum / n);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(score: f64, manipulated: bool, context: bool) -> ImageSignals {
        ImageSignals {
            authenticity_score: score,
            manipulation_detected: manipulated,
            disaster_context: context,
            confidence: 75.0,
            analysis: ImageAnalysis {
                image_quality: ImageQuality::Good,
                lighting_consistency: LightingConsistency::Consistent,
                metadata_intact: true,
                reverse_image_search: ReverseImageSearch::Unique,
            },
        }
    }

    #[test]
    fn test_classification_order() {
        let status = |s| ImageVerification::from_signals(s, "test").verification_status;

        assert_eq!(status(signals(95.0, true, true)), VerificationStatus::Flagged);
        assert_eq!(status(signals(95.0, false, false)), VerificationStatus::Unrelated);
        assert_eq!(status(signals(95.0, false, true)), VerificationStatus::Verified);
        assert_eq!(status(signals(80.0, false, true)), VerificationStatus::Pending);
        assert_eq!(status(signals(50.0, false, true)), VerificationStatus::Rejected);
    }

    #[test]
    fn test_stats_from_records() {
        let verified = ImageVerification::from_signals(signals(90.0, false, true), "ai");
        let flagged = ImageVerification::from_signals(signals(30.0, true, true), "manual");

        let records = vec![
            VerificationRecord::new("d1", "a.jpg", None, verified.clone(), "u"),
            VerificationRecord::new("d1", "b.jpg", None, verified, "u"),
            VerificationRecord::new("d1", "c.jpg", None, flagged, "u"),
        ];

        let stats = VerificationStats::from_records(&records);

        assert_eq!(stats.total_images_verified, 3);
        assert_eq!(stats.verified_count, 2);
        assert_eq!(stats.flagged_count, 1);
        assert_eq!(stats.average_authenticity_score, Some(70.0));
        assert_eq!(stats.verification_methods.get("ai"), Some(&2));
        assert_eq!(stats.verification_methods.get("manual"), Some(&1));
    }

    #[test]
    fn test_stats_empty() {
        let stats = VerificationStats::from_records(&[]);

        assert_eq!(stats.total_images_verified, 0);
        assert_eq!(stats.average_confidence, None);
    }

    #[test]
    fn test_analysis_serialization() {
        let value = serde_json::to_value(ReverseImageSearch::FoundElsewhere).unwrap();
        assert_eq!(value, serde_json::json!("found_elsewhere"));
    }
}
