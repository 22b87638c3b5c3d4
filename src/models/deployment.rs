use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Deployment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    /// Triggered, waiting for a builder
    Queued,
    /// Build in progress
    Building,
    /// Build succeeded and is serving
    Ready,
    /// Build failed
    Error,
    /// Stopped before completion
    Canceled,
}

impl DeploymentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Error | Self::Canceled)
    }

    pub fn can_transition_to(&self, next: DeploymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Building)
                | (Self::Queued, Self::Canceled)
                | (Self::Building, Self::Ready)
                | (Self::Building, Self::Error)
                | (Self::Building, Self::Canceled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Building => "building",
            Self::Ready => "ready",
            Self::Error => "error",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentType {
    Production,
    Preview,
}

/// Lighthouse-style web vitals captured for a ready deployment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Overall score in `[0, 1]`
    pub performance_score: f64,
    /// Largest Contentful Paint (ms)
    pub lcp: f64,
    /// Cumulative Layout Shift
    pub cls: f64,
    /// First Input Delay (ms)
    pub fid: f64,
    /// Total Blocking Time (ms)
    pub tbt: f64,
}

impl PerformanceMetrics {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.performance_score) {
            return Err("performanceScore must be between 0 and 1".to_string());
        }
        for (name, value) in [
            ("lcp", self.lcp),
            ("cls", self.cls),
            ("fid", self.fid),
            ("tbt", self.tbt),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub status: DeploymentStatus,
    pub deployment_type: DeploymentType,
    pub git_branch: String,
    pub git_commit_sha: String,
    pub git_commit_message: String,
    pub git_commit_author: Option<String>,
    pub build_duration_ms: Option<u64>,
    pub performance_metrics: Option<PerformanceMetrics>,
    pub error_message: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeployment {
    pub deployment_type: DeploymentType,
    pub git_branch: String,
    pub git_commit_sha: String,
    pub git_commit_message: String,
    pub git_commit_author: Option<String>,
}

/// Requested status change plus the data that accompanies it
#[derive(Debug, Clone, Deserialize)]
pub struct StatusTransition {
    pub status: DeploymentStatus,
    pub build_duration_ms: Option<u64>,
    pub performance_metrics: Option<PerformanceMetrics>,
    pub error_message: Option<String>,
}

impl StatusTransition {
    pub fn to(status: DeploymentStatus) -> Self {
        Self {
            status,
            build_duration_ms: None,
            performance_metrics: None,
            error_message: None,
        }
    }
}
