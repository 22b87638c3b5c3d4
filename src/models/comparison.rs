use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Qualitative reading of a delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Improved,
    Regressed,
    Unchanged,
}

/// Threshold bucket for a web-vitals value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MetricRating {
    Good,
    Average,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    pub base: f64,
    pub target: f64,
    /// `target - base`
    pub delta: f64,
    pub percent_change: f64,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_rating: Option<MetricRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentComparison {
    pub base_id: Uuid,
    pub target_id: Uuid,
    pub performance_score: MetricComparison,
    pub lcp: MetricComparison,
    pub cls: MetricComparison,
    pub fid: MetricComparison,
    pub tbt: MetricComparison,
    pub build_duration: MetricComparison,
}

impl DeploymentComparison {
    pub fn performance_score_delta(&self) -> f64 {
        self.performance_score.delta
    }

    pub fn lcp_delta(&self) -> f64 {
        self.lcp.delta
    }

    pub fn cls_delta(&self) -> f64 {
        self.cls.delta
    }

    pub fn fid_delta(&self) -> f64 {
        self.fid.delta
    }

    pub fn tbt_delta(&self) -> f64 {
        self.tbt.delta
    }

    pub fn build_duration_delta(&self) -> f64 {
        self.build_duration.delta
    }

    /// All metric entries in display order
    pub fn metrics(&self) -> [(&'static str, &MetricComparison); 6] {
        [
            ("performanceScore", &self.performance_score),
            ("lcp", &self.lcp),
            ("cls", &self.cls),
            ("fid", &self.fid),
            ("tbt", &self.tbt),
            ("buildDuration", &self.build_duration),
        ]
    }
}
