use crate::error::{AppError, AppResult};
use crate::models::{
    Deployment, DeploymentComparison, Direction, MetricComparison, MetricRating,
    PerformanceMetrics,
};

/// Which way a metric should move to count as an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Better {
    Higher,
    Lower,
}

/// Computes metric deltas between two finished deployments
pub struct DeploymentComparator;

impl DeploymentComparator {
    /// Compare `target` against `base`. Pure: no state is read or written.
    pub fn compare(base: &Deployment, target: &Deployment) -> AppResult<DeploymentComparison> {
        let (base_metrics, base_duration) = Self::comparable_parts(base, "base")?;
        let (target_metrics, target_duration) = Self::comparable_parts(target, "target")?;

        Ok(DeploymentComparison {
            base_id: base.id,
            target_id: target.id,
            performance_score: Self::metric(
                base_metrics.performance_score,
                target_metrics.performance_score,
                Better::Higher,
                Some(score_rating),
            ),
            lcp: Self::metric(
                base_metrics.lcp,
                target_metrics.lcp,
                Better::Lower,
                Some(lcp_rating),
            ),
            cls: Self::metric(
                base_metrics.cls,
                target_metrics.cls,
                Better::Lower,
                Some(cls_rating),
            ),
            fid: Self::metric(
                base_metrics.fid,
                target_metrics.fid,
                Better::Lower,
                Some(fid_rating),
            ),
            tbt: Self::metric(base_metrics.tbt, target_metrics.tbt, Better::Lower, None),
            build_duration: Self::metric(
                base_duration as f64,
                target_duration as f64,
                Better::Lower,
                None,
            ),
        })
    }

    fn comparable_parts<'a>(
        deployment: &'a Deployment,
        role: &str,
    ) -> AppResult<(&'a PerformanceMetrics, u64)> {
        if !deployment.status.is_terminal() {
            return Err(AppError::IncomparableState(format!(
                "{} deployment {} is still {}",
                role, deployment.id, deployment.status
            )));
        }

        let metrics = deployment.performance_metrics.as_ref().ok_or_else(|| {
            AppError::IncomparableState(format!(
                "{} deployment {} has no performance metrics",
                role, deployment.id
            ))
        })?;

        let duration = deployment.build_duration_ms.ok_or_else(|| {
            AppError::IncomparableState(format!(
                "{} deployment {} has no build duration",
                role, deployment.id
            ))
        })?;

        Ok((metrics, duration))
    }

    fn metric(
        base: f64,
        target: f64,
        better: Better,
        rate: Option<fn(f64) -> MetricRating>,
    ) -> MetricComparison {
        let raw = target - base;
        let delta = round_reported(raw);
        let percent_change = if base != 0.0 {
            round_reported(raw / base * 100.0)
        } else {
            0.0
        };

        let direction = if delta == 0.0 {
            Direction::Unchanged
        } else if (delta > 0.0) == (better == Better::Higher) {
            Direction::Improved
        } else {
            Direction::Regressed
        };

        MetricComparison {
            base,
            target,
            delta,
            percent_change,
            direction,
            target_rating: rate.map(|f| f(target)),
        }
    }
}

/// Deltas are reported to six decimal places so subtraction noise
/// (`0.95 - 0.90`) does not leak into responses or flip a direction.
/// Rounding is symmetric, so swapping base and target still negates exactly.
fn round_reported(value: f64) -> f64 {
    (value * REPORTED_SCALE).round() / REPORTED_SCALE
}

const REPORTED_SCALE: f64 = 1e6;

/// Score is in `[0, 1]`
pub fn score_rating(value: f64) -> MetricRating {
    if value >= 0.9 {
        MetricRating::Good
    } else if value >= 0.5 {
        MetricRating::Average
    } else {
        MetricRating::Poor
    }
}

pub fn lcp_rating(value: f64) -> MetricRating {
    upper_bound_rating(value, 2500.0, 4000.0)
}

pub fn fid_rating(value: f64) -> MetricRating {
    upper_bound_rating(value, 100.0, 300.0)
}

pub fn cls_rating(value: f64) -> MetricRating {
    upper_bound_rating(value, 0.1, 0.25)
}

fn upper_bound_rating(value: f64, good: f64, average: f64) -> MetricRating {
    if value <= good {
        MetricRating::Good
    } else if value <= average {
        MetricRating::Average
    } else {
        MetricRating::Poor
    }
}
