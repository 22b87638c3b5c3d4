use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Group assigned to variables created without one
pub const DEFAULT_GROUP: &str = "General";

/// Marker returned in place of secret values
pub const REDACTED_VALUE: &str = "••••••••";

/// Execution phase that consumes a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnvTarget {
    Build,
    Runtime,
    #[default]
    Both,
}

impl EnvTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Runtime => "runtime",
            Self::Both => "both",
        }
    }

    /// `both` overlaps every target; specific targets only overlap themselves
    pub fn overlaps(&self, other: &EnvTarget) -> bool {
        *self == Self::Both || *other == Self::Both || self == other
    }
}

impl fmt::Display for EnvTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment environment a variable applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnvEnvironment {
    Production,
    Preview,
    #[default]
    Both,
}

impl EnvEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Preview => "preview",
            Self::Both => "both",
        }
    }

    pub fn overlaps(&self, other: &EnvEnvironment) -> bool {
        *self == Self::Both || *other == Self::Both || self == other
    }
}

impl fmt::Display for EnvEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub id: Uuid,
    pub project_id: Uuid,
    pub key: String,
    pub value: String,
    pub is_secret: bool,
    pub target: EnvTarget,
    pub environment: EnvEnvironment,
    pub group: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl EnvironmentVariable {
    /// Whether this variable and a `(target, environment)` scope would both apply somewhere
    pub fn scope_overlaps(&self, target: EnvTarget, environment: EnvEnvironment) -> bool {
        self.target.overlaps(&target) && self.environment.overlaps(&environment)
    }

    /// Copy safe to hand out of the store: secret values are masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.is_secret {
            copy.value = REDACTED_VALUE.to_string();
        }
        copy
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnvVariable {
    pub key: String,
    pub value: String,
    pub is_secret: bool,
    pub target: EnvTarget,
    pub environment: EnvEnvironment,
    pub group: Option<String>,
}

/// Partial update; `key` may only repeat the current key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEnvVariable {
    pub key: Option<String>,
    pub value: Option<String>,
    pub is_secret: Option<bool>,
    pub target: Option<EnvTarget>,
    pub environment: Option<EnvEnvironment>,
    pub group: Option<String>,
}

/// Normalize an optional group label, falling back to [`DEFAULT_GROUP`]
pub fn normalize_group(group: Option<&str>) -> String {
    match group.map(str::trim) {
        Some(g) if !g.is_empty() => g.to_string(),
        _ => DEFAULT_GROUP.to_string(),
    }
}
