use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    normalize_group, CreateEnvVariable, EnvEnvironment, EnvTarget, EnvironmentVariable,
    UpdateEnvVariable,
};

/// Environment variable store.
///
/// Records are kept in insertion order, which doubles as creation order for
/// listing. A single write guard covers the scope check and the mutation, so
/// two racing `add` calls for the same key resolve deterministically.
#[derive(Default)]
pub struct EnvVariableStore {
    records: RwLock<Vec<EnvironmentVariable>>,
}

impl EnvVariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// List a project's variables, secrets redacted, grouped by first occurrence
    pub fn list(&self, project_id: Uuid) -> Vec<EnvironmentVariable> {
        let records = self.records.read();
        let owned: Vec<&EnvironmentVariable> = records
            .iter()
            .filter(|v| v.project_id == project_id)
            .collect();

        let mut groups: Vec<&str> = Vec::new();
        for var in &owned {
            if !groups.contains(&var.group.as_str()) {
                groups.push(var.group.as_str());
            }
        }

        groups
            .into_iter()
            .flat_map(|group| {
                owned
                    .iter()
                    .filter(move |v| v.group == group)
                    .map(|v| v.redacted())
            })
            .collect()
    }

    /// Add a variable; fails if a same-key variable's scope overlaps
    pub fn add(
        &self,
        project_id: Uuid,
        input: CreateEnvVariable,
    ) -> AppResult<EnvironmentVariable> {
        validate_key(&input.key)?;

        let mut records = self.records.write();
        ensure_scope_free(
            &records,
            project_id,
            &input.key,
            input.target,
            input.environment,
            None,
        )?;

        let now = time::OffsetDateTime::now_utc();
        let var = EnvironmentVariable {
            id: Uuid::new_v4(),
            project_id,
            key: input.key,
            value: input.value,
            is_secret: input.is_secret,
            target: input.target,
            environment: input.environment,
            group: normalize_group(input.group.as_deref()),
            created_at: now,
            updated_at: now,
        };
        records.push(var.clone());

        Ok(var)
    }

    /// Apply a partial update. The key is immutable.
    pub fn update(&self, id: Uuid, patch: UpdateEnvVariable) -> AppResult<EnvironmentVariable> {
        let mut records = self.records.write();
        let index = records
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| AppError::NotFound("Environment variable".to_string()))?;

        let current = &records[index];
        if let Some(key) = &patch.key {
            if *key != current.key {
                return Err(AppError::Validation(
                    "Environment variable key cannot be changed".to_string(),
                ));
            }
        }

        let target = patch.target.unwrap_or(current.target);
        let environment = patch.environment.unwrap_or(current.environment);
        if target != current.target || environment != current.environment {
            ensure_scope_free(
                &records,
                current.project_id,
                &current.key,
                target,
                environment,
                Some(id),
            )?;
        }

        let var = &mut records[index];
        if let Some(value) = patch.value {
            var.value = value;
        }
        if let Some(is_secret) = patch.is_secret {
            var.is_secret = is_secret;
        }
        if let Some(group) = patch.group {
            var.group = normalize_group(Some(&group));
        }
        var.target = target;
        var.environment = environment;
        var.updated_at = time::OffsetDateTime::now_utc();

        Ok(var.clone())
    }

    pub fn remove(&self, id: Uuid) -> AppResult<EnvironmentVariable> {
        let mut records = self.records.write();
        let index = records
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| AppError::NotFound("Environment variable".to_string()))?;

        Ok(records.remove(index))
    }

    /// Unredacted lookup, used for explicit reveal requests
    pub fn get(&self, id: Uuid) -> AppResult<EnvironmentVariable> {
        self.records
            .read()
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Environment variable".to_string()))
    }

    /// Unredacted copies in creation order, for snapshots
    pub fn export(&self, project_id: Uuid) -> Vec<EnvironmentVariable> {
        self.records
            .read()
            .iter()
            .filter(|v| v.project_id == project_id)
            .cloned()
            .collect()
    }

    /// Replace a project's variables with previously exported ones
    pub fn import(&self, project_id: Uuid, vars: Vec<EnvironmentVariable>) {
        let mut records = self.records.write();
        records.retain(|v| v.project_id != project_id);
        records.extend(vars.into_iter().filter(|v| v.project_id == project_id));
    }

    /// Cascade delete; returns the number of variables removed
    pub fn remove_project(&self, project_id: Uuid) -> usize {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|v| v.project_id != project_id);
        before - records.len()
    }
}

/// Keys are uppercase identifiers starting with a letter, e.g. `DATABASE_URL`
fn validate_key(key: &str) -> AppResult<()> {
    let mut chars = key.chars();
    match chars.next() {
        None => Err(AppError::Validation("Key is required".to_string())),
        Some(first)
            if first.is_ascii_uppercase()
                && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_') =>
        {
            Ok(())
        }
        Some(_) => Err(AppError::Validation(
            "Key must be uppercase and start with a letter (e.g., DATABASE_URL)".to_string(),
        )),
    }
}

fn ensure_scope_free(
    records: &[EnvironmentVariable],
    project_id: Uuid,
    key: &str,
    target: EnvTarget,
    environment: EnvEnvironment,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    let clash = records.iter().find(|v| {
        v.project_id == project_id
            && v.key == key
            && Some(v.id) != exclude
            && v.scope_overlaps(target, environment)
    });

    match clash {
        Some(existing) => Err(AppError::Conflict(format!(
            "Environment variable {} ({}/{})",
            existing.key, existing.target, existing.environment
        ))),
        None => Ok(()),
    }
}
