//! The submission pipeline: stage → upload → log → record.
//!
//! Each step has a declared failure policy. Staging and the object-store
//! upload are always required; nothing downstream may run without a stored
//! image. The audit append and the entry insert are best-effort by default:
//! their failures are logged and returned as warnings alongside an otherwise
//! successful outcome, or made fatal through [`PipelinePolicy`].

use std::fmt;
use std::path::{Path, PathBuf};

use babycontest_cloud::{ObjectStore, StorageError};
use babycontest_core::entry::EntryFields;
use babycontest_core::error::CoreError;
use babycontest_core::naming::{image_content_type, local_upload_url, sanitize_filename};
use babycontest_core::types::DbId;
use babycontest_db::models::entry::CreateEntry;
use babycontest_db::repositories::EntryRepo;
use babycontest_db::DbPool;

use crate::audit_log::{AuditLog, AuditLogError};
use crate::error::AppError;
use crate::form::ImageUpload;
use crate::state::AppState;

/// A complete submission: all text fields and an image.
#[derive(Debug, Clone)]
pub struct Submission {
    pub fields: EntryFields,
    pub image: ImageUpload,
}

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stage,
    Upload,
    AuditAppend,
    EntryInsert,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Upload => "upload",
            Self::AuditAppend => "audit_append",
            Self::EntryInsert => "entry_insert",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a step's failure does to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Abort the request.
    Required,
    /// Log, record a warning, continue.
    BestEffort,
}

impl StepPolicy {
    pub fn required_if(required: bool) -> Self {
        if required {
            Self::Required
        } else {
            Self::BestEffort
        }
    }
}

/// Policies for the steps that are allowed to be best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelinePolicy {
    pub audit_append: StepPolicy,
    pub entry_insert: StepPolicy,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            audit_append: StepPolicy::BestEffort,
            entry_insert: StepPolicy::BestEffort,
        }
    }
}

/// A best-effort step that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: Step,
    pub message: String,
}

/// Result of a pipeline run that stored the image.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub fields: EntryFields,
    /// Sanitised filename, used as the object key.
    pub object_key: String,
    pub image_url: String,
    pub audit_sequence: Option<u64>,
    pub entry_id: Option<DbId>,
    /// Best-effort steps that failed, in execution order.
    pub warnings: Vec<StepFailure>,
}

impl SubmissionOutcome {
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Failures that abort the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Filename '{0}' has no usable characters")]
    InvalidFilename(String),

    #[error("Failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),

    #[error(transparent)]
    Upload(#[from] StorageError),

    #[error("Audit append failed: {0}")]
    AuditAppend(#[from] AuditLogError),

    #[error("Entry insert failed: {0}")]
    EntryInsert(#[from] sqlx::Error),
}

impl PipelineError {
    /// The step that raised this error.
    pub fn step(&self) -> Step {
        match self {
            Self::InvalidFilename(_) | Self::Staging(_) => Step::Stage,
            Self::Upload(_) => Step::Upload,
            Self::AuditAppend(_) => Step::AuditAppend,
            Self::EntryInsert(_) => Step::EntryInsert,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidFilename(_) => {
                AppError::Core(CoreError::Validation(err.to_string()))
            }
            PipelineError::Upload(storage) => AppError::Upload(storage),
            PipelineError::EntryInsert(db) => AppError::Database(db),
            PipelineError::Staging(_) | PipelineError::AuditAppend(_) => {
                AppError::InternalError(err.to_string())
            }
        }
    }
}

/// One submission's worth of collaborators.
pub struct SubmissionPipeline<'a> {
    pub store: &'a dyn ObjectStore,
    pub audit_log: &'a AuditLog,
    pub pool: &'a DbPool,
    pub upload_dir: &'a Path,
    pub public_host: &'a str,
    pub public_port: u16,
    pub policy: PipelinePolicy,
}

impl<'a> SubmissionPipeline<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
            audit_log: state.audit_log.as_ref(),
            pool: &state.pool,
            upload_dir: &state.config.upload_dir,
            public_host: &state.config.public_host,
            public_port: state.config.public_port,
            policy: PipelinePolicy {
                audit_append: StepPolicy::required_if(state.config.audit_append_required),
                entry_insert: StepPolicy::required_if(state.config.entry_insert_required),
            },
        }
    }

    pub async fn run(&self, submission: Submission) -> Result<SubmissionOutcome, PipelineError> {
        let Submission { fields, image } = submission;

        let object_key = sanitize_filename(&image.file_name)
            .ok_or_else(|| PipelineError::InvalidFilename(image.file_name.clone()))?;

        let content_type = image
            .content_type
            .as_deref()
            .filter(|ct| ct.starts_with("image/"))
            .or_else(|| image_content_type(&object_key));

        // --- Stage + upload (required) ---
        let staging = self.stage(&object_key, &image).await?;
        let upload = self
            .store
            .put_file(&object_key, &staging.path, content_type)
            .await;
        staging.close();
        upload?;

        let image_url = self.store.public_url(&object_key);
        tracing::info!(
            key = %object_key,
            backend = self.store.backend(),
            url = %image_url,
            "Stored contest image"
        );

        let mut warnings = Vec::new();

        // --- Audit append ---
        let local_url = local_upload_url(self.public_host, self.public_port, &object_key);
        let audit_sequence = match self.audit_log.append(&local_url).await {
            Ok(line) => Some(line.sequence),
            Err(e) => {
                settle(Step::AuditAppend, self.policy.audit_append, e, &mut warnings)?;
                None
            }
        };

        // --- Entry insert ---
        let entry_id = match EntryRepo::create(self.pool, &CreateEntry::new(&fields, &image_url)).await
        {
            Ok(entry) => Some(entry.id),
            Err(e) => {
                settle(Step::EntryInsert, self.policy.entry_insert, e, &mut warnings)?;
                None
            }
        };

        Ok(SubmissionOutcome {
            fields,
            object_key,
            image_url,
            audit_sequence,
            entry_id,
            warnings,
        })
    }

    /// Write the image into a fresh per-request directory under `upload_dir`.
    async fn stage(&self, key: &str, image: &ImageUpload) -> Result<StagedFile, PipelineError> {
        tokio::fs::create_dir_all(self.upload_dir)
            .await
            .map_err(PipelineError::Staging)?;

        let dir = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(self.upload_dir)
            .map_err(PipelineError::Staging)?;

        let path = dir.path().join(key);
        tokio::fs::write(&path, &image.data)
            .await
            .map_err(PipelineError::Staging)?;

        tracing::debug!(path = %path.display(), bytes = image.data.len(), "Staged upload");
        Ok(StagedFile { dir, path })
    }
}

/// A staged upload. The directory and file are removed on drop if
/// [`StagedFile::close`] is never reached.
struct StagedFile {
    dir: tempfile::TempDir,
    path: PathBuf,
}

impl StagedFile {
    fn close(self) {
        let dir = self.dir.path().display().to_string();
        if let Err(e) = self.dir.close() {
            tracing::warn!(dir = %dir, error = %e, "Failed to remove staging directory");
        }
    }
}

/// Apply `policy` to a failed step.
fn settle<E>(
    step: Step,
    policy: StepPolicy,
    err: E,
    warnings: &mut Vec<StepFailure>,
) -> Result<(), PipelineError>
where
    E: fmt::Display + Into<PipelineError>,
{
    tracing::error!(step = %step, error = %err, ?policy, "Submission step failed");
    match policy {
        StepPolicy::Required => Err(err.into()),
        StepPolicy::BestEffort => {
            warnings.push(StepFailure {
                step,
                message: err.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_best_effort() {
        let policy = PipelinePolicy::default();
        assert_eq!(policy.audit_append, StepPolicy::BestEffort);
        assert_eq!(policy.entry_insert, StepPolicy::BestEffort);
    }

    #[test]
    fn required_if_maps_flag() {
        assert_eq!(StepPolicy::required_if(true), StepPolicy::Required);
        assert_eq!(StepPolicy::required_if(false), StepPolicy::BestEffort);
    }

    fn disk_full() -> AuditLogError {
        AuditLogError::Write {
            path: "/efs/upload_log.txt".into(),
            source: std::io::Error::other("disk full"),
        }
    }

    #[test]
    fn best_effort_failure_becomes_warning() {
        let mut warnings = Vec::new();
        settle(
            Step::EntryInsert,
            StepPolicy::BestEffort,
            sqlx::Error::PoolTimedOut,
            &mut warnings,
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].step, Step::EntryInsert);
        assert_eq!(warnings[0].message, sqlx::Error::PoolTimedOut.to_string());
    }

    #[test]
    fn required_failure_aborts_with_source() {
        let mut warnings = Vec::new();
        let err = settle(Step::AuditAppend, StepPolicy::Required, disk_full(), &mut warnings)
            .unwrap_err();
        assert!(matches!(err, PipelineError::AuditAppend(AuditLogError::Write { .. })));
        assert_eq!(err.step(), Step::AuditAppend);
        assert!(warnings.is_empty());
    }

    #[test]
    fn required_insert_failure_maps_to_database_error() {
        let mut warnings = Vec::new();
        let err = settle(
            Step::EntryInsert,
            StepPolicy::Required,
            sqlx::Error::PoolTimedOut,
            &mut warnings,
        )
        .unwrap_err();
        let app: AppError = err.into();
        assert!(matches!(app, AppError::Database(sqlx::Error::PoolTimedOut)));
    }

    #[test]
    fn required_audit_failure_maps_to_internal_error() {
        let app: AppError = PipelineError::AuditAppend(disk_full()).into();
        assert!(matches!(app, AppError::InternalError(_)));
    }

    #[test]
    fn invalid_filename_maps_to_validation_error() {
        let err: AppError = PipelineError::InvalidFilename("..".into()).into();
        assert!(matches!(err, AppError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn upload_error_keeps_storage_detail() {
        let err: AppError =
            PipelineError::Upload(StorageError::Upload("a.png".into(), "timeout".into())).into();
        assert!(matches!(err, AppError::Upload(_)));
        assert!(err.to_string().contains("timeout"));
    }
}
