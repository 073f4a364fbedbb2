use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{ApplyRecord, JobPostId, NewApply, UserId};
use super::gateway::{GatewayError, RecruitmentGateway, APPLY_USER_JOB_POST_UNIQUE};

/// Accepts applications while keeping at most one per `(user, job post)` pair.
pub struct ApplicationSubmissionService<G> {
    gateway: Arc<G>,
}

impl<G> ApplicationSubmissionService<G>
where
    G: RecruitmentGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Submit `user_id`'s application to `job_post_id`.
    ///
    /// Checks run in a fixed order so the surfaced error is deterministic: an existing
    /// application first, then the posting, then the user. The existence check only saves work;
    /// the gateway's uniqueness constraint decides races, and a violation on insert is reported
    /// as [`SubmissionError::AlreadyApplied`] as well.
    pub fn apply(
        &self,
        user_id: UserId,
        job_post_id: JobPostId,
    ) -> Result<ApplyRecord, SubmissionError> {
        let already_applied = SubmissionError::AlreadyApplied {
            user_id,
            job_post_id,
        };

        let outcome = self.gateway.atomically::<_, SubmissionError, _>(|tx| {
            if tx.exists_apply(user_id, job_post_id)? {
                return Err(already_applied);
            }

            let post = tx
                .find_job_post(job_post_id)?
                .ok_or(SubmissionError::JobPostNotFound(job_post_id))?;
            let user = tx
                .find_user(user_id)?
                .ok_or(SubmissionError::UserNotFound(user_id))?;

            let apply = tx
                .insert_apply(NewApply {
                    job_post_id,
                    user_id,
                })
                .map_err(|err| {
                    if err.is_unique_violation(APPLY_USER_JOB_POST_UNIQUE) {
                        already_applied
                    } else {
                        SubmissionError::Gateway(err)
                    }
                })?;

            Ok(ApplyRecord::new(&apply, &user, &post))
        });

        match &outcome {
            Ok(_) => debug!(%user_id, %job_post_id, "application stored"),
            Err(err) => warn!(%user_id, %job_post_id, error = %err, "application rejected"),
        }
        outcome
    }
}

/// Error raised by the submission service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("user {user_id} already applied to job post {job_post_id}")]
    AlreadyApplied {
        user_id: UserId,
        job_post_id: JobPostId,
    },
    #[error("job post {0} not found")]
    JobPostNotFound(JobPostId),
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
