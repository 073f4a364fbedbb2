use super::domain::{
    Apply, Company, CompanyId, JobPost, JobPostFields, JobPostId, JobPostRecord, NewApply,
    NewCompany, NewJobPost, NewUser, User, UserId,
};
use super::search::SearchQuery;

/// Name of the storage constraint guarding one application per `(user, job post)` pair.
pub const APPLY_USER_JOB_POST_UNIQUE: &str = "apply_user_job_post_unique";

/// Storage abstraction shared by the catalog and submission services.
///
/// Every service operation runs inside exactly one [`RecruitmentGateway::atomically`] call:
/// the work either commits as a whole when it returns `Ok`, or leaves no trace when it returns
/// `Err`. Implementations must isolate concurrent units of work from one another and must
/// enforce [`APPLY_USER_JOB_POST_UNIQUE`] on insert regardless of any caller-side check.
pub trait RecruitmentGateway: Send + Sync {
    fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GatewayTransaction) -> Result<T, E>,
        E: From<GatewayError>;
}

/// Reads and writes available inside one unit of work.
pub trait GatewayTransaction {
    fn exists_apply(&self, user_id: UserId, job_post_id: JobPostId) -> Result<bool, GatewayError>;
    /// Fails with [`GatewayError::UniqueViolation`] when the pair already applied.
    fn insert_apply(&mut self, apply: NewApply) -> Result<Apply, GatewayError>;
    fn count_applies_for_job_post(&self, job_post_id: JobPostId) -> Result<usize, GatewayError>;

    fn find_job_post(&self, id: JobPostId) -> Result<Option<JobPost>, GatewayError>;
    fn find_user(&self, id: UserId) -> Result<Option<User>, GatewayError>;
    fn find_company(&self, id: CompanyId) -> Result<Option<Company>, GatewayError>;

    fn save_job_post(&mut self, post: NewJobPost) -> Result<JobPost, GatewayError>;
    /// Returns `None` when no posting has the given id.
    fn update_job_post_fields(
        &mut self,
        id: JobPostId,
        fields: JobPostFields,
    ) -> Result<Option<JobPost>, GatewayError>;
    /// Removes the posting and its applications. Returns whether a posting was removed.
    fn delete_job_post(&mut self, id: JobPostId) -> Result<bool, GatewayError>;

    /// Every posting with its company, ascending by id.
    fn list_all_job_posts(&self) -> Result<Vec<JobPostRecord>, GatewayError>;
    /// Postings whose own or company fields contain the query, ascending by id.
    fn search_job_posts(&self, query: &SearchQuery) -> Result<Vec<JobPostRecord>, GatewayError>;
    /// Ids of the company's postings other than `exclude`, ascending.
    fn list_sibling_job_post_ids(
        &self,
        company_id: CompanyId,
        exclude: JobPostId,
    ) -> Result<Vec<JobPostId>, GatewayError>;

    fn insert_company(&mut self, company: NewCompany) -> Result<Company, GatewayError>;
    fn insert_user(&mut self, user: NewUser) -> Result<User, GatewayError>;
    /// Removes the company, its postings, and their applications.
    fn delete_company(&mut self, id: CompanyId) -> Result<bool, GatewayError>;
    /// Removes the user and their applications.
    fn delete_user(&mut self, id: UserId) -> Result<bool, GatewayError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("unique constraint `{constraint}` violated")]
    UniqueViolation { constraint: &'static str },
    #[error("{entity} {id} is referenced but does not exist")]
    MissingReference { entity: &'static str, id: i64 },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    pub fn is_unique_violation(&self, name: &str) -> bool {
        matches!(self, GatewayError::UniqueViolation { constraint } if *constraint == name)
    }
}
