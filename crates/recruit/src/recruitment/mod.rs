//! Job postings, applications, and the storage gateway they share.

pub mod catalog;
pub mod domain;
pub mod gateway;
pub mod memory;
pub mod router;
pub mod search;
pub mod seed;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, JobPostCatalogService};
pub use domain::{
    Apply, ApplyId, ApplyRecord, Company, CompanyId, CompanySummary, JobPost, JobPostDetail,
    JobPostFields, JobPostId, JobPostRecord, NewApply, NewCompany, NewJobPost, NewUser, User,
    UserId,
};
pub use gateway::{
    GatewayError, GatewayTransaction, RecruitmentGateway, APPLY_USER_JOB_POST_UNIQUE,
};
pub use memory::InMemoryGateway;
pub use router::{recruitment_router, ApiError, ErrorResponse, RecruitmentServices};
pub use search::{InvalidSearchQuery, SearchQuery};
pub use seed::SeedError;
pub use submission::{ApplicationSubmissionService, SubmissionError};
pub use validation::{
    ApplyRequest, FieldError, JobPostRequest, JobPostUpdateRequest, ValidationErrors,
};
