//! Recruitment posting core.
//!
//! Companies publish job postings through the [`recruitment::JobPostCatalogService`] and users
//! apply to them through the [`recruitment::ApplicationSubmissionService`]. Both services run
//! every operation as one unit of work against an injected [`recruitment::RecruitmentGateway`].

pub mod config;
pub mod error;
pub mod recruitment;
pub mod telemetry;
