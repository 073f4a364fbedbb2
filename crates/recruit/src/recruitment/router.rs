use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::catalog::{CatalogError, JobPostCatalogService};
use super::domain::{ApplyRecord, JobPostDetail, JobPostId, JobPostRecord};
use super::gateway::RecruitmentGateway;
use super::submission::{ApplicationSubmissionService, SubmissionError};
use super::validation::{ApplyRequest, JobPostRequest, JobPostUpdateRequest, ValidationErrors};

/// Both services sharing one gateway, as held by the router state.
pub struct RecruitmentServices<G> {
    pub catalog: JobPostCatalogService<G>,
    pub submissions: ApplicationSubmissionService<G>,
}

impl<G> RecruitmentServices<G>
where
    G: RecruitmentGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            catalog: JobPostCatalogService::new(gateway.clone()),
            submissions: ApplicationSubmissionService::new(gateway),
        }
    }
}

/// Router builder exposing the posting and application endpoints.
pub fn recruitment_router<G>(services: Arc<RecruitmentServices<G>>) -> Router
where
    G: RecruitmentGateway + 'static,
{
    Router::new()
        .route("/job", post(save_handler::<G>).get(list_handler::<G>))
        .route(
            "/job/:id",
            get(detail_handler::<G>)
                .put(update_handler::<G>)
                .delete(delete_handler::<G>),
        )
        .route("/job/:id/apply", post(apply_handler::<G>))
        .with_state(services)
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub title: String,
    pub message: String,
}

/// Boundary error translating service failures into status codes.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationErrors),
    Catalog(CatalogError),
    Submission(SubmissionError),
}

impl ApiError {
    fn status_and_title(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::Catalog(CatalogError::InvalidSearchQuery(_)) => {
                (StatusCode::BAD_REQUEST, "InvalidSearchQuery")
            }
            ApiError::Catalog(CatalogError::CompanyNotFound(_)) => {
                (StatusCode::NOT_FOUND, "CompanyNotFound")
            }
            ApiError::Catalog(CatalogError::JobPostNotFound(_))
            | ApiError::Submission(SubmissionError::JobPostNotFound(_)) => {
                (StatusCode::NOT_FOUND, "JobPostNotFound")
            }
            ApiError::Submission(SubmissionError::UserNotFound(_)) => {
                (StatusCode::NOT_FOUND, "UserNotFound")
            }
            ApiError::Submission(SubmissionError::AlreadyApplied { .. }) => {
                (StatusCode::CONFLICT, "AlreadyApplied")
            }
            ApiError::Catalog(CatalogError::Gateway(_))
            | ApiError::Submission(SubmissionError::Gateway(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "StorageUnavailable")
            }
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(err) => err.to_string(),
            ApiError::Catalog(err) => err.to_string(),
            ApiError::Submission(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title) = self.status_and_title();
        let body = ErrorResponse {
            title: title.to_string(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<SubmissionError> for ApiError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(ValidationErrors::single("body", value.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::Validation(ValidationErrors::single("id", value.body_text()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    pub(crate) search: Option<String>,
}

type Services<G> = State<Arc<RecruitmentServices<G>>>;

pub(crate) async fn save_handler<G>(
    State(services): Services<G>,
    payload: Result<Json<JobPostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobPostRecord>), ApiError>
where
    G: RecruitmentGateway + 'static,
{
    let Json(request) = payload?;
    let command = request.validate()?;
    let record = services.catalog.save(command.company_id, command.fields)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn update_handler<G>(
    State(services): Services<G>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<JobPostUpdateRequest>, JsonRejection>,
) -> Result<Json<JobPostRecord>, ApiError>
where
    G: RecruitmentGateway + 'static,
{
    let Path(id) = path?;
    let Json(request) = payload?;
    let fields = request.validate()?;
    let record = services.catalog.update(JobPostId(id), fields)?;
    Ok(Json(record))
}

pub(crate) async fn list_handler<G>(
    State(services): Services<G>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<JobPostRecord>>, ApiError>
where
    G: RecruitmentGateway + 'static,
{
    let records = services.catalog.get_list(params.search.as_deref())?;
    Ok(Json(records))
}

pub(crate) async fn detail_handler<G>(
    State(services): Services<G>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<JobPostDetail>, ApiError>
where
    G: RecruitmentGateway + 'static,
{
    let Path(id) = path?;
    let detail = services.catalog.get_detail(JobPostId(id))?;
    Ok(Json(detail))
}

pub(crate) async fn delete_handler<G>(
    State(services): Services<G>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
    G: RecruitmentGateway + 'static,
{
    let Path(id) = path?;
    services.catalog.delete(JobPostId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn apply_handler<G>(
    State(services): Services<G>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApplyRecord>), ApiError>
where
    G: RecruitmentGateway + 'static,
{
    let Path(id) = path?;
    let Json(request) = payload?;
    let command = request.validate(id)?;
    let record = services
        .submissions
        .apply(command.user_id, command.job_post_id)?;
    Ok((StatusCode::CREATED, Json(record)))
}
