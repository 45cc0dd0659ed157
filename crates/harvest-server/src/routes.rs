use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use harvest_core::error::AppError;
use harvest_core::models::ScrapeUrl;
use harvest_core::traits::{CrudStore, Record, UrlQueue};

use harvest_db::{Entity, Repository};

use crate::dto::{
    BatchQuery, ConfigResponse, CreateConfigRequest, CreateJobRequest, CreateUrlRequest,
    HealthResponse, JobResponse, ListQuery, RootResponse, ScrapeResultRequest,
    UpdateConfigRequest, UpdateJobRequest, UpdateUrlRequest, UrlResponse,
};
use crate::error::ApiError;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::openapi::ApiDoc;
use crate::state::AppState;

const DEFAULT_PENDING_LIMIT: u64 = 100;
const DEFAULT_CLAIM_LIMIT: u64 = 10;

/// Build the full router: entity routes under the configured prefix, plus
/// the root, health, and documentation routes.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/configs", get(list_configs).post(create_config))
        .route("/configs/", get(list_configs).post(create_config))
        .route(
            "/configs/{id}",
            get(get_config).put(update_config).delete(delete_config),
        )
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/", get(list_jobs).post(create_job))
        .route(
            "/jobs/{id}",
            get(get_job).put(update_job).delete(delete_job),
        )
        .route("/urls", get(list_urls).post(create_url))
        .route("/urls/", get(list_urls).post(create_url))
        .route("/urls/pending", get(pending_urls))
        .route("/urls/claim", post(claim_urls))
        .route(
            "/urls/{id}",
            get(get_url).put(update_url).delete(delete_url),
        )
        .route("/urls/{id}/result", post(record_result))
        .route("/urls/{id}/release", post(release_url));

    let prefix = state.settings.api_prefix.clone();
    let api = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Configs
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/configs/",
    request_body = CreateConfigRequest,
    responses(
        (status = 201, description = "Config created", body = ConfigResponse),
        (status = 422, description = "Invalid input", body = crate::dto::ErrorResponse),
        (status = 503, description = "Storage failure", body = crate::dto::ErrorResponse),
    ),
    tag = "configs"
)]
pub async fn create_config(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<CreateConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state.db.config_repo().create(body.into()).await?;
    Ok((StatusCode::CREATED, axum::Json(ConfigResponse::from(config))))
}

#[utoipa::path(
    get,
    path = "/api/v1/configs/",
    params(ListQuery),
    responses(
        (status = 200, description = "List of configs", body = Vec<ConfigResponse>),
        (status = 422, description = "Invalid query", body = crate::dto::ErrorResponse),
    ),
    tag = "configs"
)]
pub async fn list_configs(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let configs = state
        .db
        .config_repo()
        .list(query.skip(), query.limit())
        .await?;
    let response: Vec<ConfigResponse> = configs.into_iter().map(ConfigResponse::from).collect();
    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/configs/{id}",
    params(("id" = Uuid, Path, description = "Config ID")),
    responses(
        (status = 200, description = "Config details", body = ConfigResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "configs"
)]
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state.db.config_repo().get_or_fail(id).await?;
    Ok(axum::Json(ConfigResponse::from(config)))
}

#[utoipa::path(
    put,
    path = "/api/v1/configs/{id}",
    params(("id" = Uuid, Path, description = "Config ID")),
    request_body = UpdateConfigRequest,
    responses(
        (status = 200, description = "Config updated", body = ConfigResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::dto::ErrorResponse),
        (status = 503, description = "Storage failure", body = crate::dto::ErrorResponse),
    ),
    tag = "configs"
)]
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<UpdateConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.config_repo();
    let existing = repo.get_or_fail(id).await?;
    let config = repo.update(existing, body.into()).await?;
    Ok(axum::Json(ConfigResponse::from(config)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/configs/{id}",
    params(("id" = Uuid, Path, description = "Config ID")),
    responses(
        (status = 204, description = "Config and its URLs deleted"),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "configs"
)]
pub async fn delete_config(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    removed(state.db.config_repo(), id).await
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/jobs/",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 422, description = "Invalid input", body = crate::dto::ErrorResponse),
    ),
    tag = "jobs"
)]
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.db.job_repo().create(body.into()).await?;
    Ok((StatusCode::CREATED, axum::Json(JobResponse::from(job))))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/",
    params(ListQuery),
    responses(
        (status = 200, description = "List of jobs", body = Vec<JobResponse>),
        (status = 422, description = "Invalid query", body = crate::dto::ErrorResponse),
    ),
    tag = "jobs"
)]
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = state
        .db
        .job_repo()
        .list(query.skip(), query.limit())
        .await?;
    let response: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();
    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job details", body = JobResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "jobs"
)]
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.db.job_repo().get_or_fail(id).await?;
    Ok(axum::Json(JobResponse::from(job)))
}

#[utoipa::path(
    put,
    path = "/api/v1/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::dto::ErrorResponse),
    ),
    tag = "jobs"
)]
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<UpdateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.job_repo();
    let existing = repo.get_or_fail(id).await?;
    let job = repo.update(existing, body.into()).await?;
    Ok(axum::Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job and its URLs deleted"),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "jobs"
)]
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    removed(state.db.job_repo(), id).await
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/urls/",
    request_body = CreateUrlRequest,
    responses(
        (status = 201, description = "URL queued", body = UrlResponse),
        (status = 422, description = "Invalid input", body = crate::dto::ErrorResponse),
        (status = 503, description = "Storage failure", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn create_url(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<CreateUrlRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let url = state.db.url_repo().create(body.into()).await?;
    Ok((StatusCode::CREATED, axum::Json(UrlResponse::from(url))))
}

#[utoipa::path(
    get,
    path = "/api/v1/urls/",
    params(ListQuery),
    responses(
        (status = 200, description = "List of URLs", body = Vec<UrlResponse>),
        (status = 422, description = "Invalid query", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn list_urls(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let urls = state
        .db
        .url_repo()
        .list(query.skip(), query.limit())
        .await?;
    Ok(axum::Json(url_list(urls)))
}

#[utoipa::path(
    get,
    path = "/api/v1/urls/pending",
    params(BatchQuery),
    responses(
        (status = 200, description = "Pending URLs, highest priority then oldest first", body = Vec<UrlResponse>),
        (status = 422, description = "Invalid query", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn pending_urls(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<BatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PENDING_LIMIT);
    let urls = state.db.url_repo().pending_ordered(limit).await?;
    Ok(axum::Json(url_list(urls)))
}

#[utoipa::path(
    post,
    path = "/api/v1/urls/claim",
    params(BatchQuery),
    responses(
        (status = 200, description = "URLs moved to in_progress, in queue order", body = Vec<UrlResponse>),
        (status = 422, description = "Invalid query", body = crate::dto::ErrorResponse),
        (status = 503, description = "Storage failure", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn claim_urls(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<BatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_CLAIM_LIMIT);
    let urls = state.db.url_repo().claim_pending(limit).await?;
    Ok(axum::Json(url_list(urls)))
}

#[utoipa::path(
    get,
    path = "/api/v1/urls/{id}",
    params(("id" = Uuid, Path, description = "URL ID")),
    responses(
        (status = 200, description = "URL details", body = UrlResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn get_url(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let url = state.db.url_repo().get_or_fail(id).await?;
    Ok(axum::Json(UrlResponse::from(url)))
}

#[utoipa::path(
    put,
    path = "/api/v1/urls/{id}",
    params(("id" = Uuid, Path, description = "URL ID")),
    request_body = UpdateUrlRequest,
    responses(
        (status = 200, description = "URL updated", body = UrlResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::dto::ErrorResponse),
        (status = 503, description = "Storage failure", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn update_url(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<UpdateUrlRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.url_repo();
    let existing = repo.get_or_fail(id).await?;
    let url = repo.update(existing, body.into()).await?;
    Ok(axum::Json(UrlResponse::from(url)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/urls/{id}",
    params(("id" = Uuid, Path, description = "URL ID")),
    responses(
        (status = 204, description = "URL deleted"),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn delete_url(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    removed(state.db.url_repo(), id).await
}

#[utoipa::path(
    post,
    path = "/api/v1/urls/{id}/result",
    params(("id" = Uuid, Path, description = "URL ID")),
    request_body = ScrapeResultRequest,
    responses(
        (status = 200, description = "Result recorded", body = UrlResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 422, description = "Status is not a result", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn record_result(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<ScrapeResultRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let url = state
        .db
        .url_repo()
        .mark_scraped(id, body.status)
        .await?
        .ok_or_else(|| AppError::not_found(ScrapeUrl::NAME, id))?;
    Ok(axum::Json(UrlResponse::from(url)))
}

#[utoipa::path(
    post,
    path = "/api/v1/urls/{id}/release",
    params(("id" = Uuid, Path, description = "URL ID")),
    responses(
        (status = 200, description = "URL returned to pending", body = UrlResponse),
        (status = 400, description = "URL is not in progress", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "urls"
)]
pub async fn release_url(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.url_repo();
    match repo.release(id).await? {
        Some(url) => Ok(axum::Json(UrlResponse::from(url))),
        None => {
            let current = repo.get_or_fail(id).await?;
            Err(AppError::operation(
                "Release",
                format!("failed: URL {id} is {}, not in_progress.", current.status),
            )
            .into())
        }
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message", body = RootResponse)),
    tag = "system"
)]
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(RootResponse {
        message: format!("Welcome to {}", state.settings.project_name),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let healthy = state.db.health_check().await.is_ok();

    let (status, response) = if healthy {
        (
            StatusCode::OK,
            HealthResponse {
                status: "healthy",
                database: "ok",
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "unhealthy",
                database: "error",
            },
        )
    };

    (status, axum::Json(response))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Delete through any repository: 204 when a row went away, 404 when there was none.
async fn removed<E: Entity>(repo: Repository<E>, id: Uuid) -> Result<StatusCode, ApiError> {
    match repo.remove(id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::not_found(E::NAME, id).into()),
    }
}

fn url_list(urls: Vec<ScrapeUrl>) -> Vec<UrlResponse> {
    urls.into_iter().map(UrlResponse::from).collect()
}
