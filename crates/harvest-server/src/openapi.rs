use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Harvest API",
        version = "0.1.0",
        description = "Scrape configurations, scraping jobs, and a priority-ordered URL queue."
    ),
    paths(
        crate::routes::create_config,
        crate::routes::list_configs,
        crate::routes::get_config,
        crate::routes::update_config,
        crate::routes::delete_config,
        crate::routes::create_job,
        crate::routes::list_jobs,
        crate::routes::get_job,
        crate::routes::update_job,
        crate::routes::delete_job,
        crate::routes::create_url,
        crate::routes::list_urls,
        crate::routes::pending_urls,
        crate::routes::claim_urls,
        crate::routes::get_url,
        crate::routes::update_url,
        crate::routes::delete_url,
        crate::routes::record_result,
        crate::routes::release_url,
        crate::routes::root,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::CreateConfigRequest,
        crate::dto::UpdateConfigRequest,
        crate::dto::ConfigResponse,
        crate::dto::CreateJobRequest,
        crate::dto::UpdateJobRequest,
        crate::dto::JobResponse,
        crate::dto::CreateUrlRequest,
        crate::dto::UpdateUrlRequest,
        crate::dto::ScrapeResultRequest,
        crate::dto::UrlResponse,
        crate::dto::RootResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
        crate::dto::FieldError,
    )),
    tags(
        (name = "configs", description = "Per-site selector configurations"),
        (name = "jobs", description = "Scraping runs and their counters"),
        (name = "urls", description = "URL queue"),
        (name = "system", description = "Welcome and health"),
    )
)]
pub struct ApiDoc;
