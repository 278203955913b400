pub mod auth;
pub mod colleges;
pub mod dashboard;
pub mod files;
mod home;
pub mod saved_files;
pub mod search;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        auth::login,
        auth::me,
        files::list_files,
        files::get_file,
        files::create_file,
        files::update_file,
        files::delete_file,
        files::file_filters,
        upload::upload_file,
        colleges::list_colleges,
        colleges::get_college,
        colleges::create_college,
        colleges::update_college,
        colleges::delete_college,
        colleges::college_dropdown,
        colleges::bulk_import_colleges,
        saved_files::list_saved_files,
        saved_files::save_file,
        saved_files::check_saved,
        saved_files::unsave_file,
        saved_files::update_saved_file,
        saved_files::delete_saved_file,
        search::search,
        dashboard::dashboard_stats,
    ),
    components(
        schemas(
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserProfile,
            files::FileResponse,
            files::CreateFileRequest,
            files::UpdateFileRequest,
            files::FileFilterOptions,
            colleges::CollegeResponse,
            colleges::CollegeInput,
            colleges::DropdownItem,
            colleges::BulkImportRequest,
            colleges::BulkImportSummary,
            colleges::BulkImportError,
            saved_files::SavedFileResponse,
            saved_files::SaveFileRequest,
            saved_files::UpdateSavedRequest,
            saved_files::SavedStatus,
            search::Suggestion,
            search::SearchResponse,
            dashboard::DashboardStats,
            dashboard::Totals,
            dashboard::GroupCount,
            crate::entities::file::FileType,
            crate::entities::file::PaperType,
            crate::entities::college::CollegeType,
            crate::entities::college::CollegeCategory,
            crate::entities::saved_file::SavedCategory,
        )
    ),
    tags(
        (name = "General", description = "General API information"),
        (name = "Authentication", description = "Admin login and session introspection"),
        (name = "Files", description = "Notes and past-paper records"),
        (name = "File Upload", description = "Multipart upload relayed to object storage"),
        (name = "Colleges", description = "College directory, dropdown and bulk import"),
        (name = "Saved Files", description = "Per-user bookmarks with category, tags and notes"),
        (name = "Search", description = "Suggestions and global file search"),
        (name = "Dashboard", description = "Aggregate counts for the dashboard")
    ),
    info(
        title = "Papervault API",
        version = "0.1.0",
        description = "Admin API for cataloging, searching and bookmarking notes and past exam papers",
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(
                utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer
                )
            ),
        );
    }
}

pub fn create_routes(state: AppState) -> Router {
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let upload_routes = Router::new()
        .route("/files/upload", post(upload::upload_file))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    // Everything behind the admin session
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/files", get(files::list_files).post(files::create_file))
        .route("/files/filters", get(files::file_filters))
        .route(
            "/files/{id}",
            get(files::get_file)
                .put(files::update_file)
                .delete(files::delete_file),
        )
        .merge(upload_routes)
        .route(
            "/colleges",
            get(colleges::list_colleges).post(colleges::create_college),
        )
        .route("/colleges/dropdown", get(colleges::college_dropdown))
        .route("/colleges/bulk", post(colleges::bulk_import_colleges))
        .route(
            "/colleges/{id}",
            get(colleges::get_college)
                .put(colleges::update_college)
                .delete(colleges::delete_college),
        )
        .route(
            "/saved-files",
            get(saved_files::list_saved_files)
                .post(saved_files::save_file)
                .delete(saved_files::unsave_file),
        )
        .route("/saved-files/check", get(saved_files::check_saved))
        .route(
            "/saved-files/{id}",
            put(saved_files::update_saved_file).delete(saved_files::delete_saved_file),
        )
        .route("/search", get(search::search))
        .route("/dashboard/stats", get(dashboard::dashboard_stats))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/auth/login", post(auth::login))
        .merge(protected_routes)
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
