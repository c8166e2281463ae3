pub mod health;


use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::brief::{MAX_GUIDELINE_BYTES, MAX_IMAGES, MAX_IMAGE_BYTES};
use crate::state::AppState;
use crate::{account, brands, brief, craft, finalize, generation, guidelines, library};

// Multipart framing on top of the raw file bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let media_limit = MAX_IMAGES * MAX_IMAGE_BYTES + MULTIPART_OVERHEAD;
    let guideline_limit = MAX_GUIDELINE_BYTES + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_handler))
        // Brief
        .route(
            "/api/v1/media",
            post(brief::handlers::handle_upload_media).layer(DefaultBodyLimit::max(media_limit)),
        )
        // Generation + craft + finalize
        .route("/api/v1/generate", post(generation::handlers::handle_generate))
        .route(
            "/api/v1/generate/regenerate",
            post(generation::handlers::handle_regenerate),
        )
        .route("/api/v1/platforms", get(craft::handlers::handle_list_platforms))
        .route("/api/v1/craft", post(craft::handlers::handle_craft))
        .route("/api/v1/finalize", post(finalize::handlers::handle_finalize))
        // Library
        .route("/api/v1/library", get(library::handlers::handle_list_posts))
        .route(
            "/api/v1/library/:id",
            get(library::handlers::handle_get_post)
                .patch(library::handlers::handle_update_post)
                .delete(library::handlers::handle_delete_post),
        )
        .route("/api/v1/dashboard", get(library::handlers::handle_dashboard))
        .route("/api/v1/calendar", get(library::handlers::handle_calendar))
        // Brands
        .route(
            "/api/v1/brands",
            get(brands::handlers::handle_list_brands).post(brands::handlers::handle_create_brand),
        )
        .route(
            "/api/v1/brands/:id",
            get(brands::handlers::handle_get_brand)
                .patch(brands::handlers::handle_update_brand)
                .delete(brands::handlers::handle_delete_brand),
        )
        // Guidelines
        .route(
            "/api/v1/brands/:id/guidelines",
            get(guidelines::handlers::handle_list_guidelines)
                .post(guidelines::handlers::handle_upload_guideline)
                .layer(DefaultBodyLimit::max(guideline_limit)),
        )
        .route(
            "/api/v1/guidelines/parse",
            post(guidelines::handlers::handle_parse_guideline),
        )
        .route(
            "/api/v1/guidelines/:id",
            delete(guidelines::handlers::handle_delete_guideline),
        )
        // Account
        .route(
            "/api/v1/subscription",
            get(account::handlers::handle_get_subscription),
        )
        .route(
            "/api/v1/profile",
            get(account::handlers::handle_get_profile).patch(account::handlers::handle_update_profile),
        )
        .with_state(state)
}
