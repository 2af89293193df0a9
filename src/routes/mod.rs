pub mod admin;
pub mod categories;
pub mod health;
pub mod jobs;
pub mod me;
pub mod offers;
pub mod onboarding;
pub mod professionals;
pub mod support;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        .route("/categories", get(categories::list_categories))
        .route("/categories/match", get(categories::match_category))
        .route("/professionals", get(professionals::list_professionals))
        .route(
            "/professionals/nearby",
            get(professionals::nearby_professionals),
        )
        .route("/professionals/:pro_id", get(professionals::get_professional))
        .route("/contact", post(support::create_contact_message))
        // Authenticated routes
        .route("/me", get(me::get_me))
        // Jobs
        .route("/jobs", post(jobs::create_job))
        .route("/jobs", get(jobs::list_open_jobs))
        .route("/jobs/:job_id", get(jobs::get_job))
        .route("/jobs/:job_id", delete(jobs::delete_job))
        .route("/me/jobs", get(jobs::my_jobs))
        // Offers (nested under jobs)
        .route("/jobs/:job_id/offers", post(offers::create_offer))
        .route("/jobs/:job_id/offers", get(offers::list_offers_for_job))
        .route("/me/offers", get(offers::my_offers))
        .route("/offers/:offer_id/accept", post(offers::accept_offer))
        // Provider onboarding
        .route(
            "/provider-requests",
            post(onboarding::create_provider_request),
        )
        .route("/me/provider-request", get(onboarding::my_provider_request))
        // Support
        .route("/tickets", post(support::create_ticket))
        .route("/me/tickets", get(support::my_tickets))
        .route("/tickets/:ticket_id", get(support::get_ticket))
        .route("/tickets/:ticket_id/replies", get(support::list_replies))
        .route("/tickets/:ticket_id/replies", post(support::create_reply))
        // Admin back-office
        .route(
            "/admin/provider-requests",
            get(admin::list_provider_requests),
        )
        .route(
            "/admin/provider-requests/:request_id/approve",
            post(admin::approve_provider_request),
        )
        .route(
            "/admin/provider-requests/:request_id/reject",
            post(admin::reject_provider_request),
        )
        .route("/admin/jobs", get(admin::list_all_jobs))
        .route("/admin/jobs/:job_id", delete(admin::delete_job))
        .route("/admin/tickets", get(admin::list_tickets))
        .route("/admin/tickets/:ticket_id", patch(admin::update_ticket))
        .route("/admin/messages", get(admin::list_messages))
        .route(
            "/admin/messages/:message_id/archive",
            post(admin::archive_message),
        )
}
