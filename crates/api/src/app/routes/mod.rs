use axum::{Router, routing::get};

pub mod diagnostics;
pub mod ledger;
pub mod session;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints, mounted under `/api`.
///
/// `diagnostics` adds the endpoints that disclose which authorization rule
/// failed.
pub fn router(diagnostics: bool) -> Router {
    let mut api = Router::new()
        .route("/me", get(session::me))
        .route("/users", get(users::list_users))
        .nest("/revenues", ledger::revenues_router())
        .nest("/expenses", ledger::expenses_router());

    if diagnostics {
        api = api.merge(diagnostics::router());
    }

    Router::new().nest("/api", api)
}
