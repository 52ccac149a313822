//! Revenue and expense books.
//!
//! Every call targets one branch (or, for headquarters reads, all of them) and
//! is guarded with an opaque `Forbidden` on denial.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::Utc;

use branchdesk_auth::Action;
use branchdesk_core::EntryId;
use branchdesk_infra::{EntryPatch, LedgerKind, NewLedgerEntry};

use crate::app::dto::{self, AmendEntryRequest, BranchQuery, CreateEntryRequest, LedgerListResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::{self, Disclosure};
use crate::context::CallerContext;

#[derive(Debug, Copy, Clone)]
struct BookPolicy {
    kind: LedgerKind,
    view: Action,
    create: Action,
    edit: Action,
}

const REVENUES: BookPolicy = BookPolicy {
    kind: LedgerKind::Revenue,
    view: Action::ViewRevenues,
    create: Action::CreateRevenue,
    edit: Action::EditRevenue,
};

const EXPENSES: BookPolicy = BookPolicy {
    kind: LedgerKind::Expense,
    view: Action::ViewExpenses,
    create: Action::CreateExpense,
    edit: Action::EditExpense,
};

pub fn revenues_router() -> Router {
    Router::new()
        .route("/", get(list_revenues).post(create_revenue))
        .route("/:id", put(amend_revenue))
}

pub fn expenses_router() -> Router {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", put(amend_expense))
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared handlers
// ─────────────────────────────────────────────────────────────────────────────

fn list_entries(
    policy: BookPolicy,
    services: &AppServices,
    caller: &CallerContext,
    query: BranchQuery,
) -> Result<Response, ApiError> {
    let requested = dto::parse_branch(query.branch_id.as_deref())?;
    let branch = authz::target_branch(caller, requested);
    authz::guard(caller, branch, policy.view, Disclosure::Opaque)?;

    let statement = services.book(policy.kind).statement(branch)?;

    Ok((
        StatusCode::OK,
        Json(LedgerListResponse {
            branch,
            total: statement.total,
            entries: statement.entries,
        }),
    )
        .into_response())
}

fn create_entry(
    policy: BookPolicy,
    services: &AppServices,
    caller: &CallerContext,
    body: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let requested = dto::parse_branch(body.branch_id.as_deref())?;
    let branch = dto::require_branch(authz::target_branch(caller, requested))?;
    authz::guard(caller, Some(branch), policy.create, Disclosure::Opaque)?;

    let now = Utc::now();
    let entry = services.book(policy.kind).record(
        branch,
        NewLedgerEntry {
            amount: body.amount,
            description: body.description,
            occurred_on: body.occurred_on.unwrap_or_else(|| now.date_naive()),
        },
        caller.email(),
        now,
    )?;

    tracing::info!(
        kind = ?policy.kind,
        entry = %entry.id,
        branch = %branch,
        user = %caller.email(),
        "ledger entry recorded"
    );

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

fn amend_entry(
    policy: BookPolicy,
    services: &AppServices,
    caller: &CallerContext,
    id: String,
    query: BranchQuery,
    body: Result<Json<AmendEntryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let id: EntryId = id.parse()?;

    let requested = dto::parse_branch(query.branch_id.as_deref())?;
    let branch = dto::require_branch(authz::target_branch(caller, requested))?;
    authz::guard(caller, Some(branch), policy.edit, Disclosure::Opaque)?;

    let patch = EntryPatch {
        amount: body.amount,
        description: body.description,
        occurred_on: body.occurred_on,
    };
    let entry = services.book(policy.kind).amend(branch, id, patch, Utc::now())?;

    tracing::info!(
        kind = ?policy.kind,
        entry = %entry.id,
        branch = %branch,
        user = %caller.email(),
        "ledger entry amended"
    );

    Ok((StatusCode::OK, Json(entry)).into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// Revenues
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/revenues[?branch_id=]
pub async fn list_revenues(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<BranchQuery>,
) -> Result<Response, ApiError> {
    list_entries(REVENUES, &services, &caller, query)
}

/// POST /api/revenues
pub async fn create_revenue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    body: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    create_entry(REVENUES, &services, &caller, body)
}

/// PUT /api/revenues/:id[?branch_id=]
pub async fn amend_revenue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Query(query): Query<BranchQuery>,
    body: Result<Json<AmendEntryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    amend_entry(REVENUES, &services, &caller, id, query, body)
}

// ─────────────────────────────────────────────────────────────────────────────
// Expenses
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/expenses[?branch_id=]
pub async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<BranchQuery>,
) -> Result<Response, ApiError> {
    list_entries(EXPENSES, &services, &caller, query)
}

/// POST /api/expenses
pub async fn create_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    body: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    create_entry(EXPENSES, &services, &caller, body)
}

/// PUT /api/expenses/:id[?branch_id=]
pub async fn amend_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Query(query): Query<BranchQuery>,
    body: Result<Json<AmendEntryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    amend_entry(EXPENSES, &services, &caller, id, query, body)
}
