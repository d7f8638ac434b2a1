//! # Company Handlers
//!
//! The company grid, its create/edit/delete forms and the detail page. Every
//! mutation answers with a redirect back to the grid carrying a flash message;
//! a form that fails validation re-renders the grid with field errors.

use crate::error::{ApiError, RepositoryError};
use crate::pages::company::{
    CompanyDetail, CompanyGrid, INDEX_COMPONENT, IndexProps, SHOW_COMPONENT, ShowProps,
};
use crate::pages::{Page, PageContext, PageResponse, redirect_with_flash};
use crate::repositories::CompanyRepository;
use crate::server::AppState;
use crate::validation::{CompanyForm, FieldErrors};
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use metrics::counter;

pub const COMPANY_INDEX_PATH: &str = "/company";

pub const CREATED_MESSAGE: &str = "Empresa criada com sucesso!";
pub const UPDATED_MESSAGE: &str = "Empresa atualizada com sucesso!";
pub const DELETED_MESSAGE: &str = "Empresa excluída com sucesso!";

/// Company grid, newest first, each row with its machine count
#[utoipa::path(
    get,
    path = "/company",
    params(
        ("X-Inertia" = Option<bool>, Header, description = "Return the page object as JSON instead of the HTML shell"),
        ("X-Inertia-Version" = Option<String>, Header, description = "Asset version of the client")
    ),
    responses(
        (status = 200, description = "Company grid page", body = Page),
        (status = 409, description = "Client asset version is stale; reload from X-Inertia-Location"),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "company"
)]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<PageResponse, ApiError> {
    let grid = load_grid(&state).await?;
    Ok(page.render(INDEX_COMPONENT, IndexProps::new(grid)))
}

/// Create a company
#[utoipa::path(
    post,
    path = "/company",
    request_body = CompanyForm,
    responses(
        (status = 302, description = "Created; redirects to the grid with a flash message", headers(
            ("Location", description = "/company"),
            ("Set-Cookie", description = "Flash message cookie")
        )),
        (status = 400, description = "Malformed JSON body", body = ApiError),
        (status = 422, description = "Validation failed; grid re-rendered with errors", body = Page),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "company"
)]
pub async fn store(
    State(state): State<AppState>,
    page: PageContext,
    payload: Result<Json<CompanyForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = payload?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return invalid_form(&state, &page, &form, errors, "store").await,
    };

    let company = CompanyRepository::new(&state.db).create(input).await?;
    counter!("registry_company_mutations_total", "action" => "store").increment(1);
    tracing::debug!(company_id = company.id, "Redirecting after create");

    Ok(redirect_with_flash(
        &page.method,
        COMPANY_INDEX_PATH,
        CREATED_MESSAGE,
    ))
}

/// Company detail with its machines
#[utoipa::path(
    get,
    path = "/company/{id}",
    params(
        ("id" = String, Path, description = "Company identifier")
    ),
    responses(
        (status = 200, description = "Company detail page", body = Page),
        (status = 404, description = "Company not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "company"
)]
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    page: PageContext,
) -> Result<PageResponse, ApiError> {
    let id = company_id(&raw_id)?;
    let (company, machines) = CompanyRepository::new(&state.db)
        .find_with_machines(id)
        .await?;

    Ok(page.render(
        SHOW_COMPONENT,
        ShowProps {
            company: CompanyDetail::new(company, machines),
        },
    ))
}

/// Replace a company's name and description
#[utoipa::path(
    put,
    path = "/company/{id}",
    params(
        ("id" = String, Path, description = "Company identifier")
    ),
    request_body = CompanyForm,
    responses(
        (status = 303, description = "Updated; redirects to the grid with a flash message", headers(
            ("Location", description = "/company"),
            ("Set-Cookie", description = "Flash message cookie")
        )),
        (status = 400, description = "Malformed JSON body", body = ApiError),
        (status = 404, description = "Company not found", body = ApiError),
        (status = 422, description = "Validation failed; grid re-rendered with errors", body = Page),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "company"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    page: PageContext,
    payload: Result<Json<CompanyForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = company_id(&raw_id)?;
    let repo = CompanyRepository::new(&state.db);

    // An unknown id is a 404 even when the body is also invalid
    if repo.get_by_id(id).await?.is_none() {
        return Err(RepositoryError::not_found("Company", id).into());
    }

    let Json(form) = payload?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return invalid_form(&state, &page, &form, errors, "update").await,
    };

    repo.update(id, input).await?;
    counter!("registry_company_mutations_total", "action" => "update").increment(1);

    Ok(redirect_with_flash(
        &page.method,
        COMPANY_INDEX_PATH,
        UPDATED_MESSAGE,
    ))
}

/// Delete a company together with its machines and their documents
#[utoipa::path(
    delete,
    path = "/company/{id}",
    params(
        ("id" = String, Path, description = "Company identifier")
    ),
    responses(
        (status = 303, description = "Deleted; redirects to the grid with a flash message", headers(
            ("Location", description = "/company"),
            ("Set-Cookie", description = "Flash message cookie")
        )),
        (status = 404, description = "Company not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "company"
)]
pub async fn destroy(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    page: PageContext,
) -> Result<Response, ApiError> {
    let id = company_id(&raw_id)?;
    CompanyRepository::new(&state.db).delete(id).await?;
    counter!("registry_company_mutations_total", "action" => "destroy").increment(1);

    Ok(redirect_with_flash(
        &page.method,
        COMPANY_INDEX_PATH,
        DELETED_MESSAGE,
    ))
}

/// Ids that cannot name a stored company are simply not found
fn company_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| RepositoryError::NotFound(format!("Company {} not found", raw)).into())
}

async fn load_grid(state: &AppState) -> Result<CompanyGrid, ApiError> {
    let rows = CompanyRepository::new(&state.db)
        .list_with_machine_count()
        .await?;
    Ok(CompanyGrid::new(rows))
}

async fn invalid_form(
    state: &AppState,
    page: &PageContext,
    form: &CompanyForm,
    errors: FieldErrors,
    action: &'static str,
) -> Result<Response, ApiError> {
    counter!("registry_company_validation_failures_total", "action" => action).increment(1);
    tracing::debug!(action, fields = errors.len(), "Company form rejected");

    let grid = load_grid(state).await?;
    let props = IndexProps::with_errors(grid, errors, form.old_input());

    Ok(page
        .render(INDEX_COMPONENT, props)
        .with_status(StatusCode::UNPROCESSABLE_ENTITY)
        .into_response())
}
