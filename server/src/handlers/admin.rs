//! Admin pages. Every handler except login and logout requires an
//! [`AdminSession`], so unauthenticated visitors are sent to the login page.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{Local, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::{AdminSession, DASHBOARD_PATH, LOGIN_PATH};
use crate::handlers::public::CodeForm;
use crate::services;
use crate::state::AppState;
use crate::store::DirectoryFilter;
use crate::templates::{
    AdminVerificationTemplate, DashboardTemplate, DirectoryTemplate, LoginTemplate, StatusOption,
    TicketView,
};
use crate::utils::response::render;
use crate::utils::time::format_day;
use crate::utils::AppError;

const BAD_CREDENTIALS: &str = "Identifiants incorrects";

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    pub search: Option<String>,
    pub statut: Option<String>,
}

pub async fn login_page(jar: SignedCookieJar) -> Result<Response, AppError> {
    // If already logged in, go straight to the dashboard
    if AdminSession::is_set(&jar) {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    Ok(render(&LoginTemplate { error: None })?.into_response())
}

pub async fn login_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if !state.credentials.verify(&form.username, &form.password) {
        warn!(username = %form.username, "Admin login failed");
        let page = render(&LoginTemplate {
            error: Some(BAD_CREDENTIALS),
        })?;
        return Ok(page.into_response());
    }

    info!(username = %form.username, "Admin logged in");
    let jar = AdminSession::grant(jar, state.secure_cookies);
    Ok((jar, Redirect::to(DASHBOARD_PATH)).into_response())
}

pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    if AdminSession::is_set(&jar) {
        info!("Admin logged out");
    }
    (AdminSession::revoke(jar), Redirect::to(LOGIN_PATH))
}

pub async fn dashboard(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let counts = services::dashboard(&*state.store).await?;

    render(&DashboardTemplate {
        counts,
        today: format_day(&Local::now()),
    })
}

pub async fn directory(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Html<String>, AppError> {
    let filter = DirectoryFilter::from_params(query.search.as_deref(), query.statut.as_deref());
    let tickets = services::directory(&*state.store, &filter).await?;

    let now = Utc::now();
    render(&DirectoryTemplate {
        tickets: tickets.iter().map(|t| TicketView::new(t, now)).collect(),
        search: query.search.unwrap_or_default(),
        options: StatusOption::all(query.statut.as_deref().unwrap_or_default()),
    })
}

pub async fn verification_page(_admin: AdminSession) -> Result<Html<String>, AppError> {
    render(&AdminVerificationTemplate {
        ticket: None,
        message: None,
    })
}

/// Staff lookup by code. Shows the ticket without consuming it.
pub async fn verification_submit(
    _admin: AdminSession,
    State(state): State<AppState>,
    Form(form): Form<CodeForm>,
) -> Result<Html<String>, AppError> {
    let mut page = AdminVerificationTemplate {
        ticket: None,
        message: None,
    };

    if let Some(code) = form.code() {
        match services::lookup(&*state.store, code).await? {
            Some(ticket) => page.ticket = Some(TicketView::new(&ticket, Utc::now())),
            None => page.message = Some(services::VerificationOutcome::NotFound.label()),
        }
    }

    render(&page)
}
