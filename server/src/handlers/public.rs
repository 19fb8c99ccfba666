//! Customer-facing pages: purchase, gate verification, ticket display.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use chrono::Utc;
use serde::Deserialize;

use crate::services;
use crate::state::AppState;
use crate::templates::{
    IndexTemplate, PurchaseTemplate, TicketTemplate, TicketView, VerificationResult,
    VerificationTemplate,
};
use crate::utils::response::render;
use crate::utils::AppError;

/// Purchase form; absent fields are taken as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseForm {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub matricule: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CodeForm {
    #[serde(default)]
    pub code: String,
}

impl CodeForm {
    /// The submitted code, or `None` when nothing was entered.
    pub fn code(&self) -> Option<&str> {
        Some(self.code.trim()).filter(|code| !code.is_empty())
    }
}

pub async fn home() -> Result<Html<String>, AppError> {
    render(&IndexTemplate)
}

pub async fn purchase_page() -> Result<Html<String>, AppError> {
    render(&PurchaseTemplate)
}

pub async fn purchase_submit(
    State(state): State<AppState>,
    Form(form): Form<PurchaseForm>,
) -> Result<Html<String>, AppError> {
    let now = Utc::now();
    let ticket = services::purchase(&*state.store, form.nom, form.matricule, now).await?;

    render(&TicketTemplate {
        ticket: TicketView::new(&ticket, now),
    })
}

pub async fn verification_page() -> Result<Html<String>, AppError> {
    render(&VerificationTemplate { result: None })
}

pub async fn verification_submit(
    State(state): State<AppState>,
    Form(form): Form<CodeForm>,
) -> Result<Html<String>, AppError> {
    let result = match form.code() {
        Some(code) => {
            let outcome = services::verify(&*state.store, code, Utc::now()).await?;
            Some(VerificationResult::from(&outcome))
        }
        None => None,
    };

    render(&VerificationTemplate { result })
}

/// Show a ticket by code. An unknown code is a plain message, not an error.
pub async fn ticket_page(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let Some(ticket) = services::lookup(&*state.store, &code).await? else {
        return Ok("Ticket introuvable".into_response());
    };

    let page = render(&TicketTemplate {
        ticket: TicketView::new(&ticket, Utc::now()),
    })?;
    Ok(page.into_response())
}
