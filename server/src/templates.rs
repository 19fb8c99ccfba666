//! Askama templates for public and admin pages.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::models::{Ticket, TicketStatus};
use crate::services::VerificationOutcome;
use crate::store::StatusCounts;
use crate::utils::time::{format_ticket_time, local};

/// Ticket fields pre-formatted for display
pub struct TicketView {
    pub name: String,
    pub external_id: String,
    pub code: String,
    pub status: &'static str,
    pub effective_status: &'static str,
    pub purchased_at: String,
    pub expires_at: String,
}

impl TicketView {
    pub fn new(ticket: &Ticket, now: DateTime<Utc>) -> Self {
        Self {
            name: ticket.name.clone(),
            external_id: ticket.external_id.clone(),
            code: ticket.code.clone(),
            status: ticket.status.as_str(),
            effective_status: ticket.effective_status(now).as_str(),
            purchased_at: format_ticket_time(&local(ticket.created_at)),
            expires_at: format_ticket_time(&local(ticket.expires_at)),
        }
    }
}

#[derive(Template)]
#[template(path = "public/index.html")]
pub struct IndexTemplate;

#[derive(Template)]
#[template(path = "public/achat.html")]
pub struct PurchaseTemplate;

#[derive(Template)]
#[template(path = "public/ticket.html")]
pub struct TicketTemplate {
    pub ticket: TicketView,
}

/// Verification outcome as shown at the gate
pub struct VerificationResult {
    pub label: &'static str,
    pub message: &'static str,
}

impl From<&VerificationOutcome> for VerificationResult {
    fn from(outcome: &VerificationOutcome) -> Self {
        let message = match outcome {
            VerificationOutcome::NotFound => "Ticket introuvable.",
            VerificationOutcome::AlreadyUsed => "Ticket déjà utilisé.",
            VerificationOutcome::Expired => "Ticket expiré.",
            VerificationOutcome::Valid(_) => "Ticket valide, entrée autorisée.",
        };
        Self {
            label: outcome.label(),
            message,
        }
    }
}

#[derive(Template)]
#[template(path = "public/verification.html")]
pub struct VerificationTemplate {
    pub result: Option<VerificationResult>,
}

#[derive(Template)]
#[template(path = "admin/connexion_admin.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "admin/dashboard_admin.html")]
pub struct DashboardTemplate {
    pub counts: StatusCounts,
    pub today: String,
}

/// Entry of the directory status selector
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl StatusOption {
    pub fn all(selected: &str) -> Vec<StatusOption> {
        let mut options = vec![StatusOption {
            value: "tous",
            label: "Tous",
            selected: selected.is_empty() || selected == "tous",
        }];
        options.extend(TicketStatus::ALL.into_iter().map(|status| StatusOption {
            value: status.as_str(),
            label: match status {
                TicketStatus::Valid => "Valides",
                TicketStatus::Used => "Utilisés",
                TicketStatus::Expired => "Expirés",
            },
            selected: selected == status.as_str(),
        }));
        options
    }
}

#[derive(Template)]
#[template(path = "admin/repertoire.html")]
pub struct DirectoryTemplate {
    pub tickets: Vec<TicketView>,
    pub search: String,
    pub options: Vec<StatusOption>,
}

#[derive(Template)]
#[template(path = "admin/verification_admin.html")]
pub struct AdminVerificationTemplate {
    pub ticket: Option<TicketView>,
    pub message: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub code: &'a str,
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_ticket_view_shows_effective_status() {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let ticket = Ticket {
            id: 1,
            name: "Alice".into(),
            external_id: "E1".into(),
            code: "abcd1234".into(),
            status: TicketStatus::Valid,
            expires_at: created_at + Duration::hours(4),
            created_at,
        };

        let view = TicketView::new(&ticket, created_at + Duration::hours(5));
        assert_eq!(view.status, "valide");
        assert_eq!(view.effective_status, "expire");
    }

    #[test]
    fn test_verification_page_shows_outcome() {
        let page = VerificationTemplate {
            result: Some(VerificationResult::from(&VerificationOutcome::Expired)),
        }
        .render()
        .unwrap();
        assert!(page.contains("data-resultat=\"expire\""));
        assert!(page.contains("Ticket expiré."));

        let empty = VerificationTemplate { result: None }.render().unwrap();
        assert!(!empty.contains("data-resultat"));
    }

    #[test]
    fn test_status_options_mark_selection() {
        let options = StatusOption::all("utilise");
        let selected: Vec<_> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, ["utilise"]);

        let options = StatusOption::all("");
        assert!(options[0].selected);
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn test_ticket_page_escapes_user_input() {
        let page = TicketTemplate {
            ticket: TicketView {
                name: "<script>".into(),
                external_id: "E1".into(),
                code: "abcd1234".into(),
                status: "valide",
                effective_status: "valide",
                purchased_at: "01/03/2026 10:00".into(),
                expires_at: "01/03/2026 14:00".into(),
            },
        }
        .render()
        .unwrap();
        assert!(page.contains("abcd1234"));
        assert!(!page.contains("<script>"));
    }
}
