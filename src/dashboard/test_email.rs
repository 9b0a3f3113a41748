//! Sends a test email to the configured notification recipients and shows the
//! provider's response.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, NotificationSettings,
    alert::Alert,
    email::{DispatchOutcome, EmailDispatcher, Recipient},
};

/// The subject line of the test email.
pub const TEST_EMAIL_SUBJECT: &str = "Hello from Finance App";

/// The element the result of a test email is swapped into.
pub const EMAIL_RESULT_ID: &str = "email-result";

/// The state needed for [send_test_email_endpoint].
#[derive(Debug, Clone)]
pub struct TestEmailState {
    pub email_dispatcher: EmailDispatcher,
    pub notification: NotificationSettings,
}

impl FromRef<AppState> for TestEmailState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            email_dispatcher: state.email_dispatcher.clone(),
            notification: state.notification.clone(),
        }
    }
}

fn test_email_body() -> Markup {
    html! {
        p { "This is a test email." }
    }
}

fn outcome_view(recipient: &Recipient, outcome: &DispatchOutcome) -> Markup {
    let alert = if outcome.success {
        Alert::Success {
            message: "Test email sent".to_owned(),
            details: format!("Sent to {} recipient(s).", recipient.len()),
        }
    } else {
        Alert::Error {
            message: "Could not send test email".to_owned(),
            details: outcome.error.clone().unwrap_or_default(),
        }
    };

    let outcome_json = serde_json::to_string_pretty(outcome).unwrap_or_else(|error| {
        tracing::error!("Could not serialize email outcome {outcome:?}: {error}");
        format!("{outcome:?}")
    });

    html! {
        (alert.into_html())

        pre
            id="email-outcome"
            class="p-4 overflow-x-auto text-xs rounded-lg bg-gray-100 dark:bg-gray-900"
        {
            (outcome_json)
        }
    }
}

/// Sends the test email to the notification recipients.
///
/// Responds with an alert and the JSON outcome of the dispatch, or a 400 alert
/// if no recipients are configured.
pub async fn send_test_email_endpoint(State(state): State<TestEmailState>) -> Response {
    let Some(recipient) = &state.notification.recipient else {
        tracing::warn!("Tried to send a test email without any notification recipients");
        return Error::NotificationsNotConfigured.into_alert_response();
    };

    let body = test_email_body().into_string();
    let result = state
        .email_dispatcher
        .send(recipient, TEST_EMAIL_SUBJECT, &body)
        .await;

    outcome_view(recipient, &DispatchOutcome::from(result)).into_response()
}
