//! Alert messages shown in the page's alert container after an HTMX request.

use maud::{Markup, html};

/// A success or error message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details, style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 border-green-300 bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
            ),
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                id="alert"
                role="alert"
                class={ "flex items-start p-4 mb-4 border rounded-lg " (style) }
            {
                div class="text-sm"
                {
                    p class="font-medium alert-message" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1 alert-details" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-auto -mx-1.5 -my-1.5 p-1.5 rounded-lg inline-flex items-center justify-center h-8 w-8"
                    onclick="this.closest('#alert-container').classList.add('hidden')"
                {
                    "×"
                }
            }
        }
    }
}

#[cfg(test)]
mod alert_tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let markup = Alert::Error {
            message: "Something went wrong".to_owned(),
            details: "Check the logs".to_owned(),
        }
        .into_html();
        let html = Html::parse_fragment(&markup.into_string());

        let message = html
            .select(&Selector::parse(".alert-message").unwrap())
            .next()
            .expect("alert message missing")
            .text()
            .collect::<String>();
        let details = html
            .select(&Selector::parse(".alert-details").unwrap())
            .next()
            .expect("alert details missing")
            .text()
            .collect::<String>();

        assert_eq!(message, "Something went wrong");
        assert_eq!(details, "Check the logs");
    }

    #[test]
    fn alert_without_details_omits_details() {
        let markup = Alert::Success {
            message: "Saved".to_owned(),
            details: String::new(),
        }
        .into_html();
        let html = Html::parse_fragment(&markup.into_string());

        assert!(
            html.select(&Selector::parse(".alert-details").unwrap())
                .next()
                .is_none()
        );
    }
}
