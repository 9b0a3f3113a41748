use std::net::SocketAddr;

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use finance_app::{
    AppState, NotificationSettings, build_router,
    email::{
        DEFAULT_RESEND_API_URL, DEFAULT_SENDER, EmailAddress, EmailDispatcher, Recipient,
        ResendConfig,
    },
    graceful_shutdown,
};

/// The web server for Finance App.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// The API key for sending email through Resend.
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    resend_api_key: String,

    /// The base URL of the Resend API.
    #[arg(long, default_value = DEFAULT_RESEND_API_URL)]
    resend_api_url: String,

    /// The sender identity for outgoing email, e.g. "Finance App <noreply@example.com>".
    #[arg(long, default_value = DEFAULT_SENDER)]
    email_sender: String,

    /// An address that receives notification emails. Repeat the flag to add more.
    #[arg(long = "notification-email", value_parser = EmailAddress::new)]
    notification_emails: Vec<EmailAddress>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let connection = Connection::open(&args.db_path).unwrap_or_else(|error| {
        panic!("Could not open database file {}: {error}", args.db_path)
    });

    let email_dispatcher = EmailDispatcher::resend(
        ResendConfig::new(&args.resend_api_key).with_api_url(&args.resend_api_url),
        &args.email_sender,
    );
    let notification = NotificationSettings {
        recipient: Recipient::from_addresses(args.notification_emails),
    };

    if notification.recipient.is_none() {
        tracing::warn!("No notification email recipients were given, test emails are disabled");
    }

    let state = AppState::new(connection, &args.timezone, email_dispatcher, notification)
        .expect("Could not initialize the database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Handlers log their own errors.
        .on_failure(());

    router.layer(tracing_layer)
}
