//! Subcommand implementations.

pub mod customers;
pub mod watch;

use customer_desk_client::view::PageView;
use customer_desk_client::{ApiError, ClientConfig, CustomerApi, FormError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The remote service could not be reached or rejected a request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A form rejected the input or its submit failed.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Waiting for Ctrl+C failed.
    #[error("Signal handler error: {0}")]
    Signal(#[from] std::io::Error),
}

fn connect(config: &ClientConfig) -> Result<CustomerApi, CommandError> {
    Ok(CustomerApi::new(&config.api)?)
}

/// Log one rendered page of the list.
fn print_page(page: &PageView) {
    if page.is_empty() {
        tracing::info!("No customers found");
        return;
    }

    for row in page.rows() {
        let id = row.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        tracing::info!(
            "#{id} {} {} {}",
            row.first_name,
            row.last_name,
            row.phones
        );
    }

    tracing::info!(
        "Page {} of {} ({} matching, prev: {}, next: {})",
        page.page,
        page.total_pages,
        page.total_matches,
        if page.has_previous() { "yes" } else { "no" },
        if page.has_next() { "yes" } else { "no" },
    );
}
