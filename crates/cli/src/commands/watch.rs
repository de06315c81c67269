//! Live customer list.

use customer_desk_client::{ClientConfig, CustomerDirectory};

use super::{CommandError, connect, print_page};

/// Mount the directory and re-render on every store change until Ctrl+C.
pub async fn run(
    config: &ClientConfig,
    search: Option<String>,
    page: usize,
) -> Result<(), CommandError> {
    let api = connect(config)?;
    let mut directory = CustomerDirectory::new(api, config);
    if let Some(term) = search {
        directory.set_search(term);
    }

    let mut revisions = directory.store().subscribe();
    directory.mount();
    tracing::info!(
        base_url = %config.api.base_url,
        interval_ms = config.refresh_interval.as_millis(),
        "Watching customers, press Ctrl+C to stop"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            signal = &mut shutdown => break signal.map_err(CommandError::from),
            changed = revisions.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                directory.go_to_page(page);
                print_page(&directory.render());
            }
        }
    };

    directory.teardown();
    result
}
