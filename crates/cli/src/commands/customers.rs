//! One-shot customer commands.
//!
//! Writes go through the same form view-models the directory uses, so local
//! validation applies before anything is sent.

use clap::Args;
use customer_desk_client::{
    ClientConfig, CollectionStore, CreateForm, CustomerRemote, DeleteForm, ListView, UpdateForm,
};
use customer_desk_core::{Customer, CustomerId, Phone};

use super::{CommandError, connect, print_page};

/// Fields for a new customer.
#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    state: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    neighborhood: String,
    #[arg(long)]
    street: String,
    #[arg(long)]
    number: String,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    additional_info: Option<String>,
    /// Phone as AREA:NUMBER (repeatable)
    #[arg(long = "phone", required = true)]
    phones: Vec<Phone>,
}

impl CreateArgs {
    fn assignments(self) -> (Vec<(&'static str, String)>, Vec<Phone>) {
        let mut fields = vec![
            ("first_name", self.first_name),
            ("last_name", self.last_name),
            ("state", self.state),
            ("city", self.city),
            ("neighborhood", self.neighborhood),
            ("street", self.street),
            ("number", self.number),
        ];
        let optional = [
            ("email", self.email),
            ("postal_code", self.postal_code),
            ("additional_info", self.additional_info),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v))),
        );
        (fields, self.phones)
    }
}

/// Parse a `FIELD=VALUE` assignment.
///
/// # Errors
///
/// Returns a message if there is no `=` or the field name is empty.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{s}`"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Fetch the list once and print the requested page.
pub async fn list(
    config: &ClientConfig,
    search: Option<String>,
    page: usize,
) -> Result<(), CommandError> {
    let api = connect(config)?;
    let customers = api.list().await?;

    let mut view = ListView::new(config.page_size);
    if let Some(term) = search {
        view.set_search(term);
    }
    view.go_to_page(page, &customers);
    print_page(&view.render(&customers));
    Ok(())
}

/// Fetch and print one customer.
pub async fn show(config: &ClientConfig, id: CustomerId) -> Result<(), CommandError> {
    let api = connect(config)?;
    let customer = api.get(id).await?;
    print_customer(&customer);
    Ok(())
}

/// Register a customer through the create form.
pub async fn create(config: &ClientConfig, args: CreateArgs) -> Result<(), CommandError> {
    let api = connect(config)?;
    let mut form = CreateForm::new(api, CollectionStore::new());

    let (fields, phones) = args.assignments();
    let draft = form.draft_mut();
    for (name, value) in fields {
        draft.set_field(name, value)?;
    }
    draft.set_phones(phones);

    let created = form.submit().await?;
    if let Some(message) = form.status().message() {
        tracing::info!("{message}");
    }
    print_customer(&created);
    Ok(())
}

/// Edit a customer through the update form.
pub async fn update(
    config: &ClientConfig,
    id: CustomerId,
    assignments: Vec<(String, String)>,
    phones: Vec<Phone>,
) -> Result<(), CommandError> {
    let api = connect(config)?;
    let mut form = UpdateForm::load(api, CollectionStore::new(), id).await?;

    let draft = form.draft_mut();
    for (name, value) in assignments {
        draft.set_field(&name, value)?;
    }
    if !phones.is_empty() {
        draft.set_phones(phones);
    }

    let updated = form.submit().await?;
    if let Some(message) = form.status().message() {
        tracing::info!("{message}");
    }
    print_customer(&updated);
    Ok(())
}

/// Delete a customer through the delete form.
pub async fn delete(config: &ClientConfig, id: CustomerId) -> Result<(), CommandError> {
    let api = connect(config)?;
    let mut form = DeleteForm::new(api, CollectionStore::new(), id);
    form.submit().await?;
    if let Some(message) = form.status().message() {
        tracing::info!(customer_id = %id, "{message}");
    }
    Ok(())
}

fn print_customer(customer: &Customer) {
    let id = customer
        .id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    let address = &customer.address;

    tracing::info!("Customer #{id}: {}", customer.display_name());
    tracing::info!("  Email: {}", customer.email.as_deref().unwrap_or("-"));
    tracing::info!(
        "  Address: {}, {} - {}, {}/{}",
        address.street,
        address.number,
        address.neighborhood,
        address.city,
        address.state
    );
    if let Some(postal_code) = &address.postal_code {
        tracing::info!("  Postal code: {postal_code}");
    }
    if let Some(info) = &address.additional_info {
        tracing::info!("  Additional info: {info}");
    }
    tracing::info!("  Phones: {}", customer.phone_summary());
}
