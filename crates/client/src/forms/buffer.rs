//! Edit buffer shared by the create and update forms.

use std::collections::HashMap;
use std::sync::LazyLock;

use customer_desk_core::{Customer, CustomerId, Phone};

use super::error::{FormError, ValidationError};

type Setter = fn(&mut Customer, String);

/// Editable field names, in display order.
pub const FIELD_NAMES: [&str; 10] = [
    "first_name",
    "last_name",
    "email",
    "state",
    "city",
    "neighborhood",
    "street",
    "number",
    "postal_code",
    "additional_info",
];

static SETTERS: LazyLock<HashMap<&'static str, Setter>> = LazyLock::new(|| {
    let setters: [(&'static str, Setter); 10] = [
        ("first_name", |c, v| c.first_name = v),
        ("last_name", |c, v| c.last_name = v),
        ("email", |c, v| c.email = non_empty(v)),
        ("state", |c, v| c.address.state = v),
        ("city", |c, v| c.address.city = v),
        ("neighborhood", |c, v| c.address.neighborhood = v),
        ("street", |c, v| c.address.street = v),
        ("number", |c, v| c.address.number = v),
        ("postal_code", |c, v| c.address.postal_code = non_empty(v)),
        ("additional_info", |c, v| c.address.additional_info = non_empty(v)),
    ];
    HashMap::from(setters)
});

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// A customer record being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    customer: Customer,
}

impl CustomerDraft {
    /// Empty buffer with exactly one blank phone.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            customer: Customer {
                phones: vec![Phone::default()],
                ..Customer::default()
            },
        }
    }

    /// Buffer seeded from an existing record.
    #[must_use]
    pub const fn from_customer(customer: Customer) -> Self {
        Self { customer }
    }

    #[must_use]
    pub const fn customer(&self) -> &Customer {
        &self.customer
    }

    #[must_use]
    pub fn into_customer(self) -> Customer {
        self.customer
    }

    pub(crate) fn set_id(&mut self, id: CustomerId) {
        self.customer.id = Some(id);
    }

    /// Set a field by name.
    ///
    /// Empty values for `email`, `postal_code` and `additional_info` clear the
    /// field instead of storing an empty string.
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownField` if `name` is not in [`FIELD_NAMES`].
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let setter = SETTERS
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        setter(&mut self.customer, value.into());
        Ok(())
    }

    #[must_use]
    pub fn phones(&self) -> &[Phone] {
        &self.customer.phones
    }

    /// Append a blank phone entry and return its index.
    pub fn add_phone(&mut self) -> usize {
        self.customer.phones.push(Phone::default());
        self.customer.phones.len() - 1
    }

    /// Remove the phone at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::PhoneIndex` if `index` is out of range.
    pub fn remove_phone(&mut self, index: usize) -> Result<Phone, FormError> {
        self.check_index(index)?;
        Ok(self.customer.phones.remove(index))
    }

    /// Set the area code of the phone at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::PhoneIndex` if `index` is out of range.
    pub fn set_phone_area_code(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.phone_mut(index)?.area_code = value.into();
        Ok(())
    }

    /// Set the number of the phone at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::PhoneIndex` if `index` is out of range.
    pub fn set_phone_number(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.phone_mut(index)?.number = value.into();
        Ok(())
    }

    /// Replace the whole phone list.
    pub fn set_phones(&mut self, phones: Vec<Phone>) {
        self.customer.phones = phones;
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        let len = self.customer.phones.len();
        if index < len {
            Ok(())
        } else {
            Err(FormError::PhoneIndex { index, len })
        }
    }

    fn phone_mut(&mut self, index: usize) -> Result<&mut Phone, FormError> {
        let len = self.customer.phones.len();
        self.customer
            .phones
            .get_mut(index)
            .ok_or(FormError::PhoneIndex { index, len })
    }

    /// Checks required before creating a record.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate_for_create(&self) -> Result<(), ValidationError> {
        self.validate_names()?;
        if self.customer.phones.is_empty() {
            return Err(ValidationError::NoPhones);
        }
        self.validate_phones()
    }

    /// Checks required before sending an update.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate_for_update(&self) -> Result<(), ValidationError> {
        self.validate_names()?;
        self.validate_phones()
    }

    fn validate_names(&self) -> Result<(), ValidationError> {
        if self.customer.first_name.is_empty() {
            return Err(ValidationError::MissingFirstName);
        }
        if self.customer.last_name.is_empty() {
            return Err(ValidationError::MissingLastName);
        }
        Ok(())
    }

    fn validate_phones(&self) -> Result<(), ValidationError> {
        match self.customer.phones.iter().position(|p| !p.is_complete()) {
            Some(index) => Err(ValidationError::IncompletePhone { index }),
            None => Ok(()),
        }
    }
}
