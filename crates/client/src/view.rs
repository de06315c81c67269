//! Search and pagination over the customer collection.
//!
//! Everything here is a pure function of the store contents and the view state
//! (search term, requested page, page size). Derived values such as the page
//! count are recomputed on every render and never cached.

use std::ops::RangeInclusive;

use customer_desk_core::{Customer, CustomerId};

/// Whether `customer` matches the search `term`.
///
/// An empty term matches everything. Otherwise the term must be a
/// case-insensitive substring of the first or last name.
#[must_use]
pub fn matches_search(customer: &Customer, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let term = term.to_lowercase();
    customer.first_name.to_lowercase().contains(&term)
        || customer.last_name.to_lowercase().contains(&term)
}

/// Customers matching `term`, in store order.
#[must_use]
pub fn filter_customers<'a>(customers: &'a [Customer], term: &str) -> Vec<&'a Customer> {
    customers
        .iter()
        .filter(|c| matches_search(c, term))
        .collect()
}

/// Number of pages needed for `count` items. Zero items means zero pages.
#[must_use]
pub const fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Clamp a requested page into `[1, total_pages]`, or 1 when there are no pages.
#[must_use]
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        1
    } else {
        requested.clamp(1, total_pages)
    }
}

/// One row of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    /// Phones formatted as `(area) number, ...`.
    pub phones: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            phones: customer.phone_summary(),
        }
    }
}

/// The rendered state of the list for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Customers on the current page.
    pub items: Vec<Customer>,
    /// Current page, 1-based, already clamped.
    pub page: usize,
    /// Page count for the filtered set (0 when nothing matches).
    pub total_pages: usize,
    /// Number of customers matching the search term.
    pub total_matches: usize,
    /// Maximum customers per page.
    pub page_size: usize,
}

impl PageView {
    /// Whether nothing matched (render "no results" rather than a pager).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page numbers for pager buttons (empty when nothing matched).
    #[must_use]
    pub const fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages
    }

    /// Row summaries for the current page.
    #[must_use]
    pub fn rows(&self) -> Vec<CustomerRow> {
        self.items.iter().map(CustomerRow::from).collect()
    }
}

/// Compute the page view for `customers` given the view state.
#[must_use]
pub fn paginate(customers: &[Customer], term: &str, page_size: usize, page: usize) -> PageView {
    let page_size = page_size.max(1);
    let filtered = filter_customers(customers, term);
    let total_matches = filtered.len();
    let total_pages = total_pages(total_matches, page_size);
    let page = clamp_page(page, total_pages);

    let items = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    PageView {
        items,
        page,
        total_pages,
        total_matches,
        page_size,
    }
}

/// Search term and current page of the customer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    search: String,
    page: usize,
    page_size: usize,
}

impl ListView {
    /// Create a view on page 1 with an empty search term.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Last page navigated to, before clamping against the current contents.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the search term. Always resets to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Navigate to `requested`, clamped against the filtered `customers`.
    ///
    /// Returns the page actually selected.
    pub fn go_to_page(&mut self, requested: usize, customers: &[Customer]) -> usize {
        let matches = filter_customers(customers, &self.search).len();
        self.page = clamp_page(requested, total_pages(matches, self.page_size));
        self.page
    }

    /// Move one page forward, staying on the last page.
    pub fn next_page(&mut self, customers: &[Customer]) -> usize {
        let current = self.render(customers).page;
        self.go_to_page(current.saturating_add(1), customers)
    }

    /// Move one page back, staying on page 1.
    pub fn previous_page(&mut self, customers: &[Customer]) -> usize {
        let current = self.render(customers).page;
        self.go_to_page(current.saturating_sub(1), customers)
    }

    /// Render the current page of `customers`.
    #[must_use]
    pub fn render(&self, customers: &[Customer]) -> PageView {
        paginate(customers, &self.search, self.page_size, self.page)
    }
}
