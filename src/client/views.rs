//! View-model logic behind the list and detail screens
//!
//! Pure state containers: the rendering layer owns widgets and navigation,
//! this module owns pagination, fetch ordering and form lifecycle.

use std::str::FromStr;

use utoipa::ToSchema;
use validator::Validate;

use crate::models::pagination::Paginated;

/// Ticket identifying one dispatched list fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Pagination and filter state behind a resource list view
///
/// Fetches are tagged with a monotonically increasing sequence number; a
/// resolving response is applied only when no newer fetch has been dispatched
/// since, so a slow response can never overwrite a newer one.
#[derive(Debug)]
pub struct ListState<T>
where
    T: for<'a> ToSchema<'a>,
{
    page: i64,
    filter: String,
    latest: u64,
    rows: Vec<T>,
    total: i64,
    last_page: i64,
}

impl<T> Default for ListState<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListState<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new() -> Self {
        Self {
            page: 1,
            filter: String::new(),
            latest: 0,
            rows: Vec::new(),
            total: 0,
            last_page: 1,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn filter(&self) -> Option<&str> {
        if self.filter.is_empty() {
            None
        } else {
            Some(&self.filter)
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn last_page(&self) -> i64 {
        self.last_page
    }

    /// Move to another page (clamped at 1); the caller refetches
    pub fn set_page(&mut self, page: i64) {
        self.page = page.max(1);
    }

    /// Replace the filter draft and reset to the first page
    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        self.page = 1;
    }

    /// Register a fetch dispatch and hand out its ticket
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        FetchTicket(self.latest)
    }

    /// Apply a resolved page; stale responses are discarded
    ///
    /// Returns whether the response was applied.
    pub fn apply(&mut self, ticket: FetchTicket, response: Paginated<T>) -> bool {
        if ticket.0 < self.latest {
            return false;
        }

        self.rows = response.data;
        self.total = response.total;
        self.last_page = response.last_page;
        self.page = response.current_page;
        true
    }
}

/// Route target of a detail view; the literal `new` selects create mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTarget {
    New,
    Existing(i32),
}

impl FromStr for DetailTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "new" {
            return Ok(DetailTarget::New);
        }
        s.parse::<i32>()
            .map(DetailTarget::Existing)
            .map_err(|_| format!("Invalid detail target: {}", s))
    }
}

/// Detail view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    View,
    Edit,
}

/// State behind a create/view/edit detail form
///
/// `T` is the form payload (the create/update request shape). In View mode
/// the draft is frozen; Cancel during Edit reverts the draft to the fetched
/// snapshot.
#[derive(Debug)]
pub struct DetailForm<T: Clone + Validate> {
    mode: FormMode,
    fetched: Option<T>,
    draft: T,
}

impl<T: Clone + Validate> DetailForm<T> {
    /// Empty form for a new record
    pub fn create(empty: T) -> Self {
        Self {
            mode: FormMode::Create,
            fetched: None,
            draft: empty,
        }
    }

    /// Read-only form populated from a fetched record
    pub fn view(fetched: T) -> Self {
        Self {
            mode: FormMode::View,
            draft: fetched.clone(),
            fetched: Some(fetched),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    /// Mutable draft access; denied while the form is read-only
    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match self.mode {
            FormMode::Create | FormMode::Edit => Some(&mut self.draft),
            FormMode::View => None,
        }
    }

    /// Switch a read-only form into edit mode
    pub fn begin_edit(&mut self) {
        if self.mode == FormMode::View {
            self.mode = FormMode::Edit;
        }
    }

    /// Discard in-memory changes and revert to the fetched values
    pub fn cancel(&mut self) {
        if self.mode == FormMode::Edit {
            if let Some(ref fetched) = self.fetched {
                self.draft = fetched.clone();
            }
            self.mode = FormMode::View;
        }
    }

    /// Validate the draft and hand it over for submission
    pub fn submit(&self) -> Result<&T, crate::error::FieldErrors> {
        self.draft
            .validate()
            .map_err(|errors| crate::error::collect_field_errors(&errors))?;
        Ok(&self.draft)
    }

    /// Record a successful save; the saved payload becomes the new snapshot
    pub fn mark_saved(&mut self, saved: T) {
        self.draft = saved.clone();
        self.fetched = Some(saved);
        self.mode = FormMode::View;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::author::{Author, CreateAuthor};
    use chrono::Utc;

    fn author(id: i32, name: &str) -> Author {
        Author {
            id,
            name: name.to_string(),
            bio: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn page_of(authors: Vec<Author>, page: i64) -> Paginated<Author> {
        let total = authors.len() as i64;
        Paginated::new(authors, total, page, 10)
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut list = ListState::new();

        let old_ticket = list.begin_fetch();
        let new_ticket = list.begin_fetch();

        assert!(list.apply(new_ticket, page_of(vec![author(2, "Newer")], 1)));
        // the earlier fetch resolves late and must not clobber the newer one
        assert!(!list.apply(old_ticket, page_of(vec![author(1, "Older")], 1)));

        assert_eq!(list.rows().len(), 1);
        assert_eq!(list.rows()[0].name, "Newer");
    }

    #[test]
    fn test_responses_in_order_apply() {
        let mut list = ListState::new();

        let first = list.begin_fetch();
        assert!(list.apply(first, page_of(vec![author(1, "A")], 1)));

        let second = list.begin_fetch();
        assert!(list.apply(second, page_of(vec![author(2, "B")], 1)));
        assert_eq!(list.rows()[0].name, "B");
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut list: ListState<Author> = ListState::new();
        list.set_page(4);
        assert_eq!(list.page(), 4);

        list.set_filter("John");
        assert_eq!(list.page(), 1);
        assert_eq!(list.filter(), Some("John"));
    }

    #[test]
    fn test_detail_target_parsing() {
        assert_eq!("new".parse::<DetailTarget>(), Ok(DetailTarget::New));
        assert_eq!("42".parse::<DetailTarget>(), Ok(DetailTarget::Existing(42)));
        assert!("froble".parse::<DetailTarget>().is_err());
    }

    #[test]
    fn test_view_mode_freezes_draft() {
        let mut form = DetailForm::view(CreateAuthor {
            name: Some("John".to_string()),
            bio: None,
        });
        assert_eq!(form.mode(), FormMode::View);
        assert!(form.draft_mut().is_none());

        form.begin_edit();
        assert_eq!(form.mode(), FormMode::Edit);
        assert!(form.draft_mut().is_some());
    }

    #[test]
    fn test_cancel_reverts_to_fetched_values() {
        let mut form = DetailForm::view(CreateAuthor {
            name: Some("John".to_string()),
            bio: Some("Original bio".to_string()),
        });

        form.begin_edit();
        if let Some(draft) = form.draft_mut() {
            draft.name = Some("Changed".to_string());
        }

        form.cancel();
        assert_eq!(form.mode(), FormMode::View);
        assert_eq!(form.draft().name.as_deref(), Some("John"));
        assert_eq!(form.draft().bio.as_deref(), Some("Original bio"));
    }

    #[test]
    fn test_submit_validates_required_fields() {
        let form = DetailForm::create(CreateAuthor::default());
        let errors = form.submit().expect_err("empty form must not submit");
        assert!(errors.contains_key("name"));

        let mut form = DetailForm::create(CreateAuthor::default());
        if let Some(draft) = form.draft_mut() {
            draft.name = Some("John".to_string());
        }
        assert!(form.submit().is_ok());
    }
}
