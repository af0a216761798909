use serde::{Deserialize, Serialize};

use super::error::{Action, BookError};

/// A book record as held by the store and returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier for the book, never changes after creation
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    /// Total number of pages
    pub page_count: i64,
    /// Pages read so far
    pub read_page: i64,
    /// Reader-declared "currently reading" flag
    pub reading: bool,
    /// Derived on every write: `read_page == page_count`
    pub finished: bool,
    pub inserted_at: String,
    pub updated_at: String,
}

impl Book {
    /// Build a fresh record; `inserted_at` and `updated_at` share `now`.
    pub fn new(id: String, draft: BookDraft, now: String) -> Self {
        let finished = draft.is_finished();
        Self {
            id,
            name: draft.name,
            year: draft.year,
            author: draft.author,
            summary: draft.summary,
            publisher: draft.publisher,
            page_count: draft.page_count,
            read_page: draft.read_page,
            reading: draft.reading,
            finished,
            inserted_at: now.clone(),
            updated_at: now,
        }
    }

    /// Replace every field except `id` and `inserted_at`.
    pub fn apply(&mut self, draft: BookDraft, now: String) {
        self.finished = draft.is_finished();
        self.name = draft.name;
        self.year = draft.year;
        self.author = draft.author;
        self.summary = draft.summary;
        self.publisher = draft.publisher;
        self.page_count = draft.page_count;
        self.read_page = draft.read_page;
        self.reading = draft.reading;
        self.updated_at = now;
    }
}

/// Request body for creating or updating a book.
///
/// Every field may be omitted; missing values fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: i64,
    pub read_page: i64,
    pub reading: bool,
}

impl BookPayload {
    /// Check the payload for `action`; name first, then the page counts.
    pub fn validate(self, action: Action) -> Result<BookDraft, BookError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BookError::MissingName(action)),
        };

        if self.read_page > self.page_count {
            return Err(BookError::ReadPageExceedsPageCount(action));
        }

        Ok(BookDraft {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: i64,
    pub read_page: i64,
    pub reading: bool,
}

impl BookDraft {
    fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

/// Projection used by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Filters accepted by the list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

/// How several list filters combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilterMode {
    /// Each filter selects from the whole store; the last one supplied wins.
    #[default]
    Independent,
    /// Each filter narrows the result of the previous one.
    Composed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    NameContains(String),
    Reading(bool),
    Finished(bool),
}

impl Predicate {
    fn matches(&self, book: &Book) -> bool {
        match self {
            Predicate::NameContains(needle) => book.name.to_lowercase().contains(needle.as_str()),
            Predicate::Reading(reading) => book.reading == *reading,
            Predicate::Finished(finished) => book.finished == *finished,
        }
    }
}

impl ListQuery {
    /// Build from raw query pairs. A key given more than once carries no
    /// usable value and is ignored, as are unknown keys.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = ListQuery::default();
        let mut repeated: Vec<String> = Vec::new();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if slot.replace(value).is_some() {
                repeated.push(key);
            }
        }

        for key in repeated {
            match key.as_str() {
                "name" => query.name = None,
                "reading" => query.reading = None,
                _ => query.finished = None,
            }
        }

        query
    }

    /// Filters in evaluation order: name, reading, finished.
    ///
    /// Empty names and flag values other than "0"/"1" are ignored.
    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            predicates.push(Predicate::NameContains(name.to_lowercase()));
        }
        if let Some(reading) = parse_flag(self.reading.as_deref()) {
            predicates.push(Predicate::Reading(reading));
        }
        if let Some(finished) = parse_flag(self.finished.as_deref()) {
            predicates.push(Predicate::Finished(finished));
        }

        predicates
    }

    /// Select the matching books, keeping store order.
    pub fn select<'a>(&self, books: &'a [Book], mode: ListFilterMode) -> Vec<&'a Book> {
        let mut selected: Vec<&Book> = books.iter().collect();

        for predicate in self.predicates() {
            let source = match mode {
                ListFilterMode::Independent => books.iter().collect(),
                ListFilterMode::Composed => selected,
            };
            selected = source
                .into_iter()
                .filter(|book| predicate.matches(book))
                .collect();
        }

        selected
    }
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("0") => Some(false),
        Some("1") => Some(true),
        _ => None,
    }
}
