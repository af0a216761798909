use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{Action, BookError};
use super::models::{Book, BookPayload, BookSummary, ListFilterMode, ListQuery};
use super::store::BookStore;
use crate::utils::{Clock, IdGenerator, RandomIdGenerator, SystemClock};

/// Book operations over a shared [`BookStore`].
///
/// Cloning is cheap and every clone sees the same store. Writers take the
/// store lock exclusively, so ids stay unique and updates are never lost.
#[derive(Clone)]
pub struct BookService {
    store: Arc<RwLock<BookStore>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    filter_mode: ListFilterMode,
}

impl BookService {
    pub fn new(
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        filter_mode: ListFilterMode,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(BookStore::new())),
            ids,
            clock,
            filter_mode,
        }
    }

    /// Service backed by random ids and the system clock.
    pub fn with_system_defaults(filter_mode: ListFilterMode) -> Self {
        Self::new(Arc::new(RandomIdGenerator), Arc::new(SystemClock), filter_mode)
    }

    pub fn filter_mode(&self) -> ListFilterMode {
        self.filter_mode
    }

    /// Validate and store a new book, returning its id.
    pub async fn create(&self, payload: BookPayload) -> Result<String, BookError> {
        let draft = payload.validate(Action::Add)?;

        let mut store = self.store.write().await;
        let id = loop {
            let candidate = self.ids.next_id();
            if !store.contains(&candidate) {
                break candidate;
            }
            tracing::warn!(book_id = %candidate, "generated id already taken, drawing another");
        };

        let book = Book::new(id.clone(), draft, self.clock.now());
        store.insert(book);

        tracing::info!(book_id = %id, total = store.len(), "book added");
        Ok(id)
    }

    /// Summaries of the books selected by `query`, in insertion order.
    pub async fn list(&self, query: &ListQuery) -> Vec<BookSummary> {
        let store = self.store.read().await;
        query
            .select(store.books(), self.filter_mode)
            .into_iter()
            .map(BookSummary::from)
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Book, BookError> {
        let store = self.store.read().await;
        store.get(id).cloned().ok_or(BookError::NotFound)
    }

    /// Replace a book's fields; validation runs before the id lookup.
    pub async fn update(&self, id: &str, payload: BookPayload) -> Result<(), BookError> {
        let draft = payload.validate(Action::Update)?;

        let mut store = self.store.write().await;
        let book = store.get_mut(id).ok_or(BookError::UpdateTargetNotFound)?;
        book.apply(draft, self.clock.now());

        tracing::info!(book_id = %id, "book updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), BookError> {
        let mut store = self.store.write().await;
        store.remove(id).ok_or(BookError::DeleteTargetNotFound)?;

        tracing::info!(book_id = %id, total = store.len(), "book deleted");
        Ok(())
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Hands out queued ids, then `id-<n>`.
    #[derive(Default)]
    struct ScriptedIds {
        queued: Mutex<VecDeque<String>>,
        counter: AtomicUsize,
    }

    impl ScriptedIds {
        fn with(ids: &[&str]) -> Self {
            Self {
                queued: Mutex::new(ids.iter().map(|id| id.to_string()).collect()),
                counter: AtomicUsize::new(0),
            }
        }
    }

    impl IdGenerator for ScriptedIds {
        fn next_id(&self) -> String {
            if let Some(id) = self.queued.lock().unwrap().pop_front() {
                return id;
            }
            format!("id-{}", self.counter.fetch_add(1, Ordering::SeqCst))
        }
    }

    /// Advances one second per reading.
    #[derive(Default)]
    struct TickingClock {
        ticks: AtomicUsize,
    }

    impl Clock for TickingClock {
        fn now(&self) -> String {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            format!("2024-01-01T00:00:{:02}.000Z", tick)
        }
    }

    fn service_with(ids: ScriptedIds, mode: ListFilterMode) -> BookService {
        BookService::new(Arc::new(ids), Arc::new(TickingClock::default()), mode)
    }

    fn service() -> BookService {
        service_with(ScriptedIds::default(), ListFilterMode::Independent)
    }

    fn payload(name: &str, page_count: i64, read_page: i64, reading: bool) -> BookPayload {
        BookPayload {
            name: Some(name.to_string()),
            year: 2018,
            author: "James Clear".to_string(),
            summary: "Small habits".to_string(),
            publisher: "Avery".to_string(),
            page_count,
            read_page,
            reading,
        }
    }

    #[tokio::test]
    async fn created_book_is_retrievable() {
        let service = service();
        let id = service
            .create(payload("Atomic Habits", 100, 100, false))
            .await
            .unwrap();

        let book = service.get(&id).await.unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.name, "Atomic Habits");
        assert_eq!(book.year, 2018);
        assert_eq!(book.publisher, "Avery");
        assert_eq!(book.page_count, 100);
        assert!(book.finished);
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[tokio::test]
    async fn invalid_create_leaves_store_untouched() {
        let service = service();

        let err = service.create(payload("", 10, 1, false)).await.unwrap_err();
        assert_eq!(err, BookError::MissingName(Action::Add));

        let err = service
            .create(payload("Dune", 50, 60, false))
            .await
            .unwrap_err();
        assert_eq!(err, BookError::ReadPageExceedsPageCount(Action::Add));

        assert_eq!(service.count().await, 0);
    }

    #[tokio::test]
    async fn colliding_id_is_redrawn() {
        let service = service_with(
            ScriptedIds::with(&["dup", "dup", "fresh"]),
            ListFilterMode::Independent,
        );

        let first = service.create(payload("One", 1, 0, false)).await.unwrap();
        let second = service.create(payload("Two", 1, 0, false)).await.unwrap();

        assert_eq!(first, "dup");
        assert_eq!(second, "fresh");
        assert_eq!(service.count().await, 2);
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_identity() {
        let service = service();
        let id = service
            .create(payload("Draft", 200, 10, true))
            .await
            .unwrap();
        let before = service.get(&id).await.unwrap();

        service
            .update(&id, payload("Final", 300, 300, false))
            .await
            .unwrap();
        let after = service.get(&id).await.unwrap();

        assert_eq!(after.id, before.id);
        assert_eq!(after.inserted_at, before.inserted_at);
        assert_ne!(after.updated_at, before.updated_at);
        assert_eq!(after.name, "Final");
        assert_eq!(after.page_count, 300);
        assert!(!after.reading);
        assert!(after.finished);
    }

    #[tokio::test]
    async fn update_validates_before_lookup() {
        let service = service();

        let err = service
            .update("missing", payload("", 1, 0, false))
            .await
            .unwrap_err();
        assert_eq!(err, BookError::MissingName(Action::Update));

        let err = service
            .update("missing", payload("Dune", 1, 2, false))
            .await
            .unwrap_err();
        assert_eq!(err, BookError::ReadPageExceedsPageCount(Action::Update));

        let err = service
            .update("missing", payload("Dune", 2, 1, false))
            .await
            .unwrap_err();
        assert_eq!(err, BookError::UpdateTargetNotFound);
    }

    #[tokio::test]
    async fn delete_removes_book() {
        let service = service();
        let id = service.create(payload("Dune", 10, 0, false)).await.unwrap();

        service.delete(&id).await.unwrap();

        assert_eq!(service.get(&id).await.unwrap_err(), BookError::NotFound);
        assert_eq!(
            service.delete(&id).await.unwrap_err(),
            BookError::DeleteTargetNotFound
        );
    }

    #[tokio::test]
    async fn list_projects_and_filters_finished() {
        let service = service();
        let done = service
            .create(payload("Atomic Habits", 100, 100, false))
            .await
            .unwrap();
        let open = service
            .create(payload("Dune", 100, 20, true))
            .await
            .unwrap();

        let finished = service
            .list(&ListQuery {
                finished: Some("1".to_string()),
                ..ListQuery::default()
            })
            .await;
        assert_eq!(
            finished,
            vec![BookSummary {
                id: done.clone(),
                name: "Atomic Habits".to_string(),
                publisher: "Avery".to_string(),
            }]
        );

        let unfinished = service
            .list(&ListQuery {
                finished: Some("0".to_string()),
                ..ListQuery::default()
            })
            .await;
        let ids: Vec<_> = unfinished.into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![open]);
    }

    #[tokio::test]
    async fn list_mode_decides_how_filters_combine() {
        let query = ListQuery {
            name: Some("atomic".to_string()),
            reading: Some("1".to_string()),
            finished: None,
        };

        for (mode, expected) in [
            (ListFilterMode::Independent, vec!["Dune"]),
            (ListFilterMode::Composed, Vec::<&str>::new()),
        ] {
            let service = service_with(ScriptedIds::default(), mode);
            service
                .create(payload("Atomic Habits", 100, 100, false))
                .await
                .unwrap();
            service
                .create(payload("Dune", 100, 20, true))
                .await
                .unwrap();

            let names: Vec<_> = service
                .list(&query)
                .await
                .into_iter()
                .map(|b| b.name)
                .collect();
            assert_eq!(names, expected, "mode {:?}", mode);
        }
    }

    #[tokio::test]
    async fn clones_share_the_store() {
        let service = service();
        let other = service.clone();
        let id = service.create(payload("Dune", 1, 1, false)).await.unwrap();
        assert!(other.get(&id).await.is_ok());
    }
}
