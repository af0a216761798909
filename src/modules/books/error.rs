use bookshelf_http::AppError;
use thiserror::Error;

/// Write operation a validation failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Add => "menambahkan",
            Action::Update => "memperbarui",
        }
    }
}

/// Failures of the book operations, carrying the messages shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("Gagal {} buku. Mohon isi nama buku", .0.verb())]
    MissingName(Action),

    #[error("Gagal {} buku. readPage tidak boleh lebih besar dari pageCount", .0.verb())]
    ReadPageExceedsPageCount(Action),

    #[error("Buku tidak ditemukan")]
    NotFound,

    #[error("Gagal memperbarui buku. Id tidak ditemukan")]
    UpdateTargetNotFound,

    #[error("Buku gagal dihapus. Id tidak ditemukan")]
    DeleteTargetNotFound,
}

impl BookError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookError::MissingName(_) | BookError::ReadPageExceedsPageCount(_)
        )
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        if err.is_validation() {
            AppError::validation(err.to_string())
        } else {
            AppError::not_found(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_action() {
        assert_eq!(
            BookError::MissingName(Action::Add).to_string(),
            "Gagal menambahkan buku. Mohon isi nama buku"
        );
        assert_eq!(
            BookError::ReadPageExceedsPageCount(Action::Update).to_string(),
            "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
        );
    }

    #[test]
    fn maps_to_http_errors() {
        let validation: AppError = BookError::MissingName(Action::Add).into();
        assert!(matches!(validation, AppError::Validation { .. }));

        let missing: AppError = BookError::DeleteTargetNotFound.into();
        match missing {
            AppError::NotFound { message, .. } => {
                assert_eq!(message, "Buku gagal dihapus. Id tidak ditemukan")
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
