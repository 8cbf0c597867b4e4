//! Оркестраторы экранов.
//!
//! Каждый экран хранит флаг загрузки, слот ошибки и загруженные сущности.
//! Сеть остаётся на стороне фронтенда: экран выдаёт описание запроса с
//! билетом поколения и принимает результат, отбрасывая устаревшие ответы.

pub mod comments;
pub mod detail;
pub mod editor;
pub mod listing;

pub use comments::{CommentComposer, CommentsView};
pub use detail::PostDetailView;
pub use editor::{EditorLoad, EditorMode, EditorSubmit, PostEditorView};
pub use listing::{ListingScope, ListingStep, ListingView, PageRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Флаг загрузки и сообщение об ошибке экрана.
pub struct ViewStatus {
    loading: bool,
    error: Option<String>,
}

impl ViewStatus {
    /// Запрос отправлен: ошибка сбрасывается.
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Запрос завершился успешно.
    pub fn finish(&mut self) {
        self.loading = false;
    }

    /// Запрос завершился ошибкой, показываемой пользователю.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Показывает ошибку, не трогая флаг загрузки.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Убирает сообщение об ошибке.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Идёт загрузка.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Текущее сообщение об ошибке.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
