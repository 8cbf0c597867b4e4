//! Обсуждение под постом: дерево комментариев и форма ответа.

use crate::error::{ApiError, ApiResult};
use crate::generation::{Generation, RequestTicket};
use crate::models::{Comment, NewComment};
use crate::session::Session;
use crate::threads::CommentForest;

use super::ViewStatus;

/// Сообщение для анонимного пользователя.
pub const LOGIN_REQUIRED: &str = "Please log in to comment";
const EMPTY_COMMENT: &str = "Comment must not be empty";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Черновик комментария и адресат ответа.
pub struct CommentComposer {
    draft: String,
    reply_to: Option<i64>,
    submitting: bool,
}

impl CommentComposer {
    /// Текст черновика.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Заменяет текст черновика.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Делает комментарий `id` адресатом ответа.
    pub fn reply_to(&mut self, id: i64) {
        self.reply_to = Some(id);
    }

    /// Снимает адресата: следующий комментарий будет верхнего уровня.
    pub fn cancel_reply(&mut self) {
        self.reply_to = None;
    }

    /// Текущий адресат ответа.
    pub fn reply_target(&self) -> Option<i64> {
        self.reply_to
    }

    /// Идёт отправка.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Готовит тело запроса. Без токена запрос не формируется.
    fn prepare(&self, session: &Session, post_id: i64) -> Result<NewComment, &'static str> {
        if session.require_token().is_err() {
            return Err(LOGIN_REQUIRED);
        }
        let content = self.draft.trim();
        if content.is_empty() {
            return Err(EMPTY_COMMENT);
        }
        Ok(NewComment {
            content: content.to_string(),
            post_id,
            parent_id: self.reply_to,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Состояние блока комментариев.
pub struct CommentsView {
    post_id: i64,
    forest: CommentForest,
    composer: CommentComposer,
    status: ViewStatus,
    generation: Generation,
}

impl CommentsView {
    /// Блок комментариев поста `post_id`.
    pub fn new(post_id: i64) -> Self {
        Self {
            post_id,
            forest: CommentForest::default(),
            composer: CommentComposer::default(),
            status: ViewStatus::default(),
            generation: Generation::default(),
        }
    }

    /// Начинает загрузку полного списка комментариев.
    pub fn load(&mut self) -> RequestTicket {
        self.status.start();
        self.generation.begin()
    }

    /// Перестраивает дерево по ответу; `false`, если ответ устарел.
    pub fn resolve(&mut self, ticket: RequestTicket, result: ApiResult<Vec<Comment>>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(post_id = self.post_id, "dropping stale comments response");
            return false;
        }

        match result {
            Ok(comments) => {
                self.forest = CommentForest::build(comments);
                self.status.finish();
            }
            Err(err) => {
                tracing::warn!(error = %err, post_id = self.post_id, "failed to load comments");
                self.status.fail("Failed to load comments");
            }
        }
        true
    }

    /// Отправка черновика. При `None` запрос не нужен, причина в слоте ошибки.
    pub fn submit(&mut self, session: &Session) -> Option<NewComment> {
        if self.composer.submitting {
            return None;
        }

        match self.composer.prepare(session, self.post_id) {
            Ok(body) => {
                self.status.clear_error();
                self.composer.submitting = true;
                Some(body)
            }
            Err(message) => {
                self.status.set_error(message);
                None
            }
        }
    }

    /// Результат отправки. При `true` комментарий сохранён и список нужно
    /// загрузить заново; при ошибке черновик остаётся нетронутым.
    pub fn resolve_submit<T>(&mut self, result: ApiResult<T>) -> bool {
        self.composer.submitting = false;
        match result {
            Ok(_) => {
                self.composer.draft.clear();
                self.composer.reply_to = None;
                true
            }
            Err(ApiError::MissingCredential) => {
                self.status.set_error(LOGIN_REQUIRED);
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, post_id = self.post_id, "failed to post comment");
                self.status
                    .set_error(format!("Failed to post comment ({err}). Please try again."));
                false
            }
        }
    }

    /// Черновик и адресат ответа.
    pub fn composer(&self) -> &CommentComposer {
        &self.composer
    }

    /// Изменяемый черновик.
    pub fn composer_mut(&mut self) -> &mut CommentComposer {
        &mut self.composer
    }

    /// Дерево комментариев.
    pub fn forest(&self) -> &CommentForest {
        &self.forest
    }

    /// Пост обсуждения.
    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    /// Флаг загрузки и ошибка.
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }
}
