//! Страница поста.

use crate::error::ApiResult;
use crate::generation::{Generation, RequestTicket};
use crate::models::Post;
use crate::routes::Route;
use crate::session::Session;

use super::ViewStatus;

#[derive(Debug, Clone, PartialEq)]
/// Состояние страницы поста.
pub struct PostDetailView {
    post_id: i64,
    post: Option<Post>,
    is_author: bool,
    status: ViewStatus,
    generation: Generation,
}

impl PostDetailView {
    /// Страница поста `post_id`, ещё не загруженная.
    pub fn new(post_id: i64) -> Self {
        Self {
            post_id,
            post: None,
            is_author: false,
            status: ViewStatus::default(),
            generation: Generation::default(),
        }
    }

    /// Начинает загрузку поста.
    pub fn load(&mut self) -> RequestTicket {
        self.status.start();
        self.generation.begin()
    }

    /// Применяет загруженный пост и сразу пересчитывает авторство;
    /// `false`, если ответ устарел.
    pub fn resolve_post(
        &mut self,
        ticket: RequestTicket,
        result: ApiResult<Post>,
        session: &Session,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(post_id = self.post_id, "dropping stale post response");
            return false;
        }

        match result {
            Ok(post) => {
                self.is_author = session.is_author_of(&post);
                self.post = Some(post);
                self.status.finish();
            }
            Err(err) if err.is_not_found() => {
                self.post = None;
                self.is_author = false;
                self.status.fail("Post not found");
            }
            Err(err) => {
                tracing::warn!(error = %err, post_id = self.post_id, "failed to load post");
                self.status.fail(format!("Failed to load post: {err}"));
            }
        }
        true
    }

    /// Пересчитывает авторство по подтверждённому пользователю сессии.
    pub fn resolve_author(&mut self, session: &Session) {
        self.is_author = self
            .post
            .as_ref()
            .is_some_and(|post| session.is_author_of(post));
    }

    /// Нужна ли проверка текущего пользователя для определения авторства.
    pub fn needs_current_user(&self, session: &Session) -> bool {
        self.post.is_some() && session.is_authenticated() && session.user().is_none()
    }

    /// Переход к редактированию, доступный только автору.
    pub fn edit_route(&self) -> Option<Route> {
        self.is_author.then_some(Route::EditPost(self.post_id))
    }

    /// Идентификатор поста.
    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    /// Загруженный пост.
    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    /// Является ли текущий пользователь автором поста.
    pub fn is_author(&self) -> bool {
        self.is_author
    }

    /// Флаг загрузки и ошибка.
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }
}
