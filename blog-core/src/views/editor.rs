//! Форма создания и редактирования поста.

use crate::error::ApiResult;
use crate::generation::{Generation, RequestTicket};
use crate::models::{Post, PostForm};
use crate::routes::Route;
use crate::session::Session;

use super::ViewStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Режим формы.
pub enum EditorMode {
    /// Новый пост.
    New,
    /// Редактирование поста с указанным id.
    Edit(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Шаг открытия формы.
pub enum EditorLoad {
    /// Форма готова, загружать нечего.
    Ready,
    /// Загрузить редактируемый пост.
    Fetch {
        /// Билет запроса.
        ticket: RequestTicket,
        /// Редактируемый пост.
        post_id: i64,
    },
    /// Перейти на другой экран.
    Redirect(Route),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Шаг отправки формы.
pub enum EditorSubmit {
    /// `POST /api/posts`.
    Create(PostForm),
    /// `PUT /api/posts/:id`.
    Update(i64, PostForm),
    /// Перейти на другой экран.
    Redirect(Route),
    /// Форма не прошла проверку, причина в слоте ошибки.
    Rejected,
}

#[derive(Debug, Clone, PartialEq)]
/// Состояние формы поста.
pub struct PostEditorView {
    mode: EditorMode,
    form: PostForm,
    status: ViewStatus,
    generation: Generation,
    submitting: bool,
}

impl PostEditorView {
    /// Пустая форма в заданном режиме.
    pub fn new(mode: EditorMode) -> Self {
        Self {
            mode,
            form: PostForm::default(),
            status: ViewStatus::default(),
            generation: Generation::default(),
            submitting: false,
        }
    }

    /// Открывает форму; в режиме редактирования нужен токен.
    pub fn load(&mut self, session: &Session) -> EditorLoad {
        match self.mode {
            EditorMode::New => EditorLoad::Ready,
            EditorMode::Edit(_) if !session.is_authenticated() => {
                EditorLoad::Redirect(Route::Home)
            }
            EditorMode::Edit(post_id) => {
                self.status.start();
                EditorLoad::Fetch {
                    ticket: self.generation.begin(),
                    post_id,
                }
            }
        }
    }

    /// Заполняет форму загруженным постом; `false`, если ответ устарел.
    pub fn resolve_load(&mut self, ticket: RequestTicket, result: ApiResult<Post>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        match result {
            Ok(post) => {
                self.form = PostForm::from(&post);
                self.status.finish();
            }
            Err(err) => {
                tracing::warn!(error = %err, mode = ?self.mode, "failed to fetch post for editing");
                self.status.fail("Failed to fetch post");
            }
        }
        true
    }

    /// Проверяет форму и формирует запрос.
    pub fn submit(&mut self, session: &Session) -> EditorSubmit {
        if !session.is_authenticated() {
            return EditorSubmit::Redirect(Route::Home);
        }
        if self.submitting {
            return EditorSubmit::Rejected;
        }

        let form = match validate_form(&self.form) {
            Ok(form) => form,
            Err(message) => {
                self.status.set_error(message);
                return EditorSubmit::Rejected;
            }
        };

        self.status.clear_error();
        self.submitting = true;
        match self.mode {
            EditorMode::New => EditorSubmit::Create(form),
            EditorMode::Edit(id) => EditorSubmit::Update(id, form),
        }
    }

    /// Результат сохранения: переход в кабинет или сообщение об ошибке.
    pub fn resolve_submit(&mut self, result: ApiResult<Post>) -> Option<Route> {
        self.submitting = false;
        match result {
            Ok(_) => Some(Route::Dashboard),
            Err(err) => {
                tracing::warn!(error = %err, mode = ?self.mode, "failed to save post");
                let message = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Failed to {} post", self.action_verb()));
                self.status.set_error(message);
                None
            }
        }
    }

    fn action_verb(&self) -> &'static str {
        match self.mode {
            EditorMode::New => "create",
            EditorMode::Edit(_) => "update",
        }
    }

    /// Заголовок экрана.
    pub fn heading(&self) -> &'static str {
        match self.mode {
            EditorMode::New => "Create New Post",
            EditorMode::Edit(_) => "Edit Post",
        }
    }

    /// Режим формы.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Поля формы.
    pub fn form(&self) -> &PostForm {
        &self.form
    }

    /// Изменяемые поля формы.
    pub fn form_mut(&mut self) -> &mut PostForm {
        &mut self.form
    }

    /// Сохранение уже отправлено.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Флаг загрузки и ошибка.
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }
}

fn validate_form(form: &PostForm) -> Result<PostForm, &'static str> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err("Title is required");
    }
    let summary = form.summary.trim();
    if summary.is_empty() {
        return Err("Summary is required");
    }
    if form.content.trim().is_empty() {
        return Err("Content is required");
    }

    Ok(PostForm {
        title: title.to_string(),
        summary: summary.to_string(),
        content: form.content.clone(),
        published: form.published,
    })
}
