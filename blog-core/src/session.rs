//! Явная сессия пользователя вместо глобального хранилища токена.
//!
//! Сессия создаётся фронтендом, передаётся экранам параметром и живёт
//! по правилам: токен ставится при входе, сбрасывается при выходе или когда
//! сервер отверг проверку текущего пользователя.

use std::cell::RefCell;

use crate::error::{ApiError, ApiResult};
use crate::models::{CurrentUser, Post};

/// Ключ, под которым токен лежит в постоянном хранилище клиента.
pub const TOKEN_KEY: &str = "token";

/// Постоянное хранилище bearer-токена.
pub trait TokenStore {
    /// Ошибка хранилища.
    type Error: std::fmt::Display;

    /// Читает сохранённый токен.
    fn load(&self) -> Result<Option<String>, Self::Error>;
    /// Сохраняет токен.
    fn save(&self, token: &str) -> Result<(), Self::Error>;
    /// Удаляет токен.
    fn clear(&self) -> Result<(), Self::Error>;
}

/// Значение заголовка `Authorization` для токена.
pub fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}

/// Нормализует сырое значение токена: пробелы срезаются, пустое значение даёт `None`.
pub fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Состояние аутентификации.
pub struct Session {
    token: Option<String>,
    user: Option<CurrentUser>,
}

impl Session {
    /// Анонимная сессия.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Сессия с уже известным токеном (например, прочитанным из хранилища).
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut session = Self::default();
        session.set_token(token);
        session
    }

    /// Восстанавливает сессию из хранилища; ошибка чтения даёт анонимную
    /// сессию.
    pub fn restore<S: TokenStore>(store: &S) -> Self {
        match store.load() {
            Ok(Some(token)) => Self::with_token(token),
            Ok(None) => Self::anonymous(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored token");
                Self::anonymous()
            }
        }
    }

    /// Устанавливает токен после успешного входа; пустой токен игнорируется.
    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = parse_token(&token.into());
        if token != self.token {
            self.user = None;
        }
        self.token = token;
    }

    /// Текущий токен.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Токен или [`ApiError::MissingCredential`].
    pub fn require_token(&self) -> ApiResult<&str> {
        self.token().ok_or(ApiError::MissingCredential)
    }

    /// Есть ли токен.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Подтверждённый сервером пользователь.
    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Применяет результат проверки текущего пользователя, выполненной
    /// с токеном `checked_token`.
    ///
    /// Ответ для токена, который уже сменился, игнорируется. Любая неудача
    /// для текущего токена молча переводит сессию в анонимную. Возвращает
    /// `true`, если токен был сброшен и его нужно удалить из хранилища.
    pub fn apply_current_user(
        &mut self,
        checked_token: &str,
        result: ApiResult<CurrentUser>,
    ) -> bool {
        if self.token.as_deref() != Some(checked_token) {
            tracing::debug!("dropping current user response for a replaced token");
            return false;
        }

        match result {
            Ok(user) => {
                self.user = Some(user);
                false
            }
            Err(err) => {
                tracing::info!(error = %err, "current user check failed, logging out");
                self.logout();
                true
            }
        }
    }

    /// Сбрасывает токен и пользователя.
    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
    }

    /// Является ли текущий пользователь автором поста.
    pub fn is_author_of(&self, post: &Post) -> bool {
        match (&self.user, &post.user_id) {
            (Some(user), Some(owner)) => user.pid == *owner,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
/// Хранилище токена в памяти.
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    type Error = std::convert::Infallible;

    fn load(&self) -> Result<Option<String>, Self::Error> {
        Ok(self.token.borrow().clone())
    }

    fn save(&self, token: &str) -> Result<(), Self::Error> {
        *self.token.borrow_mut() = parse_token(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        *self.token.borrow_mut() = None;
        Ok(())
    }
}
