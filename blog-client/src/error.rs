use blog_core::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blog-client`.
pub enum BlogClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Нет токена: запрос не отправлялся.
    #[error("not logged in")]
    MissingCredential,

    /// Сервер отверг токен.
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Сервер отклонил запрос с другим неуспешным статусом.
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// HTTP-статус.
        status: u16,
        /// Сообщение сервера.
        message: String,
    },

    /// Ответ не удалось разобрать.
    #[error("invalid response: {0}")]
    Decode(String),
}

/// Результат операций `blog-client`.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

impl BlogClientError {
    pub(crate) fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            _ => match ApiError::from_status(status, body) {
                ApiError::Http { status, message } => Self::Rejected { status, message },
                other => Self::Decode(other.to_string()),
            },
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::from_http_status(status.as_u16(), "");
        }
        Self::Http(err)
    }
}

impl From<BlogClientError> for ApiError {
    fn from(err: BlogClientError) -> Self {
        match err {
            BlogClientError::Http(err) => ApiError::Network(err.to_string()),
            BlogClientError::MissingCredential => ApiError::MissingCredential,
            BlogClientError::Unauthorized => ApiError::from_status(401, ""),
            BlogClientError::NotFound => ApiError::from_status(404, ""),
            BlogClientError::Rejected { status, message } => ApiError::Http { status, message },
            BlogClientError::Decode(message) => ApiError::Decode(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        assert!(matches!(
            BlogClientError::from_http_status(401, ""),
            BlogClientError::Unauthorized
        ));
        assert!(matches!(
            BlogClientError::from_http_status(403, "{}"),
            BlogClientError::Unauthorized
        ));
    }

    #[test]
    fn other_statuses_keep_server_message() {
        match BlogClientError::from_http_status(422, r#"{"message":"bad title"}"#) {
            BlogClientError::Rejected { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "bad title");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn converts_into_core_error() {
        assert!(ApiError::from(BlogClientError::Unauthorized).is_unauthorized());
        assert!(ApiError::from(BlogClientError::NotFound).is_not_found());
        assert_eq!(
            ApiError::from(BlogClientError::MissingCredential),
            ApiError::MissingCredential
        );
    }
}
