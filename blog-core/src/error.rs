use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Ошибки обращения к удалённому API блога.
pub enum ApiError {
    /// Нет токена: запрос не отправляется вовсе.
    #[error("not logged in")]
    MissingCredential,

    /// Ошибка транспорта (соединение, DNS, таймаут).
    #[error("network error: {0}")]
    Network(String),

    /// Сервер ответил неуспешным статусом.
    #[error("http error {status}: {message}")]
    Http {
        /// HTTP-статус ответа.
        status: u16,
        /// Сообщение из тела ответа или описание статуса.
        message: String,
    },

    /// Тело ответа не удалось разобрать.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Результат обращения к API.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    description: Option<String>,
}

impl ApiError {
    /// Строит ошибку неуспешного статуса по сырому телу ответа.
    ///
    /// Если тело является JSON с полем `message`/`error`/`description`, берётся оно,
    /// иначе непустой текст тела, иначе описание статуса.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message.or(body.description).or(body.error))
            .filter(|message| !message.trim().is_empty())
            .or_else(|| {
                let text = body.trim();
                (!text.is_empty() && !text.starts_with('{')).then(|| text.to_string())
            })
            .unwrap_or_else(|| status_fallback(status));

        Self::Http { status, message }
    }

    /// Сервер отверг учётные данные.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// Ресурс не найден.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Сообщение сервера для неуспешного статуса.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => Some(message),
            _ => None,
        }
    }
}

fn status_fallback(status: u16) -> String {
    match status {
        400 => "bad request".to_string(),
        401 => "authorization required".to_string(),
        403 => "not allowed".to_string(),
        404 => "not found".to_string(),
        409 => "conflict".to_string(),
        500..=599 => "server error".to_string(),
        _ => format!("http status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_prefers_json_message() {
        let err = ApiError::from_status(422, r#"{"error":"invalid_params","message":"title is required"}"#);
        assert_eq!(
            err,
            ApiError::Http {
                status: 422,
                message: "title is required".to_string()
            }
        );
    }

    #[test]
    fn from_status_uses_plain_text_body() {
        let err = ApiError::from_status(500, "db is down\n");
        assert_eq!(err.server_message(), Some("db is down"));
    }

    #[test]
    fn from_status_falls_back_to_status_text() {
        let err = ApiError::from_status(404, "");
        assert!(err.is_not_found());
        assert_eq!(err.server_message(), Some("not found"));

        let err = ApiError::from_status(401, "{}");
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("authorization required"));
    }

    #[test]
    fn network_errors_are_not_unauthorized() {
        assert!(!ApiError::Network("refused".to_string()).is_unauthorized());
        assert!(!ApiError::MissingCredential.is_unauthorized());
    }
}
