use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

use blog_core::{Comment, CurrentUser, LoginResponse, NewComment, Page, Post, PostForm};

use crate::error::{BlogClientError, BlogClientResult};

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PageQuery {
    page: u32,
    page_size: u32,
}

#[derive(Serialize)]
struct CommentsQuery {
    post_id: i64,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API блога.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.endpoint(path);
        tracing::debug!(%method, %url, authenticated = token.is_some(), "sending request");

        let request = self.client.request(method, url);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> BlogClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status, "request failed");
        BlogClientError::from_http_status(status, &body)
    }

    /// отправляет запрос и разбирает успешный json-ответ
    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> BlogClientResult<T> {
        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(BlogClientError::from_reqwest)
    }

    /// Выполняет вход по email и паролю.
    pub async fn login(&self, email: &str, password: &str) -> BlogClientResult<LoginResponse> {
        let payload = LoginRequestDto { email, password };
        let request = self
            .request(Method::POST, "/api/auth/login", None)
            .json(&payload);
        Self::execute(request).await
    }

    /// Возвращает пользователя, которому принадлежит токен.
    pub async fn current_user(&self, token: &str) -> BlogClientResult<CurrentUser> {
        let request = self.request(Method::GET, "/api/auth/current", Some(token));
        Self::execute(request).await
    }

    /// Возвращает страницу постов по пути `path` (`/api/posts` или `/api/posts/my`).
    pub async fn list_posts(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
        token: Option<&str>,
    ) -> BlogClientResult<Page<Post>> {
        let query = PageQuery { page, page_size };
        let request = self.request(Method::GET, path, token).query(&query);
        Self::execute(request).await
    }

    /// Получает пост по идентификатору.
    pub async fn get_post(&self, id: i64, token: Option<&str>) -> BlogClientResult<Post> {
        let request = self.request(Method::GET, &format!("/api/posts/{id}"), token);
        Self::execute(request).await
    }

    /// Создаёт пост от имени владельца токена.
    pub async fn create_post(&self, token: &str, form: &PostForm) -> BlogClientResult<Post> {
        let request = self
            .request(Method::POST, "/api/posts", Some(token))
            .json(form);
        Self::execute(request).await
    }

    /// Обновляет пост по идентификатору.
    pub async fn update_post(
        &self,
        token: &str,
        id: i64,
        form: &PostForm,
    ) -> BlogClientResult<Post> {
        let request = self
            .request(Method::PUT, &format!("/api/posts/{id}"), Some(token))
            .json(form);
        Self::execute(request).await
    }

    /// Возвращает все комментарии поста плоским списком.
    pub async fn list_comments(
        &self,
        post_id: i64,
        token: Option<&str>,
    ) -> BlogClientResult<Vec<Comment>> {
        let request = self
            .request(Method::GET, "/api/comments", token)
            .query(&CommentsQuery { post_id });
        Self::execute(request).await
    }

    /// Создаёт комментарий.
    pub async fn create_comment(
        &self,
        token: &str,
        comment: &NewComment,
    ) -> BlogClientResult<Comment> {
        let request = self
            .request(Method::POST, "/api/comments", Some(token))
            .json(comment);
        Self::execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:5150/").expect("client must build");
        let full = client.endpoint("/api/posts");
        assert_eq!(full, "http://localhost:5150/api/posts");
    }

    #[test]
    fn endpoint_keeps_nested_path() {
        let client = HttpClient::new("http://localhost:5150").expect("client must build");
        assert_eq!(
            client.endpoint("api/posts/my"),
            "http://localhost:5150/api/posts/my"
        );
    }
}
