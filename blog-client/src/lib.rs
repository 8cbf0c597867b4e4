//! Клиентская библиотека для REST API блога.
//!
//! Предоставляет `BlogClient` поверх HTTP (`reqwest`). Клиент держит явную
//! [`Session`]: токен появляется после `login`, используется в защищённых
//! операциях и сбрасывается при `logout` или отказе проверки пользователя.
#![warn(missing_docs)]

mod error;
mod http_client;

pub use blog_core::{
    ApiError, Comment, CurrentUser, LoginResponse, NewComment, Page, Post, PostForm, Session,
};
pub use error::{BlogClientError, BlogClientResult};

use blog_core::views::{ListingScope, PageRequest};
use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент блог-сервиса с явной сессией.
pub struct BlogClient {
    http_client: HttpClient,
    session: Session,
}

impl BlogClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:5150`.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(base_url)?,
            session: Session::anonymous(),
        })
    }

    /// Устанавливает токен вручную (например, из файла).
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set_token(token);
    }

    /// Возвращает текущий токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Сбрасывает сессию.
    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Текущая сессия.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Выполняет вход и сохраняет полученный токен в сессии.
    pub async fn login(&mut self, email: &str, password: &str) -> BlogClientResult<LoginResponse> {
        let result = self.http_client.login(email, password).await?;
        self.session.set_token(result.token.clone());
        Ok(result)
    }

    /// Проверяет токен на сервере.
    ///
    /// При успехе пользователь запоминается в сессии; любая ошибка сбрасывает
    /// сессию в анонимную и возвращается вызывающему.
    pub async fn current_user(&mut self) -> BlogClientResult<CurrentUser> {
        let token = self.require_token()?.to_string();
        match self.http_client.current_user(&token).await {
            Ok(user) => {
                self.session.apply_current_user(&token, Ok(user.clone()));
                Ok(user)
            }
            Err(err) => {
                tracing::info!(error = %err, "current user check failed, logging out");
                self.session.logout();
                Err(err)
            }
        }
    }

    /// Возвращает страницу всех постов.
    pub async fn list_posts(&self, page: u32, page_size: u32) -> BlogClientResult<Page<Post>> {
        self.http_client
            .list_posts(ListingScope::All.path(), page, page_size, self.session.token())
            .await
    }

    /// Возвращает страницу постов текущего пользователя.
    ///
    /// Требует установленный токен.
    pub async fn list_my_posts(&self, page: u32, page_size: u32) -> BlogClientResult<Page<Post>> {
        let token = self.require_token()?;
        self.http_client
            .list_posts(ListingScope::Mine.path(), page, page_size, Some(token))
            .await
    }

    /// Выполняет запрос страницы, выданный [`blog_core::views::ListingView`].
    pub async fn fetch_page(&self, request: &PageRequest) -> BlogClientResult<Page<Post>> {
        match request.scope {
            ListingScope::All => self.list_posts(request.page, request.page_size).await,
            ListingScope::Mine => self.list_my_posts(request.page, request.page_size).await,
        }
    }

    /// Возвращает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> BlogClientResult<Post> {
        self.http_client.get_post(id, self.session.token()).await
    }

    /// Создаёт новый пост.
    ///
    /// Требует установленный токен.
    pub async fn create_post(&self, form: &PostForm) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http_client.create_post(token, form).await
    }

    /// Обновляет пост по идентификатору.
    ///
    /// Требует установленный токен.
    pub async fn update_post(&self, id: i64, form: &PostForm) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http_client.update_post(token, id, form).await
    }

    /// Возвращает комментарии поста.
    pub async fn list_comments(&self, post_id: i64) -> BlogClientResult<Vec<Comment>> {
        self.http_client
            .list_comments(post_id, self.session.token())
            .await
    }

    /// Создаёт комментарий.
    ///
    /// Требует установленный токен; без него запрос не отправляется.
    pub async fn create_comment(&self, comment: &NewComment) -> BlogClientResult<Comment> {
        let token = self.require_token()?;
        self.http_client.create_comment(token, comment).await
    }

    fn require_token(&self) -> BlogClientResult<&str> {
        self.session
            .require_token()
            .map_err(|_| BlogClientError::MissingCredential)
    }
}
