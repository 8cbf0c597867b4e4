use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Пост блога.
///
/// В ответах списка поле `content` отсутствует и остаётся пустым.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Содержимое в markdown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Краткое описание.
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    /// Опубликован ли пост.
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    /// Момент публикации (UTC), если пост опубликован.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
    /// `pid` владельца поста.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Текст комментария.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// `pid` автора.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    /// Пост, к которому относится комментарий.
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_id: i64,
    /// Родительский комментарий; `None` для комментариев верхнего уровня.
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Страница выборки с параметрами пагинации.
pub struct Page<T> {
    /// Элементы текущей страницы.
    pub items: Vec<T>,
    /// Общее количество элементов.
    pub total: u64,
    /// Номер страницы, начиная с 1.
    pub page: u32,
    /// Размер страницы.
    pub page_size: u32,
    /// Общее количество страниц.
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Текущий пользователь по данным `/api/auth/current`.
pub struct CurrentUser {
    /// Публичный идентификатор пользователя.
    pub pid: String,
    /// Email.
    pub email: String,
    /// Отображаемое имя.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Ответ `/api/auth/login`.
pub struct LoginResponse {
    /// Bearer-токен.
    pub token: String,
    /// `pid` пользователя, если сервер его вернул.
    #[serde(default)]
    pub pid: Option<String>,
    /// Имя пользователя, если сервер его вернул.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Тело создания и обновления поста.
pub struct PostForm {
    /// Заголовок.
    pub title: String,
    /// Содержимое в markdown.
    pub content: String,
    /// Краткое описание.
    pub summary: String,
    /// Публиковать ли пост.
    pub published: bool,
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            summary: post.summary.clone(),
            published: post.published,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Тело создания комментария.
pub struct NewComment {
    /// Текст комментария.
    pub content: String,
    /// Пост, к которому пишется комментарий.
    pub post_id: i64,
    /// Комментарий, на который дан ответ.
    pub parent_id: Option<i64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
