#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Экран, на который переходит фронтенд.
pub enum Route {
    /// Лента опубликованных постов.
    Home,
    /// Посты текущего пользователя.
    Dashboard,
    /// Страница поста.
    PostDetail(i64),
    /// Форма нового поста.
    NewPost,
    /// Форма редактирования поста.
    EditPost(i64),
}

impl Route {
    /// Путь экрана в адресной строке.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::PostDetail(id) => format!("/post/{id}"),
            Self::NewPost => "/new-post".to_string(),
            Self::EditPost(id) => format!("/edit-post/{id}"),
        }
    }

    /// Разбирает путь; неизвестные пути ведут на главную.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["dashboard"] => Self::Dashboard,
            ["new-post"] => Self::NewPost,
            ["post", id] => id.parse().map(Self::PostDetail).unwrap_or(Self::Home),
            ["edit-post", id] => id.parse().map(Self::EditPost).unwrap_or(Self::Home),
            _ => Self::Home,
        }
    }
}
