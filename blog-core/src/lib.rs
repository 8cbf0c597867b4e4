//! Переиспользуемое ядро блог-фронтенда без ввода-вывода.
//!
//! Содержит модель данных API, пагинатор, построитель дерева комментариев,
//! явную сессию пользователя и оркестраторы экранов. Сетевые вызовы делают
//! фронтенды (`blog-cli`, `blog-wasm`): оркестраторы только выдают описания
//! запросов и принимают их результаты.
#![warn(missing_docs)]

mod avatar;
mod error;
mod generation;
mod models;
pub mod pagination;
mod routes;
pub mod session;
pub mod threads;
pub mod views;

pub use avatar::gravatar_url;
pub use error::{ApiError, ApiResult};
pub use generation::{Generation, RequestTicket};
pub use models::{Comment, CurrentUser, LoginResponse, NewComment, Page, Post, PostForm};
pub use pagination::{NavControls, PageAction, Paginator, compute_window};
pub use routes::Route;
pub use session::{MemoryTokenStore, Session, TOKEN_KEY, TokenStore};
pub use threads::{CommentForest, CommentThread, MAX_INDENT_DEPTH};
