use blog_core::session::bearer_value;
use blog_core::{
    ApiError, Comment, CurrentUser, LoginResponse, NewComment, Page, Post, PostForm,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:5150",
};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn with_auth(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &bearer_value(token)),
        None => builder,
    }
}

/// Пишет ошибку запроса в консоль браузера.
pub(crate) fn log_error(context: &str, err: &ApiError) {
    web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(&format!("{context}: {err}")));
}

async fn parse_error_body(response: Response) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    ApiError::from_status(status, &text)
}

async fn finish<T: DeserializeOwned>(
    response: Result<Response, gloo_net::Error>,
) -> Result<T, ApiError> {
    let response = response.map_err(|err| ApiError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn send_json<B: Serialize, T: DeserializeOwned>(
    builder: RequestBuilder,
    body: &B,
) -> Result<T, ApiError> {
    let request = builder
        .json(body)
        .map_err(|err| ApiError::Network(err.to_string()))?;
    finish(request.send().await).await
}

pub(crate) async fn login(email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let payload = LoginRequest { email, password };
    send_json(Request::post(&endpoint("/api/auth/login")), &payload).await
}

pub(crate) async fn current_user(token: &str) -> Result<CurrentUser, ApiError> {
    let builder = with_auth(Request::get(&endpoint("/api/auth/current")), Some(token));
    finish(builder.send().await).await
}

pub(crate) async fn list_posts(
    path: &str,
    page: u32,
    page_size: u32,
    token: Option<&str>,
) -> Result<Page<Post>, ApiError> {
    let url = endpoint(&format!("{path}?page={page}&page_size={page_size}"));
    let builder = with_auth(Request::get(&url), token);
    finish(builder.send().await).await
}

pub(crate) async fn get_post(id: i64, token: Option<&str>) -> Result<Post, ApiError> {
    let builder = with_auth(Request::get(&endpoint(&format!("/api/posts/{id}"))), token);
    finish(builder.send().await).await
}

pub(crate) async fn create_post(token: &str, form: &PostForm) -> Result<Post, ApiError> {
    let builder = with_auth(Request::post(&endpoint("/api/posts")), Some(token));
    send_json(builder, form).await
}

pub(crate) async fn update_post(token: &str, id: i64, form: &PostForm) -> Result<Post, ApiError> {
    let builder = with_auth(
        Request::put(&endpoint(&format!("/api/posts/{id}"))),
        Some(token),
    );
    send_json(builder, form).await
}

pub(crate) async fn list_comments(
    post_id: i64,
    token: Option<&str>,
) -> Result<Vec<Comment>, ApiError> {
    let url = endpoint(&format!("/api/comments?post_id={post_id}"));
    let builder = with_auth(Request::get(&url), token);
    finish(builder.send().await).await
}

pub(crate) async fn create_comment(token: &str, body: &NewComment) -> Result<Comment, ApiError> {
    let builder = with_auth(Request::post(&endpoint("/api/comments")), Some(token));
    send_json(builder, body).await
}
