use blog_core::session::parse_token;
use blog_core::{TOKEN_KEY, TokenStore};

/// Токен в `localStorage` браузера.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LocalTokenStore;

fn local_storage() -> Result<web_sys::Storage, String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())
}

impl TokenStore for LocalTokenStore {
    type Error = String;

    fn load(&self) -> Result<Option<String>, String> {
        let raw = local_storage()?
            .get_item(TOKEN_KEY)
            .map_err(|_| "failed to read token".to_string())?;
        Ok(raw.as_deref().and_then(parse_token))
    }

    fn save(&self, token: &str) -> Result<(), String> {
        local_storage()?
            .set_item(TOKEN_KEY, token)
            .map_err(|_| "failed to save token".to_string())
    }

    fn clear(&self) -> Result<(), String> {
        local_storage()?
            .remove_item(TOKEN_KEY)
            .map_err(|_| "failed to clear token".to_string())
    }
}
