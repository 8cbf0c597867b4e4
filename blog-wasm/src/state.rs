use blog_core::{ApiResult, CurrentUser, Route, Session, TokenStore};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::storage::LocalTokenStore;

fn log_storage_error(err: &str) {
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(err));
}

pub(crate) fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

fn initial_route() -> Route {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .map(|path| Route::from_path(&path))
        .unwrap_or(Route::Home)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct AppState {
    pub(crate) session: RwSignal<Session>,
    pub(crate) route: RwSignal<Route>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            session: RwSignal::new(Session::restore(&LocalTokenStore)),
            route: RwSignal::new(initial_route()),
        }
    }

    pub(crate) fn navigate(&self, route: Route) {
        self.route.set(route);
        scroll_to_top();
    }

    /// Переход, отложенный до конца текущего рендера.
    pub(crate) fn redirect(&self, route: Route) {
        let state = *self;
        spawn_local(async move { state.navigate(route) });
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.session
            .with_untracked(|session| session.token().map(str::to_string))
    }

    pub(crate) fn login(&self, token: String) {
        if let Err(err) = LocalTokenStore.save(&token) {
            log_storage_error(&err);
        }
        self.session.update(|session| session.set_token(token));
    }

    pub(crate) fn logout(&self) {
        if let Err(err) = LocalTokenStore.clear() {
            log_storage_error(&err);
        }
        self.session.update(Session::logout);
    }

    /// Любая ошибка проверки пользователя сбрасывает сохранённый токен,
    /// если за время запроса токен не сменился.
    pub(crate) fn apply_current_user(&self, checked_token: &str, result: ApiResult<CurrentUser>) {
        let mut cleared = false;
        self.session
            .update(|session| cleared = session.apply_current_user(checked_token, result));
        if cleared && let Err(err) = LocalTokenStore.clear() {
            log_storage_error(&err);
        }
    }
}
