use blog_core::{Route, gravatar_url};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::state::AppState;

/// Проверяет сохранённый токен через `/api/auth/current`.
pub(crate) fn refresh_current_user(state: AppState) {
    let Some(token) = state.token() else {
        return;
    };

    spawn_local(async move {
        let result = api::current_user(&token).await;
        if let Err(err) = &result {
            api::log_error("current user", err);
        }
        state.apply_current_user(&token, result);
    });
}

#[component]
pub(crate) fn AuthPanel(state: AppState) -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_form = RwSignal::new(false);
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_login = move |ev: SubmitEvent| {
        ev.prevent_default();
        error.set(None);

        let login_email = email.get().trim().to_string();
        let login_password = password.get();
        if login_email.is_empty() || login_password.is_empty() {
            error.set(Some("Email and password are required".to_string()));
            return;
        }

        busy.set(true);
        spawn_local(async move {
            match api::login(&login_email, &login_password).await {
                Ok(response) => {
                    state.login(response.token);
                    password.set(String::new());
                    show_form.set(false);
                    refresh_current_user(state);
                }
                Err(err) => {
                    api::log_error("login", &err);
                    error.set(Some(format!("Login failed: {err}")));
                }
            }
            busy.set(false);
        });
    };

    let on_logout = move |_| {
        state.logout();
        state.navigate(Route::Home);
    };

    let user_name = move || {
        state.session.with(|session| {
            session
                .user()
                .map(|user| user.name.clone())
                .unwrap_or_default()
        })
    };

    let avatar = move || {
        state.session.with(|session| {
            session.user().map(|user| {
                view! { <img class="avatar" src=gravatar_url(&user.email, 40) alt=user.name.clone() /> }
            })
        })
    };

    view! {
        <div class="auth-panel">
            <Show
                when=move || state.session.with(|session| session.is_authenticated())
                fallback=move || {
                    view! {
                        <button on:click=move |_| show_form.update(|open| *open = !*open)>
                            "Login"
                        </button>
                    }
                }
            >
                {avatar}
                <span class="user-name">{user_name}</span>
                <button on:click=move |_| state.navigate(Route::NewPost)>"New Post"</button>
                <button on:click=on_logout>"Logout"</button>
            </Show>

            <Show when=move || show_form.get() && !state.session.with(|s| s.is_authenticated())>
                <form class="login-form" on:submit=on_login>
                    <input
                        type="email"
                        placeholder="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        placeholder="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
            </Show>

            <Show when=move || error.get().is_some()>
                <p class="error">{move || error.get().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}
