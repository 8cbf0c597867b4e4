use blog_core::Route;
use blog_core::views::{EditorMode, ListingScope};
use leptos::prelude::*;

use crate::components::auth_panel::{AuthPanel, refresh_current_user};
use crate::components::post_editor::PostEditor;
use crate::components::post_list::PostList;
use crate::components::post_show::PostShow;
use crate::state::AppState;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    refresh_current_user(state);

    let screen = move || match state.route.get() {
        Route::Home => view! { <PostList state=state scope=ListingScope::All /> }.into_any(),
        Route::Dashboard => view! { <PostList state=state scope=ListingScope::Mine /> }.into_any(),
        Route::PostDetail(id) => view! { <PostShow state=state post_id=id /> }.into_any(),
        Route::NewPost => view! { <PostEditor state=state mode=EditorMode::New /> }.into_any(),
        Route::EditPost(id) => {
            view! { <PostEditor state=state mode=EditorMode::Edit(id) /> }.into_any()
        }
    };

    view! {
        <main class="page">
            <section class="container">
                <header class="site-header">
                    <a class="brand" href="#" on:click=move |ev| {
                        ev.prevent_default();
                        state.navigate(Route::Home);
                    }>
                        "Rust Blog"
                    </a>
                    <Show when=move || state.session.with(|session| session.is_authenticated())>
                        <button on:click=move |_| state.navigate(Route::Dashboard)>"My Posts"</button>
                    </Show>
                    <AuthPanel state=state />
                </header>

                {screen}
            </section>
        </main>
    }
}
