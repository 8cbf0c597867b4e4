use blog_core::views::PostDetailView;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::auth_panel::refresh_current_user;
use crate::components::comments::Comments;
use crate::state::AppState;

fn load_post(state: AppState, detail: RwSignal<PostDetailView>) {
    let Some(ticket) = detail.try_update(|view| view.load()) else {
        return;
    };
    let post_id = detail.with_untracked(|view| view.post_id());
    let token = state.token();

    spawn_local(async move {
        let result = api::get_post(post_id, token.as_deref()).await;
        if let Err(err) = &result {
            api::log_error("get post", err);
        }
        let session = state.session.get_untracked();
        let accepted = detail
            .try_update(|view| view.resolve_post(ticket, result, &session))
            .unwrap_or(false);
        if !accepted {
            return;
        }

        let needs_user = detail.with_untracked(|view| view.needs_current_user(&session));
        if needs_user {
            refresh_current_user(state);
        }
    });
}

#[component]
pub(crate) fn PostShow(state: AppState, post_id: i64) -> impl IntoView {
    let detail = RwSignal::new(PostDetailView::new(post_id));
    load_post(state, detail);

    // Автор пересчитывается при входе, выходе и загрузке пользователя.
    Effect::new(move |_| {
        let session = state.session.get();
        detail.update(|view| view.resolve_author(&session));
    });

    let post = move || detail.with(|view| view.post().cloned());
    let edit_route = move || detail.with(|view| view.edit_route());

    view! {
        <section class="post-detail">
            <Show when=move || detail.with(|view| view.status().is_loading())>
                <p class="loading">"Loading..."</p>
            </Show>

            <Show when=move || detail.with(|view| view.status().error().is_some())>
                <div class="error-banner">
                    {move || detail.with(|view| view.status().error().unwrap_or_default().to_string())}
                </div>
            </Show>

            {move || {
                post()
                    .map(|post| {
                        let published = post
                            .published_at
                            .map(|ts| format!("Published: {}", ts.format("%B %-d, %Y")))
                            .unwrap_or_else(|| "Published: Draft".to_string());
                        let created = format!("Created: {}", post.created_at.format("%B %-d, %Y"));

                        view! {
                            <article>
                                <header>
                                    <h1>{post.title}</h1>
                                    {move || {
                                        edit_route()
                                            .map(|route| {
                                                view! {
                                                    <button on:click=move |_| state.navigate(route)>
                                                        "Edit"
                                                    </button>
                                                }
                                            })
                                    }}
                                    <p class="meta">{published}" · "{created}</p>
                                </header>
                                <p class="summary">{post.summary}</p>
                                <div class="markdown-content">
                                    <pre>{post.content}</pre>
                                </div>
                            </article>
                        }
                    })
            }}

            <Comments state=state post_id=post_id />
        </section>
    }
}
