use blog_core::views::{EditorLoad, EditorMode, EditorSubmit, PostEditorView};
use blog_core::{ApiError, Post, Route};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::state::AppState;

fn load_post(state: AppState, editor: RwSignal<PostEditorView>) {
    let session = state.session.get_untracked();
    match editor.try_update(|view| view.load(&session)) {
        Some(EditorLoad::Fetch { ticket, post_id }) => {
            let token = state.token();
            spawn_local(async move {
                let result = api::get_post(post_id, token.as_deref()).await;
                if let Err(err) = &result {
                    api::log_error("get post", err);
                }
                let _ = editor.try_update(|view| view.resolve_load(ticket, result));
            });
        }
        Some(EditorLoad::Redirect(route)) => state.redirect(route),
        Some(EditorLoad::Ready) | None => {}
    }
}

fn finish_submit(state: AppState, editor: RwSignal<PostEditorView>, result: Result<Post, ApiError>) {
    if let Err(err) = &result {
        api::log_error("save post", err);
    }
    if let Some(Some(route)) = editor.try_update(|view| view.resolve_submit(result)) {
        state.navigate(route);
    }
}

#[component]
pub(crate) fn PostEditor(state: AppState, mode: EditorMode) -> impl IntoView {
    let editor = RwSignal::new(PostEditorView::new(mode));
    load_post(state, editor);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let session = state.session.get_untracked();
        let Some(step) = editor.try_update(|view| view.submit(&session)) else {
            return;
        };
        let token = state.token().unwrap_or_default();

        match step {
            EditorSubmit::Create(form) => spawn_local(async move {
                let result = api::create_post(&token, &form).await;
                finish_submit(state, editor, result);
            }),
            EditorSubmit::Update(id, form) => spawn_local(async move {
                let result = api::update_post(&token, id, &form).await;
                finish_submit(state, editor, result);
            }),
            EditorSubmit::Redirect(route) => state.navigate(route),
            EditorSubmit::Rejected => {}
        }
    };

    let heading = editor.with_untracked(|view| view.heading());

    view! {
        <section class="post-editor">
            <h1>{heading}</h1>

            <Show when=move || editor.with(|view| view.status().error().is_some())>
                <div class="error-banner">
                    {move || editor.with(|view| view.status().error().unwrap_or_default().to_string())}
                </div>
            </Show>

            <form on:submit=on_submit>
                <label>
                    "Title"
                    <input
                        type="text"
                        prop:value=move || editor.with(|view| view.form().title.clone())
                        on:input=move |ev| {
                            editor.update(|view| view.form_mut().title = event_target_value(&ev))
                        }
                    />
                </label>
                <label>
                    "Summary"
                    <input
                        type="text"
                        prop:value=move || editor.with(|view| view.form().summary.clone())
                        on:input=move |ev| {
                            editor.update(|view| view.form_mut().summary = event_target_value(&ev))
                        }
                    />
                </label>
                <label>
                    "Content (Markdown)"
                    <textarea
                        rows="16"
                        prop:value=move || editor.with(|view| view.form().content.clone())
                        on:input=move |ev| {
                            editor.update(|view| view.form_mut().content = event_target_value(&ev))
                        }
                    ></textarea>
                </label>
                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || editor.with(|view| view.form().published)
                        on:change=move |ev| {
                            editor.update(|view| view.form_mut().published = event_target_checked(&ev))
                        }
                    />
                    "Published"
                </label>
                <div class="actions">
                    <button type="submit" disabled=move || {
                        editor.with(|view| view.status().is_loading() || view.is_submitting())
                    }>
                        "Save"
                    </button>
                    <button type="button" on:click=move |_| state.navigate(Route::Dashboard)>
                        "Cancel"
                    </button>
                </div>
            </form>
        </section>
    }
}
