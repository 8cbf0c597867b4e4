use blog_core::Comment;
use blog_core::views::CommentsView;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::state::AppState;

const INDENT_REM: usize = 2;
const QUOTE_CHARS: usize = 80;

fn load_comments(state: AppState, comments: RwSignal<CommentsView>) {
    let Some(ticket) = comments.try_update(|view| view.load()) else {
        return;
    };
    let post_id = comments.with_untracked(|view| view.post_id());
    let token = state.token();

    spawn_local(async move {
        let result = api::list_comments(post_id, token.as_deref()).await;
        if let Err(err) = &result {
            api::log_error("list comments", err);
        }
        let _ = comments.try_update(|view| view.resolve(ticket, result));
    });
}

fn comment_item(comments: RwSignal<CommentsView>, indent: usize, comment: Comment) -> impl IntoView {
    let id = comment.id;
    let style = format!("margin-left: {}rem", indent * INDENT_REM);
    let posted = format!("Posted on {}", comment.created_at.format("%B %-d, %Y %H:%M"));

    view! {
        <div class="comment" class:reply={indent > 0} style=style>
            <p>{comment.content}</p>
            <div class="comment-meta">
                <span>{posted}</span>
                <button on:click=move |_| comments.update(|view| view.composer_mut().reply_to(id))>
                    "Reply"
                </button>
            </div>
        </div>
    }
}

#[component]
pub(crate) fn Comments(state: AppState, post_id: i64) -> impl IntoView {
    let comments = RwSignal::new(CommentsView::new(post_id));
    load_comments(state, comments);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let session = state.session.get_untracked();
        let Some(body) = comments.try_update(|view| view.submit(&session)).flatten() else {
            return;
        };
        let Some(token) = state.token() else {
            return;
        };

        spawn_local(async move {
            let result = api::create_comment(&token, &body).await;
            if let Err(err) = &result {
                api::log_error("create comment", err);
            }
            let reload = comments
                .try_update(|view| view.resolve_submit(result))
                .unwrap_or(false);
            if reload {
                load_comments(state, comments);
            }
        });
    };

    let reply_target = move || {
        comments.with(|view| {
            view.composer().reply_target().map(|id| {
                let quote = view
                    .forest()
                    .find(id)
                    .map(|comment| comment.content.chars().take(QUOTE_CHARS).collect::<String>())
                    .unwrap_or_default();
                (id, quote)
            })
        })
    };

    view! {
        <section class="comments">
            <h2>"Comments"</h2>

            <Show when=move || comments.with(|view| view.status().error().is_some())>
                <div class="error-banner">
                    {move || {
                        comments.with(|view| view.status().error().unwrap_or_default().to_string())
                    }}
                </div>
            </Show>

            <Show when=move || comments.with(|view| view.status().is_loading())>
                <p class="loading">"Loading comments..."</p>
            </Show>

            <Show
                when=move || comments.with(|view| !view.forest().is_empty())
                fallback=|| view! { <p class="empty">"No comments yet"</p> }
            >
                {move || {
                    comments
                        .with(|view| {
                            view.forest()
                                .render_order()
                                .into_iter()
                                .map(|(indent, comment)| (indent, comment.clone()))
                                .collect::<Vec<_>>()
                        })
                        .into_iter()
                        .map(|(indent, comment)| comment_item(comments, indent, comment))
                        .collect_view()
                }}
            </Show>

            <form class="comment-form" on:submit=on_submit>
                {move || {
                    reply_target()
                        .map(|(id, quote)| {
                            view! {
                                <div class="reply-target">
                                    <span>{format!("Replying to comment #{id}")}</span>
                                    <blockquote>{quote}</blockquote>
                                    <button
                                        type="button"
                                        on:click=move |_| {
                                            comments.update(|view| view.composer_mut().cancel_reply())
                                        }
                                    >
                                        "Cancel"
                                    </button>
                                </div>
                            }
                        })
                }}
                <textarea
                    placeholder="Write a comment..."
                    prop:value=move || comments.with(|view| view.composer().draft().to_string())
                    on:input=move |ev| {
                        comments.update(|view| view.composer_mut().set_draft(event_target_value(&ev)))
                    }
                ></textarea>
                <button
                    type="submit"
                    disabled=move || comments.with(|view| view.composer().is_submitting())
                >
                    {move || {
                        if comments.with(|view| view.composer().is_submitting()) {
                            "Posting..."
                        } else {
                            "Post Comment"
                        }
                    }}
                </button>
            </form>
        </section>
    }
}
