use blog_core::pagination::DEFAULT_PAGE_SIZE;
use blog_core::views::{ListingScope, ListingStep, ListingView, PageRequest};
use blog_core::{PageAction, Post, Route};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::pagination::Pagination;
use crate::state::{AppState, scroll_to_top};

fn fetch_page(state: AppState, listing: RwSignal<ListingView>, request: PageRequest) {
    let token = state.token();
    spawn_local(async move {
        let result = api::list_posts(
            request.scope.path(),
            request.page,
            request.page_size,
            token.as_deref(),
        )
        .await;
        if let Err(err) = &result {
            api::log_error("list posts", err);
        }
        let _ = listing.try_update(|view| view.resolve(request.ticket, result));
    });
}

fn run_step(state: AppState, listing: RwSignal<ListingView>, step: ListingStep) {
    match step {
        ListingStep::Fetch(request) => fetch_page(state, listing, request),
        ListingStep::Redirect(route) => state.redirect(route),
    }
}

fn post_card(state: AppState, scope: ListingScope, post: Post) -> impl IntoView {
    let id = post.id;
    let meta = match (scope, post.published_at) {
        (ListingScope::Mine, _) if !post.published => {
            format!("Draft, created {}", post.created_at.format("%B %-d, %Y"))
        }
        (_, Some(published_at)) => format!("Published on {}", published_at.format("%B %-d, %Y")),
        _ => String::new(),
    };

    view! {
        <article class="post-card" on:click=move |_| state.navigate(Route::PostDetail(id))>
            <h2>{post.title}</h2>
            <p class="meta">{meta}</p>
            <p class="summary">{post.summary}</p>
        </article>
    }
}

#[component]
pub(crate) fn PostList(state: AppState, scope: ListingScope) -> impl IntoView {
    let listing = RwSignal::new(ListingView::new(scope, DEFAULT_PAGE_SIZE));

    let session = state.session.get_untracked();
    if let Some(step) = listing.try_update(|view| view.reload(&session)) {
        run_step(state, listing, step);
    }

    let on_change = Callback::new(move |action: PageAction| {
        let session = state.session.get_untracked();
        if let Some(Some(step)) = listing.try_update(|view| view.navigate(&session, action)) {
            scroll_to_top();
            run_step(state, listing, step);
        }
    });

    let paginator = Signal::derive(move || listing.with(|view| view.paginator()));
    let heading = match scope {
        ListingScope::All => "Blog Posts",
        ListingScope::Mine => "My Posts",
    };

    view! {
        <section class="post-list">
            <h1>{heading}</h1>

            <Show when=move || listing.with(|view| view.status().error().is_some())>
                <div class="error-banner">
                    {move || {
                        listing.with(|view| view.status().error().unwrap_or_default().to_string())
                    }}
                </div>
            </Show>

            <Show when=move || listing.with(|view| view.status().is_loading())>
                <p class="loading">"Loading..."</p>
            </Show>

            <Show when=move || {
                listing.with(|view| !view.status().is_loading() && view.posts().is_empty())
            }>
                <p class="empty">"No posts yet"</p>
            </Show>

            {move || {
                listing
                    .with(|view| view.posts().to_vec())
                    .into_iter()
                    .map(|post| post_card(state, scope, post))
                    .collect_view()
            }}

            <Pagination paginator=paginator on_change=on_change />
        </section>
    }
}
