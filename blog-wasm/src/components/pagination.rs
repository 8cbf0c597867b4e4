use blog_core::{PageAction, Paginator};
use leptos::prelude::*;

#[component]
pub(crate) fn Pagination(
    paginator: Signal<Paginator>,
    on_change: Callback<PageAction>,
) -> impl IntoView {
    let controls = move || paginator.get().controls();

    view! {
        <Show when=move || { paginator.get().total_pages() > 1 }>
            <nav class="pagination">
                <button
                    disabled=move || !controls().first
                    on:click=move |_| on_change.run(PageAction::First)
                >
                    "«"
                </button>
                <button
                    disabled=move || !controls().previous
                    on:click=move |_| on_change.run(PageAction::Previous)
                >
                    "‹"
                </button>
                {move || {
                    let current = paginator.get().current_page();
                    paginator
                        .get()
                        .window()
                        .into_iter()
                        .map(|page| {
                            view! {
                                <button
                                    class:active={page == current}
                                    on:click=move |_| on_change.run(PageAction::Goto(page))
                                >
                                    {page}
                                </button>
                            }
                        })
                        .collect_view()
                }}
                <button
                    disabled=move || !controls().next
                    on:click=move |_| on_change.run(PageAction::Next)
                >
                    "›"
                </button>
                <button
                    disabled=move || !controls().last
                    on:click=move |_| on_change.run(PageAction::Last)
                >
                    "»"
                </button>
            </nav>
        </Show>
    }
}
