//! Reactive tag filter bar.

use leptos::prelude::*;

use crate::config::TagConfig;
use crate::state::tag_filter::TagFilter;

fn toggle(filter: RwSignal<TagFilter>, tag: String) {
    #[cfg(feature = "csr")]
    {
        let _ = filter;
        crate::boot::toggle_tag(&tag);
    }
    #[cfg(not(feature = "csr"))]
    {
        filter.update(|f| {
            f.toggle_tag(&tag);
        });
    }
}

fn clear(filter: RwSignal<TagFilter>) {
    #[cfg(feature = "csr")]
    {
        let _ = filter;
        crate::boot::clear_filters();
    }
    #[cfg(not(feature = "csr"))]
    {
        filter.update(TagFilter::clear_filters);
    }
}

/// One button per catalog tag, a clear control and the hidden inputs that
/// carry the selection on form submit.
///
/// Reads `RwSignal<TagFilter>` and `TagConfig` from context. The catalog is
/// fixed at init, so buttons are built once; only their state is reactive.
#[component]
pub fn TagFilterBar() -> impl IntoView {
    let filter = expect_context::<RwSignal<TagFilter>>();
    let config = expect_context::<TagConfig>();

    let catalog = filter.with_untracked(|f| f.catalog().to_vec());
    let has_selection = move || filter.with(|f| !f.selection().is_empty());
    let clear_config = config.clone();
    let clear_class = move || filter.with(|f| f.clear_control(&clear_config).class_string());

    view! {
        <div class="tag-filter-bar">
            <div class="tag-filter-bar__tags">
                {catalog
                    .into_iter()
                    .map(|tag| {
                        let selected_tag = tag.clone();
                        let click_tag = tag.clone();
                        let selected = move || filter.with(|f| f.is_tag_selected(&selected_tag));
                        view! {
                            <button
                                type="button"
                                class="tag-filter-bar__tag"
                                class:selected=selected
                                on:click=move |_| toggle(filter, click_tag.clone())
                            >
                                {tag}
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>
            <button
                type="button"
                class=clear_class
                disabled=move || !has_selection()
                on:click=move |_| clear(filter)
            >
                "Clear filters"
            </button>
            <div class="tag-filter-bar__fields">
                {move || {
                    filter
                        .with(TagFilter::hidden_fields)
                        .into_iter()
                        .map(|field| view! { <input type="hidden" name=field.name value=field.value/> })
                        .collect::<Vec<_>>()
                }}
            </div>
        </div>
    }
}
