//! Light / dark / system picker.

use leptos::prelude::*;

use crate::state::theme::ThemeSetting;

/// Segmented control for the theme preference.
///
/// Reads the active setting from the `RwSignal<ThemeSetting>` context. In the
/// browser a click goes through the page session so the preference is
/// persisted and CAPTCHA frames follow; elsewhere it only updates the signal.
#[component]
pub fn ThemeSwitcher() -> impl IntoView {
    let current = expect_context::<RwSignal<ThemeSetting>>();

    let pick = move |setting: ThemeSetting| {
        #[cfg(feature = "csr")]
        {
            crate::boot::select_theme(setting);
        }
        #[cfg(not(feature = "csr"))]
        {
            current.set(setting);
        }
    };

    view! {
        <div class="theme-switcher" role="group" aria-label="Theme">
            {ThemeSetting::ALL
                .into_iter()
                .map(|setting| {
                    let active = move || current.get() == setting;
                    view! {
                        <button
                            type="button"
                            class="theme-switcher__option"
                            class:theme-switcher__option--active=active
                            aria-pressed=move || active().to_string()
                            data-theme=setting.as_str()
                            on:click=move |_| pick(setting)
                        >
                            {setting.label()}
                        </button>
                    }
                })
                .collect::<Vec<_>>()}
        </div>
    }
}
