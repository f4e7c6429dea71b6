//! CSRF token lookup for same-origin AJAX requests.

#[cfg(test)]
#[path = "csrf_test.rs"]
mod csrf_test;

/// Extract the value of cookie `name` from a `document.cookie` string.
///
/// Returns `None` when the cookie is absent or empty.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Read the CSRF token cookie from the current document.
pub fn read_token(cookie_name: &str) -> Option<String> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let html = document.dyn_ref::<web_sys::HtmlDocument>()?;
        let cookies = html.cookie().ok()?;
        cookie_value(&cookies, cookie_name)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = cookie_name;
        None
    }
}
