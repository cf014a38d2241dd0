use url::Url;

/// Environment variable consulted when nothing else supplies an API key.
pub const API_KEY_ENV: &str = "WAVE_API_KEY";

const KEY_PARAM: &str = "key";

/// Where the running program can observe a page URL.
///
/// Browser builds read `location.href`; everything else has no location.
/// Injected into credential resolution so the chain is testable without a
/// DOM.
pub trait LocationSource {
    /// Full URL of the current page, when there is one.
    fn href(&self) -> Option<String>;
}

/// Location source for environments without a page URL.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLocation;

impl LocationSource for NoLocation {
    fn href(&self) -> Option<String> {
        None
    }
}

/// Reads `location.href` from the browser global scope. Any failure along
/// the way reads as "no location".
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLocation;

#[cfg(target_arch = "wasm32")]
impl LocationSource for BrowserLocation {
    fn href(&self) -> Option<String> {
        use wasm_bindgen::JsValue;

        let global = js_sys::global();
        let location = js_sys::Reflect::get(&global, &JsValue::from_str("location")).ok()?;
        let href = js_sys::Reflect::get(&location, &JsValue::from_str("href")).ok()?;
        href.as_string()
    }
}

/// Resolves the API key for a client.
///
/// Sources are consulted in a fixed order and the first hit wins: the
/// explicit argument, the page URL's `key` query parameter, its `key`
/// fragment parameter, and finally the [`API_KEY_ENV`] environment variable.
/// Browser builds never consult the environment. Blank values and
/// unparseable URLs fall through silently.
pub fn resolve_credential(explicit: Option<&str>, location: &dyn LocationSource) -> Option<String> {
    if let Some(key) = non_blank(explicit) {
        return Some(key);
    }
    if let Some(key) = location.href().as_deref().and_then(key_from_href) {
        return Some(key);
    }
    env_credential()
}

fn key_from_href(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;

    let from_query = url
        .query_pairs()
        .find(|(name, _)| name == KEY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());
    if from_query.is_some() {
        return from_query;
    }

    let fragment = url.fragment()?;
    url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(name, _)| name == KEY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(not(target_arch = "wasm32"))]
fn env_credential() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .as_deref()
        .and_then(|value| non_blank(Some(value)))
}

#[cfg(target_arch = "wasm32")]
fn env_credential() -> Option<String> {
    None
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::{resolve_credential, LocationSource, NoLocation, API_KEY_ENV};

    struct FixedLocation(Option<&'static str>);

    impl LocationSource for FixedLocation {
        fn href(&self) -> Option<String> {
            self.0.map(str::to_owned)
        }
    }

    #[test]
    fn explicit_key_wins_over_page_url() {
        let location = FixedLocation(Some("https://study.example/run?key=from-url"));
        let key = resolve_credential(Some("explicit"), &location);
        assert_eq!(key.as_deref(), Some("explicit"));
    }

    #[test]
    fn blank_explicit_key_falls_through() {
        let location = FixedLocation(Some("https://study.example/run?key=from-url"));
        let key = resolve_credential(Some("   "), &location);
        assert_eq!(key.as_deref(), Some("from-url"));
    }

    #[test]
    fn query_parameter_beats_fragment() {
        let location =
            FixedLocation(Some("https://study.example/run?key=from-query#key=from-fragment"));
        let key = resolve_credential(None, &location);
        assert_eq!(key.as_deref(), Some("from-query"));
    }

    #[test]
    fn fragment_parameter_used_when_query_has_no_key() {
        let location =
            FixedLocation(Some("https://study.example/run?session=9#trial=2&key=from-fragment"));
        let key = resolve_credential(None, &location);
        assert_eq!(key.as_deref(), Some("from-fragment"));
    }

    #[test]
    fn empty_url_values_do_not_count() {
        assert_eq!(super::key_from_href("https://study.example/run?key=#key="), None);
    }

    #[test]
    fn unparseable_href_yields_nothing() {
        assert_eq!(super::key_from_href("not a url at all"), None);
    }

    #[test]
    fn fragment_with_bare_key_value() {
        assert_eq!(
            super::key_from_href("https://study.example/run#key=wv_12345").as_deref(),
            Some("wv_12345")
        );
    }

    // Environment access is process-global, so every env-dependent case
    // lives in this one test.
    #[test]
    fn environment_is_the_last_resort() {
        std::env::remove_var(API_KEY_ENV);
        assert_eq!(resolve_credential(None, &NoLocation), None);

        std::env::set_var(API_KEY_ENV, "from-env");
        assert_eq!(
            resolve_credential(None, &NoLocation).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            resolve_credential(Some("explicit"), &NoLocation).as_deref(),
            Some("explicit")
        );

        std::env::remove_var(API_KEY_ENV);
        assert_eq!(resolve_credential(None, &NoLocation), None);
    }
}
