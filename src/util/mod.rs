pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// dd/mm/yyyy, the format the note cards display.
pub(crate) fn format_date_dmy(iso: &str) -> String {
    if iso.trim().is_empty() {
        return String::new();
    }

    let d = js_sys::Date::new(&iso.into());
    let t = d.get_time();
    if t.is_nan() {
        return String::new();
    }

    format!(
        "{:02}/{:02}/{:04}",
        d.get_date(),
        d.get_month() + 1,
        d.get_full_year()
    )
}

/// Good-enough email shape check for the profile form; the server
/// performs the authoritative validation.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !local.contains(char::is_whitespace)
        && !domain.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain.split_once('.').is_some_and(|(host, tld)| {
            !host.is_empty() && !tld.is_empty()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("  user@sub.example.org "));
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email("user@exa mple.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email(""));
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` +
// wasm-bindgen-test-runner); js_sys::Date needs a JS runtime.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_format_date_dmy() {
        assert_eq!(format_date_dmy("2025-03-09T10:30:00"), "09/03/2025");
        assert_eq!(format_date_dmy(""), "");
        assert_eq!(format_date_dmy("not-a-date"), "");
    }

    #[wasm_bindgen_test]
    fn test_now_ms_monotonic_enough() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }
}
