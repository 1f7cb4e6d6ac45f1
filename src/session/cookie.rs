use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

/// Value of cookie `name` from any `Cookie` header on the request.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value scoped to the whole site. `None` if the name or value
/// cannot appear in a header.
pub fn set_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

pub fn clear_cookie(name: &str, secure: bool) -> Option<HeaderValue> {
    set_cookie(name, "", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; sid=abc123; lang=en"));
        assert_eq!(parse_cookie(&headers, "sid").as_deref(), Some("abc123"));
        assert_eq!(parse_cookie(&headers, "lang").as_deref(), Some("en"));
        assert_eq!(parse_cookie(&headers, "missing"), None);
    }

    #[test]
    fn reads_across_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("sid=xyz"));
        assert_eq!(parse_cookie(&headers, "sid").as_deref(), Some("xyz"));
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sid="));
        assert_eq!(parse_cookie(&headers, "sid"), None);
    }

    #[test]
    fn prefix_names_do_not_match() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sid_old=1"));
        assert_eq!(parse_cookie(&headers, "sid"), None);
    }

    #[test]
    fn set_cookie_attributes() {
        let plain = set_cookie("sid", "tok", 604_800, false).unwrap();
        assert_eq!(
            plain.to_str().unwrap(),
            "sid=tok; Max-Age=604800; Path=/; HttpOnly; SameSite=Lax"
        );
        let secure = set_cookie("sid", "tok", 10, true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
        assert!(set_cookie("bad\nname", "v", 1, false).is_none());
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let v = clear_cookie("sid", false).unwrap();
        assert!(v.to_str().unwrap().starts_with("sid=; Max-Age=0;"));
    }
}
