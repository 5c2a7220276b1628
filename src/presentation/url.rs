//! URL conventions for presentation contexts.

/// Query parameter marking a page as a presentation context.
const PRESENTATION_MARKER: &str = "presentation=1";

/// Derive the presentation URL for a page: append the marker with `&` if
/// the page already has a query string, `?` otherwise.
pub fn presentation_url(page_url: &str) -> String {
    let separator = if page_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", page_url, separator, PRESENTATION_MARKER)
}

/// Whether a URL carries the presentation marker parameter.
pub fn has_presentation_marker(url: &str) -> bool {
    match url.split_once('?') {
        Some((_, query)) => query
            .split('&')
            .any(|param| param.split('=').next() == Some("presentation")),
        None => false,
    }
}

/// Presentation URL for a specific invoice.
pub fn invoice_presentation_url(id: i64) -> String {
    format!("/presentation/invoice/{}", id)
}

/// The `scheme://host[:port]` part of an absolute URL, or None for
/// relative URLs.
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_appended_with_question_mark() {
        assert_eq!(
            presentation_url("http://localhost:5000/invoices"),
            "http://localhost:5000/invoices?presentation=1"
        );
    }

    #[test]
    fn test_marker_appended_with_ampersand() {
        assert_eq!(
            presentation_url("http://localhost:5000/invoices?page=2"),
            "http://localhost:5000/invoices?page=2&presentation=1"
        );
    }

    #[test]
    fn test_has_presentation_marker() {
        assert!(has_presentation_marker("/x?presentation=1"));
        assert!(has_presentation_marker("/x?page=2&presentation=1"));
        assert!(has_presentation_marker("/x?presentation"));
        assert!(!has_presentation_marker("/x"));
        assert!(!has_presentation_marker("/x?page=2"));
        assert!(!has_presentation_marker("/presentation/invoice/1"));
    }

    #[test]
    fn test_invoice_presentation_url() {
        assert_eq!(invoice_presentation_url(42), "/presentation/invoice/42");
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("http://localhost:5000/a/b?c=1").as_deref(),
            Some("http://localhost:5000")
        );
        assert_eq!(
            origin_of("https://admin.example.com").as_deref(),
            Some("https://admin.example.com")
        );
        assert_eq!(origin_of("/presentation/invoice/42"), None);
    }
}
