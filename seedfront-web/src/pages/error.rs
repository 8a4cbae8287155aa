//! HTML error page for browser requests

use axum::http::StatusCode;
use axum::response::Html;

use super::render_page;
use crate::components::layout;
use crate::i18n::Locale;

/// Renders the error page for `status`.
pub fn error_page(status: StatusCode, locale: Locale) -> Html<String> {
    let (title, detail) = if status == StatusCode::NOT_FOUND {
        ("Page not found", Some("The requested page does not exist."))
    } else {
        ("Internal server error", None)
    };
    let title = locale.tr(title);

    let content = format!(
        r#"<div class="text-center py-12">
            <div class="text-6xl font-bold text-seed-500 mb-4">{}</div>
            <h2 class="text-2xl font-semibold text-white mb-4">{title}</h2>
            <p class="text-gray-400 mb-8">{}</p>
            <a href="/">{}</a>
        </div>"#,
        status.as_u16(),
        detail.map(|d| locale.tr(d)).unwrap_or_default(),
        layout::button(locale.tr("Back to dashboard"), "primary", None)
    );

    render_page(title, "", locale, &[], &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_page() {
        let Html(html) = error_page(StatusCode::NOT_FOUND, Locale::Fr);
        assert!(html.contains("404"));
        assert!(html.contains("Page introuvable"));
        assert!(html.contains(r#"<html lang="fr">"#));
    }

    #[test]
    fn test_internal_error_page() {
        let Html(html) = error_page(StatusCode::INTERNAL_SERVER_ERROR, Locale::En);
        assert!(html.contains("500"));
        assert!(html.contains("Internal server error"));
    }
}
