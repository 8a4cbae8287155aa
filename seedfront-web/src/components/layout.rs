//! Layout components: headers, cards, grids and navigation

use crate::i18n::Locale;

/// Navigation entries as `(href, label, page id)`.
const NAV_ITEMS: [(&str, &str, &str); 6] = [
    ("/", "Dashboard", "dashboard"),
    ("/stats", "Statistics", "stats"),
    ("/uploaded", "Uploaded", "uploaded"),
    ("/downloaded", "Downloaded", "downloaded"),
    ("/info", "Info", "info"),
    ("/settings", "Settings", "settings"),
];

/// Renders a page header with title and optional subtitle.
pub fn page_header(title: &str, subtitle: Option<&str>) -> String {
    let subtitle_html = subtitle
        .map(|s| format!(r#"<p class="text-gray-400 mt-2">{s}</p>"#))
        .unwrap_or_default();

    format!(
        r#"<div class="mb-8">
            <h1 class="text-3xl font-bold text-white">{title}</h1>
            {subtitle_html}
        </div>"#
    )
}

/// Renders a card container with an optional title.
pub fn card(title: Option<&str>, content: &str) -> String {
    let header_html = title
        .map(|t| format!(r#"<h3 class="text-lg font-semibold text-white mb-6">{t}</h3>"#))
        .unwrap_or_default();

    format!(
        r#"<div class="bg-gray-800 border border-gray-700 rounded-lg p-6 mb-6">
            {header_html}
            {content}
        </div>"#
    )
}

/// Renders the main navigation bar, highlighting `active_page`.
pub fn nav_bar(active_page: &str, locale: Locale) -> String {
    let items: String = NAV_ITEMS
        .iter()
        .map(|&(href, label, page)| {
            let active_class = if page == active_page {
                "text-seed-500 bg-seed-500 bg-opacity-10"
            } else {
                "text-gray-300 hover:text-seed-500 hover:bg-gray-700"
            };
            format!(
                r#"<a href="{href}" class="px-3 py-2 rounded-md text-sm font-medium transition-colors {active_class}">{}</a>"#,
                locale.tr(label)
            )
        })
        .collect();

    format!(
        r#"<nav class="bg-gray-800 border-b border-gray-700 sticky top-0 z-50">
            <div class="max-w-7xl mx-auto px-4">
                <div class="flex items-center h-16 space-x-8">
                    <a href="/" class="text-2xl font-bold text-seed-500">SeedFront</a>
                    <div class="hidden md:flex space-x-6">{items}</div>
                </div>
            </div>
        </nav>"#
    )
}

/// Renders a grid container with Tailwind column classes such as `grid-cols-1 lg:grid-cols-2`.
pub fn grid(columns: &str, content: &str) -> String {
    format!(r#"<div class="grid {columns} gap-6">{content}</div>"#)
}

/// Renders a button with one of the `primary`, `secondary` or `ghost` styles.
pub fn button(text: &str, variant: &str, attributes: Option<&str>) -> String {
    let base_classes = "px-4 py-2 rounded-lg font-medium transition-colors focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-offset-gray-900 disabled:opacity-50";

    let variant_classes = match variant {
        "primary" => "bg-seed-500 hover:bg-seed-600 text-white focus:ring-seed-500",
        "secondary" => "bg-gray-700 hover:bg-gray-600 text-white focus:ring-gray-500",
        "ghost" => "text-gray-300 hover:text-white hover:bg-gray-700 focus:ring-gray-500",
        _ => "bg-gray-600 hover:bg-gray-700 text-white focus:ring-gray-500",
    };

    let attrs = attributes.unwrap_or("");

    format!(r#"<button class="{base_classes} {variant_classes}" {attrs}>{text}</button>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_bar_translated_and_active() {
        let html = nav_bar("stats", Locale::Fr);
        assert!(html.contains("Tableau de bord"));
        assert!(html.contains(r#"href="/stats" class="px-3 py-2 rounded-md text-sm font-medium transition-colors text-seed-500"#));
        assert!(!html.contains(">Dashboard<"));
    }
}
