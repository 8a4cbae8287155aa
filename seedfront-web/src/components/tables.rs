//! Tables, search box and paging links for the listing pages

use crate::i18n::Locale;

use super::escape;

/// Renders a table. Cells are inserted as-is, so callers escape text.
pub fn data_table(headers: &[&'static str], rows: &[Vec<String>], locale: Locale) -> String {
    if rows.is_empty() {
        return format!(
            r#"<p class="text-gray-400 text-center py-6">{}</p>"#,
            locale.tr("Nothing to show")
        );
    }

    let head: String = headers
        .iter()
        .map(|&h| {
            format!(
                r#"<th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{}</th>"#,
                locale.tr(h)
            )
        })
        .collect();

    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!(r#"<td class="px-4 py-2 text-sm text-gray-200">{cell}</td>"#))
                .collect();
            format!(r#"<tr class="border-t border-gray-700 hover:bg-gray-700">{cells}</tr>"#)
        })
        .collect();

    format!(
        r#"<div class="overflow-x-auto">
            <table class="min-w-full">
                <thead><tr>{head}</tr></thead>
                <tbody>{body}</tbody>
            </table>
        </div>"#
    )
}

/// Renders the search box of a listing page.
pub fn search_form(action: &str, search: Option<&str>, locale: Locale) -> String {
    let value = search.map(escape).unwrap_or_default();
    let label = locale.tr("Search");

    format!(
        r#"<form method="get" action="{action}" class="flex space-x-4 mb-6">
            <input type="search" name="search" value="{value}" placeholder="{label}"
                   class="flex-1 px-4 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white placeholder-gray-400 focus:outline-none focus:ring-2 focus:ring-seed-500" />
            <button type="submit" class="px-4 py-2 rounded-lg bg-seed-500 hover:bg-seed-600 text-white">{label}</button>
        </form>"#
    )
}

fn page_href(path: &str, search: Option<&str>, offset: u32, limit: u32) -> String {
    let mut href = format!("{path}?offset={offset}&amp;limit={limit}");
    if let Some(search) = search {
        href.push_str("&amp;search=");
        href.push_str(&urlencoding::encode(search));
    }
    href
}

/// Renders previous/next links.
///
/// A next link is shown when the current page came back full, since the
/// listing pages do not count rows.
pub fn pagination(
    path: &str,
    search: Option<&str>,
    offset: u32,
    limit: u32,
    shown: usize,
    locale: Locale,
) -> String {
    let link = |href: String, label: &'static str| {
        format!(
            r#"<a href="{href}" class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-white text-sm">{}</a>"#,
            locale.tr(label)
        )
    };

    let previous = if offset > 0 {
        link(page_href(path, search, offset.saturating_sub(limit), limit), "Previous")
    } else {
        String::new()
    };
    let next = if shown >= limit as usize {
        link(page_href(path, search, offset.saturating_add(limit), limit), "Next")
    } else {
        String::new()
    };

    format!(r#"<div class="flex justify-between mt-6"><div>{previous}</div><div>{next}</div></div>"#)
}
