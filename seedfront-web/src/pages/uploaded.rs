//! Uploaded torrents page

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::response::{Html, Response};
use seedfront_core::db::{UploadFilter, queries};

use super::dashboard::upload_rows;
use super::{cached_page, page_query, render_page, startup_flashes};
use crate::cache::LISTING_PAGE_TTL;
use crate::components::{layout, tables};
use crate::errors::PageError;
use crate::i18n::Locale;
use crate::params::{LENIENT_MAX_LIMIT, PAGE_DEFAULT_LIMIT, lenient_limit, lenient_offset, search_term};
use crate::server::AppState;

async fn render(
    state: AppState,
    locale: Locale,
    query: HashMap<String, String>,
) -> Result<Html<String>, PageError> {
    let filter = UploadFilter {
        search: search_term(&query),
        limit: lenient_limit(
            query.get("limit").map(String::as_str),
            PAGE_DEFAULT_LIMIT,
            LENIENT_MAX_LIMIT,
        ),
        offset: lenient_offset(query.get("offset").map(String::as_str)),
    };

    let page_filter = filter.clone();
    let uploads = page_query(&state, locale, move |conn| queries::list_uploads(conn, &page_filter)).await?;

    let search = filter.search.as_deref();
    let table = format!(
        "{}{}{}",
        tables::search_form("/uploaded", search, locale),
        tables::data_table(&["#", "Name", "Sent"], &upload_rows(&uploads), locale),
        tables::pagination("/uploaded", search, filter.offset, filter.limit, uploads.len(), locale),
    );
    let content = format!(
        "{}{}",
        layout::page_header(locale.tr("Uploaded"), None),
        layout::card(None, &table)
    );

    Ok(render_page(
        locale.tr("Uploaded"),
        "uploaded",
        locale,
        &startup_flashes(&state, locale),
        &content,
    ))
}

/// `GET /uploaded?search=&offset=&limit=`
pub async fn uploaded_page(
    State(state): State<AppState>,
    locale: Locale,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let page_state = state.clone();
    cached_page(&state, &uri, locale, LISTING_PAGE_TTL, || {
        render(page_state, locale, query)
    })
    .await
}
