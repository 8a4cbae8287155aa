//! Downloaded files page, with the in-progress list underneath

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::response::{Html, Response};
use seedfront_core::db::{DownloadFilter, queries};

use super::dashboard::download_rows;
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
    let filter = DownloadFilter {
        finished: Some(true),
        search: search_term(&query),
        limit: lenient_limit(
            query.get("limit").map(String::as_str),
            PAGE_DEFAULT_LIMIT,
            LENIENT_MAX_LIMIT,
        ),
        offset: lenient_offset(query.get("offset").map(String::as_str)),
    };

    let page_filter = filter.clone();
    let (finished, in_progress) = page_query(&state, locale, move |conn| {
        let in_progress = DownloadFilter {
            finished: Some(false),
            limit: u32::MAX,
            ..DownloadFilter::default()
        };
        Ok((
            queries::list_downloads(conn, &page_filter)?,
            queries::list_downloads(conn, &in_progress)?,
        ))
    })
    .await?;

    let search = filter.search.as_deref();
    let table = format!(
        "{}{}{}",
        tables::search_form("/downloaded", search, locale),
        tables::data_table(
            &["#", "Path", "Finished", "Size"],
            &download_rows(&finished, true),
            locale
        ),
        tables::pagination("/downloaded", search, filter.offset, filter.limit, finished.len(), locale),
    );
    let content = format!(
        "{}{}{}",
        layout::page_header(locale.tr("Downloaded"), None),
        layout::card(None, &table),
        layout::card(
            Some(locale.tr("In progress")),
            &tables::data_table(
                &["#", "Path", "Started", "Size"],
                &download_rows(&in_progress, false),
                locale
            )
        ),
    );

    Ok(render_page(
        locale.tr("Downloaded"),
        "downloaded",
        locale,
        &startup_flashes(&state, locale),
        &content,
    ))
}

/// `GET /downloaded?search=&offset=&limit=`
pub async fn downloaded_page(
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
