//! Settings page: edits the sync tool's YAML configuration

use std::collections::HashMap;

use axum::Form;
use axum::extract::State;
use axum::response::Html;
use seedfront_core::settings::form::HEALTHCHECK_KEYS;
use seedfront_core::settings::{self, SettingsError, SettingsForm};

use super::{render_page, startup_flashes};
use crate::components::forms::{checkbox_field, fieldset, input_field, text_field};
use crate::components::{Flash, layout};
use crate::errors::PageError;
use crate::i18n::Locale;
use crate::server::AppState;

/// Translated message for a failed save.
pub fn error_message(err: &SettingsError, locale: Locale) -> String {
    match err {
        SettingsError::MissingFields { fields } => {
            format!("{}: {}", locale.tr("Missing required fields"), fields.join(", "))
        }
        SettingsError::InvalidPort { .. } => {
            locale.tr("Port must be a number between 0 and 65535").to_string()
        }
        SettingsError::InvalidTimeout { .. } => locale.tr("Timeout must be a number").to_string(),
        SettingsError::InvalidChmod { value } => {
            format!("{}: {value}", locale.tr("Invalid chmod value"))
        }
        SettingsError::ReadOnly { .. } => locale.tr("Configuration file is read-only").to_string(),
        SettingsError::NotMapping | SettingsError::Io(_) | SettingsError::Yaml(_) => {
            format!("{}: {err}", locale.tr("Settings could not be saved"))
        }
    }
}

/// Renders the settings form. Inputs are disabled when the file cannot be written.
pub fn settings_form(form: &SettingsForm, disabled: bool, locale: Locale) -> String {
    let s = &form.seedbox;
    let seedbox = [
        text_field("seedbox_host", locale.tr("Host"), &s.host, disabled),
        input_field("seedbox_port", locale.tr("Port"), "number", &s.port, disabled),
        text_field("seedbox_login", locale.tr("Login"), &s.login, disabled),
        input_field("seedbox_password", locale.tr("Password"), "password", &s.password, disabled),
        text_field("seedbox_protocol", locale.tr("Protocol"), &s.protocol, disabled),
        checkbox_field(
            "seedbox_timeout_enabled",
            &format!("{} ({})", locale.tr("Timeout"), locale.tr("Enabled")),
            s.timeout_enabled,
            disabled,
        ),
        input_field("seedbox_timeout", locale.tr("Timeout"), "number", &s.timeout, disabled),
        checkbox_field(
            "seedbox_chmod_enabled",
            &format!("{} ({})", locale.tr("Permissions (chmod)"), locale.tr("Enabled")),
            s.chmod_enabled,
            disabled,
        ),
        text_field("seedbox_chmod", locale.tr("Permissions (chmod)"), &s.chmod, disabled),
        text_field("seedbox_tmp_path", locale.tr("Temporary path"), &s.tmp_path, disabled),
        text_field("seedbox_watch_path", locale.tr("Watch path"), &s.watch_path, disabled),
        text_field("seedbox_finished_path", locale.tr("Finished path"), &s.finished_path, disabled),
        text_field("seedbox_prefixed_path", locale.tr("Prefixed path"), &s.prefixed_path, disabled),
        text_field("seedbox_part_suffix", locale.tr("Part suffix"), &s.part_suffix, disabled),
        text_field(
            "seedbox_exclude_syncing",
            locale.tr("Exclude from sync"),
            &s.exclude_syncing,
            disabled,
        ),
    ]
    .concat();

    let l = &form.local;
    let local = [
        text_field("local_watch_path", locale.tr("Watch path"), &l.watch_path, disabled),
        text_field("local_download_path", locale.tr("Download path"), &l.download_path, disabled),
        text_field("local_db_file", locale.tr("Database file"), &l.db_file, disabled),
    ]
    .concat();

    let healthchecks: String = HEALTHCHECK_KEYS
        .iter()
        .map(|key| {
            let check = form.healthcheck(key);
            format!(
                r#"<div class="mb-4"><h4 class="text-white font-medium mb-2">{key}</h4>{}{}</div>"#,
                checkbox_field(
                    &format!("healthchecks_{key}_enabled"),
                    locale.tr("Enabled"),
                    check.enabled,
                    disabled
                ),
                text_field(
                    &format!("healthchecks_{key}_ping_url"),
                    locale.tr("Ping URL"),
                    &check.ping_url,
                    disabled
                ),
            )
        })
        .collect();

    let submit = if disabled {
        layout::button(locale.tr("Save"), "primary", Some(r#"type="submit" disabled"#))
    } else {
        layout::button(locale.tr("Save"), "primary", Some(r#"type="submit""#))
    };

    format!(
        r#"<form method="post" action="/settings">{}{}{}<div class="flex justify-end">{submit}</div></form>"#,
        fieldset(locale.tr("Seedbox"), &seedbox),
        fieldset(locale.tr("Local"), &local),
        fieldset(locale.tr("Health checks"), &healthchecks),
    )
}

fn read_only(state: &AppState) -> bool {
    state
        .settings_path
        .as_deref()
        .is_none_or(settings::is_read_only)
}

fn render(
    state: &AppState,
    locale: Locale,
    form: &SettingsForm,
    mut flashes: Vec<Flash>,
) -> Html<String> {
    let disabled = read_only(state);
    if disabled {
        flashes.push(Flash::warning(locale.tr(
            "The configuration file cannot be modified: the form is disabled.",
        )));
    }

    let mut all = startup_flashes(state, locale);
    all.extend(flashes);

    let content = format!(
        "{}{}",
        layout::page_header(locale.tr("Settings"), None),
        settings_form(form, disabled, locale)
    );
    render_page(locale.tr("Settings"), "settings", locale, &all, &content)
}

/// `GET /settings`
pub async fn settings_page(State(state): State<AppState>, locale: Locale) -> Html<String> {
    let form = state
        .document()
        .map(|document| SettingsForm::from_document(&document))
        .unwrap_or_default();
    render(&state, locale, &form, Vec::new())
}

/// `POST /settings`
///
/// Saves on success and re-renders the form either way. A rejected
/// submission is shown again as typed.
pub async fn save_settings(
    State(state): State<AppState>,
    locale: Locale,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Html<String>, PageError> {
    let Some(path) = state.settings_path.clone() else {
        let err = SettingsError::ReadOnly {
            path: Default::default(),
        };
        tracing::warn!("Settings not saved: {err}");
        let form = SettingsForm::from_submitted(&fields);
        return Ok(render(&state, locale, &form, vec![Flash::error(error_message(&err, locale))]));
    };

    let submitted = fields.clone();
    let saved = tokio::task::spawn_blocking(move || settings::save_submission(&path, &submitted))
        .await
        .map_err(|err| {
            tracing::error!("Settings save task failed: {err}");
            PageError::internal(locale)
        })?;

    let page = match saved {
        Ok(document) => {
            let form = SettingsForm::from_document(&document);
            state.replace_document(document);
            render(&state, locale, &form, vec![Flash::success(locale.tr("Settings saved"))])
        }
        Err(err) => {
            tracing::warn!("Settings not saved: {err}");
            let form = SettingsForm::from_submitted(&fields);
            render(&state, locale, &form, vec![Flash::error(error_message(&err, locale))])
        }
    };
    Ok(page)
}
