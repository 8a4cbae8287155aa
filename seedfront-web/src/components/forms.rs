//! Settings form inputs

use super::escape;

const INPUT_CLASSES: &str = "w-full px-4 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white placeholder-gray-400 focus:outline-none focus:ring-2 focus:ring-seed-500 focus:border-transparent disabled:opacity-50";

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled { " disabled" } else { "" }
}

/// Renders a labelled input. `value` is escaped.
pub fn input_field(name: &str, label: &str, input_type: &str, value: &str, disabled: bool) -> String {
    format!(
        r#"<label class="block mb-4">
            <span class="block text-sm text-gray-400 mb-1">{label}</span>
            <input type="{input_type}" name="{name}" id="{name}" value="{}" class="{INPUT_CLASSES}"{} />
        </label>"#,
        escape(value),
        disabled_attr(disabled)
    )
}

pub fn text_field(name: &str, label: &str, value: &str, disabled: bool) -> String {
    input_field(name, label, "text", value, disabled)
}

/// Renders a labelled checkbox submitting `on` when ticked.
pub fn checkbox_field(name: &str, label: &str, checked: bool, disabled: bool) -> String {
    let checked_attr = if checked { " checked" } else { "" };
    format!(
        r#"<label class="flex items-center space-x-3 mb-4">
            <input type="checkbox" name="{name}" id="{name}" value="on" class="w-4 h-4 accent-seed-500"{checked_attr}{} />
            <span class="text-sm text-gray-300">{label}</span>
        </label>"#,
        disabled_attr(disabled)
    )
}

/// Groups related inputs under a legend.
pub fn fieldset(legend: &str, content: &str) -> String {
    format!(
        r#"<fieldset class="bg-gray-800 border border-gray-700 rounded-lg p-6 mb-6">
            <legend class="px-2 text-lg font-semibold text-white">{legend}</legend>
            {content}
        </fieldset>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_and_escaped_input() {
        let html = text_field("seedbox_host", "Host", r#"a"b"#, true);
        assert!(html.contains(r#"value="a&quot;b""#));
        assert!(html.contains(" disabled"));
    }

    #[test]
    fn test_checkbox_state() {
        assert!(checkbox_field("chmod_enabled", "Enabled", true, false).contains(" checked"));
        assert!(!checkbox_field("chmod_enabled", "Enabled", false, false).contains(" checked"));
    }
}
