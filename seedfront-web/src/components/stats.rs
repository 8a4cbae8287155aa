//! Statistics components

/// Renders a statistics card with a value and label.
pub fn stat_card(value: &str, label: &str, color: Option<&str>) -> String {
    let value_color = color.unwrap_or("text-seed-500");

    format!(
        r#"<div class="bg-gray-800 border border-gray-700 rounded-lg p-6 text-center">
            <div class="text-2xl font-bold {value_color} mb-1">{value}</div>
            <div class="text-gray-400 text-sm">{label}</div>
        </div>"#
    )
}

/// Renders a grid of stat cards, sizing columns to the card count.
pub fn stats_grid(stats: &[String]) -> String {
    let grid_cols = match stats.len() {
        1..=2 => "grid-cols-1 md:grid-cols-2",
        3 => "grid-cols-1 md:grid-cols-3",
        _ => "grid-cols-2 md:grid-cols-4",
    };

    format!(
        r#"<div class="grid {} gap-6 mb-8">
            {}
        </div>"#,
        grid_cols,
        stats.join("")
    )
}

/// Renders a status dot with label.
///
/// `locked` is yellow and pulses, `unlocked` green, `unknown` grey.
pub fn status_indicator(status: &str, label: &str) -> String {
    let (color_class, pulse_class) = match status {
        "locked" => ("bg-yellow-400", "status-pulse"),
        "unlocked" => ("bg-green-400", ""),
        "error" => ("bg-red-400", ""),
        _ => ("bg-gray-400", ""),
    };

    format!(
        r#"<div class="flex items-center space-x-2">
            <div class="w-2 h-2 {color_class} rounded-full {pulse_class}"></div>
            <span class="text-sm text-gray-400">{label}</span>
        </div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_grid_columns() {
        let cards = vec![stat_card("12", "Files", None), stat_card("1.0GiB", "Size", None)];
        let html = stats_grid(&cards);
        assert!(html.contains("md:grid-cols-2"));
        assert!(html.contains("1.0GiB"));
    }
}
