//! Inline flash messages shown above page content

use super::escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Warning,
    Error,
}

/// One message rendered with the response that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Renders a dismissible banner for one flash.
pub fn flash_message(flash: &Flash) -> String {
    let (bg_class, border_class, icon) = match flash.kind {
        FlashKind::Success => ("bg-green-800", "border-green-600", "✓"),
        FlashKind::Warning => ("bg-yellow-800", "border-yellow-600", "!"),
        FlashKind::Error => ("bg-red-800", "border-red-600", "✗"),
    };

    format!(
        r#"<div class="flash flex items-center justify-between p-4 mb-4 {bg_class} border {border_class} rounded-lg" role="alert">
            <div class="flex items-center space-x-3">
                <span class="font-bold">{icon}</span>
                <span class="text-sm text-white">{}</span>
            </div>
            <button class="ml-4 text-gray-300 hover:text-white" onclick="this.parentElement.remove()">×</button>
        </div>"#,
        escape(&flash.message)
    )
}

pub fn flash_list(flashes: &[Flash]) -> String {
    flashes.iter().map(flash_message).collect()
}
