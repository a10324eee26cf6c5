use std::fmt;
use std::str::FromStr;

use colored::{Color, Colorize};

/// Visual variant of a button. Each variant maps to one row of the style
/// table below instead of being matched as a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Filled,
    Outline,
    Success,
    Danger,
    Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantStyle {
    pub open: &'static str,
    pub close: &'static str,
    pub color: Option<Color>,
    pub bold: bool,
}

impl ButtonVariant {
    pub const ALL: [ButtonVariant; 5] = [
        ButtonVariant::Filled,
        ButtonVariant::Outline,
        ButtonVariant::Success,
        ButtonVariant::Danger,
        ButtonVariant::Ghost,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ButtonVariant::Filled => "filled",
            ButtonVariant::Outline => "outline",
            ButtonVariant::Success => "success",
            ButtonVariant::Danger => "danger",
            ButtonVariant::Ghost => "ghost",
        }
    }

    pub fn style(self) -> VariantStyle {
        match self {
            ButtonVariant::Filled => VariantStyle {
                open: "[ ",
                close: " ]",
                color: Some(Color::BrightCyan),
                bold: true,
            },
            ButtonVariant::Outline => VariantStyle {
                open: "( ",
                close: " )",
                color: Some(Color::Cyan),
                bold: false,
            },
            ButtonVariant::Success => VariantStyle {
                open: "[ ",
                close: " ]",
                color: Some(Color::BrightGreen),
                bold: true,
            },
            ButtonVariant::Danger => VariantStyle {
                open: "[ ",
                close: " ]",
                color: Some(Color::BrightRed),
                bold: true,
            },
            ButtonVariant::Ghost => VariantStyle {
                open: "",
                close: "",
                color: None,
                bold: false,
            },
        }
    }

    /// Plain rendering, used for width calculations and uncoloured output.
    pub fn plain(self, label: &str, enabled: bool) -> String {
        let style = self.style();
        if enabled {
            format!("{}{}{}", style.open, label, style.close)
        } else {
            format!("{}{} (disabled){}", style.open, label, style.close)
        }
    }

    pub fn render(self, label: &str, enabled: bool, colored: bool) -> String {
        let text = self.plain(label, enabled);
        if !colored {
            return text;
        }
        if !enabled {
            return text.dimmed().to_string();
        }
        let style = self.style();
        let painted = match style.color {
            Some(color) => text.color(color),
            None => text.normal(),
        };
        if style.bold {
            painted.bold().to_string()
        } else {
            painted.to_string()
        }
    }
}

impl fmt::Display for ButtonVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ButtonVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ButtonVariant::ALL
            .into_iter()
            .find(|variant| variant.name() == normalized)
            .ok_or_else(|| format!("unknown button variant `{}`", value.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering_uses_style_table() {
        assert_eq!(ButtonVariant::Filled.plain("Next", true), "[ Next ]");
        assert_eq!(ButtonVariant::Outline.plain("Cancel", true), "( Cancel )");
        assert_eq!(ButtonVariant::Ghost.plain("Skip", true), "Skip");
        assert_eq!(
            ButtonVariant::Success.plain("Submit", false),
            "[ Submit (disabled) ]"
        );
    }

    #[test]
    fn uncoloured_render_matches_plain() {
        assert_eq!(
            ButtonVariant::Danger.render("Delete", true, false),
            ButtonVariant::Danger.plain("Delete", true)
        );
    }

    #[test]
    fn parses_variant_names() {
        assert_eq!("Outline".parse::<ButtonVariant>(), Ok(ButtonVariant::Outline));
        assert!("sparkly".parse::<ButtonVariant>().is_err());
    }
}
