//! Viewport-dependent modal rendering.
//!
//! Each viewport class has exactly one renderer; callers pick it once with
//! [`layout_for`] instead of branching on width inside every component.

use crate::modal::ModalIcon;

use super::variant::ButtonVariant;

const COMPACT_RULE_WIDTH: usize = 32;
const CLOSE_MARKER: &str = "[x]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Compact,
    Wide,
}

impl ViewportClass {
    pub fn for_width(columns: u16, breakpoint: u16) -> Self {
        if columns < breakpoint {
            ViewportClass::Compact
        } else {
            ViewportClass::Wide
        }
    }
}

pub struct FooterView<'a> {
    pub cancel: &'a str,
    pub confirm: &'a str,
    pub confirm_variant: ButtonVariant,
    pub confirm_enabled: bool,
}

/// Everything a layout needs to draw one modal.
pub struct ModalView<'a> {
    pub title: &'a str,
    pub icon: ModalIcon,
    pub closable: bool,
    pub banner: Option<&'a str>,
    pub body: &'a [String],
    pub footer: Option<FooterView<'a>>,
}

impl ModalView<'_> {
    fn heading(&self) -> String {
        match self.icon.glyph() {
            "" => self.title.to_string(),
            glyph => format!("{} {}", glyph, self.title),
        }
    }
}

pub trait ModalLayout {
    fn render(&self, view: &ModalView<'_>) -> Vec<String>;
}

/// Full-width, stacked layout for narrow terminals.
pub struct CompactLayout {
    pub colored: bool,
}

impl ModalLayout for CompactLayout {
    fn render(&self, view: &ModalView<'_>) -> Vec<String> {
        let rule = "-".repeat(COMPACT_RULE_WIDTH);
        let mut lines = Vec::new();
        let mut heading = view.heading();
        if view.closable {
            heading.push_str("  ");
            heading.push_str(CLOSE_MARKER);
        }
        lines.push(heading);
        lines.push(rule.clone());
        if let Some(banner) = view.banner {
            lines.push(format!("! {}", banner));
        }
        lines.extend(view.body.iter().cloned());
        if let Some(footer) = &view.footer {
            lines.push(rule);
            lines.push(
                footer
                    .confirm_variant
                    .render(footer.confirm, footer.confirm_enabled, self.colored),
            );
            lines.push(ButtonVariant::Outline.render(footer.cancel, true, self.colored));
        }
        lines
    }
}

/// Boxed layout with a right-aligned button row.
pub struct WideLayout {
    pub width: usize,
    pub colored: bool,
}

impl WideLayout {
    fn border(&self) -> String {
        format!("+{}+", "-".repeat(self.width + 2))
    }

    fn row(&self, text: &str) -> String {
        let clipped: String = text.chars().take(self.width).collect();
        let pad = self.width - clipped.chars().count();
        format!("| {}{} |", clipped, " ".repeat(pad))
    }
}

impl ModalLayout for WideLayout {
    fn render(&self, view: &ModalView<'_>) -> Vec<String> {
        let mut lines = vec![self.border()];

        let heading = view.heading();
        if view.closable {
            let room = self.width.saturating_sub(CLOSE_MARKER.len() + 1);
            let clipped: String = heading.chars().take(room).collect();
            let pad = self
                .width
                .saturating_sub(clipped.chars().count())
                .saturating_sub(CLOSE_MARKER.len());
            lines.push(format!(
                "| {}{}{} |",
                clipped,
                " ".repeat(pad),
                CLOSE_MARKER
            ));
        } else {
            lines.push(self.row(&heading));
        }
        lines.push(self.border());

        if let Some(banner) = view.banner {
            lines.push(self.row(&format!("! {}", banner)));
        }
        for line in view.body {
            lines.push(self.row(line));
        }

        if let Some(footer) = &view.footer {
            lines.push(self.border());
            let cancel_plain = ButtonVariant::Outline.plain(footer.cancel, true);
            let confirm_plain = footer
                .confirm_variant
                .plain(footer.confirm, footer.confirm_enabled);
            let used = cancel_plain.chars().count() + 2 + confirm_plain.chars().count();
            let pad = self.width.saturating_sub(used);
            lines.push(format!(
                "| {}{}  {} |",
                " ".repeat(pad),
                ButtonVariant::Outline.render(footer.cancel, true, self.colored),
                footer
                    .confirm_variant
                    .render(footer.confirm, footer.confirm_enabled, self.colored)
            ));
        }
        lines.push(self.border());
        lines
    }
}

pub fn layout_for(class: ViewportClass, width: usize, colored: bool) -> Box<dyn ModalLayout> {
    match class {
        ViewportClass::Compact => Box::new(CompactLayout { colored }),
        ViewportClass::Wide => Box::new(WideLayout { width, colored }),
    }
}
