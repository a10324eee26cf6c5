//! Modal shell: overlay chrome that hosts wizards and single-step forms.
//!
//! [`ModalHost`] keeps a stack of open modals. The page behind them is
//! scroll-locked while the stack is non-empty, and an outside click only
//! ever targets the top-most modal.

pub mod hosted;

use std::fmt;

use tracing::{debug, info};

use crate::errors::ModalError;
use crate::ui::layout::{FooterView, ModalLayout, ModalView};
use crate::ui::variant::ButtonVariant;

pub use hosted::{ConfirmStep, HostedOutcome, WizardModal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalHandle(u64);

impl fmt::Display for ModalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalIcon {
    #[default]
    None,
    Info,
    Warning,
    Danger,
    Success,
    Form,
}

impl ModalIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            ModalIcon::None => "",
            ModalIcon::Info => "(i)",
            ModalIcon::Warning => "(!)",
            ModalIcon::Danger => "(x)",
            ModalIcon::Success => "(ok)",
            ModalIcon::Form => "(+)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterConfig {
    pub cancel_label: String,
    pub confirm_label: String,
    pub confirm_variant: ButtonVariant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalConfig {
    pub title: String,
    pub icon: ModalIcon,
    pub footer: Option<FooterConfig>,
    pub close_on_outside_click: bool,
    pub show_close: bool,
}

impl ModalConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: ModalIcon::None,
            footer: None,
            close_on_outside_click: true,
            show_close: true,
        }
    }

    pub fn with_icon(mut self, icon: ModalIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_footer(mut self, cancel: impl Into<String>, confirm: impl Into<String>) -> Self {
        self.footer = Some(FooterConfig {
            cancel_label: cancel.into(),
            confirm_label: confirm.into(),
            confirm_variant: ButtonVariant::Filled,
        });
        self
    }

    pub fn with_confirm_variant(mut self, variant: ButtonVariant) -> Self {
        if let Some(footer) = &mut self.footer {
            footer.confirm_variant = variant;
        }
        self
    }

    /// Outside clicks are ignored; used by wizards so a stray click cannot
    /// discard progress.
    pub fn persistent(mut self) -> Self {
        self.close_on_outside_click = false;
        self
    }
}

/// What the hosted form reports to the shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormStatus {
    pub invalid: bool,
    pub submitting: bool,
}

impl FormStatus {
    pub fn confirm_enabled(&self) -> bool {
        !self.invalid && !self.submitting
    }
}

struct OpenModal {
    handle: ModalHandle,
    config: ModalConfig,
    status: FormStatus,
    banner: Option<String>,
    body: Vec<String>,
}

#[derive(Default)]
pub struct ModalHost {
    next_id: u64,
    stack: Vec<OpenModal>,
}

impl ModalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, config: ModalConfig) -> ModalHandle {
        self.next_id += 1;
        let handle = ModalHandle(self.next_id);
        info!(modal = %handle, title = %config.title, "modal opened");
        self.stack.push(OpenModal {
            handle,
            config,
            status: FormStatus::default(),
            banner: None,
            body: Vec::new(),
        });
        handle
    }

    /// Returns whether the modal was open.
    pub fn close(&mut self, handle: ModalHandle) -> bool {
        let before = self.stack.len();
        self.stack.retain(|modal| modal.handle != handle);
        let closed = self.stack.len() != before;
        if closed {
            info!(modal = %handle, "modal closed");
        }
        closed
    }

    pub fn is_open(&self, handle: ModalHandle) -> bool {
        self.find(handle).is_some()
    }

    pub fn open_count(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> Option<ModalHandle> {
        self.stack.last().map(|modal| modal.handle)
    }

    pub fn scroll_locked(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Click on the backdrop. Closes the top-most modal unless it is
    /// persistent; returns the closed handle.
    pub fn outside_click(&mut self) -> Option<ModalHandle> {
        let top = self.stack.last()?;
        if !top.config.close_on_outside_click {
            debug!(modal = %top.handle, "outside click ignored");
            return None;
        }
        let handle = top.handle;
        self.close(handle);
        Some(handle)
    }

    pub fn config(&self, handle: ModalHandle) -> Option<&ModalConfig> {
        self.find(handle).map(|modal| &modal.config)
    }

    pub fn set_status(&mut self, handle: ModalHandle, status: FormStatus) -> Result<(), ModalError> {
        self.find_mut(handle)?.status = status;
        Ok(())
    }

    pub fn set_banner(
        &mut self,
        handle: ModalHandle,
        banner: Option<String>,
    ) -> Result<(), ModalError> {
        self.find_mut(handle)?.banner = banner;
        Ok(())
    }

    pub fn set_body(&mut self, handle: ModalHandle, body: Vec<String>) -> Result<(), ModalError> {
        self.find_mut(handle)?.body = body;
        Ok(())
    }

    pub fn set_confirm_label(
        &mut self,
        handle: ModalHandle,
        label: impl Into<String>,
    ) -> Result<(), ModalError> {
        if let Some(footer) = &mut self.find_mut(handle)?.config.footer {
            footer.confirm_label = label.into();
        }
        Ok(())
    }

    /// Confirm is disabled while the hosted form is invalid or submitting.
    pub fn confirm_enabled(&self, handle: ModalHandle) -> bool {
        self.find(handle)
            .map(|modal| modal.config.footer.is_some() && modal.status.confirm_enabled())
            .unwrap_or(false)
    }

    pub fn render(
        &self,
        handle: ModalHandle,
        layout: &dyn ModalLayout,
    ) -> Result<Vec<String>, ModalError> {
        let modal = self.find(handle).ok_or(ModalError::NotOpen(handle))?;
        let view = ModalView {
            title: &modal.config.title,
            icon: modal.config.icon,
            closable: modal.config.show_close,
            banner: modal.banner.as_deref(),
            body: &modal.body,
            footer: modal.config.footer.as_ref().map(|footer| FooterView {
                cancel: &footer.cancel_label,
                confirm: &footer.confirm_label,
                confirm_variant: footer.confirm_variant,
                confirm_enabled: modal.status.confirm_enabled(),
            }),
        };
        Ok(layout.render(&view))
    }

    fn find(&self, handle: ModalHandle) -> Option<&OpenModal> {
        self.stack.iter().find(|modal| modal.handle == handle)
    }

    fn find_mut(&mut self, handle: ModalHandle) -> Result<&mut OpenModal, ModalError> {
        self.stack
            .iter_mut()
            .find(|modal| modal.handle == handle)
            .ok_or(ModalError::NotOpen(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::CompactLayout;

    #[test]
    fn scroll_lock_follows_open_modals() {
        let mut host = ModalHost::new();
        assert!(!host.scroll_locked());
        let first = host.open(ModalConfig::new("First"));
        let second = host.open(ModalConfig::new("Second"));
        assert!(host.scroll_locked());
        assert!(host.close(first));
        assert!(host.scroll_locked());
        assert!(host.close(second));
        assert!(!host.scroll_locked());
        assert!(!host.close(second));
    }

    #[test]
    fn outside_click_closes_only_non_persistent_top() {
        let mut host = ModalHost::new();
        let dialog = host.open(ModalConfig::new("Confirm delete"));
        let wizard = host.open(ModalConfig::new("Add customer").persistent());
        assert_eq!(host.outside_click(), None);
        assert!(host.is_open(wizard));
        host.close(wizard);
        assert_eq!(host.outside_click(), Some(dialog));
        assert_eq!(host.outside_click(), None);
    }

    #[test]
    fn confirm_tracks_form_status() {
        let mut host = ModalHost::new();
        let handle = host.open(ModalConfig::new("Edit").with_footer("Cancel", "Save"));
        assert!(host.confirm_enabled(handle));
        host.set_status(
            handle,
            FormStatus {
                invalid: false,
                submitting: true,
            },
        )
        .unwrap();
        assert!(!host.confirm_enabled(handle));
        host.set_status(
            handle,
            FormStatus {
                invalid: true,
                submitting: false,
            },
        )
        .unwrap();
        assert!(!host.confirm_enabled(handle));
    }

    #[test]
    fn footerless_modal_has_no_confirm() {
        let mut host = ModalHost::new();
        let handle = host.open(ModalConfig::new("Notice").with_icon(ModalIcon::Info));
        assert!(!host.confirm_enabled(handle));
        let lines = host
            .render(handle, &CompactLayout { colored: false })
            .unwrap();
        assert_eq!(lines, vec!["(i) Notice  [x]".to_string(), "-".repeat(32)]);
    }

    #[test]
    fn operations_on_closed_modal_fail() {
        let mut host = ModalHost::new();
        let handle = host.open(ModalConfig::new("Gone"));
        host.close(handle);
        assert_eq!(
            host.set_body(handle, vec![]).unwrap_err(),
            ModalError::NotOpen(handle)
        );
        assert!(host
            .render(handle, &CompactLayout { colored: false })
            .is_err());
    }
}
