//! Terminal driver for modal-hosted wizards.
//!
//! A [`WizardInteraction`] answers one field prompt at a time; the runner
//! feeds the answers into a [`WizardModal`] exactly the way the dashboard
//! feeds keystrokes and blur events, then presses the confirm button once
//! every field of the step has been visited.

use std::io::{BufRead, IsTerminal};

use dialoguer::theme::ColorfulTheme;

use crate::api::{Notifier, Submitter};
use crate::forms::validators::FieldKind;
use crate::forms::{FieldRule, FormFlow};
use crate::modal::{ConfirmStep, HostedOutcome, ModalHost, WizardModal};
use crate::ui::layout::ModalLayout;

use super::{io as cli_io, output, CliError};

const BACK_LABEL: &str = "<- Back";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Value(String),
    /// Keep the current value.
    Keep,
    Back,
    Help,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirm,
    Back,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Everything an interaction needs to ask for one field.
pub struct FieldPrompt<'a> {
    pub field: &'a FieldRule,
    pub step: usize,
    pub total_steps: usize,
    pub current: Option<String>,
    pub error: Option<String>,
}

pub trait WizardInteraction {
    fn prompt_field(&mut self, prompt: &FieldPrompt<'_>) -> PromptResponse;

    fn confirm(&mut self, title: &str, summary: &[String]) -> ConfirmationResponse;

    fn show(&mut self, lines: &[String]);
}

/// Drives `flow` to completion or cancellation.
pub fn run_wizard<F, S, N, I>(
    flow: F,
    submitter: &mut S,
    notifier: &mut N,
    interaction: &mut I,
    layout: &dyn ModalLayout,
) -> Result<FormResult<S::Entity>, CliError>
where
    F: FormFlow,
    S: Submitter<F::Draft>,
    N: Notifier,
    I: WizardInteraction,
{
    let mut host = ModalHost::new();
    let mut modal = WizardModal::new(flow)?;
    modal.open(&mut host)?;

    loop {
        interaction.show(&modal.render(&host, layout)?);
        match prompt_step(&mut modal, &mut host, interaction)? {
            StepExit::Cancelled => {
                modal.close(&mut host);
                return Ok(FormResult::Cancelled);
            }
            StepExit::Back => {
                modal.back(&mut host)?;
                continue;
            }
            StepExit::Filled => {}
        }

        if modal.wizard().is_final_step() && modal.wizard().visible_errors().is_empty() {
            let summary = summary_lines(&modal);
            match interaction.confirm(modal.flow().title(), &summary) {
                ConfirmationResponse::Confirm => {}
                ConfirmationResponse::Back => continue,
                ConfirmationResponse::Cancel => {
                    modal.close(&mut host);
                    return Ok(FormResult::Cancelled);
                }
            }
        }

        match modal.confirm_with(&mut host, submitter, notifier)? {
            ConfirmStep::Moved { .. } | ConfirmStep::Blocked { .. } => continue,
            ConfirmStep::Submit(HostedOutcome::Completed(entity)) => {
                return Ok(FormResult::Completed(entity))
            }
            ConfirmStep::Submit(HostedOutcome::Failed(_)) => continue,
            ConfirmStep::Submit(HostedOutcome::Discarded) => return Ok(FormResult::Cancelled),
        }
    }
}

enum StepExit {
    Filled,
    Back,
    Cancelled,
}

fn prompt_step<F: FormFlow, I: WizardInteraction>(
    modal: &mut WizardModal<F>,
    host: &mut ModalHost,
    interaction: &mut I,
) -> Result<StepExit, CliError> {
    let fields = modal.wizard().current_schema().fields.clone();
    let step = modal.wizard().current_step();
    let total_steps = modal.wizard().step_count();
    let mut index = 0;

    while index < fields.len() {
        let field = &fields[index];
        let prompt = FieldPrompt {
            field,
            step,
            total_steps,
            current: modal.wizard().form().optional(field.key),
            error: modal.wizard().visible_error(field.key).map(str::to_string),
        };
        match interaction.prompt_field(&prompt) {
            PromptResponse::Value(raw) => {
                modal.input(host, field.key, &raw)?;
                modal.blur(host, field.key)?;
                if modal.wizard().visible_error(field.key).is_none() {
                    index += 1;
                }
            }
            PromptResponse::Keep => {
                modal.blur(host, field.key)?;
                if modal.wizard().visible_error(field.key).is_none() {
                    index += 1;
                }
            }
            PromptResponse::Help => {
                let help = field.help.unwrap_or("No additional help for this field.");
                interaction.show(&[format!("{}: {}", field.label, help)]);
            }
            PromptResponse::Back if index > 0 => index -= 1,
            PromptResponse::Back if step > 1 => return Ok(StepExit::Back),
            PromptResponse::Back => {}
            PromptResponse::Cancel => return Ok(StepExit::Cancelled),
        }
    }
    Ok(StepExit::Filled)
}

fn summary_lines<F: FormFlow>(modal: &WizardModal<F>) -> Vec<String> {
    let wizard = modal.wizard();
    wizard
        .registry()
        .steps()
        .iter()
        .flat_map(|schema| schema.fields.iter())
        .filter_map(|field| {
            let value = wizard.form().optional(field.key)?;
            let shown = match field.kind {
                FieldKind::Secret => "*".repeat(value.chars().count()),
                _ => value,
            };
            Some(format!("{}: {}", field.label, shown))
        })
        .collect()
}

/// Prompts on the terminal through dialoguer.
///
/// Text prompts accept `:back`, `:help` and `:cancel`; an empty answer keeps
/// the current value when there is one.
pub struct DialoguerInteraction {
    theme: ColorfulTheme,
}

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn prompt_label(prompt: &FieldPrompt<'_>) -> String {
        let marker = if prompt.field.required { "*" } else { "" };
        format!(
            "[{}/{}] {}{}",
            prompt.step, prompt.total_steps, prompt.field.label, marker
        )
    }

    fn prompt_choice(&self, prompt: &FieldPrompt<'_>, options: &[String]) -> PromptResponse {
        let mut items: Vec<String> = options.to_vec();
        if !prompt.field.required {
            items.push("(none)".to_string());
        }
        items.push(BACK_LABEL.to_string());
        let default = prompt
            .current
            .as_deref()
            .and_then(|current| options.iter().position(|o| o.eq_ignore_ascii_case(current)))
            .unwrap_or(0);
        match cli_io::prompt_select(&self.theme, &Self::prompt_label(prompt), &items, default) {
            Ok(Some(index)) if items[index] == BACK_LABEL => PromptResponse::Back,
            Ok(Some(index)) if index >= options.len() => PromptResponse::Value(String::new()),
            Ok(Some(index)) => PromptResponse::Value(items[index].clone()),
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }

    fn prompt_text(&self, prompt: &FieldPrompt<'_>) -> PromptResponse {
        let label = Self::prompt_label(prompt);
        let answer = match prompt.field.kind {
            FieldKind::Secret => cli_io::prompt_secret(&self.theme, &label),
            _ => cli_io::prompt_text(&self.theme, &label, prompt.current.as_deref()),
        };
        match answer {
            Ok(value) => parse_command(&value, prompt.current.is_some()),
            Err(_) => PromptResponse::Cancel,
        }
    }
}

impl Default for DialoguerInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardInteraction for DialoguerInteraction {
    fn prompt_field(&mut self, prompt: &FieldPrompt<'_>) -> PromptResponse {
        if let Some(error) = &prompt.error {
            output::warning(error);
        }
        match &prompt.field.kind {
            FieldKind::Choice(options) => self.prompt_choice(prompt, options),
            _ => self.prompt_text(prompt),
        }
    }

    fn confirm(&mut self, title: &str, summary: &[String]) -> ConfirmationResponse {
        output::section(format!("{} summary", title));
        output::lines(summary);
        let items = vec![
            "Submit".to_string(),
            "Edit this step".to_string(),
            "Cancel".to_string(),
        ];
        match cli_io::prompt_select(&self.theme, "Ready?", &items, 0) {
            Ok(Some(0)) => ConfirmationResponse::Confirm,
            Ok(Some(1)) => ConfirmationResponse::Back,
            _ => ConfirmationResponse::Cancel,
        }
    }

    fn show(&mut self, lines: &[String]) {
        output::lines(lines);
    }
}

/// Reads answers line by line, for scripts and tests.
///
/// Each line answers one prompt. `:keep`, `:back`, `:help` and `:cancel`
/// map to the matching responses; confirmation lines accept `y`/`yes` (or a
/// blank line) and `:back`. End of input cancels.
pub struct ScriptedInteraction<R: BufRead> {
    input: R,
    echo: bool,
}

impl<R: BufRead> ScriptedInteraction<R> {
    pub fn new(input: R) -> Self {
        Self { input, echo: true }
    }

    pub fn quiet(input: R) -> Self {
        Self { input, echo: false }
    }

    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
        }
    }
}

impl<R: BufRead> WizardInteraction for ScriptedInteraction<R> {
    fn prompt_field(&mut self, prompt: &FieldPrompt<'_>) -> PromptResponse {
        if self.echo {
            if let Some(error) = &prompt.error {
                output::warning(error);
            }
        }
        match self.next_line() {
            Some(line) if line.trim() == ":keep" => PromptResponse::Keep,
            Some(line) => parse_command(&line, false),
            None => PromptResponse::Cancel,
        }
    }

    fn confirm(&mut self, title: &str, summary: &[String]) -> ConfirmationResponse {
        if self.echo {
            output::section(format!("{} summary", title));
            output::lines(summary);
        }
        match self.next_line().map(|line| line.trim().to_ascii_lowercase()) {
            Some(answer) if answer.is_empty() || answer == "y" || answer == "yes" => {
                ConfirmationResponse::Confirm
            }
            Some(answer) if answer == ":back" => ConfirmationResponse::Back,
            _ => ConfirmationResponse::Cancel,
        }
    }

    fn show(&mut self, lines: &[String]) {
        if self.echo {
            output::lines(lines);
        }
    }
}

fn parse_command(raw: &str, has_current: bool) -> PromptResponse {
    match raw.trim() {
        ":back" => PromptResponse::Back,
        ":help" => PromptResponse::Help,
        ":cancel" => PromptResponse::Cancel,
        "" if has_current => PromptResponse::Keep,
        _ => PromptResponse::Value(raw.to_string()),
    }
}

/// Scripted input when requested or when stdin is not a terminal.
pub fn use_scripted_input() -> bool {
    std::env::var_os("PORTAL_CORE_CLI_SCRIPT").is_some() || !std::io::stdin().is_terminal()
}
