use dialoguer::{theme::ColorfulTheme, Input, Password, Select};

use super::CliError;

/// Free-form text; blank answers are allowed so the caller can decide what
/// they mean.
pub fn prompt_text(theme: &ColorfulTheme, prompt: &str, initial: Option<&str>) -> Result<String, CliError> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true);
    if let Some(initial) = initial {
        input = input.with_initial_text(initial);
    }
    input.interact_text().map_err(CliError::from)
}

pub fn prompt_secret(theme: &ColorfulTheme, prompt: &str) -> Result<String, CliError> {
    Password::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(CliError::from)
}

/// Index into `options`, or `None` when the user pressed Esc.
pub fn prompt_select(
    theme: &ColorfulTheme,
    prompt: &str,
    options: &[String],
    default: usize,
) -> Result<Option<usize>, CliError> {
    Select::with_theme(theme)
        .with_prompt(prompt)
        .items(options)
        .default(default.min(options.len().saturating_sub(1)))
        .interact_opt()
        .map_err(CliError::from)
}
