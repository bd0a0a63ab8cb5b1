//! Terminal prompts.

use console::style;
use std::io::{self, Write};

/// Read a line of visible input.
pub fn input(prompt: &str) -> anyhow::Result<String> {
    eprint!("  {}", prompt);
    io::stderr().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Use `value` if given, otherwise prompt for it without echo.
pub fn secret_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => rpassword::prompt_password(format!("  {}", prompt))
            .map_err(|e| anyhow::anyhow!("Failed to read secret: {}", e)),
    }
}

/// Use `value` if given, otherwise prompt for it with echo.
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => input(prompt),
    }
}

/// Require the operator to type `yes`.
pub fn confirm_destructive(warning: &str) -> anyhow::Result<bool> {
    eprintln!("{} {}", style("!").red().bold(), style(warning).bold());
    let answer = input(&format!("Type {} to continue: ", style("yes").bold()))?;
    Ok(answer == "yes")
}
