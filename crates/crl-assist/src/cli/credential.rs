//! API key acquisition: environment variable first, then a masked prompt.
//!
//! The key only ever lives in the session. It is never written to the config
//! file and never logged.

use console::Style;
use crl_assist_core::{Config, Credential};
use dialoguer::Password;

use super::interactive::theme::crl_theme;

/// Where the session's key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env,
    Prompt,
}

/// Look up the key in the configured environment variable.
pub fn from_env(config: &Config) -> Option<Credential> {
    Credential::from_env(&config.llm.api_key_env)
}

/// Ask for the key with masked input. Empty input or Ctrl+C yields `None`.
pub fn prompt() -> anyhow::Result<Option<Credential>> {
    let theme = crl_theme();
    let entered = super::interactive::handle_interrupt(
        Password::with_theme(&theme)
            .with_prompt("Enter your OpenAI API key (leave empty to skip)")
            .allow_empty_password(true)
            .interact(),
    )?;
    Ok(entered.and_then(Credential::new))
}

/// Environment first; fall back to prompting when `interactive` is set.
pub fn resolve(
    config: &Config,
    interactive: bool,
) -> anyhow::Result<Option<(Credential, KeySource)>> {
    if let Some(key) = from_env(config) {
        let dim = Style::new().for_stderr().dim();
        eprintln!(
            "  {}",
            dim.apply_to(format!("Using API key from {}", config.llm.api_key_env))
        );
        return Ok(Some((key, KeySource::Env)));
    }
    if !interactive {
        return Ok(None);
    }
    Ok(prompt()?.map(|key| (key, KeySource::Prompt)))
}
