//! Interactive mode: guided experience for bare `crl-assist` invocation.
//!
//! One [`Session`] lives for the whole menu loop, so the chat transcript and
//! API key carry over between analyzing images and asking questions. Every
//! failure is printed and the menu comes back.

pub mod theme;

use console::Style;
use crl_assist_core::{Config, ImageUpload, Session};
use dialoguer::{Input, Select};
use std::path::PathBuf;

use super::credential::{self, KeySource};
use super::{chat, classify, render};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
pub(crate) fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Entry point for interactive mode.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::crl_theme();
    let mut session = Session::new(config);
    let mut key_source = None;

    if let Some(key) = credential::from_env(config) {
        session.set_credential(key);
        key_source = Some(KeySource::Env);
    }

    loop {
        if let Some(result) = session.last_result() {
            let dim = Style::new().for_stderr().dim();
            eprintln!(
                "  {}",
                dim.apply_to(format!("Last result: {}", render::result_summary(result)))
            );
        }

        let items = menu_items(key_source);
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => analyze_image(&mut session, config).await?,
            Some(1) => ask_about_crl(&mut session, &mut key_source).await?,
            Some(2) => {
                if let Some(key) = credential::prompt()? {
                    session.set_credential(key);
                    key_source = Some(KeySource::Prompt);
                }
            }
            Some(3) => show_config(config)?,
            _ => break, // Exit or Ctrl+C / Esc
        }
    }

    Ok(())
}

/// Main menu labels. The key entry reflects whether one is already set.
fn menu_items(key_source: Option<KeySource>) -> Vec<String> {
    let key_item = match key_source {
        None => "Enter OpenAI API key".to_string(),
        Some(KeySource::Env) => "Replace OpenAI API key (currently from environment)".to_string(),
        Some(KeySource::Prompt) => "Replace OpenAI API key".to_string(),
    };
    vec![
        "Analyze ultrasound image".to_string(),
        "Ask about Crown-Rump Length (CRL)".to_string(),
        key_item,
        "View configuration".to_string(),
        "Exit".to_string(),
    ]
}

/// Prompt for an image, classify it, and show the result.
async fn analyze_image(session: &mut Session, config: &Config) -> anyhow::Result<()> {
    let theme = theme::crl_theme();

    let Some(raw_path) = handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt(format!(
                "Path to ultrasound image ({})",
                config.upload.supported_formats.join("/")
            ))
            .interact_text(),
    )?
    else {
        return Ok(());
    };

    let path = classify::expand_path(&PathBuf::from(raw_path.trim()));
    let upload = match ImageUpload::from_path(&path, &config.upload) {
        Ok(upload) => upload,
        Err(e) => {
            render::error(&e.to_string());
            return Ok(());
        }
    };

    let dim = Style::new().for_stderr().dim();
    eprintln!(
        "  {}",
        dim.apply_to(format!(
            "Uploaded {} ({}x{}, {:.1} KB)",
            upload.file_name,
            upload.dimensions.0,
            upload.dimensions.1,
            upload.bytes.len() as f64 / 1024.0
        ))
    );

    match classify::analyze_with_spinner(session, &upload).await {
        Ok(outcome) => {
            eprintln!();
            render::print_result(&outcome.result);
            render::print_explanation(&outcome.explanation);
            eprintln!();
        }
        Err(e) => render::error(&e.to_string()),
    }

    Ok(())
}

/// Enter the chat, asking for a key first if none is set.
async fn ask_about_crl(
    session: &mut Session,
    key_source: &mut Option<KeySource>,
) -> anyhow::Result<()> {
    if !session.has_credential() {
        render::warn("Enter your OpenAI API key to use the CRL chatbot.");
        match credential::prompt()? {
            Some(key) => {
                session.set_credential(key);
                *key_source = Some(KeySource::Prompt);
            }
            None => return Ok(()),
        }
    }

    chat::chat_loop(session).await
}

/// Interactive config viewer. Shows a summary of current settings and offers
/// to display the full TOML or the config file path.
fn show_config(config: &Config) -> anyhow::Result<()> {
    let theme = theme::crl_theme();
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();
    let label = Style::new().for_stderr().bold();

    loop {
        eprintln!();
        eprintln!("  {}", cyan.apply_to("Current configuration:"));
        eprintln!();

        let config_path = Config::default_path();
        let path_note = if config_path.exists() {
            "(exists)"
        } else {
            "(using defaults)"
        };

        eprintln!(
            "    {:<20} {} {}",
            label.apply_to("Config file:"),
            config_path.display(),
            dim.apply_to(path_note)
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Classifier:"),
            config.classifier.endpoint
        );
        eprintln!(
            "    {:<20} {} (max {} MB)",
            label.apply_to("Uploads:"),
            config.upload.supported_formats.join(", "),
            config.upload.max_file_size_mb
        );
        eprintln!(
            "    {:<20} {} via {}",
            label.apply_to("Language model:"),
            config.llm.model,
            config.llm.endpoint
        );
        eprintln!(
            "    {:<20} ${}",
            label.apply_to("API key variable:"),
            config.llm.api_key_env
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Log level:"),
            config.logging.level
        );
        eprintln!();

        let items = &["View full config (TOML)", "Show config file path", "Back"];

        let selection = Select::with_theme(&theme)
            .with_prompt("Configuration")
            .items(items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => match config.to_toml() {
                Ok(toml) => {
                    eprintln!();
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!("{toml}");
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!();
                }
                Err(e) => render::error(&format!("Failed to serialize config: {e}")),
            },
            Some(1) => {
                eprintln!();
                eprintln!("  {}", Config::default_path().display());
                eprintln!();
            }
            _ => break, // Back or Esc / Ctrl+C
        }
    }

    Ok(())
}
