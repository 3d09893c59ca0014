//! The `crl-assist chat` command and the chat loop shared with interactive mode.

use clap::Args;
use console::Style;
use crl_assist_core::{ChatError, Config, Session};
use dialoguer::Input;

use super::interactive::theme::crl_theme;
use super::{credential, render};

/// Arguments for the `chat` command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Override the configured model for this session
    #[arg(long)]
    pub model: Option<String>,
}

/// Execute the chat command.
pub async fn execute(args: ChatArgs, config: &Config) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(model) = args.model {
        config.llm.model = model;
    }

    let mut session = Session::new(&config);
    match credential::resolve(&config, true)? {
        Some((key, _)) => session.set_credential(key),
        None => {
            render::warn("Enter your OpenAI API key to use the CRL chatbot.");
            return Ok(());
        }
    }

    chat_loop(&mut session).await
}

/// Read questions until the user submits an empty line or presses Ctrl+C.
///
/// Errors from the language model are printed and the loop continues; the
/// unanswered question stays in the transcript.
pub async fn chat_loop(session: &mut Session) -> anyhow::Result<()> {
    let theme = crl_theme();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!(
        "  {}",
        dim.apply_to("Ask about Crown-Rump Length (CRL). Empty line to return.")
    );
    eprintln!();

    if !session.conversation().is_empty() {
        render::print_transcript(session.conversation());
    }

    loop {
        let Some(question) = super::interactive::handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Ask a question about CRL or fetal growth")
                .allow_empty(true)
                .interact_text(),
        )?
        else {
            break;
        };

        if question.trim().is_empty() {
            break;
        }

        let pb = render::spinner("Thinking...");
        let outcome = session.ask(&question).await.cloned();
        pb.finish_and_clear();

        match outcome {
            Ok(reply) => {
                println!();
                render::print_turn(&reply);
            }
            Err(ChatError::MissingCredential) => {
                render::warn(&ChatError::MissingCredential.to_string());
                break;
            }
            Err(e) => {
                render::error(&e.to_string());
                if session.conversation().has_unanswered_turn() {
                    render::print_unanswered_marker();
                }
            }
        }
    }

    Ok(())
}
