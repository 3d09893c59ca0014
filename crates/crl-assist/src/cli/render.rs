//! Terminal rendering for results, explanations, and chat turns.
//!
//! Results and replies go to stdout; status lines, warnings, and spinners go
//! to stderr so piped output stays clean.

use console::Style;
use crl_assist_core::{ChatTurn, ClassificationResult, Conversation, Explanation, Role};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner on stderr with the given message.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print the label and raw probability.
pub fn print_result(result: &ClassificationResult) {
    let green = Style::new().green().bold();
    let label = Style::new().bold();
    println!(
        "{} {}",
        label.apply_to("Prediction:"),
        green.apply_to(result.display_label())
    );
    println!("{} {}", label.apply_to("Raw probability:"), result.probability);
}

/// Print the explanation, or a warning if it failed. Prints nothing if skipped.
pub fn print_explanation(explanation: &Explanation) {
    match explanation {
        Explanation::Skipped => {
            let dim = Style::new().for_stderr().dim();
            eprintln!(
                "  {}",
                dim.apply_to("No API key set; skipping AI interpretation.")
            );
        }
        Explanation::Generated(text) => {
            let cyan = Style::new().cyan().bold();
            println!();
            println!("{}", cyan.apply_to("AI Interpretation:"));
            println!();
            println!("{}", text.trim());
        }
        Explanation::Failed(e) => warn(&e.to_string()),
    }
}

/// Print one chat turn with a role header.
pub fn print_turn(turn: &ChatTurn) {
    let header = match turn.role {
        Role::User => Style::new().bold().apply_to("you"),
        Role::Assistant => Style::new().cyan().bold().apply_to("assistant"),
    };
    println!("{header}");
    println!("{}", turn.content.trim());
    println!();
}

/// Print the whole transcript, marking an unanswered final user turn.
pub fn print_transcript(conversation: &Conversation) {
    for turn in conversation.render() {
        print_turn(turn);
    }
    if conversation.has_unanswered_turn() {
        print_unanswered_marker();
    }
}

/// Dim note that the last user message got no reply.
pub fn print_unanswered_marker() {
    let dim = Style::new().for_stderr().dim();
    eprintln!("  {}", dim.apply_to("(no reply to the last message)"));
    eprintln!();
}

/// One-line summary of a classification, e.g. `GOOD (probability 0.87)`.
pub fn result_summary(result: &ClassificationResult) -> String {
    format!(
        "{} (probability {:.2})",
        result.display_label(),
        result.probability
    )
}

/// Yellow warning line on stderr.
pub fn warn(message: &str) {
    let yellow = Style::new().for_stderr().yellow();
    eprintln!("  {} {}", yellow.apply_to("!"), yellow.apply_to(message));
}

/// Red error line on stderr.
pub fn error(message: &str) {
    let red = Style::new().for_stderr().red();
    eprintln!("  {} {}", red.apply_to("✗"), red.apply_to(message));
}
