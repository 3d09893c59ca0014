//! The `crl-assist classify` command.

use clap::Args;
use crl_assist_core::{Config, Explanation, ImageUpload, InferenceOutcome, Session};
use std::path::{Path, PathBuf};

use super::{credential, render};

/// Arguments for the `classify` command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Ultrasound image (JPG, JPEG, or PNG)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Skip the AI interpretation even if an API key is available
    #[arg(long)]
    pub no_explain: bool,

    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute the classify command.
pub async fn execute(args: ClassifyArgs, config: &Config) -> anyhow::Result<()> {
    let mut session = session_for(&args, config)?;
    let path = expand_path(&args.image);
    let upload = ImageUpload::from_path(&path, &config.upload)?;
    let outcome = analyze_with_spinner(&mut session, &upload).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
    } else {
        render::print_result(&outcome.result);
        render::print_explanation(&outcome.explanation);
    }
    Ok(())
}

/// Build the session, picking up an API key from the environment unless
/// `--no-explain` was given.
fn session_for(args: &ClassifyArgs, config: &Config) -> anyhow::Result<Session> {
    let mut session = Session::new(config);
    if !args.no_explain {
        if let Some((key, _)) = credential::resolve(config, false)? {
            session.set_credential(key);
        }
    }
    Ok(session)
}

/// Run the inference flow with spinners around each remote call.
///
/// The explanation spinner only appears when a key is present.
pub async fn analyze_with_spinner(
    session: &mut Session,
    upload: &ImageUpload,
) -> Result<InferenceOutcome, crl_assist_core::ClassificationError> {
    let message = if session.has_credential() {
        "Sending image to model and generating AI reasoning..."
    } else {
        "Sending image to model..."
    };
    let pb = render::spinner(message);
    let outcome = session.analyze(upload).await;
    pb.finish_and_clear();
    outcome
}

/// Expand `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn outcome_json(outcome: &InferenceOutcome) -> serde_json::Value {
    let (explanation, explanation_error) = match &outcome.explanation {
        Explanation::Skipped => (None, None),
        Explanation::Generated(text) => (Some(text.clone()), None),
        Explanation::Failed(e) => (None, Some(e.to_string())),
    };
    serde_json::json!({
        "prediction": outcome.result.prediction,
        "probability": outcome.result.probability,
        "explanation": explanation,
        "explanation_error": explanation_error,
    })
}
