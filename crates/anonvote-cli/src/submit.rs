//! # Submission Subcommands

use clap::Args;
use serde::Serialize;

use anonvote_chain::TxReceipt;
use anonvote_submission::DEFAULT_VOTE_OPTION;

use crate::app::App;

/// Arguments for the vote subcommand.
#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Option to vote for (1-based).
    #[arg(long = "option", default_value_t = DEFAULT_VOTE_OPTION)]
    pub option: u64,
}

/// Arguments for the comment subcommand.
#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Comment text.
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionOutput {
    pub kind: &'static str,
    pub account: Option<String>,
    pub receipt: TxReceipt,
}

pub async fn vote(app: &App, args: &VoteArgs) -> anyhow::Result<SubmissionOutput> {
    app.ready_session().await?;
    let receipt = app
        .coordinator
        .submit_vote(app.driver.machine(), args.option)
        .await?;
    Ok(output(app, "vote", receipt))
}

pub async fn comment(app: &App, args: &CommentArgs) -> anyhow::Result<SubmissionOutput> {
    app.ready_session().await?;
    app.driver.set_comment_draft(args.text.clone());
    let receipt = app
        .coordinator
        .submit_comment_draft(app.driver.machine())
        .await?;
    Ok(output(app, "comment", receipt))
}

fn output(app: &App, kind: &'static str, receipt: TxReceipt) -> SubmissionOutput {
    SubmissionOutput {
        kind,
        account: app.driver.machine().snapshot().account.map(|a| a.short()),
        receipt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use std::path::PathBuf;

    fn dry_run_app() -> App {
        App::new(&AppOptions {
            eligibility_path: None,
            test_mode: true,
            nullifier_seed: 1234,
            proof_file: PathBuf::from("unused.json"),
            dry_run: true,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_dry_run_vote() {
        let app = dry_run_app();
        let out = vote(&app, &VoteArgs { option: 1 }).await.unwrap();
        assert_eq!(out.kind, "vote");
        assert!(out.account.is_some());
        assert_eq!(app.driver.machine().snapshot().records.len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_blank_comment_fails() {
        let app = dry_run_app();
        let err = comment(&app, &CommentArgs { text: "  ".into() })
            .await
            .unwrap_err();
        assert_eq!(crate::exit::exit_code(&err), 6);
    }
}
