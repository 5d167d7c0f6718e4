use crate::commands;
use crate::context::Context;
use clap::{Args, Parser, Subcommand};
use monitoria::error::AppError;
use monitoria::evaluations::MAX_CRITERION_SCORE;

#[derive(Parser, Debug)]
#[command(
    name = "monitoria",
    about = "Review call-center calls and file quality evaluations from the command line",
    version
)]
struct Cli {
    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store credentials locally
    Login(LoginArgs),
    /// Forget stored credentials
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse calls
    Calls {
        #[command(subcommand)]
        command: CallsCommand,
    },
    /// Browse and author evaluations
    Evaluations {
        #[command(subcommand)]
        command: EvaluationsCommand,
    },
    /// Show dashboard figures for a period
    Dashboard(DashboardArgs),
}

#[derive(Subcommand, Debug)]
enum CallsCommand {
    /// List calls with optional filters
    List(CallListArgs),
    /// Show one call with its evaluation
    Show(CallShowArgs),
}

#[derive(Subcommand, Debug)]
enum EvaluationsCommand {
    /// List evaluations with optional filters
    List(EvaluationListArgs),
    /// Evaluate a call that has no evaluation yet
    Create(CreateEvaluationArgs),
    /// Edit an existing evaluation
    Edit(EditEvaluationArgs),
    /// Delete an evaluation (admins only)
    Delete(DeleteEvaluationArgs),
}

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) username: String,
    /// Read from stdin when omitted
    #[arg(long)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CallListArgs {
    #[arg(long)]
    pub(crate) status: Option<String>,
    #[arg(long)]
    pub(crate) priority: Option<String>,
    #[arg(long)]
    pub(crate) category: Option<String>,
    #[arg(long)]
    pub(crate) operator_id: Option<i64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub(crate) date_from: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub(crate) date_to: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
}

#[derive(Args, Debug)]
pub(crate) struct CallShowArgs {
    pub(crate) call_id: i64,
}

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluationListArgs {
    /// Free-text search over protocol and customer
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long)]
    pub(crate) requires_coaching: Option<bool>,
    #[arg(long)]
    pub(crate) is_exemplary: Option<bool>,
    #[arg(long)]
    pub(crate) call_id: Option<i64>,
    #[arg(long)]
    pub(crate) operator_id: Option<i64>,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
}

/// Form fields shared by create and edit.
#[derive(Args, Debug, Default)]
pub(crate) struct EvaluationFormArgs {
    /// Six comma-separated scores: greeting, communication, problem resolution,
    /// empathy, procedure compliance, closing
    #[arg(long, value_parser = parse_scores)]
    pub(crate) scores: Option<[u8; 6]>,
    #[arg(long)]
    pub(crate) positive: Option<String>,
    #[arg(long)]
    pub(crate) improvement: Option<String>,
    #[arg(long)]
    pub(crate) comments: Option<String>,
    #[arg(long)]
    pub(crate) requires_coaching: Option<bool>,
    #[arg(long)]
    pub(crate) exemplary: Option<bool>,
}

#[derive(Args, Debug)]
pub(crate) struct CreateEvaluationArgs {
    pub(crate) call_id: i64,
    #[command(flatten)]
    pub(crate) form: EvaluationFormArgs,
}

#[derive(Args, Debug)]
pub(crate) struct EditEvaluationArgs {
    pub(crate) evaluation_id: i64,
    #[command(flatten)]
    pub(crate) form: EvaluationFormArgs,
}

#[derive(Args, Debug)]
pub(crate) struct DeleteEvaluationArgs {
    pub(crate) evaluation_id: i64,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    #[arg(long, default_value_t = monitoria::session::DEFAULT_PERIOD_DAYS)]
    pub(crate) days: u32,
    #[arg(long, default_value_t = monitoria::session::DEFAULT_RECENT_LIMIT)]
    pub(crate) recent: u32,
}

pub(crate) fn parse_scores(value: &str) -> Result<[u8; 6], String> {
    let parsed = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| format!("'{}' is not a score", part.trim()))
        })
        .collect::<Result<Vec<u8>, String>>()?;
    let scores: [u8; 6] = parsed
        .try_into()
        .map_err(|values: Vec<u8>| format!("expected 6 scores, got {}", values.len()))?;
    if let Some(score) = scores.iter().find(|score| **score > MAX_CRITERION_SCORE) {
        return Err(format!("scores range from 0 to {MAX_CRITERION_SCORE}, got {score}"));
    }
    Ok(scores)
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let context = Context::from_env(cli.json)?;

    match cli.command {
        Command::Login(args) => commands::login(&context, args).await,
        Command::Logout => commands::logout(&context).await,
        Command::Whoami => commands::whoami(&context).await,
        Command::Calls {
            command: CallsCommand::List(args),
        } => commands::list_calls(&context, args).await,
        Command::Calls {
            command: CallsCommand::Show(args),
        } => commands::show_call(&context, args).await,
        Command::Evaluations {
            command: EvaluationsCommand::List(args),
        } => commands::list_evaluations(&context, args).await,
        Command::Evaluations {
            command: EvaluationsCommand::Create(args),
        } => commands::create_evaluation(&context, args).await,
        Command::Evaluations {
            command: EvaluationsCommand::Edit(args),
        } => commands::edit_evaluation(&context, args).await,
        Command::Evaluations {
            command: EvaluationsCommand::Delete(args),
        } => commands::delete_evaluation(&context, args).await,
        Command::Dashboard(args) => commands::dashboard(&context, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_parse_in_criterion_order() {
        assert_eq!(parse_scores("5,4, 4,5,3,4"), Ok([5, 4, 4, 5, 3, 4]));
    }

    #[test]
    fn scores_reject_wrong_arity_and_range() {
        assert!(parse_scores("5,4,4").is_err());
        assert!(parse_scores("5,4,4,5,3,9").is_err());
        assert!(parse_scores("5,4,x,5,3,4").is_err());
    }

    #[test]
    fn cli_parses_nested_subcommands() {
        let cli = Cli::try_parse_from([
            "monitoria",
            "evaluations",
            "create",
            "7",
            "--scores",
            "5,4,4,5,3,4",
            "--positive",
            "Cordial",
            "--json",
        ])
        .expect("arguments parse");
        assert!(cli.json);
        match cli.command {
            Command::Evaluations {
                command: EvaluationsCommand::Create(args),
            } => {
                assert_eq!(args.call_id, 7);
                assert_eq!(args.form.scores, Some([5, 4, 4, 5, 3, 4]));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
