use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::error;

use moketravel::config::{config_path, config_schema, try_load_config};
use moketravel::context::SessionState;
use moketravel::forms::FormOutcome;
use moketravel::routes::{Location, Navigation, Navigator, LOGIN_ROUTE, SIGNUP_ROUTE};
use moketravel::startup::start;
use moketravel::state::AppState;
use moketravel::store::StorageError;
use moketravel::utils::{init_logging, LoggingError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("could not render schema: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("request did not establish a session")]
    NotAuthenticated,
}

#[derive(Parser, Debug)]
#[command(name = "moketravel", about = "Moke Travel session client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session.
    Login(LoginArgs),
    /// Create an account; logs in when the API confirms it.
    Signup(SignupArgs),
    /// Forget the session.
    Logout,
    /// Show whether a session is stored.
    Status,
    /// Navigate to a path, going through the route guard.
    Open { path: String },
    /// Print the JSON schema of the configuration file.
    Schema,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    username: String,
    #[arg(long, env = "MOKE_PASSWORD", hide_env_values = true)]
    password: String,
    /// Path originally requested; visited after a successful login.
    #[arg(long)]
    from: Option<String>,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "MOKE_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    from: Option<String>,
}

fn form_location(route: &str, from: Option<String>) -> Location {
    match from {
        Some(from) => Location::with_from(route, from),
        None => Location::new(route),
    }
}

fn print_navigation(navigation: &Navigation, navigator: &Navigator) {
    match navigation {
        Navigation::Rendered(route) => {
            println!("{} -> {:?}", navigator.current().path, route)
        }
        Navigation::Pending => println!("waiting for session"),
        Navigation::Redirected(login) => println!(
            "login required, redirected to {} (from {})",
            login.path,
            login.from.as_deref().unwrap_or("/")
        ),
    }
}

/// Apply a form outcome: navigate on success, print the message lines otherwise.
fn finish(state: &AppState, outcome: FormOutcome) -> Result<(), CliError> {
    match outcome {
        FormOutcome::Navigated(destination) => {
            let mut navigator = state.navigator();
            let navigation = navigator.replace(Location::new(destination));
            print_navigation(&navigation, &navigator);
            Ok(())
        }
        FormOutcome::Failed(lines) => {
            for line in lines {
                eprintln!("{}", line);
            }
            Err(CliError::NotAuthenticated)
        }
        FormOutcome::Stayed | FormOutcome::Ignored | FormOutcome::Discarded => {
            Err(CliError::NotAuthenticated)
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Schema = cli.command {
        println!("{}", config_schema()?);
        return Ok(());
    }

    let config = Arc::new(try_load_config(&config_path())?);
    init_logging(&config.logging)?;
    let (state, session) = start(config)?;

    match cli.command {
        Command::Login(args) => {
            let form = state.login_form(form_location(LOGIN_ROUTE, args.from));
            let outcome = form.submit(&args.username, &args.password).await;
            finish(&state, outcome)
        }
        Command::Signup(args) => {
            let form = state.signup_form(form_location(SIGNUP_ROUTE, args.from));
            let outcome = form.submit(&args.name, &args.email, &args.password).await;
            finish(&state, outcome)
        }
        Command::Logout => {
            state.context.logout()?;
            println!("logged out");
            Ok(())
        }
        Command::Status => {
            match session {
                SessionState::Authenticated(session) => {
                    let who = session
                        .get("username")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown user");
                    println!("authenticated as {}", who);
                }
                _ => println!("not authenticated"),
            }
            Ok(())
        }
        Command::Open { path } => {
            let mut navigator = state.navigator();
            let navigation = navigator.navigate(&path);
            print_navigation(&navigation, &navigator);
            Ok(())
        }
        Command::Schema => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::NotAuthenticated) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
