mod client;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use client::{BackendClient, LoginRequest};
use config::Config;
use pitchside_session::{
    decode_claims, derive_session, FileStore, Navigation, RouteTable, Session, SessionStore,
};

#[derive(Parser)]
#[command(name = "pitchside")]
#[command(version, about = "Pitchside Command Line Tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Tournament backend URL (overrides config)
    #[arg(long, global = true)]
    server_url: Option<String>,

    /// Credential storage file (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in against the backend and store the issued token
    ///
    /// Examples:
    ///     pitchside login --username organizer
    ///     pitchside login -u admin -p secret --server-url http://api:8080
    #[command(verbatim_doc_comment)]
    Login {
        #[arg(short, long)]
        username: String,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Remove the stored token
    Logout,

    /// Show the session derived from the stored token
    Session {
        /// Emit JSON
        #[arg(short, long)]
        json: bool,

        /// Show decoded claims, or why the token was rejected
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check where navigating to a path would end up
    ///
    /// Exit status: 0 render, 2 redirect, 3 not found.
    ///
    /// Examples:
    ///     pitchside check /dashboard
    ///     pitchside check /admin/organizers
    #[command(verbatim_doc_comment)]
    Check {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Manage the stored token directly
    #[command(subcommand)]
    Token(TokenCommand),

    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Store a token as-is
    Set { value: String },
    /// Remove the stored token
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Persist the backend URL
    SetServer { url: String },
    /// Print the effective configuration
    Show,
}

fn init_tracing() {
    // Quiet unless RUST_LOG asks for output
    if let Ok(filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    let store = FileStore::new(config.resolve_store_path(cli.store.as_deref())?);

    match cli.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
            };
            let server_url = config.resolve_server_url(cli.server_url.as_deref());
            let client = BackendClient::new(server_url.clone(), Duration::from_secs(30))?;
            tracing::debug!(server = %server_url, username = %username, "Logging in");

            let token = client
                .login(&LoginRequest { username, password })
                .await
                .with_context(|| format!("Login against {} failed", server_url))?;

            let session = Session::from_token(Some(&token));
            if !session.is_authenticated {
                anyhow::bail!("Backend issued a token without a usable role claim");
            }
            store.set(&token).context("Failed to store token")?;

            println!("Logged in as {}.", session.role.as_deref().unwrap_or_default());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Logout => {
            store.clear().context("Failed to clear token")?;
            println!("Logged out.");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Session { json, verbose } => {
            let session = derive_session(&store);
            if json {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                print!("{}", describe_session(&session));
            }
            if verbose {
                print!("{}", describe_token(store.get().as_deref()));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { path } => {
            let session = derive_session(&store);
            let (line, code) = describe_navigation(&RouteTable::standard().navigate(&path, &session));
            println!("{}", line);
            Ok(ExitCode::from(code))
        }
        Commands::Token(TokenCommand::Set { value }) => {
            store.set(value.trim()).context("Failed to store token")?;
            print!("{}", describe_session(&derive_session(&store)));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Token(TokenCommand::Clear) => {
            store.clear().context("Failed to clear token")?;
            println!("Token cleared.");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(ConfigCommand::SetServer { url }) => {
            config.server_url = Some(url.clone());
            config.save()?;
            println!("Server URL set to {}.", url);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(ConfigCommand::Show) => {
            println!("server_url: {}", config.resolve_server_url(cli.server_url.as_deref()));
            println!("store: {}", store.path().display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn describe_session(session: &Session) -> String {
    match (session.is_authenticated, session.role.as_deref()) {
        (true, Some(role)) => format!("Authenticated: yes\nRole: {}\n", role),
        _ => "Authenticated: no\n".to_string(),
    }
}

fn describe_token(token: Option<&str>) -> String {
    let Some(token) = token else {
        return "Token: none stored\n".to_string();
    };

    match decode_claims(token) {
        Ok(claims) => {
            let mut out = String::from("Claims:\n");
            out.push_str(&format!("  role: {}\n", claims.role));
            if let Some(sub) = &claims.sub {
                out.push_str(&format!("  sub: {}\n", sub));
            }
            if let Some(expires_at) = claims.expires_at() {
                out.push_str(&format!("  exp: {} (not enforced)\n", expires_at.to_rfc3339()));
            }
            for (key, value) in &claims.extra {
                out.push_str(&format!("  {}: {}\n", key, value));
            }
            out
        }
        Err(e) => format!("Token rejected: {}\n", e),
    }
}

fn describe_navigation(navigation: &Navigation) -> (String, u8) {
    match navigation {
        Navigation::Render(matched) if matched.params.is_empty() => {
            (format!("render {}", matched.name), 0)
        }
        Navigation::Render(matched) => {
            let params: Vec<String> = matched.params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            (format!("render {} ({})", matched.name, params.join(", ")), 0)
        }
        Navigation::Redirect(location) => (format!("redirect {}", location), 2),
        Navigation::NotFound => ("not found".to_string(), 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchside_session::{ROLE_USER, TOKEN_KEY};

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::parse_from(["pitchside", "check", "/admin", "--store", "/tmp/s.json"]);
        assert!(matches!(cli.command, Commands::Check { ref path } if path == "/admin"));
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_describe_session() {
        assert_eq!(describe_session(&Session::anonymous()), "Authenticated: no\n");
        let session = Session {
            is_authenticated: true,
            role: Some(ROLE_USER.to_string()),
        };
        assert_eq!(describe_session(&session), "Authenticated: yes\nRole: USER\n");
    }

    #[test]
    fn test_describe_token() {
        assert_eq!(describe_token(None), "Token: none stored\n");
        assert_eq!(
            describe_token(Some("garbage")),
            "Token rejected: Malformed token: expected 3 parts, found 1\n"
        );
    }

    #[test]
    fn test_describe_navigation() {
        let table = RouteTable::standard();
        let anonymous = Session::anonymous();
        let user = Session {
            is_authenticated: true,
            role: Some(ROLE_USER.to_string()),
        };

        assert_eq!(describe_navigation(&table.navigate("/login", &anonymous)), ("render login".to_string(), 0));
        assert_eq!(describe_navigation(&table.navigate("/admin", &anonymous)), ("redirect /login".to_string(), 2));
        assert_eq!(
            describe_navigation(&table.navigate("/admin", &user)),
            ("redirect /unauthorized".to_string(), 2)
        );
        assert_eq!(
            describe_navigation(&table.navigate("/teams/4", &user)),
            ("render team (id=4)".to_string(), 0)
        );
        assert_eq!(describe_navigation(&table.navigate("/nope", &user)), ("not found".to_string(), 3));
    }

    #[test]
    fn test_file_store_round_trip_through_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        store.set("not.a-token").unwrap();
        assert_eq!(derive_session(&store), Session::anonymous());

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains(TOKEN_KEY));
    }
}
