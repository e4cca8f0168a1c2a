//! User commands and their dispatch onto [`ProductStore`] actions.
//!
//! Front ends (the one-shot CLI and the interactive shell) translate their
//! input into a [`Command`] and hand it to [`dispatch`]; nothing here knows
//! how results are drawn.

use std::path::PathBuf;
use std::str::FromStr;

use crate::samples::{SampleFetcher, SampleSource};
use crate::store::{ActionOutcome, ProductStore};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: String, password: String },
    Register { email: String, password: String },
    Logout,
    Refresh,
    /// Raw form input; validated by the store
    Add { name: String, stock: String },
    AddSample,
    Increment { id: i64 },
    Decrement { id: i64 },
    /// Delta against an explicit version
    Adjust { id: i64, version: i64, delta: i64 },
    Delete { id: i64 },
    Toggle { id: i64 },
    Export { path: PathBuf },
    Seed { source: SampleSource, count: usize },
    Help,
    Quit,
}

impl Command {
    /// Commands that can run without a held token
    pub fn allowed_signed_out(&self) -> bool {
        matches!(
            self,
            Command::Login { .. } | Command::Register { .. } | Command::Help | Command::Quit
        )
    }
}

pub const SHELL_HELP: &str = "\
Commands:
  login <email> <password>       sign in
  register <email> <password>    create an account and sign in
  logout                         sign out
  list                           re-fetch and show products
  add <stock> <name...>          create a product
  sample                         create \"Sample Item\" with stock 5
  inc <id> | dec <id>            change stock by one
  adjust <id> <version> <delta>  change stock by delta at a known version
  delete <id>                    delete a product (asks first)
  toggle <id>                    show or hide product details
  export [path]                  write products to CSV
  seed [pokemon|rick-and-morty] [count]
  help | quit";

impl FromStr for Command {
    type Err = String;

    /// Parses one shell line.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| "Empty command".to_string())?;
        let rest: Vec<&str> = parts.collect();

        let command = match verb.to_lowercase().as_str() {
            "login" | "register" => {
                let [email, password] = rest.as_slice() else {
                    return Err(format!("Usage: {verb} <email> <password>"));
                };
                let (email, password) = (email.to_string(), password.to_string());
                if verb.eq_ignore_ascii_case("login") {
                    Command::Login { email, password }
                } else {
                    Command::Register { email, password }
                }
            }
            "logout" => Command::Logout,
            "list" | "ls" | "refresh" => Command::Refresh,
            "add" => match rest.split_first() {
                Some((stock, name)) => Command::Add {
                    name: name.join(" "),
                    stock: stock.to_string(),
                },
                None => return Err("Usage: add <stock> <name...>".to_string()),
            },
            "sample" => Command::AddSample,
            "inc" | "+" => Command::Increment {
                id: parse_id(&rest)?,
            },
            "dec" | "-" => Command::Decrement {
                id: parse_id(&rest)?,
            },
            "adjust" => {
                let [id, version, delta] = rest.as_slice() else {
                    return Err("Usage: adjust <id> <version> <delta>".to_string());
                };
                Command::Adjust {
                    id: parse_number(id, "id")?,
                    version: parse_number(version, "version")?,
                    delta: parse_number(delta, "delta")?,
                }
            }
            "delete" | "rm" => Command::Delete {
                id: parse_id(&rest)?,
            },
            "toggle" | "details" => Command::Toggle {
                id: parse_id(&rest)?,
            },
            "export" => Command::Export {
                path: rest
                    .first()
                    .map(PathBuf::from)
                    .unwrap_or_else(default_export_path),
            },
            "seed" => {
                let source = match rest.first() {
                    Some(s) => s.parse()?,
                    None => SampleSource::Pokemon,
                };
                let count = match rest.get(1) {
                    Some(n) => parse_number::<usize>(n, "count")?,
                    None => crate::config::DEFAULT_SAMPLE_COUNT,
                };
                Command::Seed { source, count }
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command: {other} (try 'help')")),
        };
        Ok(command)
    }
}

fn parse_id(rest: &[&str]) -> Result<i64, String> {
    match rest {
        [id] => parse_number(id, "id"),
        _ => Err("Expected a single product id".to_string()),
    }
}

fn parse_number<T: FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("Invalid {what}: {raw}"))
}

/// `products-YYYY-MM-DD.csv` in the working directory
pub fn default_export_path() -> PathBuf {
    PathBuf::from(crate::export::default_export_filename(
        chrono::Utc::now().date_naive(),
    ))
}

/// Runs `command` against the store. `Help` and `Quit` are front-end
/// concerns and complete immediately.
pub async fn dispatch(
    store: &mut ProductStore,
    fetcher: &SampleFetcher,
    command: Command,
) -> ActionOutcome {
    log::debug!("Dispatching {:?}", redacted(&command));
    match command {
        Command::Login { email, password } => {
            let outcome = store.login(&email, &password).await;
            if outcome.is_completed() {
                store.refresh().await;
            }
            outcome
        }
        Command::Register { email, password } => {
            let outcome = store.register(&email, &password).await;
            if outcome.is_completed() {
                store.refresh().await;
            }
            outcome
        }
        Command::Logout => store.logout(),
        Command::Refresh => store.refresh().await,
        Command::Add { name, stock } => store.create_from_input(&name, &stock).await,
        Command::AddSample => store.add_sample_product().await,
        Command::Increment { id } => store.increment(id).await,
        Command::Decrement { id } => store.decrement(id).await,
        Command::Adjust { id, version, delta } => {
            store.apply_stock_delta(id, version, delta).await
        }
        Command::Delete { id } => store.delete(id).await,
        Command::Toggle { id } => {
            store.toggle_details(id);
            ActionOutcome::Completed
        }
        Command::Export { path } => store.export_csv(&path).await,
        Command::Seed { source, count } => store.seed_samples(fetcher, source, count).await,
        Command::Help | Command::Quit => ActionOutcome::Completed,
    }
}

fn redacted(command: &Command) -> Command {
    match command {
        Command::Login { email, .. } => Command::Login {
            email: email.clone(),
            password: "***".to_string(),
        },
        Command::Register { email, .. } => Command::Register {
            email: email.clone(),
            password: "***".to_string(),
        },
        other => other.clone(),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
