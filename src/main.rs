//! Inventory Client - command-line front end
//!
//! One-shot subcommands share a session file between invocations; `shell`
//! keeps its session in memory for the lifetime of the process.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inventory_client::commands::{default_export_path, SHELL_HELP};
use inventory_client::config::{
    default_session_file, DEFAULT_BASE_URL, DEFAULT_LOG_FILTER, DEFAULT_NOTICE_MS,
    DEFAULT_SAMPLE_COUNT,
};
use inventory_client::{
    dispatch, ActionOutcome, Command, Config, FileSessionStore, InventoryApi, NoticeKind,
    ProductStore, Route, SampleFetcher, SampleSource, SessionManager,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Inventory tracker client - manage products and stock from the terminal
#[derive(Parser, Debug)]
#[command(name = "inventory_client")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the inventory service
    #[arg(long, env = "INVENTORY_API_BASE", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// File holding the session token between invocations
    #[arg(long, default_value_t = default_session_path())]
    session_file: String,

    /// How long notices stay visible in the shell, in milliseconds
    #[arg(long, default_value_t = DEFAULT_NOTICE_MS)]
    notice_ms: u64,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "INVENTORY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account, then sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "INVENTORY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show all products
    List {
        /// Include created/updated timestamps and versions
        #[arg(long, default_value_t = false)]
        details: bool,
    },
    /// Create a product
    Add { name: String, stock: String },
    /// Create "Sample Item" with stock 5
    Sample,
    /// Increase stock by one
    Inc { id: i64 },
    /// Decrease stock by one
    Dec { id: i64 },
    /// Change stock by a delta against a known version
    Adjust {
        id: i64,
        #[arg(long)]
        version: i64,
        #[arg(long, allow_negative_numbers = true)]
        delta: i64,
    },
    /// Delete a product
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short, default_value_t = false)]
        yes: bool,
    },
    /// Export all products to CSV (default: products-YYYY-MM-DD.csv)
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Seed sample products from a public API
    Seed {
        #[arg(long, default_value = "pokemon")]
        source: SampleSource,
        #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        count: usize,
    },
    /// Interactive session; the token lives only as long as the shell
    Shell,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            session_file: PathBuf::from(&self.session_file),
            notice_duration: Duration::from_millis(self.notice_ms),
        }
    }
}

const LOGIN_HINT: &str = "Not signed in. Run `inventory_client login --email <email>` to continue.";

fn default_session_path() -> String {
    default_session_file().to_string_lossy().to_string()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .init();

    let args = Args::parse();
    let config = args.config();
    log::debug!("Using {:?}", config);

    let fetcher = SampleFetcher::default();

    if matches!(args.action, Action::Shell) {
        let api = InventoryApi::new(&config.base_url, SessionManager::in_memory());
        let mut store = ProductStore::new(api, config.notice_duration);
        return run_shell(&mut store, &fetcher).await;
    }

    let mut session = SessionManager::new(Box::new(FileSessionStore::new(&config.session_file)));
    session.restore();
    let api = InventoryApi::new(&config.base_url, session);
    let mut store = ProductStore::new(api, config.notice_duration);

    let code = run_once(&mut store, &fetcher, args.action).await?;
    std::process::exit(code);
}

/// Runs a single subcommand and returns the process exit code.
async fn run_once(
    store: &mut ProductStore,
    fetcher: &SampleFetcher,
    action: Action,
) -> anyhow::Result<i32> {
    let mut show_details = false;
    let command = match action {
        Action::Login { email, password } => Command::Login { email, password },
        Action::Register { email, password } => Command::Register { email, password },
        Action::Logout => Command::Logout,
        Action::List { details } => {
            show_details = details;
            Command::Refresh
        }
        Action::Add { name, stock } => Command::Add { name, stock },
        Action::Sample => Command::AddSample,
        Action::Inc { id } => Command::Increment { id },
        Action::Dec { id } => Command::Decrement { id },
        Action::Adjust { id, version, delta } => Command::Adjust { id, version, delta },
        Action::Delete { id, yes } => {
            if !yes && store.session().is_signed_in() {
                // load the list so the prompt can name the product
                let loaded = store.refresh().await;
                if loaded == ActionOutcome::SessionExpired {
                    print_notice(store, Instant::now());
                    store.take_pending_route();
                    eprintln!("{LOGIN_HINT}");
                    return Ok(exit_code(&loaded));
                }
                if !confirm_delete(store, id)? {
                    println!("Cancelled");
                    return Ok(0);
                }
            }
            Command::Delete { id }
        }
        Action::Export { output } => Command::Export {
            path: output.unwrap_or_else(default_export_path),
        },
        Action::Seed { source, count } => Command::Seed { source, count },
        Action::Shell => anyhow::bail!("shell runs on its own, not as a one-shot command"),
    };

    if !command.allowed_signed_out() && !store.session().is_signed_in() {
        eprintln!("Please login first: inventory_client login --email <email>");
        return Ok(3);
    }

    // +1/-1 act on the version currently on screen, so load it first
    if matches!(command, Command::Increment { .. } | Command::Decrement { .. })
        && store.products().is_empty()
    {
        let loaded = store.refresh().await;
        if !loaded.is_completed() {
            print_notice(store, Instant::now());
            return Ok(exit_code(&loaded));
        }
    }

    let export_path = match &command {
        Command::Export { path } => Some(path.clone()),
        _ => None,
    };
    let shows_list = !matches!(command, Command::Logout | Command::Export { .. });

    let outcome = dispatch(store, fetcher, command).await;
    print_notice(store, Instant::now());

    if let (Some(path), ActionOutcome::Completed) = (export_path, &outcome) {
        println!("Wrote {}", path.display());
    }
    if show_details {
        let ids: Vec<i64> = store.products().iter().map(|p| p.id).collect();
        for id in ids {
            store.toggle_details(id);
        }
    }
    if store.take_pending_route() == Some(Route::Login) {
        eprintln!("{LOGIN_HINT}");
    } else if shows_list && store.session().is_signed_in() {
        print!("{}", store.render());
    }

    Ok(exit_code(&outcome))
}

fn confirm_delete(store: &ProductStore, id: i64) -> anyhow::Result<bool> {
    print!("{} [y/N] ", store.delete_prompt(id));
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn exit_code(outcome: &ActionOutcome) -> i32 {
    match outcome {
        ActionOutcome::Completed => 0,
        ActionOutcome::Failed(_) => 1,
        ActionOutcome::Conflict => 2,
        ActionOutcome::SessionExpired => 3,
    }
}

fn print_notice(store: &mut ProductStore, now: Instant) {
    if let Some(notice) = store.notices_mut().take(now) {
        match notice.kind {
            NoticeKind::Success => println!("✓ {}", notice.message),
            NoticeKind::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<Option<String>> {
    lines.next_line().await.context("Failed to read from stdin")
}

async fn run_shell(store: &mut ProductStore, fetcher: &SampleFetcher) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Inventory shell. Type 'help' for commands.");
    println!("Please login first: login <email> <password>");

    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = read_line(&mut lines).await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{SHELL_HELP}");
                continue;
            }
            _ => {}
        }

        if !command.allowed_signed_out() && !store.session().is_signed_in() {
            println!("Please login first: login <email> <password>");
            continue;
        }

        if let Command::Delete { id } = command {
            print!("{} [y/N] ", store.delete_prompt(id));
            std::io::stdout().flush().context("Failed to flush stdout")?;
            let answer = read_line(&mut lines).await?.unwrap_or_default();
            if !is_yes(&answer) {
                println!("Cancelled");
                continue;
            }
        }

        let shows_list = !matches!(command, Command::Logout | Command::Export { .. });
        dispatch(store, fetcher, command).await;
        print_notice(store, Instant::now());

        match store.take_pending_route() {
            Some(Route::Login) => println!("Signed out. Type 'login <email> <password>' to continue."),
            Some(Route::Inventory) | None => {
                if shows_list && store.session().is_signed_in() {
                    print!("{}", store.render());
                }
            }
        }
    }

    Ok(())
}
