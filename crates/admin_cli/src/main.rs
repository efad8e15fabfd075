use std::{error::Error, io::Write};

use bcrypt::{DEFAULT_COST, hash};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError, NewUserCmd};
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "walletbook_admin")]
#[command(about = "Admin utilities for Walletbook (bootstrap users, repair balances)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./walletbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Wallet(Wallet),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a user; the password is asked interactively.
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct Wallet {
    #[command(subcommand)]
    command: WalletCommand,
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    /// Print the wallets of a user with their cached balance.
    List(WalletListArgs),
    /// Rebuild the cached balance of a wallet from its transactions.
    Recalculate(WalletRecalculateArgs),
}

#[derive(Args, Debug)]
struct WalletListArgs {
    #[arg(long)]
    user: Uuid,
}

#[derive(Args, Debug)]
struct WalletRecalculateArgs {
    #[arg(long)]
    user: Uuid,
    /// Wallet to repair; every wallet of the user when omitted.
    #[arg(long)]
    wallet: Option<Uuid>,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn print_line(out: &mut std::io::Stderr, message: &str) -> CliResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Reads a line without echoing it.
fn prompt_password(prompt: &str) -> CliResult<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => {}
        }
        out.flush()?;
    }

    Ok(buf)
}

fn prompt_new_password() -> CliResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            print_line(&mut out, "Password must not be empty.")?;
            continue;
        }

        if prompt_password("Confirm password: ")? == first {
            return Ok(first);
        }
        print_line(&mut out, "Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_engine(database_url: &str) -> CliResult<Engine> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Engine::builder().database(db).build().await?)
}

async fn recalculate(engine: &Engine, args: WalletRecalculateArgs) -> CliResult<()> {
    let wallet_ids = match args.wallet {
        Some(id) => vec![id],
        None => engine
            .wallets(args.user)
            .await?
            .into_iter()
            .map(|w| w.id)
            .collect(),
    };

    for wallet_id in wallet_ids {
        let before = engine.wallet(args.user, wallet_id).await?.balance;
        let after = engine.recalculate_wallet_balance(args.user, wallet_id).await?;
        if before == after {
            println!("{wallet_id}: {after} (unchanged)");
        } else {
            println!("{wallet_id}: {before} -> {after}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let engine = connect_engine(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_new_password()?;
            let password_hash = hash(password, DEFAULT_COST)?;

            let created = engine
                .new_user(NewUserCmd {
                    username: args.username,
                    email: args.email,
                    password_hash,
                })
                .await;
            match created {
                Ok(user) => println!("created user: {} ({})", user.username, user.id),
                Err(EngineError::ExistingKey(key)) => {
                    eprintln!("user already exists: {key}");
                    std::process::exit(1);
                }
                Err(err) if err.is_validation() => {
                    for message in err.messages() {
                        eprintln!("{message}");
                    }
                    std::process::exit(2);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Wallet(Wallet {
            command: WalletCommand::List(args),
        }) => {
            for wallet in engine.wallets(args.user).await? {
                println!(
                    "{}  {:<24} {} {}",
                    wallet.id,
                    wallet.name,
                    wallet.balance,
                    wallet.currency.code()
                );
            }
        }
        Command::Wallet(Wallet {
            command: WalletCommand::Recalculate(args),
        }) => recalculate(&engine, args).await?,
    }

    Ok(())
}
