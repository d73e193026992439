use std::{error::Error, io::Write};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Actor, Engine, Role, UserNew};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "kaskrout_admin")]
#[command(about = "Admin utilities for Kaskrout (bootstrap users, reconciliation)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./kaskrout.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    name: String,
    /// One of `user`, `vip`, `admin`.
    #[arg(long, default_value = "admin", value_parser = parse_role)]
    role: Role,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ReconcileArgs {
    /// Recompute the cost and net profit of one date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Retry every date left pending by a failed reconciliation.
    #[arg(long)]
    pending: bool,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::try_from(raw).map_err(|err| err.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    engine::parse_date(raw).map_err(|err| err.to_string())
}

/// Identity used for writes issued from this tool. Whoever runs it already
/// holds the database file.
fn operator() -> Actor {
    Actor::new(0, "kaskrout_admin", Role::Admin)
}

type BoxError = Box<dyn Error + Send + Sync>;

/// What a single key press did to the hidden input line.
#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Typed,
    Erased,
    Submit,
    Interrupt,
    Ignored,
}

fn apply_key(line: &mut String, key: KeyEvent) -> KeyOutcome {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => KeyOutcome::Submit,
        KeyCode::Char('c') if control => KeyOutcome::Interrupt,
        KeyCode::Char(ch) if !control => {
            line.push(ch);
            KeyOutcome::Typed
        }
        KeyCode::Backspace if line.pop().is_some() => KeyOutcome::Erased,
        _ => KeyOutcome::Ignored,
    }
}

/// Checks a new password and its confirmation against the account rules.
fn accept_password(first: &str, second: &str) -> Result<(), String> {
    engine::require_password(first).map_err(|err| err.to_string())?;
    if first != second {
        return Err("passwords do not match".to_string());
    }
    Ok(())
}

/// Raw-mode terminal session on stderr; raw mode ends when it is dropped.
struct HiddenPrompt {
    out: std::io::Stderr,
}

impl HiddenPrompt {
    fn open() -> Result<Self, BoxError> {
        terminal::enable_raw_mode()?;
        Ok(Self {
            out: std::io::stderr(),
        })
    }

    fn line(&mut self, text: &str) -> Result<(), BoxError> {
        execute!(
            self.out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        Ok(self.out.flush()?)
    }

    fn end_line(&mut self) -> Result<(), BoxError> {
        execute!(self.out, Print("\r\n"))?;
        Ok(self.out.flush()?)
    }

    fn read(&mut self, label: &str) -> Result<String, BoxError> {
        self.line(label)?;
        let mut secret = String::new();
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match apply_key(&mut secret, key) {
                KeyOutcome::Typed => execute!(self.out, Print("*"))?,
                KeyOutcome::Erased => {
                    execute!(self.out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?
                }
                KeyOutcome::Submit => {
                    self.end_line()?;
                    return Ok(secret);
                }
                KeyOutcome::Interrupt => {
                    self.end_line()?;
                    return Err("interrupted".into());
                }
                KeyOutcome::Ignored => continue,
            }
            self.out.flush()?;
        }
    }
}

impl Drop for HiddenPrompt {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

const PASSWORD_ATTEMPTS: usize = 3;

fn ask_new_password() -> Result<String, BoxError> {
    let mut prompt = HiddenPrompt::open()?;
    for _ in 0..PASSWORD_ATTEMPTS {
        let first = prompt.read("Password: ")?;
        let second = prompt.read("Confirm password: ")?;
        match accept_password(&first, &second) {
            Ok(()) => return Ok(first),
            Err(reason) => prompt.line(&format!("{reason}, try again\r\n"))?,
        }
    }
    Err("too many attempts".into())
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, BoxError> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = ask_new_password()?;

            let user = match engine
                .create_user(
                    &operator(),
                    UserNew {
                        name: args.name.clone(),
                        password,
                        role: args.role,
                    },
                )
                .await
            {
                Ok(user) => user,
                Err(err) => {
                    eprintln!("cannot create user {}: {err}", args.name);
                    std::process::exit(1);
                }
            };

            println!("created user: {} ({}, id {})", user.name, user.role, user.id);
        }
        Command::Reconcile(ReconcileArgs {
            date: Some(date), ..
        }) => {
            let earnings = engine.reconcile(date).await?;
            println!(
                "{date}: cost {} net profit {}",
                earnings.consumables_cost, earnings.net_profit
            );
        }
        Command::Reconcile(ReconcileArgs { date: None, .. }) => {
            let repaired = engine.repair_pending().await?;
            let left = engine.pending_dates().await?;
            println!("repaired {repaired} date(s)");
            if !left.is_empty() {
                eprintln!("still pending:");
                for date in left {
                    eprintln!("  {date}");
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
