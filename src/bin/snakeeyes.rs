//! Snake Eyes Binary
//!
//! Plays a dice game in the terminal. Humans press Enter to roll; computer
//! players roll on their own.
//!
//! Options: --player NAME[:cpu] (repeatable), --rounds, --rule, --seed, --brisk, --json
//! Without --player the lineup is picked interactively.

use clap::Parser;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Select;
use snakeeyes::*;
use tokio::sync::mpsc::unbounded_channel;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seat a player, in turn order; append `:cpu` for a computer player.
    #[arg(long = "player", value_name = "NAME[:cpu]", value_parser = seat)]
    players: Vec<Player>,
    /// Rounds to play.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..=MAX_ROUNDS as u64))]
    rounds: u64,
    /// How a roll adds to a score.
    #[arg(long, value_enum, default_value_t = Rule::Sum)]
    rule: Rule,
    /// Seed the dice for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
    /// Shorter animation and hand-off delays.
    #[arg(long)]
    brisk: bool,
    /// Print the final state as JSON.
    #[arg(long)]
    json: bool,
}

fn seat(arg: &str) -> Result<Player, String> {
    match arg.rsplit_once(':') {
        Some((name, "cpu")) => Ok(Player::bot(name.trim())),
        Some((_, tag)) => Err(format!("unknown player tag '{}', expected 'cpu'", tag)),
        None => Ok(Player::human(arg.trim())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log()?;
    let args = Args::parse();
    let (players, rounds) = match args.players.is_empty() {
        true => setup()?,
        false => (args.players, args.rounds as usize),
    };
    let settings = Settings {
        pacing: if args.brisk { Pacing::brisk() } else { Pacing::default() },
        rule: args.rule,
        seed: args.seed,
    };
    let (signals, inbox) = unbounded_channel();
    let table = Table::new(settings, signals);
    let screen = Screen::spawn(Console::default(), inbox, table.watch());
    kys(&table);
    table.start(players, rounds)?;
    play(&table, args.json).await?;
    table.close().await;
    screen.await?;
    Ok(())
}

/// Drives human turns until the player declines a rematch.
async fn play(table: &Table, json: bool) -> anyhow::Result<()> {
    let mut view = table.watch();
    let mut epoch = 1;
    loop {
        let snapshot = view
            .wait_for(|s| s.epoch == epoch && !s.locked)
            .await?
            .clone();
        if snapshot.phase == Phase::Faulted {
            anyhow::bail!("game #{} stopped in an inconsistent state", epoch);
        }
        if snapshot.finished {
            if json {
                println!("{}", snapshot.to_json());
            }
            match ask(|| Confirm::new().with_prompt("Play again?").default(false).interact()).await? {
                true => {
                    table.replay()?;
                    epoch += 1;
                    continue;
                }
                false => return Ok(()),
            }
        }
        let Some(seat) = snapshot.on_turn() else {
            continue;
        };
        let prompt = format!("{}, press Enter to roll", seat.name);
        ask(move || {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .report(false)
                .interact_text()
        })
        .await?;
        match table.roll() {
            Ok(()) => view.changed().await?,
            Err(e) => log::warn!("roll refused: {}", e),
        }
    }
}

/// Runs a blocking prompt off the async workers.
async fn ask<T, F>(prompt: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(prompt).await??)
}

/// Interactive lineup: player count, names, computer flags and rounds, each
/// picked from a bounded list.
fn setup() -> anyhow::Result<(Vec<Player>, usize)> {
    let counts = (1..=MAX_PLAYERS).map(|n| n.to_string()).collect::<Vec<_>>();
    let count = 1 + Select::new()
        .with_prompt("How many players?")
        .items(&counts)
        .default(1)
        .interact()?;
    let mut players = Vec::with_capacity(count);
    for i in 1..=count {
        let name = Input::<String>::new()
            .with_prompt(format!("Name of player {}", i))
            .default(format!("Player {}", i))
            .validate_with(|name: &String| vacant(name, &players))
            .interact_text()?;
        let automated = Confirm::new()
            .with_prompt(format!("Is {} a computer player?", name.trim()))
            .default(false)
            .interact()?;
        players.push(Player::new(name.trim(), automated));
    }
    let rounds = (1..=MAX_ROUNDS).map(|n| n.to_string()).collect::<Vec<_>>();
    let rounds = 1 + Select::new()
        .with_prompt("How many rounds?")
        .items(&rounds)
        .default(2)
        .interact()?;
    Ok((players, rounds))
}

/// Setup-time name check, so a bad name is asked again instead of failing the game.
fn vacant(name: &str, players: &[Player]) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name cannot be blank".to_string());
    }
    if players.iter().any(|p| p.name() == name) {
        return Err(format!("{} is already playing", name));
    }
    Ok(())
}
