use super::*;
use colored::Colorize;
use std::io::Write;

/// Terminal front end. Dice frames overwrite each other on one line; the
/// applied roll, announcements and the scoreboard each get their own.
#[derive(Debug, Default)]
pub struct Console {
    rolling: bool,
}

#[async_trait::async_trait]
impl Presenter for Console {
    async fn render(&mut self, signal: &Signal, snapshot: &Snapshot) {
        match signal {
            Signal::Started { epoch } => {
                println!("{}", format!("── game #{} ──", epoch).dimmed())
            }
            Signal::Frame(roll) => {
                self.rolling = true;
                print!("\r  {}   ", roll.to_string().dimmed());
                let _ = std::io::stdout().flush();
            }
            Signal::Rolled {
                name, roll, score, ..
            } => {
                self.rolling = false;
                println!("\r  {}  {} now has {}", roll.to_string().bold(), name, score.to_string().green());
            }
            Signal::Announce(announcement) => self.announce(announcement),
            Signal::Scores => println!("{}", Self::scoreboard(snapshot)),
            Signal::Lock(_) => {}
            Signal::Fault(e) => {
                if std::mem::take(&mut self.rolling) {
                    println!();
                }
                println!("{}", format!("! {}", e).red())
            }
        }
    }
}

impl Console {
    fn announce(&self, announcement: &Announcement) {
        match announcement {
            Announcement::Round { .. } => println!("{}", announcement.to_string().cyan().bold()),
            Announcement::YourTurn(_) => println!("{}", announcement.to_string().yellow().bold()),
            Announcement::Over(_) => println!("{}", announcement.to_string().magenta().bold()),
            Announcement::Rolling(_) | Announcement::Up(_) => println!("{}", announcement),
        }
    }
    fn scoreboard(snapshot: &Snapshot) -> String {
        snapshot
            .seats
            .iter()
            .enumerate()
            .map(|(i, seat)| Self::row(seat, i == snapshot.current && !snapshot.finished))
            .collect::<Vec<_>>()
            .join("\n")
    }
    fn row(seat: &Seat, on_turn: bool) -> String {
        let marker = match on_turn {
            true => ">".yellow(),
            false => " ".normal(),
        };
        let status = match seat.status {
            Status::Finished => "✓".green(),
            Status::Unrolled => "·".dimmed(),
        };
        let kind = match seat.automated {
            true => "cpu".dimmed(),
            false => "".normal(),
        };
        format!("{} {} {:<16} {:>4} {}", marker, status, seat.name, seat.score, kind)
    }
}
