//! Tournament mode for running many bot matches in parallel and collecting statistics
//!
//! Every match is an independent [`run_local`] call with its own seed, so
//! rayon can spread them over all cores without sharing any game state.

use crate::config::{BotConfig, MatchConfig, MAX_ACTORS, MIN_ACTORS};
use crate::game::{run_local, LocalReport, VerbosityLevel};
use crate::loader::Manifest;
use crate::{Result, SaladError};
use rayon::prelude::*;
use std::fmt;
use std::time::{Duration, Instant};

/// Odd constant used to spread per-game seeds
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Statistics collected during a tournament
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentStats {
    pub games: usize,
    pub failures: usize,
    /// Shared wins count once for every tied winner
    pub wins_by_seat: Vec<usize>,
    pub starts_by_seat: Vec<usize>,
    pub shared_wins: usize,
    pub total_turns: u64,
    pub total_winning_score: i64,
}

impl TournamentStats {
    fn new(actors: usize) -> Self {
        TournamentStats {
            wins_by_seat: vec![0; actors],
            starts_by_seat: vec![0; actors],
            ..Default::default()
        }
    }

    fn record(&mut self, report: &LocalReport) {
        self.games += 1;
        self.total_turns += u64::from(report.turns);
        self.starts_by_seat[report.starting_actor] += 1;

        let winners = report.ranking.winners();
        if winners.len() > 1 {
            self.shared_wins += 1;
        }
        for winner in winners {
            self.wins_by_seat[winner] += 1;
        }
        self.total_winning_score += i64::from(report.ranking.top_score().unwrap_or(0));
    }

    fn merge(mut self, other: TournamentStats) -> Self {
        self.games += other.games;
        self.failures += other.failures;
        for (mine, theirs) in self.wins_by_seat.iter_mut().zip(&other.wins_by_seat) {
            *mine += theirs;
        }
        for (mine, theirs) in self.starts_by_seat.iter_mut().zip(&other.starts_by_seat) {
            *mine += theirs;
        }
        self.shared_wins += other.shared_wins;
        self.total_turns += other.total_turns;
        self.total_winning_score += other.total_winning_score;
        self
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games as f64
        }
    }

    pub fn average_winning_score(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_winning_score as f64 / self.games as f64
        }
    }
}

/// Outcome of [`run_tourney`]
#[derive(Debug, Clone)]
pub struct TournamentReport {
    pub actors: usize,
    pub seed: u64,
    pub elapsed: Duration,
    pub stats: TournamentStats,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

impl fmt::Display for TournamentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(f, "=== Tournament Complete ===")?;
        writeln!(f, "Tournament seed: {}", self.seed)?;
        writeln!(f, "Total games played: {}", stats.games)?;
        if stats.failures > 0 {
            writeln!(f, "Failed games: {}", stats.failures)?;
        }
        writeln!(f, "Elapsed time: {:.2}s", self.elapsed.as_secs_f64())?;
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            writeln!(f, "Games per second: {:.2}", stats.games as f64 / secs)?;
        }

        writeln!(f, "\n=== Seat Statistics ===")?;
        for seat in 0..self.actors {
            writeln!(
                f,
                "Player {seat}: wins {} ({:.1}%), started {} ({:.1}%)",
                stats.wins_by_seat[seat],
                percent(stats.wins_by_seat[seat], stats.games),
                stats.starts_by_seat[seat],
                percent(stats.starts_by_seat[seat], stats.games),
            )?;
        }
        writeln!(
            f,
            "Shared wins: {} ({:.1}%)",
            stats.shared_wins,
            percent(stats.shared_wins, stats.games)
        )?;

        writeln!(f, "\n=== Averages ===")?;
        writeln!(f, "Turns per game: {:.1}", stats.average_turns())?;
        write!(f, "Winning score: {:.1}", stats.average_winning_score())
    }
}

/// Seed of the `index`-th game of a tournament
pub fn game_seed(tournament_seed: u64, index: usize) -> u64 {
    tournament_seed.wrapping_add((index as u64).wrapping_mul(SEED_STRIDE))
}

/// Play `games` all-bot matches of `actors` seats in parallel
pub fn run_tourney(
    manifest: &Manifest,
    actors: usize,
    games: usize,
    bot: &BotConfig,
    seed: u64,
) -> Result<TournamentReport> {
    if !(MIN_ACTORS..=MAX_ACTORS).contains(&actors) {
        return Err(SaladError::Config(format!(
            "a tournament needs {MIN_ACTORS} to {MAX_ACTORS} actors, got {actors}"
        )));
    }
    if games == 0 {
        return Err(SaladError::Config("a tournament needs at least one game".to_string()));
    }
    tracing::info!(actors, games, seed, "tournament started");

    let start = Instant::now();
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(actors),
            |mut stats, index| {
                let config = MatchConfig::bots_only(actors)
                    .with_seed(game_seed(seed, index))
                    .with_max_attempts(bot.max_attempts)
                    .with_verbosity(VerbosityLevel::Silent);
                match run_local(&config, manifest) {
                    Ok(report) => stats.record(&report),
                    Err(err) => {
                        tracing::warn!(game = index, error = %err, "game failed");
                        stats.failures += 1;
                    }
                }
                stats
            },
        )
        .reduce(|| TournamentStats::new(actors), TournamentStats::merge);

    Ok(TournamentReport {
        actors,
        seed,
        elapsed: start.elapsed(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tourney_counts_every_game() {
        let manifest = Manifest::builtin().unwrap();
        let report = run_tourney(&manifest, 3, 12, &BotConfig::default(), 5).unwrap();
        let stats = &report.stats;

        assert_eq!(stats.games, 12);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.starts_by_seat.iter().sum::<usize>(), 12);
        // every game has at least one winner
        assert!(stats.wins_by_seat.iter().sum::<usize>() >= 12);
        assert!(stats.average_turns() > 0.0);
    }

    #[test]
    fn test_tourney_is_reproducible() {
        let manifest = Manifest::builtin().unwrap();
        let a = run_tourney(&manifest, 2, 8, &BotConfig::default(), 99).unwrap();
        let b = run_tourney(&manifest, 2, 8, &BotConfig::default(), 99).unwrap();
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_tourney_rejects_bad_sizes() {
        let manifest = Manifest::builtin().unwrap();
        let bot = BotConfig::default();
        assert!(run_tourney(&manifest, 1, 10, &bot, 0).is_err());
        assert!(run_tourney(&manifest, 7, 10, &bot, 0).is_err());
        assert!(run_tourney(&manifest, 2, 0, &bot, 0).is_err());
    }

    #[test]
    fn test_game_seeds_differ() {
        assert_ne!(game_seed(1, 0), game_seed(1, 1));
        assert_eq!(game_seed(1, 0), 1);
    }

    #[test]
    fn test_report_text() {
        let report = TournamentReport {
            actors: 2,
            seed: 3,
            elapsed: Duration::from_secs(1),
            stats: TournamentStats {
                games: 4,
                failures: 0,
                wins_by_seat: vec![3, 2],
                starts_by_seat: vec![2, 2],
                shared_wins: 1,
                total_turns: 40,
                total_winning_score: 80,
            },
        };
        let text = report.to_string();
        assert!(text.contains("Player 0: wins 3 (75.0%), started 2 (50.0%)"));
        assert!(text.contains("Shared wins: 1 (25.0%)"));
        assert!(text.contains("Turns per game: 10.0"));
        assert!(text.contains("Winning score: 20.0"));
    }
}
