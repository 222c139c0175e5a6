//! Play command - batch games between two automated tiers
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_series(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use tictac_core::{Match, MatchConfig, Mark, NoInput, Outcome, Position, Tier};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Tier playing X: easy, medium or hard
    #[arg(long, value_name = "KIND")]
    pub x: Tier,

    /// Tier playing O: easy, medium or hard
    #[arg(long, value_name = "KIND")]
    pub o: Tier,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    outcome: Outcome,
    moves: Vec<(Mark, Position)>,
}

/// Aggregated series results
#[derive(Clone, Debug, Serialize)]
struct SeriesResults {
    x: Tier,
    o: Tier,
    total_games: usize,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    invalid: usize,
    avg_moves: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let base = MatchConfig::new(args.x, args.o);
    base.require_automated()
        .context("the play command only runs automated tiers")?;

    tracing::info!(
        "Starting series: {} vs {} ({} games)",
        args.x,
        args.o,
        args.games
    );

    let results = play_series(&base, args.games, seed)?;

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games of the series
fn play_series(base: &MatchConfig, games: usize, seed: Option<u64>) -> Result<SeriesResults> {
    let mut rng = create_rng(seed);
    let mut records = Vec::with_capacity(games);

    for game_number in 1..=games {
        let record = play_single_game(base, game_number, rng.gen())?;

        tracing::info!(
            "Game {}: {} ({} moves)",
            record.game_number,
            record.outcome,
            record.moves.len()
        );

        records.push(record);
    }

    Ok(compute_statistics(base, records))
}

/// Report series results
fn report_results(results: &SeriesResults, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(results).context("failed to encode results")?;
        println!("{}", text);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to completion
fn play_single_game(base: &MatchConfig, game_number: usize, seed: u64) -> Result<GameRecord> {
    let config = base.clone().with_seed(seed);
    let mut game = Match::from_config(&config);

    let outcome = game
        .play(&mut NoInput)
        .with_context(|| format!("game {} (seed {}) aborted", game_number, seed))?;

    Ok(GameRecord {
        game_number,
        seed,
        outcome,
        moves: game.history().to_vec(),
    })
}

/// Compute aggregate statistics from game records
fn compute_statistics(base: &MatchConfig, games: Vec<GameRecord>) -> SeriesResults {
    let count = |outcome: Outcome| games.iter().filter(|g| g.outcome == outcome).count();

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    SeriesResults {
        x: base.x,
        o: base.o,
        total_games: games.len(),
        x_wins: count(Outcome::XWins),
        o_wins: count(Outcome::OWins),
        draws: count(Outcome::Draw),
        invalid: count(Outcome::InvalidState),
        avg_moves,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as text
fn print_text_results(results: &SeriesResults) {
    let total = results.total_games;

    println!("\n=== Series Results: {} (X) vs {} (O) ===", results.x, results.o);
    println!("Total games: {}", total);
    println!("X wins:      {} ({:.1}%)", results.x_wins, percent(results.x_wins, total));
    println!("O wins:      {} ({:.1}%)", results.o_wins, percent(results.o_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    if results.invalid > 0 {
        println!("Invalid:     {}", results.invalid);
    }
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} moves (seed {})",
            game.game_number,
            game.outcome,
            game.moves.len(),
            game.seed
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
