//! Whole-match properties over many seeds, played by bots

use point_salad::config::MatchConfig;
use point_salad::core::VegetableType;
use point_salad::game::{run_local, VerbosityLevel};
use point_salad::loader::{DeckBuilder, Manifest};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::collections::HashSet;

fn silent(actors: usize, seed: u64) -> MatchConfig {
    MatchConfig::bots_only(actors)
        .with_seed(seed)
        .with_verbosity(VerbosityLevel::Silent)
}

#[test]
fn test_deck_composition_for_every_actor_count() {
    let manifest = Manifest::builtin().unwrap();
    for actors in 2..=6 {
        let mut rng = ChaCha12Rng::seed_from_u64(actors as u64);
        let deck = DeckBuilder::build(&manifest, actors, &mut rng).unwrap();

        assert_eq!(deck.len(), 6 * 3 * actors);
        assert_eq!(deck.len() % 3, 0);
        for vegetable in VegetableType::ALL {
            let count = deck.iter().filter(|c| c.vegetable == vegetable).count();
            assert_eq!(count, 3 * actors, "{vegetable} with {actors} actors");
        }
        let pairs: HashSet<_> = deck.iter().map(|c| (c.vegetable, c.identity)).collect();
        assert_eq!(pairs.len(), deck.len(), "duplicate card with {actors} actors");
    }
}

#[test]
fn test_starting_actor_is_uniform() {
    let manifest = Manifest::builtin().unwrap();
    let games = 600u64;
    let mut starts = [0usize; 6];
    for seed in 0..games {
        let report = run_local(&silent(6, seed), &manifest).unwrap();
        starts[report.starting_actor] += 1;
    }

    // Expected 100 per seat; chi-square with 5 degrees of freedom, p = 0.001
    let expected = games as f64 / 6.0;
    let chi_square: f64 = starts
        .iter()
        .map(|&n| (n as f64 - expected).powi(2) / expected)
        .sum();
    assert!(chi_square < 20.52, "starts {starts:?}, chi-square {chi_square:.2}");
}

#[test]
fn test_every_match_ends_within_deck_size_turns() {
    let manifest = Manifest::builtin().unwrap();
    for actors in 2..=6 {
        for seed in 0..5 {
            let report = run_local(&silent(actors, seed), &manifest).unwrap();
            let deck_size = DeckBuilder::deck_size(actors) as u32;
            assert!(
                report.turns <= deck_size,
                "{actors} actors, seed {seed}: {} turns for {deck_size} cards",
                report.turns
            );
            assert_eq!(report.ranking.standings().len(), actors);
            assert!(!report.ranking.winners().is_empty());
        }
    }
}

#[test]
fn test_same_seed_same_match() {
    let manifest = Manifest::builtin().unwrap();
    let first = run_local(&silent(4, 2024), &manifest).unwrap();
    let second = run_local(&silent(4, 2024), &manifest).unwrap();
    assert_eq!(first, second);
}
