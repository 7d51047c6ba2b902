//! Performance benchmarks for the bot policy and whole bot matches
//!
//! 1. **Decision** - one greedy market decision from the opening position
//! 2. **Fresh** - deal and play a complete match each iteration
//! 3. **Snapshot** - clone a dealt match and play it out each iteration

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use point_salad::{
    config::MatchConfig,
    game::{
        bot_controller::best_market_action, run_local, ActorController, BotController, Match,
        VerbosityLevel,
    },
    loader::Manifest,
};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::Duration;

fn config(actors: usize, seed: u64) -> MatchConfig {
    MatchConfig::bots_only(actors)
        .with_seed(seed)
        .with_verbosity(VerbosityLevel::Silent)
}

fn dealt_match(manifest: &Manifest, actors: usize, seed: u64) -> Match {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    Match::new(&config(actors, seed), manifest, &mut rng).expect("Failed to deal match")
}

/// Benchmark: a single bot decision, sampled and exhaustive
fn bench_bot_decision(c: &mut Criterion) {
    let manifest = Manifest::builtin().expect("Bundled manifest should parse");
    let game = dealt_match(&manifest, 4, 42);
    let state = game.state().clone();
    let actor = state.active_actor();

    let mut group = c.benchmark_group("bot_decision");
    group.bench_function("sampled", |b| {
        let mut bot = BotController::new(actor, 7);
        b.iter(|| {
            bot.choose_market_action(black_box(&state))
                .expect("Bot should find an action")
        });
    });
    group.bench_function("exhaustive", |b| {
        b.iter(|| best_market_action(black_box(&state)));
    });
    group.finish();
}

/// Benchmark: Fresh mode - deal a new match each iteration
fn bench_match_fresh(c: &mut Criterion) {
    let manifest = Manifest::builtin().expect("Bundled manifest should parse");

    let mut group = c.benchmark_group("match_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for actors in [2usize, 6] {
        let seed = 42u64;
        if let Ok(report) = run_local(&config(actors, seed), &manifest) {
            println!("\nWarmup match ({actors} actors, seed {seed}):");
            println!("  Turns: {}", report.turns);
            println!("  Winners: {:?}", report.ranking.winners());
        }

        group.bench_with_input(BenchmarkId::new("fresh", actors), &actors, |b, &actors| {
            b.iter(|| {
                run_local(&config(actors, black_box(seed)), &manifest)
                    .expect("Match should complete successfully")
            });
        });
    }

    group.finish();
}

/// Benchmark: Snapshot mode - clone a dealt match each iteration
fn bench_match_snapshot(c: &mut Criterion) {
    let manifest = Manifest::builtin().expect("Bundled manifest should parse");
    let initial = dealt_match(&manifest, 4, 42);

    let mut group = c.benchmark_group("match_execution");
    group.sample_size(20);

    group.bench_function(BenchmarkId::new("snapshot", 4), |b| {
        b.iter(|| {
            let mut game = initial.clone();
            let mut controllers: Vec<Box<dyn ActorController>> = (0..4)
                .map(|actor| {
                    Box::new(BotController::new(actor, actor as u64)) as Box<dyn ActorController>
                })
                .collect();
            game.run(&mut controllers)
                .expect("Match should complete successfully")
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_bot_decision,
    bench_match_fresh,
    bench_match_snapshot
);
criterion_main!(benches);
