//! A full match with one remote human over a real TCP connection

use point_salad::client::play;
use point_salad::config::MatchConfig;
use point_salad::game::{GameLoop, GameOutcome, Match, VerbosityLevel};
use point_salad::loader::Manifest;
use point_salad::network::{accept_players, connect};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use tokio::net::TcpListener;

/// Enough lines to answer every prompt of a two-actor match
fn scripted_input() -> Vec<u8> {
    let round = "A\nB\nC\nD\nE\nF\n0\n1\n2\nn\n";
    round.repeat(200).into_bytes()
}

#[tokio::test]
async fn test_remote_human_plays_to_the_end() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let client = tokio::spawn(async move {
        let stream = connect("127.0.0.1", port).await.unwrap();
        let (reader, writer) = stream.into_split();
        let input = scripted_input();
        let mut output = Vec::new();
        play(reader, writer, input.as_slice(), &mut output)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    });

    let channels = accept_players(&listener, 1).await.unwrap();
    let manifest = Manifest::builtin().unwrap();
    let config = MatchConfig::new(1, 1)
        .with_seed(5)
        .with_verbosity(VerbosityLevel::Silent);
    let mut rng = ChaCha12Rng::seed_from_u64(5);
    let game = Match::new(&config, &manifest, &mut rng).unwrap();
    let outcome = GameLoop::new(game, channels, &config.bot, &mut rng)
        .unwrap()
        .run()
        .await
        .unwrap();

    let ranking = match outcome {
        GameOutcome::Completed(ranking) => ranking,
        other => panic!("match did not complete: {other:?}"),
    };
    let transcript = client.await.unwrap();
    assert!(transcript.contains("---- MARKET ----"));
    assert!(transcript.ends_with(&ranking.to_string()));
}

#[tokio::test]
async fn test_remote_quit_aborts_the_match() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let client = tokio::spawn(async move {
        let stream = connect("127.0.0.1", port).await.unwrap();
        let (reader, writer) = stream.into_split();
        play(reader, writer, &b"Q\n"[..], Vec::new()).await.unwrap();
    });

    let channels = accept_players(&listener, 1).await.unwrap();
    let manifest = Manifest::builtin().unwrap();
    let config = MatchConfig::new(1, 1).with_verbosity(VerbosityLevel::Silent);
    let mut rng = ChaCha12Rng::seed_from_u64(9);
    let game = Match::new(&config, &manifest, &mut rng).unwrap();
    let outcome = GameLoop::new(game, channels, &config.bot, &mut rng)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(outcome, GameOutcome::Aborted { by: 0 });
    client.await.unwrap();
}
