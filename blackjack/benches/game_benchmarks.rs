use blackjack::{
    Round, Shoe,
    entities::{Card, Rank, Suit, Username},
    functional::score,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use std::hint::black_box;

/// Benchmark scoring a two card hand
fn bench_score_2_cards(c: &mut Criterion) {
    let cards = vec![Card(Rank::Ace, Suit::Spade), Card(Rank::King, Suit::Spade)];

    c.bench_function("score_2_cards", |b| {
        b.iter(|| score(black_box(&cards)));
    });
}

/// Benchmark scoring a long hand full of aces
fn bench_score_many_aces(c: &mut Criterion) {
    let cards = vec![
        Card(Rank::Ace, Suit::Spade),
        Card(Rank::Ace, Suit::Heart),
        Card(Rank::Two, Suit::Club),
        Card(Rank::Ace, Suit::Diamond),
        Card(Rank::Three, Suit::Club),
        Card(Rank::Ace, Suit::Club),
        Card(Rank::Four, Suit::Heart),
    ];

    c.bench_function("score_many_aces", |b| {
        b.iter(|| score(black_box(&cards)));
    });
}

/// Benchmark building and shuffling shoes of different sizes
fn bench_shoe_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shoe_shuffle");

    for decks in [1, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(decks), &decks, |b, &decks| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| Shoe::with_rng(decks, &mut rng));
        });
    }

    group.finish();
}

/// Benchmark a complete round with N players who all stay
fn bench_full_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_round");

    for n_players in [1u64, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, &n_players| {
                let mut shoe = Shoe::new(8);
                b.iter(|| {
                    let mut round = Round::new();
                    for id in 1..=n_players {
                        let name = Username::new(&format!("player{id}"));
                        round.place_bet(id, name, 200, 10).unwrap();
                    }
                    round.burn(&mut shoe).unwrap();
                    round.deal_hole(&mut shoe).unwrap();
                    round.deal_up(&mut shoe).unwrap();
                    for id in 1..=n_players {
                        round.stand(id).unwrap();
                    }
                    round.dealer_play(&mut shoe, 17).unwrap();
                    round.settle().unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_score_2_cards,
    bench_score_many_aces,
    bench_shoe_shuffle,
    bench_full_round,
);
criterion_main!(benches);
