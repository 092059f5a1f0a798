//! Throughput of the flat batch entry points.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chinese_checkers::batch::{apply_move_batch, compute_action_mask_batch, initialize_batch};
use chinese_checkers::board::N_MOVES;
use chinese_checkers::core::{GameRng, GameState};
use chinese_checkers::rules::{ChineseCheckers, RulesEngine};

fn first_legal(masks: &[i32]) -> Vec<i32> {
    masks
        .chunks(N_MOVES)
        .map(|m| m.iter().position(|&v| v == 1).unwrap_or(0) as i32)
        .collect()
}

fn bench_single_mask(c: &mut Criterion) {
    let state = GameState::new();
    c.bench_function("mask/single", |b| {
        b.iter(|| ChineseCheckers.compute_action_mask(black_box(&state)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    for n in [64usize, 1024, 8192] {
        group.throughput(Throughput::Elements(n as u64));

        let states = initialize_batch(n);
        group.bench_with_input(BenchmarkId::new("mask", n), &states, |b, states| {
            b.iter(|| compute_action_mask_batch(black_box(states)))
        });

        let moves = compute_action_mask_batch(&states).map(|m| first_legal(&m)).unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("apply", n), &moves, |b, moves| {
            b.iter_batched(
                || states.clone(),
                |mut buf| apply_move_batch(&mut buf, black_box(moves)),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_random_turns(c: &mut Criterion) {
    c.bench_function("playout/100_moves", |b| {
        b.iter(|| {
            let mut rng = GameRng::new(7);
            let mut state = GameState::new();
            for _ in 0..100 {
                let mask = ChineseCheckers.compute_action_mask(&state);
                match rng.sample_legal(mask) {
                    Some(mv) => {
                        ChineseCheckers.apply_move_unchecked(&mut state, mv);
                    }
                    None => break,
                }
            }
            state
        })
    });
}

criterion_group!(benches, bench_single_mask, bench_batch, bench_random_turns);
criterion_main!(benches);
