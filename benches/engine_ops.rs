use criterion::{criterion_group, criterion_main, Criterion};
use lookahead_2048::engine::{execute, Board, Move};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut boards = Vec::new();
    // Empty and two-tile starts
    boards.push(Board::EMPTY);
    let mut b = Board::<4>::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    boards.push(b.clone());
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..20 {
        let out = execute(&b, seq[i % seq.len()]);
        if !out.is_noop(&b) {
            b = out.board.with_random_tile(&mut rng);
        }
        boards.push(b.clone());
    }
    boards
}

fn bench_execute(c: &mut Criterion) {
    let boards = corpus();
    for dir in Move::ALL {
        c.bench_function(&format!("execute/{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for bd in &boards {
                    acc = acc.wrapping_add(execute(black_box(bd), dir).score);
                }
                black_box(acc)
            })
        });
    }
}

fn bench_is_stuck(c: &mut Criterion) {
    let boards = corpus();
    c.bench_function("board/is_stuck", |bch| {
        bch.iter(|| boards.iter().filter(|bd| black_box(*bd).is_stuck()).count())
    });
}

criterion_group!(engine_ops, bench_execute, bench_is_stuck);
criterion_main!(engine_ops);
