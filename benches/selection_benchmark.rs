use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{thread_rng, Rng};
use vehicle_booking::{on_day_tapped, project, DateOnly, Interval, IntervalSet, SelectionState};

// Reservation calendar with `count` three-day bookings spread over two years
fn build_interval_set(count: usize) -> IntervalSet {
    let origin = DateOnly::from_ymd(2025, 1, 1).unwrap();
    (0..count)
        .map(|i| {
            let start = origin.add_days((i * 7) as i64 % 730).unwrap();
            Interval::new(start, start.add_days(2).unwrap()).unwrap()
        })
        .collect()
}

pub fn selection_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("reservation_range_selector");
    let origin = DateOnly::from_ymd(2025, 1, 1).unwrap();

    for count in [10, 100, 1000].iter() {
        let interval_set = build_interval_set(*count);

        group.bench_with_input(BenchmarkId::new("taps", count), count, |b, _| {
            let mut rng = thread_rng();
            let taps: Vec<DateOnly> = (0..256)
                .map(|_| origin.add_days(rng.gen_range(0..730)).unwrap())
                .collect();
            b.iter(|| {
                let mut state = SelectionState::Empty;
                for date in &taps {
                    let (next, _) = on_day_tapped(*date, state, &interval_set);
                    state = next;
                }
                black_box(state)
            });
        });

        group.bench_with_input(BenchmarkId::new("project", count), count, |b, _| {
            let selection = SelectionState::Confirmed {
                interval: Interval::new(origin, origin.add_days(30).unwrap()).unwrap(),
            };
            b.iter(|| black_box(project(&interval_set, &selection)));
        });
    }

    group.finish();
}

criterion_group!(benches, selection_benchmark);
criterion_main!(benches);
