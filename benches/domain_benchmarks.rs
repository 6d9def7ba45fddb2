use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fittrack::{
    create_exercise, create_nutrition_plan, generate_workout, Activity, ActivityRegistry,
    AdvancedStrategy, BeginnerStrategy, Database, Enhance, Exercise, PlanType, WorkoutFocus,
};

fn bench_workout_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Workout Generation");

    for &minutes in &[20u32, 60, 180] {
        group.bench_with_input(BenchmarkId::new("beginner_mixed", minutes), &minutes, |b, &m| {
            b.iter(|| generate_workout(&BeginnerStrategy, black_box(m), WorkoutFocus::Mixed));
        });
        group.bench_with_input(BenchmarkId::new("advanced_mixed", minutes), &minutes, |b, &m| {
            b.iter(|| generate_workout(&AdvancedStrategy, black_box(m), WorkoutFocus::Mixed));
        });
    }

    group.finish();
}

fn bench_nutrition_plans(c: &mut Criterion) {
    let mut group = c.benchmark_group("Nutrition Plans");

    for plan in PlanType::ALL {
        group.bench_function(BenchmarkId::new("create", plan.as_str()), |b| {
            b.iter(|| create_nutrition_plan(black_box(plan.as_str()), 70.0, 170.0, 30, "MALE"));
        });
    }

    group.finish();
}

fn bench_wrapped_calories(c: &mut Criterion) {
    let wrapped = create_exercise("STRENGTH", "Squat", 30, Some(8))
        .unwrap()
        .with_weighted_equipment("Barbell", 80.0)
        .with_music("Power");

    c.bench_function("wrapped_calories", |b| b.iter(|| black_box(&wrapped).calories()));
}

fn bench_activity_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("Activity Logging");

    for &count in &[10usize, 100] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("in_memory_sqlite", count), &count, |b, &count| {
            b.iter(|| {
                let registry = ActivityRegistry::new(Database::open_in_memory().unwrap());
                for i in 0..count {
                    let exercise = create_exercise("CARDIO", "Run", 10 + i as u32 % 50, None).unwrap();
                    registry.add(Activity::new(&exercise)).unwrap();
                }
                registry.total_calories().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_workout_generation,
    bench_nutrition_plans,
    bench_wrapped_calories,
    bench_activity_logging
);
criterion_main!(benches);
