use criterion::{criterion_group, criterion_main, Criterion};
use studio_core::{GameTables, Genre, MovieDraft, ProductionPhase, Rating, StaffRole};
use studio_runtime::{Command, Session};

fn production_ready(seed: u64) -> Session {
    let mut session = Session::new(GameTables::default(), seed);
    session.dispatch(Command::StartNewGame {
        studio_name: "Bench Pictures".into(),
        owner_name: "Bench".into(),
    });
    session.dispatch(Command::StartMovieProduction {
        draft: MovieDraft {
            id: "bench".into(),
            title: "Benchmark".into(),
            genre: Genre::Action,
            rating: Rating::R,
            runtime: 160,
        },
        synopsis: String::new(),
    });
    let pool = session.tables().staff_pool.clone();
    for role in StaffRole::ALL {
        if let Some(s) = pool.iter().find(|s| s.role == role) {
            session.dispatch(Command::HireStaff(s.clone()));
            session.dispatch(Command::AssignCrew {
                staff_id: s.id.clone(),
            });
        }
    }
    session
}

fn release_when_due(session: &mut Session) {
    let phase = session
        .state()
        .current_movie_in_production
        .as_ref()
        .map(|m| m.production_phase);
    let command = match phase {
        Some(ProductionPhase::PostProduction) => Command::ReleaseTeaser,
        Some(ProductionPhase::TeaserRelease) => Command::ReleaseTrailer,
        Some(ProductionPhase::TrailerRelease) => Command::ReleaseToTheatres,
        Some(ProductionPhase::TheatreRelease) => Command::SelectMarketingStrategy {
            strategy_id: "ms1".into(),
        },
        _ => return,
    };
    session.dispatch(command);
}

fn bench_cycle(c: &mut Criterion) {
    c.bench_function("production_cycle_26_weeks", |b| {
        b.iter(|| {
            let mut session = production_ready(42);
            for _ in 0..26 {
                release_when_due(&mut session);
                session.advance_weeks(1);
            }
            session.into_state()
        })
    });
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
