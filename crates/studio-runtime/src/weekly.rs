//! The weekly update: one atomic pass over the whole game state.

use crate::events::EventSink;
use crate::phase::{advance_if_due, run_phase_week};
use studio_core::{format_money, EventKind, GameState, GameTables, PlayerStats, RandomSource, Staff};
use studio_econ::fan_income;
use tracing::{debug, info, warn};

/// Advance the game by one week and return the new snapshot.
///
/// Order: week counter, fan income, payroll, staff training, then the movie
/// in production (weekly effect first, phase transition second). The input
/// state is never modified.
pub fn process_weekly_update<R: RandomSource + ?Sized>(
    state: &GameState,
    tables: &GameTables,
    rng: &mut R,
) -> GameState {
    let mut next = state.clone();
    next.current_week = next.current_week.saturating_add(1);
    let mut sink = EventSink::new(next.current_week);

    credit_fan_income(&mut next.player_stats, tables, &mut sink);
    pay_salaries(&mut next, &mut sink);
    advance_training(&mut next.hired_staff, tables, &mut sink);

    if let Some(movie) = next.current_movie_in_production.as_mut() {
        movie.weeks_in_phase += 1;
        movie.total_weeks += 1;
        run_phase_week(movie, &mut next.player_stats, tables, rng, &mut sink);
        advance_if_due(movie, &mut next.player_stats, tables, rng, &mut sink);
    }

    sink.flush_into(&mut next.events);
    debug!(
        week = next.current_week,
        money = next.player_stats.money,
        fame = next.player_stats.fame,
        fans = next.player_stats.fans,
        "week processed"
    );
    next
}

fn credit_fan_income(stats: &mut PlayerStats, tables: &GameTables, sink: &mut EventSink) {
    let income = fan_income(stats.fans, tables.economy.fan_income_rate);
    if income > 0 {
        stats.money += income;
        sink.push(
            "fans",
            EventKind::Info,
            format!(
                "Earned ${} from your loyal fanbase.",
                format_money(income)
            ),
        );
    }
}

fn pay_salaries(state: &mut GameState, sink: &mut EventSink) {
    let payroll = state.weekly_payroll();
    state.player_stats.money -= payroll;
    if payroll > 0 {
        sink.push(
            "payroll",
            EventKind::Info,
            format!(
                "Paid ${} in weekly staff salaries.",
                format_money(payroll)
            ),
        );
    }
}

fn advance_training(staff: &mut [Staff], tables: &GameTables, sink: &mut EventSink) {
    for member in staff.iter_mut().filter(|s| s.is_training) {
        let Some(step) = tables.training_for(member.tier) else {
            warn!(staff = %member.id, tier = %member.tier, "training flag cleared: no further tier");
            member.is_training = false;
            member.weeks_in_training = 0;
            continue;
        };
        member.weeks_in_training += 1;
        if member.weeks_in_training < step.weeks {
            continue;
        }
        member.tier = step.next_tier;
        member.weekly_salary += step.salary_increase;
        member.is_training = false;
        member.weeks_in_training = 0;
        info!(staff = %member.id, tier = %member.tier, salary = member.weekly_salary, "training complete");
        sink.push(
            &format!("training-{}", member.id),
            EventKind::Success,
            format!(
                "{} has completed training and is now a {} {}!",
                member.name, member.tier, member.role
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{apply_command, Command};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use studio_core::{
        Genre, Movie, MovieDraft, PlayerStatsPatch, ProductionPhase, Rating, SequenceRng,
        StaffRole, StaffTier,
    };

    fn founded(tables: &GameTables) -> GameState {
        let state = GameState::initial(tables);
        apply_command(
            &state,
            Command::StartNewGame {
                studio_name: "Marquee".into(),
                owner_name: "Robin".into(),
            },
            tables,
            &mut SequenceRng::constant(0.5),
        )
    }

    fn movie_in(phase: ProductionPhase, weeks: u32, tables: &GameTables) -> Movie {
        let mut movie = Movie::from_draft(
            MovieDraft {
                id: "movie-1".into(),
                title: "Low Tide".into(),
                genre: Genre::Drama,
                rating: Rating::PG,
                runtime: 90,
            },
            String::new(),
            tables,
        );
        movie.production_phase = phase;
        movie.weeks_in_phase = weeks;
        movie
    }

    fn rookie(id: &str) -> Staff {
        Staff {
            id: id.into(),
            name: "Jane Doe".into(),
            role: StaffRole::CameraMan,
            tier: StaffTier::Rookie,
            weekly_salary: 2_000,
            is_training: true,
            weeks_in_training: 3,
        }
    }

    #[test]
    fn quiet_week_changes_nothing_but_the_counter() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        state.player_stats.apply(&PlayerStatsPatch {
            fans: Some(0),
            ..Default::default()
        });
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.5));
        assert_eq!(next.current_week, 2);
        assert_eq!(next.player_stats.money, 15_000_000);
        assert_eq!(next.events.len(), 1);
        assert_eq!(next.events[0].id, "evt-start");
        // Input snapshot untouched.
        assert_eq!(state.current_week, 1);
    }

    #[test]
    fn fan_income_then_payroll() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        state.hired_staff.push(tables.staff_pool[0].clone());
        state.hired_staff.push(tables.staff_pool[9].clone());
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.5));
        // +500 from 1000 fans, -12,000 payroll.
        assert_eq!(next.player_stats.money, 15_000_000 + 500 - 12_000);
        let ids: Vec<_> = next.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["evt-2-fans", "evt-2-payroll", "evt-start"]);
        assert_eq!(next.events[0].message, "Earned $500 from your loyal fanbase.");
        assert_eq!(
            next.events[1].message,
            "Paid $12,000 in weekly staff salaries."
        );
    }

    #[test]
    fn money_may_go_negative() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        state.player_stats.money = 0;
        state.player_stats.fans = 0;
        state.hired_staff.push(tables.staff_pool[2].clone());
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.5));
        assert_eq!(next.player_stats.money, -25_000);
    }

    #[test]
    fn rookie_promotes_after_fourth_week() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        state.hired_staff.push(rookie("cm2"));
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.5));
        let s = &next.hired_staff[0];
        assert_eq!(s.tier, StaffTier::Experienced);
        assert_eq!(s.weekly_salary, 5_000);
        assert!(!s.is_training);
        assert_eq!(s.weeks_in_training, 0);
        let ev = next
            .events
            .iter()
            .find(|e| e.id == "evt-2-training-cm2")
            .unwrap();
        assert_eq!(
            ev.message,
            "Jane Doe has completed training and is now a Experienced Camera Man!"
        );
    }

    #[test]
    fn training_counts_up_before_promotion() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        let mut s = rookie("cm2");
        s.weeks_in_training = 1;
        state.hired_staff.push(s);
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.5));
        assert_eq!(next.hired_staff[0].weeks_in_training, 2);
        assert_eq!(next.hired_staff[0].tier, StaffTier::Rookie);
        assert!(next.hired_staff[0].is_training);
    }

    #[test]
    fn legendary_training_flag_is_cleared() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        let mut s = tables.staff_pool[2].clone();
        s.is_training = true;
        state.hired_staff.push(s);
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.5));
        let s = &next.hired_staff[0];
        assert_eq!(s.tier, StaffTier::Legendary);
        assert!(!s.is_training);
        assert_eq!(s.weekly_salary, 25_000);
    }

    #[test]
    fn scriptwriting_rolls_into_casting() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        state.current_movie_in_production = Some(movie_in(ProductionPhase::Scriptwriting, 3, &tables));
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.5));
        let movie = next.current_movie_in_production.as_ref().unwrap();
        assert_eq!(movie.production_phase, ProductionPhase::Casting);
        assert_eq!(movie.weeks_in_phase, 0);
        assert_eq!(movie.total_weeks, 1);
        assert!(next.events.iter().any(|e| e.id == "evt-2-phase"));
    }

    #[test]
    fn teaser_week_builds_buzz_without_advancing() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        state.player_stats.fame = 20;
        let mut movie = movie_in(ProductionPhase::TeaserRelease, 1, &tables);
        movie.quality = 80;
        movie.hype = 40;
        state.current_movie_in_production = Some(movie);
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.0));
        let movie = next.current_movie_in_production.as_ref().unwrap();
        assert_eq!(movie.production_phase, ProductionPhase::TeaserRelease);
        assert_eq!(movie.weeks_in_phase, 2);
        assert_eq!(movie.teaser_stats.views, 156_000);
        assert_eq!(movie.teaser_stats.likes, 4_680);
        assert_eq!(movie.hype, 41);
    }

    #[test]
    fn theatre_week_applies_marketing_once() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        state.player_stats.fame = 20;
        state.player_stats.fans = 0;
        let mut movie = movie_in(ProductionPhase::TheatreRelease, 0, &tables);
        movie.quality = 80;
        movie.hype = 50;
        movie.critic_rating = 90;
        movie.weekly_marketing_choice_id = Some("ms3".into());
        state.current_movie_in_production = Some(movie);

        // Noise 0.0 then Discount Tuesdays draw 0.0 -> +8%.
        let mut rng = SequenceRng::new(vec![0.0, 0.0]);
        let next = process_weekly_update(&state, &tables, &mut rng);
        let movie = next.current_movie_in_production.as_ref().unwrap();
        let base = 1_717_600i64;
        let bonus = (base as f64 * 0.08).floor() as i64;
        assert_eq!(movie.box_office_revenue, vec![base + bonus]);
        assert_eq!(movie.total_box_office, base + bonus);
        assert_eq!(movie.marketing_history.len(), 1);
        assert_eq!(movie.marketing_history[0].bonus, bonus);
        assert!(movie.weekly_marketing_choice_id.is_none());
        assert_eq!(
            next.player_stats.money,
            15_000_000 - 10_000 + base + bonus
        );
        assert_eq!(next.player_stats.fame, 20 + (base + bonus) / 50_000);

        // Following week: no selection, nothing applied twice.
        let after = process_weekly_update(&next, &tables, &mut SequenceRng::constant(0.0));
        let movie = after.current_movie_in_production.as_ref().unwrap();
        assert_eq!(movie.marketing_history.len(), 1);
        assert_eq!(movie.box_office_revenue.len(), 2);
    }

    #[test]
    fn theatre_run_ends_in_ott_with_fans() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        let mut movie = movie_in(ProductionPhase::TheatreRelease, 4, &tables);
        movie.quality = 60;
        movie.critic_rating = 62;
        movie.total_box_office = 4_000_000;
        state.current_movie_in_production = Some(movie);
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.0));
        let movie = next.current_movie_in_production.as_ref().unwrap();
        assert_eq!(movie.production_phase, ProductionPhase::OttRelease);
        let expected_fans = movie.total_box_office / 200_000 + 62 * 50;
        assert_eq!(next.player_stats.fans, 1_000 + expected_fans);
        assert!(next.events.iter().any(|e| e.id == "evt-2-fangain"));
    }

    #[test]
    fn ott_window_closes_into_completed() {
        let tables = GameTables::default();
        let mut state = founded(&tables);
        state.current_movie_in_production = Some(movie_in(ProductionPhase::OttRelease, 1, &tables));
        let next = process_weekly_update(&state, &tables, &mut SequenceRng::constant(0.0));
        let after = process_weekly_update(&next, &tables, &mut SequenceRng::constant(0.0));
        let movie = after.current_movie_in_production.as_ref().unwrap();
        assert_eq!(movie.production_phase, ProductionPhase::Completed);
        assert_eq!(movie.weeks_in_phase, 1);
    }

    proptest! {
        #[test]
        fn every_week_adds_one_and_keeps_log_sorted(seed in any::<u64>(), weeks in 1usize..40) {
            let tables = GameTables::default();
            let mut state = founded(&tables);
            state.hired_staff.push(rookie("cm2"));
            state.current_movie_in_production = Some(movie_in(ProductionPhase::Scriptwriting, 0, &tables));
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..weeks {
                let next = process_weekly_update(&state, &tables, &mut rng);
                prop_assert_eq!(next.current_week, state.current_week + 1);
                prop_assert!(next.events.windows(2).all(|w| w[0].week >= w[1].week));
                prop_assert!(next.events.len() >= state.events.len());
                state = next;
            }
        }

        #[test]
        fn gates_never_open_on_their_own(
            phase in prop_oneof![
                Just(ProductionPhase::PostProduction),
                Just(ProductionPhase::TeaserRelease),
                Just(ProductionPhase::TrailerRelease),
            ],
            weeks in 0u32..30,
            ticks in 1usize..10,
        ) {
            let tables = GameTables::default();
            let mut state = founded(&tables);
            state.current_movie_in_production = Some(movie_in(phase, weeks, &tables));
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            for _ in 0..ticks {
                state = process_weekly_update(&state, &tables, &mut rng);
            }
            let movie = state.current_movie_in_production.as_ref().unwrap();
            prop_assert_eq!(movie.production_phase, phase);
            prop_assert_eq!(movie.weeks_in_phase, weeks + ticks as u32);
            prop_assert!(movie.hype <= 100);
        }
    }
}
