//! Production phase state machine and per-phase weekly effects.

use crate::events::EventSink;
use studio_core::{
    format_money, EventKind, GameTables, MarketingResult, Movie, PlayerStats, ProductionPhase,
    RandomSource,
};
use studio_econ::{
    apply_buzz, apply_quality, fame_from_earning, fame_from_views, fan_gain, resolve_marketing,
    resolve_quality, weekly_box_office, weekly_buzz, Channel,
};
use tracing::{debug, info, warn};

/// Apply the gameplay effect of the phase the movie is currently in.
/// `weeks_in_phase` must already include the current week.
pub(crate) fn run_phase_week<R: RandomSource + ?Sized>(
    movie: &mut Movie,
    stats: &mut PlayerStats,
    tables: &GameTables,
    rng: &mut R,
    sink: &mut EventSink,
) {
    match movie.production_phase {
        ProductionPhase::TeaserRelease => {
            let buzz = weekly_buzz(Channel::Teaser, movie.quality, stats.fame, rng);
            apply_buzz(movie, Channel::Teaser, buzz);
            debug!(views = buzz.views, hype = movie.hype, "teaser week");
        }
        ProductionPhase::TrailerRelease => {
            let buzz = weekly_buzz(Channel::Trailer, movie.quality, stats.fame, rng);
            apply_buzz(movie, Channel::Trailer, buzz);
            debug!(views = buzz.views, hype = movie.hype, "trailer week");
        }
        ProductionPhase::TheatreRelease => theatre_week(movie, stats, tables, rng, sink),
        _ => {}
    }
}

fn theatre_week<R: RandomSource + ?Sized>(
    movie: &mut Movie,
    stats: &mut PlayerStats,
    tables: &GameTables,
    rng: &mut R,
    sink: &mut EventSink,
) {
    let week = movie.weeks_in_phase;
    let base = weekly_box_office(movie, week, stats.fame, rng);
    let mut bonus = 0;

    // The selection is consumed this week whatever happens.
    if let Some(choice) = movie.weekly_marketing_choice_id.take() {
        match tables.strategy(&choice) {
            Some(strategy) if stats.money >= strategy.cost => {
                stats.money -= strategy.cost;
                let outcome = resolve_marketing(strategy, base, rng);
                bonus = outcome.bonus;
                movie.marketing_history.push(MarketingResult {
                    week,
                    strategy_id: strategy.id.clone(),
                    message: outcome.message.clone(),
                    bonus,
                });
                let kind = if bonus >= 0 {
                    EventKind::Success
                } else {
                    EventKind::Warning
                };
                sink.push("marketing-result", kind, outcome.message);
            }
            Some(strategy) => {
                warn!(strategy = %strategy.id, cost = strategy.cost, money = stats.money, "marketing skipped: insufficient funds");
            }
            None => warn!(strategy = %choice, "marketing skipped: unknown strategy"),
        }
    }

    let earning = (base + bonus).max(0);
    movie.box_office_revenue.push(earning);
    movie.total_box_office += earning;
    stats.money += earning;
    stats.fame += fame_from_earning(earning);
    debug!(week, base, bonus, earning, "theatre week");
    sink.push(
        "bo",
        EventKind::Success,
        format!(
            "Week {} Box Office for '{}': ${}.",
            week,
            movie.title,
            format_money(earning)
        ),
    );
}

/// Auto-advance when the phase's time is up, unless it is a manual gate or
/// terminal. Returns the phase entered, if any.
pub(crate) fn advance_if_due<R: RandomSource + ?Sized>(
    movie: &mut Movie,
    stats: &mut PlayerStats,
    tables: &GameTables,
    rng: &mut R,
    sink: &mut EventSink,
) -> Option<ProductionPhase> {
    let phase = movie.production_phase;
    if movie.weeks_in_phase < tables.phase_weeks(phase) {
        return None;
    }
    if phase.is_manual_gate() {
        debug!(%phase, weeks = movie.weeks_in_phase, "waiting for release command");
        return None;
    }
    let next = phase.next()?;
    enter_phase(movie, next, stats, tables, rng, sink);
    Some(next)
}

/// Whether an explicit release into `target` is allowed right now.
pub(crate) fn can_release(movie: &Movie, target: ProductionPhase, tables: &GameTables) -> bool {
    let phase = movie.production_phase;
    phase.is_manual_gate()
        && phase.next() == Some(target)
        && movie.weeks_in_phase >= tables.phase_weeks(phase)
}

/// Move into `next`, reset the phase counter and apply one-time entry effects.
pub(crate) fn enter_phase<R: RandomSource + ?Sized>(
    movie: &mut Movie,
    next: ProductionPhase,
    stats: &mut PlayerStats,
    tables: &GameTables,
    rng: &mut R,
    sink: &mut EventSink,
) {
    let from = movie.production_phase;
    movie.production_phase = next;
    movie.weeks_in_phase = 0;
    info!(movie = %movie.id, %from, to = %next, "phase change");
    sink.push(
        "phase",
        EventKind::Info,
        format!("'{}' has entered the {} phase.", movie.title, next),
    );

    match next {
        ProductionPhase::TeaserRelease => {
            let report = resolve_quality(movie, tables, rng);
            apply_quality(movie, report);
            sink.push(
                "marketing",
                EventKind::Info,
                format!(
                    "Marketing for '{}' has begun! Final quality: {}/100. Initial hype: {}/100.",
                    movie.title, movie.quality, movie.hype
                ),
            );
        }
        ProductionPhase::TheatreRelease => {
            let gain = fame_from_views(movie.total_views());
            stats.fame += gain;
            sink.push(
                "release",
                EventKind::Success,
                format!(
                    "'{}' has been released! Critics rating: {}/100. Hype from marketing brought in {} fame!",
                    movie.title, movie.critic_rating, gain
                ),
            );
        }
        ProductionPhase::OttRelease => {
            let gain = fan_gain(movie.total_box_office, movie.critic_rating);
            if gain > 0 {
                stats.fans += gain;
                sink.push(
                    "fangain",
                    EventKind::Success,
                    format!(
                        "'{}' was a success, gaining you {} new fans!",
                        movie.title,
                        format_money(gain)
                    ),
                );
            }
        }
        _ => {}
    }
}
