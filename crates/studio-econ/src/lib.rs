#![deny(warnings)]

//! Economic models for Studio Tycoon.
//!
//! This module provides the pure resolvers driven by the weekly update:
//! - Movie quality, initial hype and critic rating from crew and cast
//! - Weekly teaser/trailer views, likes and hype
//! - Weekly theatrical box office with drop-off
//! - Probabilistic marketing strategy outcomes
//!
//! Every random draw goes through a caller-supplied [`RandomSource`].

use serde::{Deserialize, Serialize};
use studio_core::{
    format_money, GameTables, MarketingStrategy, Movie, RandomSource, ViewStats, SCORE_MAX,
};
use tracing::debug;

/// Points a crew member contributes at tier multiplier 1.0.
pub const CREW_POINTS: f64 = 10.0;
/// Weight of a lead cast slot.
pub const LEAD_WEIGHT: f64 = 6.0;
/// Weight of a supporting cast slot.
pub const SUPPORTING_WEIGHT: f64 = 3.0;
/// Cap on the cast contribution.
pub const CAST_SCORE_CAP: f64 = 50.0;

/// Scores fixed when a movie enters marketing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub quality: u32,
    pub hype: u32,
    pub critic_rating: u32,
}

/// Clamp a rounded score into [0, 100].
pub fn clamp_score(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value as u32).min(SCORE_MAX)
}

/// Crew contribution: tier multiplier x 10 per filled role (max 50).
pub fn staff_score(movie: &Movie, tables: &GameTables) -> f64 {
    movie
        .crew()
        .map(|s| tables.staff_multiplier(s.tier) * CREW_POINTS)
        .sum()
}

/// Cast contribution: leads weigh 6, supporting roles 3, capped at 50.
pub fn cast_score(movie: &Movie, tables: &GameTables) -> f64 {
    let leads = tables.economy.lead_slots;
    let raw: f64 = movie
        .cast
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| {
            let actor = slot.actor.as_ref()?;
            let weight = if i < leads {
                LEAD_WEIGHT
            } else {
                SUPPORTING_WEIGHT
            };
            Some(tables.actor_multiplier(actor.tier) * weight)
        })
        .sum();
    raw.min(CAST_SCORE_CAP)
}

/// Compute final quality, initial hype and critic rating.
///
/// Consumes exactly one draw for the critic offset in [-5, +5).
pub fn resolve_quality<R: RandomSource + ?Sized>(
    movie: &Movie,
    tables: &GameTables,
    rng: &mut R,
) -> QualityReport {
    let staff = staff_score(movie, tables);
    let cast = cast_score(movie, tables);
    let quality = clamp_score((staff + cast).round());
    let hype = clamp_score(((staff + cast) / 2.0).round());
    let offset = (rng.next_f64() * 10.0).floor() as i64 - 5;
    let critic = (i64::from(quality) + offset).clamp(0, i64::from(SCORE_MAX)) as u32;
    debug!(staff, cast, quality, hype, critic, "resolved movie quality");
    QualityReport {
        quality,
        hype,
        critic_rating: critic,
    }
}

/// Write a quality report into the movie.
pub fn apply_quality(movie: &mut Movie, report: QualityReport) {
    movie.quality = report.quality;
    movie.hype = report.hype;
    movie.critic_rating = report.critic_rating;
}

/// Online marketing channel active before theatrical release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Teaser,
    Trailer,
}

impl Channel {
    fn views_scale(self) -> f64 {
        match self {
            Channel::Teaser => 1.0,
            Channel::Trailer => 1.5,
        }
    }

    /// Like rate range `[low, high)`.
    fn like_rate(self) -> (f64, f64) {
        match self {
            Channel::Teaser => (0.03, 0.05),
            Channel::Trailer => (0.04, 0.06),
        }
    }

    /// Views needed per hype point.
    fn views_per_hype(self) -> u64 {
        match self {
            Channel::Teaser => 150_000,
            Channel::Trailer => 100_000,
        }
    }
}

/// One week of teaser or trailer engagement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBuzz {
    pub views: u64,
    pub likes: u64,
    pub hype_gain: u32,
}

/// Unscaled weekly views: `50000 x (1 + 2q/100) x (1 + fame/100) + U[0, 25000)`.
pub fn weekly_views<R: RandomSource + ?Sized>(quality: u32, fame: i64, rng: &mut R) -> f64 {
    let quality_factor = f64::from(quality) / 100.0;
    let fame_factor = fame as f64 / 100.0;
    50_000.0 * (1.0 + quality_factor * 2.0) * (1.0 + fame_factor) + rng.uniform(0.0, 25_000.0)
}

/// Views, likes and hype for one week on `channel`. Consumes two draws.
pub fn weekly_buzz<R: RandomSource + ?Sized>(
    channel: Channel,
    quality: u32,
    fame: i64,
    rng: &mut R,
) -> WeeklyBuzz {
    let raw = weekly_views(quality, fame, rng) * channel.views_scale();
    let views = if raw > 0.0 { raw.floor() as u64 } else { 0 };
    let (low, high) = channel.like_rate();
    let likes = (views as f64 * rng.uniform(low, high)).floor() as u64;
    let hype_gain = u32::try_from(views / channel.views_per_hype()).unwrap_or(SCORE_MAX);
    WeeklyBuzz {
        views,
        likes,
        hype_gain,
    }
}

/// Accumulate a week of buzz into the movie's stats and hype (capped at 100).
pub fn apply_buzz(movie: &mut Movie, channel: Channel, buzz: WeeklyBuzz) {
    let stats: &mut ViewStats = match channel {
        Channel::Teaser => &mut movie.teaser_stats,
        Channel::Trailer => &mut movie.trailer_stats,
    };
    stats.views = stats.views.saturating_add(buzz.views);
    stats.likes = stats.likes.saturating_add(buzz.likes);
    movie.hype = movie.hype.saturating_add(buzz.hype_gain).min(SCORE_MAX);
}

/// Base theatrical revenue for a 1-indexed week of the run.
///
/// `(q x 5000 + budget + fame x 100) / (week x 0.8) x (1 + critic/100) x (1 + 1.2 hype/100)`
/// plus `U[0, 10000)` noise, floored; zero when the potential is not positive.
/// The noise draw is only consumed for a positive potential.
pub fn weekly_box_office<R: RandomSource + ?Sized>(
    movie: &Movie,
    week: u32,
    fame: i64,
    rng: &mut R,
) -> i64 {
    let week = f64::from(week.max(1));
    let hype_factor = f64::from(movie.hype) / 100.0;
    let base_potential =
        f64::from(movie.quality) * 5_000.0 + movie.marketing_budget as f64 + fame as f64 * 100.0;
    let drop_off = 1.0 / (week * 0.8);
    let earning = base_potential
        * drop_off
        * (1.0 + f64::from(movie.critic_rating) / 100.0)
        * (1.0 + hype_factor * 1.2);
    if earning > 0.0 {
        (earning + rng.uniform(0.0, 10_000.0)).floor() as i64
    } else {
        0
    }
}

/// Resolved marketing strategy for one theatre week.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingOutcome {
    pub succeeded: bool,
    /// Signed revenue delta, floored.
    pub bonus: i64,
    pub message: String,
}

/// Resolve a strategy against the week's base revenue. Consumes one draw.
pub fn resolve_marketing<R: RandomSource + ?Sized>(
    strategy: &MarketingStrategy,
    base_revenue: i64,
    rng: &mut R,
) -> MarketingOutcome {
    let o = &strategy.outcome;
    let r = rng.next_f64();
    let base = base_revenue as f64;
    let succeeded = r < o.success_chance;
    let (bonus, template) = if succeeded {
        let raw = base * (o.success_base + r * o.success_spread);
        (raw.floor() as i64, &o.success_message)
    } else {
        ((base * o.failure_factor).floor() as i64, &o.failure_message)
    };
    let message = template.replace("{amount}", &format_money(bonus.abs()));
    debug!(strategy = %strategy.id, r, succeeded, bonus, "resolved marketing strategy");
    MarketingOutcome {
        succeeded,
        bonus,
        message,
    }
}

/// Fame earned when the marketing views are cashed in at theatrical release.
pub fn fame_from_views(total_views: u64) -> i64 {
    i64::try_from(total_views / 100_000).unwrap_or(i64::MAX)
}

/// Fame earned from one week's box office.
pub fn fame_from_earning(earning: i64) -> i64 {
    earning.div_euclid(50_000)
}

/// Fans won when the theatrical run ends.
pub fn fan_gain(total_box_office: i64, critic_rating: u32) -> i64 {
    total_box_office.div_euclid(200_000) + i64::from(critic_rating) * 50
}

/// Passive weekly income from the fan base.
pub fn fan_income(fans: i64, rate: f64) -> i64 {
    (fans as f64 * rate).floor() as i64
}

/// Payment for the streaming rights of a finished movie.
pub fn ott_payout(total_box_office: i64, fraction: f64) -> i64 {
    (total_box_office as f64 * fraction).floor() as i64
}
