//! Static configuration tables: phase durations, tier multipliers, training,
//! marketing catalog, talent pools and economy constants.
//!
//! Built-in values come from [`GameTables::default`]. A YAML document may
//! override any top-level table; omitted tables keep their defaults.

use crate::{Actor, ActorTier, CastSlot, PlayerStats, ProductionPhase, Staff, StaffRole, StaffTier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or validating tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A production phase has no configured duration.
    #[error("missing duration for phase {0}")]
    MissingPhase(ProductionPhase),
    /// Release gates must take at least a week so each gate lands on its own week.
    #[error("phase {0} waits for a manual release and needs at least one week")]
    ZeroGateDuration(ProductionPhase),
    /// Tier multiplier outside [0.2, 1.0].
    #[error("multiplier for {tier} must be within [0.2,1.0], got {value}")]
    MultiplierOutOfRange { tier: String, value: f64 },
    /// Training step that does not advance the tier or takes no time.
    #[error("invalid training step for {0}")]
    InvalidTraining(StaffTier),
    #[error("duplicate marketing strategy id: {0}")]
    DuplicateStrategy(String),
    /// Probability or factor that is not finite or out of range.
    #[error("invalid outcome for strategy {0}")]
    InvalidOutcome(String),
    #[error("invalid economy constant: {0}")]
    InvalidEconomy(&'static str),
}

/// One rung of the staff training ladder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingStep {
    /// Up-front cost, charged when training starts.
    pub cost: i64,
    /// Weeks until promotion.
    pub weeks: u32,
    pub next_tier: StaffTier,
    /// Added to the weekly salary on promotion.
    pub salary_increase: i64,
}

/// Probabilistic payoff of a marketing strategy for one theatre week.
///
/// With a uniform draw `r`, the strategy succeeds when `r < success_chance`
/// and then earns `base * (success_base + r * success_spread)`. Otherwise it
/// earns `base * failure_factor` (zero or negative).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub success_chance: f64,
    pub success_base: f64,
    pub success_spread: f64,
    pub failure_factor: f64,
    /// News text on success; `{amount}` is replaced by the formatted bonus.
    pub success_message: String,
    /// News text on failure; `{amount}` is replaced by the formatted loss.
    pub failure_message: String,
}

/// A purchasable theatre-week marketing action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketingStrategy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: i64,
    pub outcome: StrategyOutcome,
}

/// Economy constants that are not tied to a specific lookup table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_stats: PlayerStats,
    /// Charged when a production starts.
    pub production_start_cost: i64,
    pub default_marketing_budget: i64,
    /// Share of the fan count paid out as passive weekly income.
    pub fan_income_rate: f64,
    /// Share of total box office paid by the streaming buyer.
    pub ott_payout_fraction: f64,
    pub lead_slots: usize,
    pub supporting_slots: usize,
    /// Runtimes (minutes) a new movie may be given.
    pub allowed_runtimes: Vec<u32>,
}

impl EconomyConfig {
    pub fn cast_slots(&self) -> usize {
        self.lead_slots + self.supporting_slots
    }

    /// Empty cast slots: "Lead Role N" first, then "Supporting Role N".
    pub fn cast_layout(&self) -> Vec<CastSlot> {
        let leads = (1..=self.lead_slots).map(|i| format!("Lead Role {i}"));
        let support = (1..=self.supporting_slots).map(|i| format!("Supporting Role {i}"));
        leads
            .chain(support)
            .map(|role_name| CastSlot {
                role_name,
                actor: None,
            })
            .collect()
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_stats: PlayerStats {
                money: 15_000_000,
                fame: 10,
                reputation: 10,
                studio_level: 1,
                fans: 1_000,
            },
            production_start_cost: 50_000,
            default_marketing_budget: 50_000,
            fan_income_rate: 0.5,
            ott_payout_fraction: 0.5,
            lead_slots: 2,
            supporting_slots: 3,
            allowed_runtimes: vec![90, 130, 160],
        }
    }
}

/// Every lookup table the simulation reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTables {
    pub phase_weeks: BTreeMap<ProductionPhase, u32>,
    pub staff_multipliers: BTreeMap<StaffTier, f64>,
    pub actor_multipliers: BTreeMap<ActorTier, f64>,
    /// Keyed by the tier being trained out of. The top tier has no entry.
    pub training: BTreeMap<StaffTier, TrainingStep>,
    pub strategies: Vec<MarketingStrategy>,
    pub staff_pool: Vec<Staff>,
    pub actor_pool: Vec<Actor>,
    pub economy: EconomyConfig,
}

impl GameTables {
    /// Configured duration of a phase in weeks.
    pub fn phase_weeks(&self, phase: ProductionPhase) -> u32 {
        self.phase_weeks.get(&phase).copied().unwrap_or(0)
    }

    pub fn staff_multiplier(&self, tier: StaffTier) -> f64 {
        self.staff_multipliers.get(&tier).copied().unwrap_or(0.0)
    }

    pub fn actor_multiplier(&self, tier: ActorTier) -> f64 {
        self.actor_multipliers.get(&tier).copied().unwrap_or(0.0)
    }

    /// Next training step for a tier, `None` at the top of the ladder.
    pub fn training_for(&self, tier: StaffTier) -> Option<&TrainingStep> {
        self.training.get(&tier)
    }

    pub fn strategy(&self, id: &str) -> Option<&MarketingStrategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    pub fn pooled_actor(&self, id: &str) -> Option<&Actor> {
        self.actor_pool.iter().find(|a| a.id == id)
    }

    /// Parse tables from YAML and validate them.
    pub fn from_yaml_str(text: &str) -> Result<Self, TableError> {
        let tables: GameTables = serde_yaml::from_str(text)?;
        validate_tables(&tables)?;
        Ok(tables)
    }
}

fn staff(id: &str, name: &str, role: StaffRole, tier: StaffTier, weekly_salary: i64) -> Staff {
    Staff {
        id: id.to_string(),
        name: name.to_string(),
        role,
        tier,
        weekly_salary,
        is_training: false,
        weeks_in_training: 0,
    }
}

fn actor(id: &str, name: &str, tier: ActorTier) -> Actor {
    Actor {
        id: id.to_string(),
        name: name.to_string(),
        tier,
    }
}

fn default_strategies() -> Vec<MarketingStrategy> {
    vec![
        MarketingStrategy {
            id: "ms1".into(),
            name: "Social Media Blitz".into(),
            description: "High chance of a solid boost.".into(),
            cost: 25_000,
            outcome: StrategyOutcome {
                success_chance: 0.8,
                success_base: 0.15,
                success_spread: 0.10,
                failure_factor: 0.0,
                success_message:
                    "The Social Media Blitz went viral! It brought in an extra ${amount}.".into(),
                failure_message: "The Social Media Blitz didn't gain much traction.".into(),
            },
        },
        MarketingStrategy {
            id: "ms2".into(),
            name: "TV Talk Show".into(),
            description: "Expensive, but can pay off big.".into(),
            cost: 75_000,
            outcome: StrategyOutcome {
                success_chance: 0.6,
                success_base: 0.30,
                success_spread: 0.20,
                failure_factor: -0.05,
                success_message: "The cast charmed the audience on the talk show! A massive success, adding ${amount}.".into(),
                failure_message: "The TV appearance was a bit awkward, slightly hurting ticket sales by ${amount}.".into(),
            },
        },
        MarketingStrategy {
            id: "ms3".into(),
            name: "Discount Tuesdays".into(),
            description: "A small, reliable earner.".into(),
            cost: 10_000,
            outcome: StrategyOutcome {
                success_chance: 1.0,
                success_base: 0.08,
                success_spread: 0.04,
                failure_factor: 0.0,
                success_message:
                    "Discount Tuesdays were a hit, reliably adding ${amount} to the pile.".into(),
                failure_message: String::new(),
            },
        },
        MarketingStrategy {
            id: "ms4".into(),
            name: "Controversial Stunt".into(),
            description: "High risk, high reward.".into(),
            cost: 5_000,
            outcome: StrategyOutcome {
                success_chance: 0.25,
                success_base: 0.80,
                success_spread: 0.40,
                failure_factor: -0.20,
                success_message: "The stunt was outrageous, but it worked! The box office exploded with an extra ${amount}!".into(),
                failure_message: "The stunt backfired badly, causing a public outcry and losing ${amount}.".into(),
            },
        },
    ]
}

impl Default for GameTables {
    fn default() -> Self {
        use ProductionPhase as P;
        let phase_weeks = BTreeMap::from([
            (P::Scriptwriting, 4),
            (P::Casting, 2),
            (P::Shooting, 2),
            (P::PostProduction, 3),
            (P::TeaserRelease, 2),
            (P::TrailerRelease, 1),
            (P::TheatreRelease, 5),
            (P::OttRelease, 2),
            (P::Completed, 0),
        ]);
        let staff_multipliers = BTreeMap::from([
            (StaffTier::Rookie, 0.3),
            (StaffTier::Experienced, 0.6),
            (StaffTier::Veteran, 0.8),
            (StaffTier::Legendary, 1.0),
        ]);
        let actor_multipliers = BTreeMap::from([
            (ActorTier::Unknown, 0.2),
            (ActorTier::RisingStar, 0.4),
            (ActorTier::BList, 0.6),
            (ActorTier::AList, 0.8),
            (ActorTier::Superstar, 1.0),
        ]);
        let training = BTreeMap::from([
            (
                StaffTier::Rookie,
                TrainingStep {
                    cost: 15_000,
                    weeks: 4,
                    next_tier: StaffTier::Experienced,
                    salary_increase: 3_000,
                },
            ),
            (
                StaffTier::Experienced,
                TrainingStep {
                    cost: 50_000,
                    weeks: 6,
                    next_tier: StaffTier::Veteran,
                    salary_increase: 8_000,
                },
            ),
            (
                StaffTier::Veteran,
                TrainingStep {
                    cost: 150_000,
                    weeks: 8,
                    next_tier: StaffTier::Legendary,
                    salary_increase: 15_000,
                },
            ),
        ]);
        use StaffRole as R;
        use StaffTier as T;
        let staff_pool = vec![
            staff("w1", "Sam Esmail", R::Writer, T::Veteran, 10_000),
            staff("w2", "Jane Goldman", R::Writer, T::Experienced, 5_000),
            staff("d1", "Denis Villeneuve", R::Director, T::Legendary, 25_000),
            staff("d2", "Greta Gerwig", R::Director, T::Veteran, 15_000),
            staff("c1", "Roger Deakins", R::Cinematographer, T::Legendary, 20_000),
            staff("c2", "Rachel Morrison", R::Cinematographer, T::Experienced, 7_000),
            staff("m1", "Hans Zimmer", R::Composer, T::Legendary, 22_000),
            staff("m2", "Hildur Guðnadóttir", R::Composer, T::Veteran, 12_000),
            staff("cm1", "John Toll", R::CameraMan, T::Veteran, 8_000),
            staff("cm2", "Jane Doe", R::CameraMan, T::Rookie, 2_000),
        ];
        use ActorTier as A;
        let actor_pool = vec![
            actor("a1", "Timothée Chalamet", A::AList),
            actor("a2", "Zendaya", A::AList),
            actor("a3", "Florence Pugh", A::AList),
            actor("a4", "Austin Butler", A::BList),
            actor("a5", "Anya Taylor-Joy", A::BList),
            actor("a6", "Paul Mescal", A::RisingStar),
            actor("a7", "Jenna Ortega", A::RisingStar),
            actor("a8", "John Smith", A::Unknown),
            actor("a9", "Emily Jones", A::Unknown),
        ];
        Self {
            phase_weeks,
            staff_multipliers,
            actor_multipliers,
            training,
            strategies: default_strategies(),
            staff_pool,
            actor_pool,
            economy: EconomyConfig::default(),
        }
    }
}

fn check_multiplier(tier: String, value: f64) -> Result<(), TableError> {
    if !value.is_finite() || !(0.2..=1.0).contains(&value) {
        return Err(TableError::MultiplierOutOfRange { tier, value });
    }
    Ok(())
}

/// Validate tables, including cross-references between training tiers.
pub fn validate_tables(tables: &GameTables) -> Result<(), TableError> {
    for phase in ProductionPhase::ORDER {
        match tables.phase_weeks.get(&phase) {
            None => return Err(TableError::MissingPhase(phase)),
            Some(0) if phase.is_manual_gate() => return Err(TableError::ZeroGateDuration(phase)),
            Some(_) => {}
        }
    }
    for (tier, m) in &tables.staff_multipliers {
        check_multiplier(tier.to_string(), *m)?;
    }
    for (tier, m) in &tables.actor_multipliers {
        check_multiplier(format!("{tier:?}"), *m)?;
    }
    for (tier, step) in &tables.training {
        if step.weeks == 0 || step.next_tier <= *tier || step.cost < 0 {
            return Err(TableError::InvalidTraining(*tier));
        }
    }

    let mut ids = BTreeSet::new();
    for s in &tables.strategies {
        if !ids.insert(s.id.as_str()) {
            return Err(TableError::DuplicateStrategy(s.id.clone()));
        }
        let o = &s.outcome;
        let finite = [
            o.success_chance,
            o.success_base,
            o.success_spread,
            o.failure_factor,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite || !(0.0..=1.0).contains(&o.success_chance) || o.failure_factor > 0.0 {
            return Err(TableError::InvalidOutcome(s.id.clone()));
        }
    }

    let e = &tables.economy;
    if e.cast_slots() == 0 {
        return Err(TableError::InvalidEconomy("cast_slots"));
    }
    if e.allowed_runtimes.is_empty() {
        return Err(TableError::InvalidEconomy("allowed_runtimes"));
    }
    if !(e.fan_income_rate.is_finite() && e.fan_income_rate >= 0.0) {
        return Err(TableError::InvalidEconomy("fan_income_rate"));
    }
    if !(e.ott_payout_fraction.is_finite() && e.ott_payout_fraction >= 0.0) {
        return Err(TableError::InvalidEconomy("ott_payout_fraction"));
    }
    Ok(())
}

/// Load tables from a YAML file.
pub fn load_tables<P: AsRef<Path>>(path: P) -> Result<GameTables, TableError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let tables = GameTables::from_yaml_str(&text)?;
    info!(path = %path.as_ref().display(), strategies = tables.strategies.len(), "loaded game tables");
    Ok(tables)
}
