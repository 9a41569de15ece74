#![deny(warnings)]

//! Core domain models and invariants for Studio Tycoon.
//!
//! This crate defines the serializable game state shared across the
//! simulation, the static configuration tables, and the injectable random
//! source used by every stochastic rule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

pub mod rng;
pub mod tables;

pub use rng::{RandomSource, SequenceRng};
pub use tables::{
    load_tables, validate_tables, EconomyConfig, GameTables, MarketingStrategy, StrategyOutcome,
    TableError, TrainingStep,
};

/// Upper bound shared by quality, hype and critic rating.
pub const SCORE_MAX: u32 = 100;

/// Movie genre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Horror,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Romance,
}

impl Genre {
    /// Every genre in menu order.
    pub const ALL: [Genre; 6] = [
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::SciFi,
        Genre::Romance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::SciFi => "Sci-Fi",
            Genre::Romance => "Romance",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Audience rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    PG,
    #[serde(rename = "PG-13")]
    PG13,
    R,
}

/// Crew role a staff member can fill on a movie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    Writer,
    Director,
    Cinematographer,
    Composer,
    #[serde(rename = "Camera Man")]
    CameraMan,
}

impl StaffRole {
    /// The five crew slots of a movie, in display order.
    pub const ALL: [StaffRole; 5] = [
        StaffRole::Writer,
        StaffRole::Director,
        StaffRole::Cinematographer,
        StaffRole::Composer,
        StaffRole::CameraMan,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StaffRole::Writer => "Writer",
            StaffRole::Director => "Director",
            StaffRole::Cinematographer => "Cinematographer",
            StaffRole::Composer => "Composer",
            StaffRole::CameraMan => "Camera Man",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Staff rank, ordered from lowest to highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StaffTier {
    Rookie,
    Experienced,
    Veteran,
    Legendary,
}

impl StaffTier {
    pub fn label(self) -> &'static str {
        match self {
            StaffTier::Rookie => "Rookie",
            StaffTier::Experienced => "Experienced",
            StaffTier::Veteran => "Veteran",
            StaffTier::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for StaffTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Actor rank, ordered from lowest to highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorTier {
    Unknown,
    #[serde(rename = "Rising Star")]
    RisingStar,
    #[serde(rename = "B-List")]
    BList,
    #[serde(rename = "A-List")]
    AList,
    Superstar,
}

/// Position of a movie in its production and release lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductionPhase {
    #[serde(rename = "Script Writing")]
    Scriptwriting,
    #[serde(rename = "Cast & Crew Selection")]
    Casting,
    Shooting,
    #[serde(rename = "Post-Production")]
    PostProduction,
    #[serde(rename = "Teaser Release")]
    TeaserRelease,
    #[serde(rename = "Trailer Release")]
    TrailerRelease,
    #[serde(rename = "Theatre Release")]
    TheatreRelease,
    #[serde(rename = "OTT Release")]
    OttRelease,
    Completed,
}

impl ProductionPhase {
    /// Fixed lifecycle order.
    pub const ORDER: [ProductionPhase; 9] = [
        ProductionPhase::Scriptwriting,
        ProductionPhase::Casting,
        ProductionPhase::Shooting,
        ProductionPhase::PostProduction,
        ProductionPhase::TeaserRelease,
        ProductionPhase::TrailerRelease,
        ProductionPhase::TheatreRelease,
        ProductionPhase::OttRelease,
        ProductionPhase::Completed,
    ];

    /// Phase that follows this one, or `None` for the terminal phase.
    pub fn next(self) -> Option<ProductionPhase> {
        let idx = Self::ORDER.iter().position(|p| *p == self)?;
        Self::ORDER.get(idx + 1).copied()
    }

    /// Phases that wait for an explicit release command once their time is up.
    pub fn is_manual_gate(self) -> bool {
        matches!(
            self,
            ProductionPhase::PostProduction
                | ProductionPhase::TeaserRelease
                | ProductionPhase::TrailerRelease
        )
    }

    /// Crew and cast may only change before marketing starts.
    pub fn allows_crew_changes(self) -> bool {
        self < ProductionPhase::TeaserRelease
    }

    pub fn label(self) -> &'static str {
        match self {
            ProductionPhase::Scriptwriting => "Script Writing",
            ProductionPhase::Casting => "Cast & Crew Selection",
            ProductionPhase::Shooting => "Shooting",
            ProductionPhase::PostProduction => "Post-Production",
            ProductionPhase::TeaserRelease => "Teaser Release",
            ProductionPhase::TrailerRelease => "Trailer Release",
            ProductionPhase::TheatreRelease => "Theatre Release",
            ProductionPhase::OttRelease => "OTT Release",
            ProductionPhase::Completed => "Completed",
        }
    }
}

impl fmt::Display for ProductionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Studio-wide counters. Money, fame and fans have no floor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Cash in whole currency units; may go negative.
    pub money: i64,
    pub fame: i64,
    pub reputation: i64,
    /// Studio level (>= 1).
    pub studio_level: u32,
    pub fans: i64,
}

/// Partial update of [`PlayerStats`]; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatsPatch {
    pub money: Option<i64>,
    pub fame: Option<i64>,
    pub reputation: Option<i64>,
    pub studio_level: Option<u32>,
    pub fans: Option<i64>,
}

impl PlayerStats {
    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &PlayerStatsPatch) {
        if let Some(v) = patch.money {
            self.money = v;
        }
        if let Some(v) = patch.fame {
            self.fame = v;
        }
        if let Some(v) = patch.reputation {
            self.reputation = v;
        }
        if let Some(v) = patch.studio_level {
            self.studio_level = v;
        }
        if let Some(v) = patch.fans {
            self.fans = v;
        }
    }
}

/// A hired (or hireable) crew member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
    pub tier: StaffTier,
    /// Salary debited every week while on the roster (> 0).
    pub weekly_salary: i64,
    #[serde(default)]
    pub is_training: bool,
    #[serde(default)]
    pub weeks_in_training: u32,
}

/// An actor from the casting pool. Never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub tier: ActorTier,
}

/// One named role in a movie's cast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastSlot {
    pub role_name: String,
    pub actor: Option<Actor>,
}

/// Cumulative online views and likes for a teaser or trailer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStats {
    pub views: u64,
    pub likes: u64,
}

/// Outcome of one theatre week's marketing strategy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingResult {
    /// 1-based week of the theatrical run.
    pub week: u32,
    pub strategy_id: String,
    pub message: String,
    /// Signed revenue delta applied to that week's earnings.
    pub bonus: i64,
}

/// Player input needed to open a new production.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDraft {
    pub id: String,
    pub title: String,
    pub genre: Genre,
    pub rating: Rating,
    /// Runtime in minutes.
    pub runtime: u32,
}

/// The movie currently moving through production, or an archived one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub genre: Genre,
    pub rating: Rating,
    pub runtime: u32,
    pub synopsis: String,

    pub production_phase: ProductionPhase,
    /// Weeks spent in the current phase; reset on every transition.
    pub weeks_in_phase: u32,
    pub total_weeks: u32,

    pub writer: Option<Staff>,
    pub director: Option<Staff>,
    pub cinematographer: Option<Staff>,
    pub composer: Option<Staff>,
    pub camera_man: Option<Staff>,
    /// Lead slots first, then supporting slots.
    pub cast: Vec<CastSlot>,

    /// In [0, 100], fixed when marketing begins.
    pub quality: u32,
    /// In [0, 100], built during teaser and trailer weeks.
    pub hype: u32,
    pub marketing_budget: i64,

    pub teaser_stats: ViewStats,
    pub trailer_stats: ViewStats,

    /// Earnings of each theatre week, in order.
    pub box_office_revenue: Vec<i64>,
    pub total_box_office: i64,
    /// In [0, 100].
    pub critic_rating: u32,

    /// Strategy chosen for the coming theatre week, if any.
    pub weekly_marketing_choice_id: Option<String>,
    pub marketing_history: Vec<MarketingResult>,
}

impl Movie {
    /// Fresh production in the script-writing phase with empty crew and cast.
    pub fn from_draft(draft: MovieDraft, synopsis: String, tables: &GameTables) -> Self {
        Self {
            id: draft.id,
            title: draft.title,
            genre: draft.genre,
            rating: draft.rating,
            runtime: draft.runtime,
            synopsis,
            production_phase: ProductionPhase::Scriptwriting,
            weeks_in_phase: 0,
            total_weeks: 0,
            writer: None,
            director: None,
            cinematographer: None,
            composer: None,
            camera_man: None,
            cast: tables.economy.cast_layout(),
            quality: 0,
            hype: 0,
            marketing_budget: tables.economy.default_marketing_budget,
            teaser_stats: ViewStats::default(),
            trailer_stats: ViewStats::default(),
            box_office_revenue: Vec::new(),
            total_box_office: 0,
            critic_rating: 0,
            weekly_marketing_choice_id: None,
            marketing_history: Vec::new(),
        }
    }

    pub fn crew_slot(&self, role: StaffRole) -> Option<&Staff> {
        match role {
            StaffRole::Writer => self.writer.as_ref(),
            StaffRole::Director => self.director.as_ref(),
            StaffRole::Cinematographer => self.cinematographer.as_ref(),
            StaffRole::Composer => self.composer.as_ref(),
            StaffRole::CameraMan => self.camera_man.as_ref(),
        }
    }

    pub fn crew_slot_mut(&mut self, role: StaffRole) -> &mut Option<Staff> {
        match role {
            StaffRole::Writer => &mut self.writer,
            StaffRole::Director => &mut self.director,
            StaffRole::Cinematographer => &mut self.cinematographer,
            StaffRole::Composer => &mut self.composer,
            StaffRole::CameraMan => &mut self.camera_man,
        }
    }

    /// Assigned crew in role order.
    pub fn crew(&self) -> impl Iterator<Item = &Staff> + '_ {
        StaffRole::ALL.into_iter().filter_map(|r| self.crew_slot(r))
    }

    /// Teaser plus trailer views.
    pub fn total_views(&self) -> u64 {
        self.teaser_stats
            .views
            .saturating_add(self.trailer_stats.views)
    }
}

/// Severity of an entry in the in-game event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Info,
    Warning,
    Success,
}

/// One entry of the in-game news feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub week: u32,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

/// Screen-level phase of the game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Splash,
    MainMenu,
    Creation,
    InGame,
}

/// Aggregate root of a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub player_stats: PlayerStats,
    pub studio_name: String,
    pub owner_name: String,
    /// Starts at 1 and only ever increases.
    pub current_week: u32,
    /// Archived movies, oldest first.
    pub completed_movies: Vec<Movie>,
    pub current_movie_in_production: Option<Movie>,
    pub hired_staff: Vec<Staff>,
    /// Newest week first.
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// State shown at application start, before a studio is founded.
    pub fn initial(tables: &GameTables) -> Self {
        Self {
            phase: GamePhase::Splash,
            player_stats: tables.economy.starting_stats.clone(),
            studio_name: String::new(),
            owner_name: String::new(),
            current_week: 1,
            completed_movies: Vec::new(),
            current_movie_in_production: None,
            hired_staff: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn staff(&self, id: &str) -> Option<&Staff> {
        self.hired_staff.iter().find(|s| s.id == id)
    }

    /// Sum of every hired staff member's weekly salary.
    pub fn weekly_payroll(&self) -> i64 {
        self.hired_staff.iter().map(|s| s.weekly_salary).sum()
    }
}

/// Sort the event log newest week first. Entries of the same week keep
/// their emission order.
pub fn sort_events(events: &mut [GameEvent]) {
    events.sort_by(|a, b| b.week.cmp(&a.week));
}

/// Format an amount with thousands separators, e.g. `1,234,567`.
pub fn format_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Score outside [0, 100].
    #[error("{field} must be within [0,100], got {value}")]
    ScoreOutOfRange { field: &'static str, value: u32 },
    /// Runtime is not one of the configured lengths.
    #[error("runtime {0} is not an allowed length")]
    InvalidRuntime(u32),
    /// Cast does not match the configured slot layout.
    #[error("expected {expected} cast slots, found {found}")]
    CastSize { expected: usize, found: usize },
    /// Same actor appears in more than one slot.
    #[error("actor {0} is cast more than once")]
    DuplicateActor(String),
    /// Crew member placed in a slot for a different role.
    #[error("staff {id} cannot fill the {slot} slot")]
    WrongCrewRole { id: String, slot: StaffRole },
    /// Title must be non-empty.
    #[error("movie title is empty")]
    EmptyTitle,
    /// Week counter must start at 1.
    #[error("week counter must be >= 1")]
    WeekZero,
    /// Salary must be strictly positive.
    #[error("staff {0} has a non-positive salary")]
    NonPositiveSalary(String),
    /// Duplicate staff id on the roster.
    #[error("duplicate staff id: {0}")]
    DuplicateStaff(String),
}

fn check_score(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value > SCORE_MAX {
        return Err(ValidationError::ScoreOutOfRange { field, value });
    }
    Ok(())
}

/// Validate a movie against the configured layout and score bounds.
pub fn validate_movie(movie: &Movie, tables: &GameTables) -> Result<(), ValidationError> {
    if movie.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if !tables.economy.allowed_runtimes.contains(&movie.runtime) {
        return Err(ValidationError::InvalidRuntime(movie.runtime));
    }
    check_score("quality", movie.quality)?;
    check_score("hype", movie.hype)?;
    check_score("critic_rating", movie.critic_rating)?;

    let expected = tables.economy.cast_slots();
    if movie.cast.len() != expected {
        return Err(ValidationError::CastSize {
            expected,
            found: movie.cast.len(),
        });
    }
    let mut seen = BTreeSet::new();
    for actor in movie.cast.iter().filter_map(|c| c.actor.as_ref()) {
        if !seen.insert(actor.id.as_str()) {
            return Err(ValidationError::DuplicateActor(actor.id.clone()));
        }
    }
    for role in StaffRole::ALL {
        if let Some(s) = movie.crew_slot(role) {
            if s.role != role {
                return Err(ValidationError::WrongCrewRole {
                    id: s.id.clone(),
                    slot: role,
                });
            }
        }
    }
    Ok(())
}

/// Validate a whole game state, including the movie in production.
pub fn validate_state(state: &GameState, tables: &GameTables) -> Result<(), ValidationError> {
    if state.current_week == 0 {
        return Err(ValidationError::WeekZero);
    }
    let mut ids = BTreeSet::new();
    for s in &state.hired_staff {
        if s.weekly_salary <= 0 {
            return Err(ValidationError::NonPositiveSalary(s.id.clone()));
        }
        if !ids.insert(s.id.as_str()) {
            return Err(ValidationError::DuplicateStaff(s.id.clone()));
        }
    }
    if let Some(movie) = &state.current_movie_in_production {
        validate_movie(movie, tables)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draft() -> MovieDraft {
        MovieDraft {
            id: "movie-1".to_string(),
            title: "Night Shift".to_string(),
            genre: Genre::Horror,
            rating: Rating::R,
            runtime: 90,
        }
    }

    #[test]
    fn phase_order_and_gates() {
        assert_eq!(
            ProductionPhase::Scriptwriting.next(),
            Some(ProductionPhase::Casting)
        );
        assert_eq!(
            ProductionPhase::OttRelease.next(),
            Some(ProductionPhase::Completed)
        );
        assert_eq!(ProductionPhase::Completed.next(), None);
        let gates: Vec<_> = ProductionPhase::ORDER
            .into_iter()
            .filter(|p| p.is_manual_gate())
            .collect();
        assert_eq!(
            gates,
            vec![
                ProductionPhase::PostProduction,
                ProductionPhase::TeaserRelease,
                ProductionPhase::TrailerRelease
            ]
        );
        assert!(ProductionPhase::PostProduction.allows_crew_changes());
        assert!(!ProductionPhase::TeaserRelease.allows_crew_changes());
    }

    #[test]
    fn movie_from_draft_has_default_layout() {
        let tables = GameTables::default();
        let movie = Movie::from_draft(draft(), "A night to forget.".into(), &tables);
        assert_eq!(movie.production_phase, ProductionPhase::Scriptwriting);
        assert_eq!(movie.marketing_budget, 50_000);
        let names: Vec<_> = movie.cast.iter().map(|c| c.role_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Lead Role 1",
                "Lead Role 2",
                "Supporting Role 1",
                "Supporting Role 2",
                "Supporting Role 3"
            ]
        );
        assert!(validate_movie(&movie, &tables).is_ok());
    }

    #[test]
    fn validate_movie_rejects_bad_input() {
        let tables = GameTables::default();
        let mut movie = Movie::from_draft(draft(), String::new(), &tables);
        movie.hype = 101;
        assert_eq!(
            validate_movie(&movie, &tables),
            Err(ValidationError::ScoreOutOfRange {
                field: "hype",
                value: 101
            })
        );

        let mut movie = Movie::from_draft(draft(), String::new(), &tables);
        movie.runtime = 45;
        assert_eq!(
            validate_movie(&movie, &tables),
            Err(ValidationError::InvalidRuntime(45))
        );

        let mut movie = Movie::from_draft(draft(), String::new(), &tables);
        let actor = tables.actor_pool[0].clone();
        movie.cast[0].actor = Some(actor.clone());
        movie.cast[3].actor = Some(actor.clone());
        assert_eq!(
            validate_movie(&movie, &tables),
            Err(ValidationError::DuplicateActor(actor.id))
        );

        let mut movie = Movie::from_draft(draft(), String::new(), &tables);
        let writer = tables
            .staff_pool
            .iter()
            .find(|s| s.role == StaffRole::Writer)
            .cloned();
        movie.director = writer;
        assert!(matches!(
            validate_movie(&movie, &tables),
            Err(ValidationError::WrongCrewRole { .. })
        ));
    }

    #[test]
    fn serde_uses_display_names() {
        let s = serde_json::to_string(&ProductionPhase::PostProduction).unwrap();
        assert_eq!(s, "\"Post-Production\"");
        let g: Genre = serde_json::from_str("\"Sci-Fi\"").unwrap();
        assert_eq!(g, Genre::SciFi);
        let t: ActorTier = serde_json::from_str("\"A-List\"").unwrap();
        assert_eq!(t, ActorTier::AList);
        let ev = GameEvent {
            id: "evt-start".into(),
            week: 1,
            message: "hi".into(),
            kind: EventKind::Success,
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["type"], "success");
    }

    #[test]
    fn game_state_snapshot_roundtrip() {
        let tables = GameTables::default();
        let mut state = GameState::initial(&tables);
        state.studio_name = "Blue Lantern".into();
        state.hired_staff.push(tables.staff_pool[0].clone());
        let mut movie = Movie::from_draft(draft(), "Synopsis".into(), &tables);
        movie.cast[1].actor = Some(tables.actor_pool[2].clone());
        state.current_movie_in_production = Some(movie);
        validate_state(&state, &tables).unwrap();

        let s = serde_json::to_string_pretty(&state).unwrap();
        let back: GameState = serde_json::from_str(&s).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn stats_patch_only_touches_set_fields() {
        let mut stats = GameTables::default().economy.starting_stats;
        stats.apply(&PlayerStatsPatch {
            money: Some(-5),
            fans: Some(12),
            ..Default::default()
        });
        assert_eq!(stats.money, -5);
        assert_eq!(stats.fans, 12);
        assert_eq!(stats.fame, 10);
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(0), "0");
        assert_eq!(format_money(999), "999");
        assert_eq!(format_money(1_000), "1,000");
        assert_eq!(format_money(1_719_600), "1,719,600");
        assert_eq!(format_money(-25_000), "-25,000");
    }

    fn event(week: u32, id: &str) -> GameEvent {
        GameEvent {
            id: id.into(),
            week,
            message: String::new(),
            kind: EventKind::Info,
        }
    }

    #[test]
    fn event_sort_keeps_emission_order_within_week() {
        let mut events = vec![
            event(1, "a"),
            event(3, "b"),
            event(2, "c"),
            event(3, "d"),
        ];
        sort_events(&mut events);
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c", "a"]);
    }

    proptest! {
        #[test]
        fn sorted_events_are_week_descending(weeks in proptest::collection::vec(1u32..50, 0..40)) {
            let mut events: Vec<_> = weeks.iter().enumerate().map(|(i, w)| event(*w, &i.to_string())).collect();
            sort_events(&mut events);
            prop_assert!(events.windows(2).all(|w| w[0].week >= w[1].week));
        }
    }
}
