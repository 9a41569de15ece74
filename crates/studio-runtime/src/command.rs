//! Commands accepted by the game and the reducer that applies them.
//!
//! Every command is an atomic transition. A command that is not valid for
//! the current state is rejected and leaves the state unchanged.

use crate::events::EventSink;
use crate::phase::{can_release, enter_phase};
use crate::weekly::process_weekly_update;
use serde::{Deserialize, Serialize};
use studio_core::{
    format_money, validate_movie, EventKind, GameEvent, GamePhase, GameState, GameTables, Movie,
    MovieDraft, PlayerStatsPatch, ProductionPhase, RandomSource, Staff, StaffTier,
    ValidationError,
};
use studio_econ::ott_payout;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A single player or system action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Switch the screen-level phase.
    SetPhase(GamePhase),
    /// Found a studio and reset everything else to the initial state.
    StartNewGame {
        studio_name: String,
        owner_name: String,
    },
    AdvanceWeek,
    /// Open a production; charges the configured start cost.
    StartMovieProduction { draft: MovieDraft, synopsis: String },
    /// Replace the movie in production wholesale.
    UpdateMovieInProduction(Box<Movie>),
    /// Archive the movie in production without further payout.
    CompleteMovieProduction,
    UpdatePlayerStats(PlayerStatsPatch),
    ReleaseTeaser,
    ReleaseTrailer,
    ReleaseToTheatres,
    HireStaff(Staff),
    StartStaffTraining { staff_id: String, cost: i64 },
    /// Put a hired staff member in the crew slot matching their role.
    AssignCrew { staff_id: String },
    /// Put an actor from the pool into a cast slot.
    CastActor { slot: usize, actor_id: String },
    /// Pick the marketing strategy for the next theatre week.
    SelectMarketingStrategy { strategy_id: String },
    /// Sell the streaming rights and archive the movie.
    AcceptOttOffer,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetPhase(_) => "set_phase",
            Command::StartNewGame { .. } => "start_new_game",
            Command::AdvanceWeek => "advance_week",
            Command::StartMovieProduction { .. } => "start_movie_production",
            Command::UpdateMovieInProduction(_) => "update_movie_in_production",
            Command::CompleteMovieProduction => "complete_movie_production",
            Command::UpdatePlayerStats(_) => "update_player_stats",
            Command::ReleaseTeaser => "release_teaser",
            Command::ReleaseTrailer => "release_trailer",
            Command::ReleaseToTheatres => "release_to_theatres",
            Command::HireStaff(_) => "hire_staff",
            Command::StartStaffTraining { .. } => "start_staff_training",
            Command::AssignCrew { .. } => "assign_crew",
            Command::CastActor { .. } => "cast_actor",
            Command::SelectMarketingStrategy { .. } => "select_marketing_strategy",
            Command::AcceptOttOffer => "accept_ott_offer",
        }
    }
}

/// Why a command was turned into a no-op.
#[derive(Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("no movie in production")]
    NoMovie,
    #[error("a movie is already in production")]
    MovieInProgress,
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("cannot release into {target} from {current}")]
    NotReleasable {
        current: ProductionPhase,
        target: ProductionPhase,
    },
    #[error("crew and cast are locked during {0}")]
    CrewLocked(ProductionPhase),
    #[error("strategies can only be chosen in theatres, movie is in {0}")]
    NotInTheatres(ProductionPhase),
    #[error("no streaming offer during {0}")]
    NoOttOffer(ProductionPhase),
    #[error("unknown staff: {0}")]
    UnknownStaff(String),
    #[error("staff {0} is already hired")]
    AlreadyHired(String),
    #[error("staff {0} is already training")]
    AlreadyTraining(String),
    #[error("no further training for {0}")]
    NoFurtherTraining(StaffTier),
    #[error("training costs {expected}, request offered {offered}")]
    TrainingCostMismatch { expected: i64, offered: i64 },
    #[error("unknown actor: {0}")]
    UnknownActor(String),
    #[error("actor {0} already plays another role")]
    ActorAlreadyCast(String),
    #[error("no cast slot {0}")]
    NoSuchSlot(usize),
    #[error("unknown marketing strategy: {0}")]
    UnknownStrategy(String),
    #[error("movie id {0} does not match the movie in production")]
    MovieMismatch(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Apply `command`, returning the new state or the reason it was rejected.
pub fn try_apply<R: RandomSource + ?Sized>(
    state: &GameState,
    command: Command,
    tables: &GameTables,
    rng: &mut R,
) -> Result<GameState, Rejection> {
    let mut next = state.clone();
    match command {
        Command::SetPhase(phase) => next.phase = phase,
        Command::StartNewGame {
            studio_name,
            owner_name,
        } => return Ok(new_game(tables, studio_name, owner_name)),
        Command::AdvanceWeek => return Ok(process_weekly_update(state, tables, rng)),
        Command::StartMovieProduction { draft, synopsis } => {
            start_production(&mut next, tables, draft, synopsis)?
        }
        Command::UpdateMovieInProduction(movie) => update_movie(&mut next, tables, *movie)?,
        Command::CompleteMovieProduction => {
            let movie = next
                .current_movie_in_production
                .take()
                .ok_or(Rejection::NoMovie)?;
            info!(movie = %movie.id, phase = %movie.production_phase, "movie archived");
            next.completed_movies.push(movie);
        }
        Command::UpdatePlayerStats(patch) => next.player_stats.apply(&patch),
        Command::ReleaseTeaser => release(&mut next, ProductionPhase::TeaserRelease, tables, rng)?,
        Command::ReleaseTrailer => {
            release(&mut next, ProductionPhase::TrailerRelease, tables, rng)?
        }
        Command::ReleaseToTheatres => {
            release(&mut next, ProductionPhase::TheatreRelease, tables, rng)?
        }
        Command::HireStaff(staff) => {
            if next.staff(&staff.id).is_some() {
                return Err(Rejection::AlreadyHired(staff.id));
            }
            if staff.weekly_salary <= 0 {
                return Err(ValidationError::NonPositiveSalary(staff.id).into());
            }
            info!(staff = %staff.id, role = %staff.role, tier = %staff.tier, "staff hired");
            next.hired_staff.push(staff);
        }
        Command::StartStaffTraining { staff_id, cost } => {
            start_training(&mut next, tables, &staff_id, cost)?
        }
        Command::AssignCrew { staff_id } => assign_crew(&mut next, &staff_id)?,
        Command::CastActor { slot, actor_id } => cast_actor(&mut next, tables, slot, &actor_id)?,
        Command::SelectMarketingStrategy { strategy_id } => {
            select_strategy(&mut next, tables, strategy_id)?
        }
        Command::AcceptOttOffer => accept_ott_offer(&mut next, tables)?,
    }
    Ok(next)
}

/// Apply `command`; a rejected command returns the state unchanged.
pub fn apply_command<R: RandomSource + ?Sized>(
    state: &GameState,
    command: Command,
    tables: &GameTables,
    rng: &mut R,
) -> GameState {
    let name = command.name();
    match try_apply(state, command, tables, rng) {
        Ok(next) => {
            debug!(command = name, week = next.current_week, "command applied");
            next
        }
        Err(reason) => {
            warn!(command = name, %reason, "command ignored");
            state.clone()
        }
    }
}

fn new_game(tables: &GameTables, studio_name: String, owner_name: String) -> GameState {
    let mut state = GameState::initial(tables);
    state.events = vec![GameEvent {
        id: "evt-start".to_string(),
        week: state.current_week,
        message: format!("Welcome! {studio_name} is officially open for business."),
        kind: EventKind::Success,
    }];
    info!(studio = %studio_name, owner = %owner_name, "new game");
    GameState {
        phase: GamePhase::InGame,
        studio_name,
        owner_name,
        ..state
    }
}

fn start_production(
    state: &mut GameState,
    tables: &GameTables,
    draft: MovieDraft,
    synopsis: String,
) -> Result<(), Rejection> {
    if state.current_movie_in_production.is_some() {
        return Err(Rejection::MovieInProgress);
    }
    let cost = tables.economy.production_start_cost;
    if state.player_stats.money < cost {
        return Err(Rejection::InsufficientFunds {
            needed: cost,
            available: state.player_stats.money,
        });
    }
    let movie = Movie::from_draft(draft, synopsis, tables);
    validate_movie(&movie, tables)?;
    info!(movie = %movie.id, title = %movie.title, genre = %movie.genre, "production started");
    state.player_stats.money -= cost;
    state.current_movie_in_production = Some(movie);
    Ok(())
}

fn update_movie(state: &mut GameState, tables: &GameTables, movie: Movie) -> Result<(), Rejection> {
    let current = state
        .current_movie_in_production
        .as_mut()
        .ok_or(Rejection::NoMovie)?;
    if current.id != movie.id {
        return Err(Rejection::MovieMismatch(movie.id));
    }
    validate_movie(&movie, tables)?;
    *current = movie;
    Ok(())
}

fn release<R: RandomSource + ?Sized>(
    state: &mut GameState,
    target: ProductionPhase,
    tables: &GameTables,
    rng: &mut R,
) -> Result<(), Rejection> {
    let movie = state
        .current_movie_in_production
        .as_mut()
        .ok_or(Rejection::NoMovie)?;
    if !can_release(movie, target, tables) {
        return Err(Rejection::NotReleasable {
            current: movie.production_phase,
            target,
        });
    }
    let mut sink = EventSink::new(state.current_week);
    enter_phase(movie, target, &mut state.player_stats, tables, rng, &mut sink);
    sink.flush_into(&mut state.events);
    Ok(())
}

fn start_training(
    state: &mut GameState,
    tables: &GameTables,
    staff_id: &str,
    cost: i64,
) -> Result<(), Rejection> {
    let available = state.player_stats.money;
    let member = state
        .hired_staff
        .iter_mut()
        .find(|s| s.id == staff_id)
        .ok_or_else(|| Rejection::UnknownStaff(staff_id.to_string()))?;
    if member.is_training {
        return Err(Rejection::AlreadyTraining(member.id.clone()));
    }
    let step = tables
        .training_for(member.tier)
        .ok_or(Rejection::NoFurtherTraining(member.tier))?;
    if step.cost != cost {
        return Err(Rejection::TrainingCostMismatch {
            expected: step.cost,
            offered: cost,
        });
    }
    if available < cost {
        return Err(Rejection::InsufficientFunds {
            needed: cost,
            available,
        });
    }
    member.is_training = true;
    member.weeks_in_training = 0;
    info!(staff = %member.id, from = %member.tier, to = %step.next_tier, weeks = step.weeks, "training started");
    state.player_stats.money -= cost;
    Ok(())
}

fn assign_crew(state: &mut GameState, staff_id: &str) -> Result<(), Rejection> {
    let staff = state
        .staff(staff_id)
        .cloned()
        .ok_or_else(|| Rejection::UnknownStaff(staff_id.to_string()))?;
    let movie = state
        .current_movie_in_production
        .as_mut()
        .ok_or(Rejection::NoMovie)?;
    if !movie.production_phase.allows_crew_changes() {
        return Err(Rejection::CrewLocked(movie.production_phase));
    }
    let role = staff.role;
    debug!(movie = %movie.id, staff = %staff.id, %role, "crew assigned");
    *movie.crew_slot_mut(role) = Some(staff);
    Ok(())
}

fn cast_actor(
    state: &mut GameState,
    tables: &GameTables,
    slot: usize,
    actor_id: &str,
) -> Result<(), Rejection> {
    let movie = state
        .current_movie_in_production
        .as_mut()
        .ok_or(Rejection::NoMovie)?;
    if !movie.production_phase.allows_crew_changes() {
        return Err(Rejection::CrewLocked(movie.production_phase));
    }
    let actor = tables
        .pooled_actor(actor_id)
        .cloned()
        .ok_or_else(|| Rejection::UnknownActor(actor_id.to_string()))?;
    let taken = movie.cast.iter().enumerate().any(|(i, c)| {
        i != slot && c.actor.as_ref().is_some_and(|a| a.id == actor.id)
    });
    if taken {
        return Err(Rejection::ActorAlreadyCast(actor.id));
    }
    let target = movie.cast.get_mut(slot).ok_or(Rejection::NoSuchSlot(slot))?;
    debug!(role = %target.role_name, actor = %actor.id, "actor cast");
    target.actor = Some(actor);
    Ok(())
}

fn select_strategy(
    state: &mut GameState,
    tables: &GameTables,
    strategy_id: String,
) -> Result<(), Rejection> {
    let money = state.player_stats.money;
    let movie = state
        .current_movie_in_production
        .as_mut()
        .ok_or(Rejection::NoMovie)?;
    if movie.production_phase != ProductionPhase::TheatreRelease {
        return Err(Rejection::NotInTheatres(movie.production_phase));
    }
    let strategy = tables
        .strategy(&strategy_id)
        .ok_or_else(|| Rejection::UnknownStrategy(strategy_id.clone()))?;
    if money < strategy.cost {
        return Err(Rejection::InsufficientFunds {
            needed: strategy.cost,
            available: money,
        });
    }
    movie.weekly_marketing_choice_id = Some(strategy_id);
    Ok(())
}

fn accept_ott_offer(state: &mut GameState, tables: &GameTables) -> Result<(), Rejection> {
    let phase = state
        .current_movie_in_production
        .as_ref()
        .map(|m| m.production_phase)
        .ok_or(Rejection::NoMovie)?;
    if !matches!(
        phase,
        ProductionPhase::OttRelease | ProductionPhase::Completed
    ) {
        return Err(Rejection::NoOttOffer(phase));
    }
    let Some(mut movie) = state.current_movie_in_production.take() else {
        return Err(Rejection::NoMovie);
    };
    let payout = ott_payout(movie.total_box_office, tables.economy.ott_payout_fraction);
    state.player_stats.money += payout;
    movie.production_phase = ProductionPhase::Completed;
    movie.weeks_in_phase = 0;

    let mut sink = EventSink::new(state.current_week);
    sink.push(
        "ott",
        EventKind::Success,
        format!(
            "Sold the streaming rights to '{}' for ${}.",
            movie.title,
            format_money(payout)
        ),
    );
    sink.flush_into(&mut state.events);
    info!(movie = %movie.id, payout, total_box_office = movie.total_box_office, "streaming deal accepted");
    state.completed_movies.push(movie);
    Ok(())
}
