#![deny(warnings)]

//! Headless driver: founds a studio (or resumes a save), produces a movie end
//! to end on autopilot and writes the save back.

use anyhow::{bail, Context, Result};
use persistence::{default_save_path, load_game, save_game};
use std::path::PathBuf;
use studio_core::{
    format_money, load_tables, GamePhase, GameTables, Genre, MovieDraft, ProductionPhase, Rating,
    StaffRole,
};
use studio_runtime::{Command, Session};
use synopsis::{synopsis_or_fallback, GeminiClient, SynopsisGenerator, DEFAULT_SYNOPSIS_TIMEOUT};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Marketing strategy bought for every theatre week when affordable.
const AUTOPILOT_STRATEGY: &str = "ms1";

struct Args {
    tables: Option<PathBuf>,
    weeks: u32,
    seed: u64,
    save: PathBuf,
    load: Option<PathBuf>,
    title: String,
}

fn usage() -> &'static str {
    "usage: studio [--tables <yaml>] [--weeks <n>] [--seed <u64>] [--save <path>] [--load <path>] [--title <text>] [--version]"
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = Args {
        tables: None,
        weeks: 26,
        seed: 42,
        save: default_save_path(),
        load: None,
        title: "The First Reel".to_string(),
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = || it.next().with_context(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "--tables" => args.tables = Some(value()?.into()),
            "--weeks" => args.weeks = value()?.parse().context("--weeks")?,
            "--seed" => args.seed = value()?.parse().context("--seed")?,
            "--save" => args.save = value()?.into(),
            "--load" => args.load = Some(value()?.into()),
            "--title" => args.title = value()?,
            "--version" => {
                println!(
                    "studio {} ({} {})",
                    env!("CARGO_PKG_VERSION"),
                    env!("STUDIO_GIT_SHA"),
                    env!("STUDIO_BUILD_DATE")
                );
                return Ok(None);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(None);
            }
            other => bail!("unknown argument {other}\n{}", usage()),
        }
    }
    Ok(Some(args))
}

/// Found the studio unless a save put us on the resume menu.
fn open_session(args: &Args, tables: GameTables) -> Result<Session> {
    let state = match &args.load {
        Some(path) => load_game(path, &tables),
        None => studio_core::GameState::initial(&tables),
    };
    if state.phase == GamePhase::MainMenu {
        let mut session = Session::resume(state, tables, args.seed);
        session.dispatch(Command::SetPhase(GamePhase::InGame));
        return Ok(session);
    }
    let mut session = Session::new(tables, args.seed);
    if !session.dispatch(Command::StartNewGame {
        studio_name: "Headless Pictures".to_string(),
        owner_name: "Autopilot".to_string(),
    }) {
        bail!("could not found the studio");
    }
    Ok(session)
}

/// Hire the first pooled candidate for every role still unfilled.
fn staff_up(session: &mut Session) {
    let pool = session.tables().staff_pool.clone();
    for role in StaffRole::ALL {
        if session.state().hired_staff.iter().any(|s| s.role == role) {
            continue;
        }
        if let Some(candidate) = pool.iter().find(|s| s.role == role) {
            session.dispatch(Command::HireStaff(candidate.clone()));
        }
    }
}

async fn start_production(
    session: &mut Session,
    generator: Option<&dyn SynopsisGenerator>,
    title: &str,
    genre: Genre,
) -> Result<()> {
    let synopsis = synopsis_or_fallback(generator, title, genre, DEFAULT_SYNOPSIS_TIMEOUT).await;
    let runtime = session
        .tables()
        .economy
        .allowed_runtimes
        .first()
        .copied()
        .context("tables allow no runtimes")?;
    let state = session.state();
    let draft = MovieDraft {
        id: format!("movie-{}-{}", state.current_week, state.completed_movies.len() + 1),
        title: title.to_string(),
        genre,
        rating: Rating::PG13,
        runtime,
    };
    if let Err(reason) = session.try_dispatch(Command::StartMovieProduction { draft, synopsis }) {
        bail!("production did not start: {reason}");
    }

    let crew: Vec<String> = session.state().hired_staff.iter().map(|s| s.id.clone()).collect();
    for staff_id in crew {
        session.dispatch(Command::AssignCrew { staff_id });
    }
    let mut actors = session.tables().actor_pool.clone();
    actors.sort_by(|a, b| b.tier.cmp(&a.tier));
    let slots = session.tables().economy.cast_slots();
    for (slot, actor) in actors.into_iter().take(slots).enumerate() {
        session.dispatch(Command::CastActor {
            slot,
            actor_id: actor.id,
        });
    }
    Ok(())
}

/// Issue whatever command the movie is waiting for this week.
fn autopilot_step(session: &mut Session) -> bool {
    let Some(movie) = session.state().current_movie_in_production.as_ref() else {
        return false;
    };
    let due = movie.weeks_in_phase >= session.tables().phase_weeks(movie.production_phase);
    let command = match movie.production_phase {
        ProductionPhase::PostProduction if due => Command::ReleaseTeaser,
        ProductionPhase::TeaserRelease if due => Command::ReleaseTrailer,
        ProductionPhase::TrailerRelease if due => Command::ReleaseToTheatres,
        ProductionPhase::TheatreRelease if movie.weekly_marketing_choice_id.is_none() => {
            let affordable = session
                .tables()
                .strategy(AUTOPILOT_STRATEGY)
                .is_some_and(|s| s.cost <= session.state().player_stats.money);
            if !affordable {
                return true;
            }
            Command::SelectMarketingStrategy {
                strategy_id: AUTOPILOT_STRATEGY.to_string(),
            }
        }
        ProductionPhase::OttRelease | ProductionPhase::Completed => Command::AcceptOttOffer,
        _ => return true,
    };
    session.dispatch(command);
    session.state().current_movie_in_production.is_some()
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };
    info!(seed = args.seed, weeks = args.weeks, save = %args.save.display(), "starting studio");

    let tables = match &args.tables {
        Some(path) => load_tables(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameTables::default(),
    };
    let mut session = open_session(&args, tables)?;

    let gemini = GeminiClient::from_env();
    if gemini.is_none() {
        warn!("no GEMINI_API_KEY or API_KEY set, using placeholder synopses");
    }
    let generator = gemini.as_ref().map(|g| g as &dyn SynopsisGenerator);

    staff_up(&mut session);
    if session.state().current_movie_in_production.is_none() {
        let genre = Genre::ALL[(args.seed % Genre::ALL.len() as u64) as usize];
        start_production(&mut session, generator, &args.title, genre).await?;
    }

    for _ in 0..args.weeks {
        if !autopilot_step(&mut session) {
            break;
        }
        session.advance_weeks(1);
    }

    let state = session.state();
    println!(
        "Studio | {} | week {} | movies released: {}",
        state.studio_name,
        state.current_week,
        state.completed_movies.len()
    );
    println!(
        "KPI | money: ${} | fame: {} | fans: {} | payroll: ${}/wk",
        format_money(state.player_stats.money),
        state.player_stats.fame,
        format_money(state.player_stats.fans),
        format_money(state.weekly_payroll())
    );
    for movie in state
        .completed_movies
        .iter()
        .chain(state.current_movie_in_production.iter())
    {
        println!(
            "Movie | {} ({}) | {} | quality {} | critics {} | box office ${}",
            movie.title,
            movie.genre,
            movie.production_phase,
            movie.quality,
            movie.critic_rating,
            format_money(movie.total_box_office)
        );
    }
    for event in state.events.iter().take(5) {
        println!("News | week {} | {}", event.week, event.message);
    }

    save_game(state, &args.save).with_context(|| format!("saving {}", args.save.display()))?;
    Ok(())
}
