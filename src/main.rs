mod config;
mod detail;
mod error;
mod fetch;
mod list;
mod models;
mod pages;
mod router;
mod sprite;
mod transform;
mod ui;
mod utils;

use anyhow::{bail, Context};
use clap::Parser;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::DexConfig;
use crate::detail::DetailState;
use crate::fetch::PokeApi;
use crate::pages::{DetailPage, ListPage};
use crate::router::{Location, Route};
use crate::ui::{draw_ui, App};
use crate::utils::{format_measure, format_name, pokemon_id_from_url, range_label};

/// Browse the Pokédex from the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// PokeAPI base URL
    #[arg(long, env = "POKEAPI_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Location to open, e.g. `/?page=3` or `/pokemon/pikachu`
    #[arg(long, default_value = "/")]
    location: String,

    /// File that receives log output (filter with RUST_LOG)
    #[arg(long, default_value = "pokedex.log")]
    log_file: PathBuf,

    /// Print the location once to stdout instead of starting the UI
    #[arg(long)]
    dump: bool,

    /// With --dump, print JSON instead of text
    #[arg(long, requires = "dump")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let api = PokeApi::new(DexConfig::with_base_url(&args.base_url));
    let location = Location::parse(&args.location);
    log::info!("starting at {} against {}", location, args.base_url);

    if args.dump {
        return dump(api, &location, args.json).await;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api, location);
    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    // print where we left off so the session can be resumed with --location
    println!("{}", app.history.current());
    Ok(())
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)
        .with_context(|| format!("opening log file {}", args.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        app.tick();
        draw_ui(terminal, app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    app.handle_key(key.code);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Resolve `location` once and print it to stdout.
async fn dump(api: PokeApi, location: &Location, json: bool) -> anyhow::Result<()> {
    match location.route() {
        Some(Route::List) => {
            let page_size = api.config().page_size;
            let (page, pending) = ListPage::mount(api, location);
            pending.await;
            let state = page.state();
            if let Some(error) = state.error {
                bail!(error);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&state.items)?);
                return Ok(());
            }
            for item in &state.items {
                println!(
                    "#{:<5} {}",
                    pokemon_id_from_url(&item.url),
                    format_name(&item.name)
                );
            }
            println!(
                "{} (page {} of {})",
                range_label(state.current_page, page_size, state.total_count),
                state.current_page,
                state.total_pages
            );
        }
        Some(Route::Detail { name }) => {
            let (page, pending) = DetailPage::mount(api, &name);
            pending.await;
            match page.state() {
                DetailState::Ready(p) if json => {
                    println!("{}", serde_json::to_string_pretty(&p)?);
                }
                DetailState::Ready(p) => {
                    println!("{} (#{})", format_name(&p.name), p.id);
                    println!("Types: {}", p.types.join(", "));
                    println!(
                        "Height: {} m  Weight: {} kg",
                        format_measure(p.height),
                        format_measure(p.weight)
                    );
                    println!("Abilities: {}", p.abilities.join(", "));
                    for (label, value) in p.stats.entries() {
                        println!("{:<12} {:>4}", label, value);
                    }
                    println!("Image: {}", p.image_url);
                }
                other => bail!(other.error().unwrap_or("Pokémon unavailable").to_string()),
            }
        }
        None => bail!("no route for {}", location),
    }
    Ok(())
}
