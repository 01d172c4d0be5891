use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use slide_routes::config::Config;
use slide_routes::direction::Direction;
use slide_routes::error::{SlideError, SlideResult};
use slide_routes::history::{FileSessionStorage, HistoryStore, MemorySessionStorage, SessionStorage};
use slide_routes::logging::init_tracing;
use slide_routes::route::{RouteRegistry, View};
use slide_routes::style::style_rules;
use slide_routes::transition::MountedView;
use slide_routes::{RenderState, SCOPE_CLASS, SlideRoutes};

#[derive(Parser, Debug)]
#[command(name = "slide-routes")]
#[command(about = "Resolve navigation direction and drive slide transitions")]
#[command(version)]
struct Cli {
    /// Log scope decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render each path in order and print the resulting transition
    Navigate {
        /// Route pattern, in registration order
        #[arg(long = "route", value_name = "PATTERN", required = true)]
        routes: Vec<String>,

        /// Redirect route as FROM=TO
        #[arg(long = "redirect", value_name = "FROM=TO", value_parser = parse_redirect)]
        redirects: Vec<(String, String)>,

        /// Persist history here so a later run resumes the session
        #[arg(long, value_name = "PATH")]
        session_file: Option<PathBuf>,

        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Paths to visit
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the stylesheet for one direction
    Css {
        #[arg(long, default_value = "forward", value_parser = parse_direction)]
        direction: Direction,

        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Drop the persisted history of a session file
    Reset {
        #[arg(long, value_name = "PATH")]
        session_file: PathBuf,

        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli.command).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> SlideResult<()> {
    match command {
        Command::Navigate {
            routes,
            redirects,
            session_file,
            config,
            paths,
        } => {
            let config = load_config(config.as_deref())?;
            let registry = build_registry(&routes, &redirects)?;
            let storage: Arc<dyn SessionStorage> = match session_file {
                Some(path) => Arc::new(FileSessionStorage::new(path)),
                None => Arc::new(MemorySessionStorage::new()),
            };
            let mut scope = SlideRoutes::new(&config, registry, storage)?;
            navigate(&mut scope, &paths).await
        }
        Command::Css { direction, config } => {
            let config = load_config(config.as_deref())?;
            let sheet = style_rules(
                config.transition.animation,
                config.transition.duration(),
                config.transition.timing,
                direction,
            );
            print!("{}", sheet.to_css(SCOPE_CLASS));
            Ok(())
        }
        Command::Reset {
            session_file,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let store = HistoryStore::new(
                Arc::new(FileSessionStorage::new(session_file)),
                config.history.key,
            );
            store.clear()
        }
    }
}

async fn navigate(scope: &mut SlideRoutes, paths: &[String]) -> SlideResult<()> {
    for path in paths {
        let state = scope.render(path)?;
        println!("{}", describe(&state));
        while let Some(token) = scope.next_exit().await {
            println!("  unmounted {token}");
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> SlideResult<Config> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn build_registry(routes: &[String], redirects: &[(String, String)]) -> SlideResult<RouteRegistry> {
    let views = routes.iter().map(|pattern| {
        let name = pattern.clone();
        View::concrete(pattern.as_str(), move |params| {
            let mut params: Vec<_> = params.iter().collect();
            params.sort();
            let params = params
                .into_iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(",");
            if params.is_empty() {
                name.clone()
            } else {
                format!("{name} [{params}]")
            }
        })
    });
    let redirects = redirects
        .iter()
        .map(|(from, to)| View::redirect(from.as_str(), to.as_str()));

    RouteRegistry::builder().views(views).views(redirects).build()
}

fn describe(state: &RenderState) -> String {
    let views = state
        .views
        .iter()
        .map(describe_view)
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{} {} key={} rendered={} {}",
        state.path,
        state.direction.id(),
        state.transition_key,
        state.rendered.as_deref().unwrap_or("-"),
        views
    )
}

fn describe_view(view: &MountedView) -> String {
    if view.classes.is_empty() {
        format!("[{}]", view.token)
    } else {
        format!("[{} {}]", view.token, view.classes.join(" "))
    }
}

fn parse_redirect(raw: &str) -> Result<(String, String), String> {
    let Some((from, to)) = raw.split_once('=') else {
        return Err(SlideError::invalid_argument(format!("expected FROM=TO, got {raw}")).to_string());
    };
    if to.is_empty() {
        return Err(SlideError::invalid_argument(format!("redirect {from} has no target")).to_string());
    }
    Ok((from.to_string(), to.to_string()))
}

fn parse_direction(raw: &str) -> Result<Direction, String> {
    Direction::parse(raw).ok_or_else(|| format!("unknown direction: {raw}"))
}
