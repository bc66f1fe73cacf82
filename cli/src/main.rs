mod args;
mod colors;
mod display;
mod json_output;
mod utils;

use clap::Parser;

use args::Args;
use colors::ColorScheme;
use soundpath_core::{ArtistInfo, Engine, EngineConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let colors = ColorScheme::new(!args.no_color);

    if let Err(message) = run(&args, &colors) {
        if args.json {
            eprintln!("{}", serde_json::json!({ "error": message }));
        } else {
            eprintln!("{}", colors.error(&format!("❌ Error: {message}")));
        }
        std::process::exit(1);
    }
}

fn run(args: &Args, colors: &ColorScheme) -> Result<(), String> {
    let config = match &args.data_path {
        Some(path) => EngineConfig::with_data_dir(path),
        None => EngineConfig::default(),
    };
    let engine = Engine::open(config).map_err(|error| format!("failed to initialize: {error}"))?;

    let from = match (&args.from, args.random) {
        (Some(name), _) => resolve_artist(&engine, name)?,
        (None, true) => engine
            .random_artist()
            .map_err(|error| error.to_string())?
            .ok_or_else(|| "the store holds no artists".to_owned())?,
        (None, false) => return Err("provide an artist name, or use --random".to_owned()),
    };

    match &args.to {
        Some(to_name) => {
            let to = resolve_artist(&engine, to_name)?;
            if args.verbose && !args.json {
                display::search_info(&from, Some(&to), args, colors);
            }

            let result = engine
                .find_path(from.id, to.id, args.algorithm(), &args.search_options())
                .map_err(|error| error.to_string())?;

            if args.json {
                let document = json_output::path_document(&from, &to, &result, args);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&document).map_err(|error| error.to_string())?
                );
            } else {
                display::path_result(&from, &to, &result, args, colors);
            }
        }
        None => {
            if args.verbose && !args.json {
                display::search_info(&from, None, args, colors);
            }

            let result = if args.reverse {
                engine.explore_reverse(from.id, args.algorithm(), &args.search_options())
            } else {
                engine.explore_forward(from.id, args.algorithm(), &args.search_options())
            }
            .map_err(|error| error.to_string())?;

            if args.json {
                let document = json_output::explore_document(&result, args);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&document).map_err(|error| error.to_string())?
                );
            } else {
                display::explore_result(&result, args, colors);
            }
        }
    }

    Ok(())
}

fn resolve_artist(engine: &Engine, name: &str) -> Result<ArtistInfo, String> {
    let mut matches = engine
        .resolve_exact(name)
        .map_err(|error| error.to_string())?;
    if !matches.is_empty() {
        // Several artists can share a normalized name; prefer the one whose
        // display form matches the query as typed.
        if let Some(position) = matches.iter().position(|artist| artist.name == name) {
            return Ok(matches.swap_remove(position));
        }
        return Ok(matches.swap_remove(0));
    }

    let suggestions = engine
        .resolve_name(name, 5)
        .map_err(|error| error.to_string())?;
    if suggestions.is_empty() {
        Err(format!("Artist '{name}' not found in database"))
    } else {
        let closest = suggestions
            .iter()
            .map(|artist| format!("\"{}\"", artist.name))
            .collect::<Vec<_>>()
            .join(", ");
        Err(format!(
            "Artist '{name}' not found in database. Closest matches: {closest}"
        ))
    }
}
