use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use gallery::{GalleryController, Key, Size};
use shared::{domain::FileInput, itinerary};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_database_url};

#[derive(Parser, Debug)]
#[command(name = "tripbook", about = "Trip itinerary with a persistent photo and video gallery")]
struct Cli {
    #[arg(long, default_value = "tripbook.toml")]
    config: PathBuf,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    capacity: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the day-by-day plan.
    Itinerary {
        #[arg(long)]
        day: Option<u8>,
        #[arg(long)]
        json: bool,
    },
    /// List gallery items in display order.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add photos or videos to the gallery.
    Add { paths: Vec<PathBuf> },
    /// Remove a gallery item by id.
    Remove { id: String },
    /// Open the viewer at an index and replay key presses.
    View {
        index: usize,
        #[arg(long, value_delimiter = ',')]
        keys: Vec<Key>,
        #[arg(long, default_value_t = 1280)]
        width: u32,
        #[arg(long, default_value_t = 800)]
        height: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config);
    init_tracing(&settings.log_filter);

    if let Command::Itinerary { day, json } = &cli.command {
        return print_itinerary(*day, *json);
    }

    let database_url =
        normalize_database_url(cli.database_url.as_deref().unwrap_or(&settings.database_url));
    let capacity = cli.capacity.unwrap_or(settings.capacity);
    let mut gallery = GalleryController::start(&database_url, capacity).await;

    match cli.command {
        Command::Itinerary { .. } => {}
        Command::List { json } => {
            if json {
                let listed = render::listed_items(&gallery);
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                print!("{}", render::render_gallery(&gallery));
            }
        }
        Command::Add { paths } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                match read_file_input(path).await {
                    Ok(file) => files.push(file),
                    Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable file"),
                }
            }
            let report = gallery.ingest(files);
            println!("{}", serde_json::to_string(&report)?);
            println!("{} / {} items", gallery.len(), gallery.capacity());
        }
        Command::Remove { id } => {
            if gallery.remove(&shared::domain::MediaId(id.clone())) {
                println!("removed {id}");
            } else {
                println!("no item with id {id}");
            }
        }
        Command::View {
            index,
            keys,
            width,
            height,
        } => {
            let viewport = Size::new(width, height);
            if !gallery.open_viewer(index) {
                bail!("no item at index {index} ({} items)", gallery.len());
            }
            print_slide(&gallery, viewport);
            for key in keys {
                gallery.handle_key(key);
                print_slide(&gallery, viewport);
                if !gallery.viewer().is_open() {
                    break;
                }
            }
        }
    }

    gallery.flush().await;
    if gallery.failed_writes() > 0 {
        warn!(failed = gallery.failed_writes(), "some changes were not persisted");
    }
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_itinerary(day: Option<u8>, json: bool) -> Result<()> {
    let days = match day {
        Some(number) => {
            let Some(found) = itinerary::day(number) else {
                bail!("no day {number} in the itinerary");
            };
            std::slice::from_ref(found)
        }
        None => itinerary::ITINERARY,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(days)?);
    } else {
        let highlights = if day.is_some() {
            &[][..]
        } else {
            itinerary::HIGHLIGHTS
        };
        print!("{}", render::render_itinerary(days, highlights));
    }
    Ok(())
}

fn print_slide(gallery: &GalleryController, viewport: Size) {
    match gallery.current_slide(viewport) {
        Some(slide) => println!("{}", render::render_slide(&slide)),
        None => println!("viewer closed"),
    }
}

async fn read_file_input(path: &Path) -> Result<FileInput> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("failed to stat '{}'", path.display()))?;
    let last_modified = metadata
        .modified()
        .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
        .unwrap_or_default();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default();

    info!(name = %name, mime_type = %mime_type, bytes = bytes.len(), "read file");
    Ok(FileInput::new(name, mime_type, last_modified, bytes))
}
