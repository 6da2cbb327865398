use poster_core::{
    ArtifactSink, AspectRatio, Compositor, DirectorySink, ExportConfig, ExportFormat,
    ExportRequest, LatLng, PosterDefaults, Radius, StillSurface, Viewport, generate_style,
    get_theme_by_id, themes::THEMES,
};

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, event};

#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Args {
    /// Log every pipeline step
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the map style document of a theme
    Style {
        #[arg(short, long, default_value = PosterDefaults::THEME)]
        theme: String,

        /// Write the style to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the viewport used for a location and radius
    Viewport {
        #[arg(long, default_value_t = PosterDefaults::LOCATION.lat, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, default_value_t = PosterDefaults::LOCATION.lng, allow_hyphen_values = true)]
        lng: f64,

        /// Radius in meters, 4000 to 20000 in steps of 500
        #[arg(short, long, default_value = "10000", value_parser = parse_radius)]
        radius: Radius,
    },

    /// Turn a captured map frame into a poster
    Export {
        /// Map frame rendered with the style and viewport of the poster (png, jpeg or webp)
        #[arg(short, long)]
        capture: PathBuf,

        #[arg(long, default_value = PosterDefaults::CITY)]
        city: String,

        #[arg(long, default_value = PosterDefaults::COUNTRY)]
        country: String,

        #[arg(long, default_value_t = PosterDefaults::LOCATION.lat, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, default_value_t = PosterDefaults::LOCATION.lng, allow_hyphen_values = true)]
        lng: f64,

        #[arg(short, long, default_value = PosterDefaults::THEME)]
        theme: String,

        #[arg(short, long, default_value_t = PosterDefaults::ASPECT_RATIO, value_enum)]
        ratio: AspectRatio,

        #[arg(short, long, default_value_t = PosterDefaults::FORMAT, value_enum)]
        format: ExportFormat,

        /// Leave the city, country and coordinates off the poster
        #[arg(long)]
        no_labels: bool,

        #[arg(short, long, default_value = "generated")]
        output_dir: PathBuf,

        /// Extra directory to load label fonts from
        #[arg(long)]
        font_dir: Vec<PathBuf>,

        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

fn parse_radius(value: &str) -> Result<Radius, String> {
    let meters: u32 = value.parse().map_err(|_| format!("not a number: {}", value))?;
    Radius::new(meters).map_err(|err| err.to_string())
}

fn check_location(lat: f64, lng: f64) -> anyhow::Result<LatLng> {
    let location = LatLng::new(lat, lng);
    if !location.is_valid() {
        bail!("Coordinates out of range: {}, {}", lat, lng);
    }
    Ok(location)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Style { theme, output } => {
            if !THEMES.iter().any(|known| known.id == theme) {
                event!(Level::WARN, "Unknown theme {}, using the default", theme);
            }

            let style = generate_style(get_theme_by_id(&theme));
            let json = style.to_json().context("Failed to serialize style")?;

            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    event!(Level::INFO, "Style {} saved to {}", style.name, path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Viewport { lat, lng, radius } => {
            let viewport = Viewport::from_radius(check_location(lat, lng)?, radius);

            println!(
                "{}",
                serde_json::to_string_pretty(&viewport).context("Failed to serialize viewport")?
            );
        }
        Command::Export {
            capture,
            city,
            country,
            lat,
            lng,
            theme,
            ratio,
            format,
            no_labels,
            output_dir,
            font_dir,
            timeout_secs,
        } => {
            let raster = fs::read(&capture)
                .with_context(|| format!("Failed to read {}", capture.display()))?;
            let surface = StillSurface::from_encoded(raster)?;

            let request = ExportRequest {
                city,
                country,
                location: check_location(lat, lng)?,
                theme: get_theme_by_id(&theme),
                show_labels: !no_labels,
                format,
                aspect_ratio: ratio,
            };

            let compositor = Compositor::new(ExportConfig {
                idle_timeout: Some(Duration::from_secs(timeout_secs)),
                paint_timeout: Some(Duration::from_secs(timeout_secs)),
                font_dirs: font_dir,
                ..ExportConfig::default()
            });

            let artifact = match compositor.export(Some(&surface), &request).await {
                Ok(artifact) => artifact,
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    return Err(err.into());
                }
            };

            let sink = DirectorySink::new(output_dir);
            sink.deliver(&artifact)?;

            println!("{}", sink.path_for(&artifact).display());
        }
    }

    Ok(())
}
