//! CornerGlow CLI
//!
//! Opens the gradient window, or renders and exports wallpapers headlessly.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;

use cornerglow::color::{
    random_corner_colors, Color, ColorFormat, HueSpec, Luminosity, RandomColor, RandomSeed,
};
use cornerglow::config::{load_app_config, load_app_config_from, AppConfig};
use cornerglow::gradient::GradientSpan;
use cornerglow::storage::{write_artifact, ExportStorage};
use cornerglow::surface::ImageKind;
use cornerglow::{logging, ExportOutcome, GradientShell};

const FALLBACK_EXPORT_SIZE: (u32, u32) = (1920, 1080);

#[derive(Parser)]
#[command(name = "cornerglow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Four-corner gradient wallpaper generator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of $XDG_CONFIG_HOME/cornerglow/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a gradient and export it as an image
    Export {
        /// Export width in pixels, clamped to 1-16384
        #[arg(long)]
        width: Option<i64>,

        /// Export height in pixels, clamped to 1-16384
        #[arg(long)]
        height: Option<i64>,

        /// Image format (jpeg, png)
        #[arg(short, long)]
        format: Option<ImageKind>,

        /// JPEG quality, 1-100
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// Blend span (inclusive reaches the far corners, half-open stops one pixel short)
        #[arg(long)]
        span: Option<GradientSpan>,

        /// Corner colors as #RRGGBB in order top-left,top-right,bottom-left,bottom-right
        #[arg(long, value_delimiter = ',')]
        colors: Option<Vec<Color>>,

        #[command(flatten)]
        random: RandomArgs,

        /// Output file; defaults to a timestamped file in the output directory
        #[arg(short, long, conflicts_with = "data_url")]
        output: Option<PathBuf>,

        /// Print the data URL instead of writing a file
        #[arg(long)]
        data_url: bool,
    },

    /// Print random colors
    Random {
        /// Output format (hex, rgb, rgba, hsl, hsla, rgbArray, hslArray, hsvArray)
        #[arg(short, long, default_value = "hex")]
        format: ColorFormat,

        /// Number of colors
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        #[command(flatten)]
        random: RandomArgs,
    },
}

#[derive(Args)]
struct RandomArgs {
    /// Seed for reproducible colors (integer or text)
    #[arg(long)]
    seed: Option<RandomSeed>,

    /// Hue constraint: degrees, a color name or #RRGGBB
    #[arg(long)]
    hue: Option<HueSpec>,

    /// Luminosity (bright, light, dark, random)
    #[arg(long)]
    luminosity: Option<Luminosity>,
}

impl RandomArgs {
    /// Command-line values override the config file.
    fn resolve(self, config: &AppConfig) -> (RandomColor, StdRng) {
        let mut random = config.random.clone();
        random.seed = self.seed.or(random.seed);
        random.hue = self.hue.or(random.hue);
        random.luminosity = self.luminosity.or(random.luminosity);
        (random.source(), random.rng())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_app_config_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => load_app_config(),
    };

    match cli.command {
        None => run_gui(config),
        Some(Commands::Export {
            width,
            height,
            format,
            quality,
            span,
            colors,
            random,
            output,
            data_url,
        }) => {
            let mut settings = config.export.settings();
            settings.kind = format.unwrap_or(settings.kind);
            settings.jpeg_quality = quality.unwrap_or(settings.jpeg_quality);

            let (source, mut rng) = random.resolve(&config);
            let corners = match colors {
                Some(colors) => <[Color; 4]>::try_from(colors)
                    .map_err(|colors| anyhow::anyhow!("expected 4 colors, got {}", colors.len()))?,
                None => random_corner_colors(&source, &mut rng),
            };

            let (default_width, default_height) = FALLBACK_EXPORT_SIZE;
            let width = width.unwrap_or_else(|| {
                i64::from(config.export.width.unwrap_or(default_width))
            });
            let height = height.unwrap_or_else(|| {
                i64::from(config.export.height.unwrap_or(default_height))
            });

            let span = span.unwrap_or(config.export.span);
            let mut shell = GradientShell::new(corners, settings).with_span(span);
            shell.open_export_modal()?;
            shell.set_export_width(width);
            shell.set_export_height(height);

            let request = shell.begin_export()?;
            if shell.complete_export(request)? != ExportOutcome::Completed {
                bail!("export was discarded");
            }
            let artifact = shell
                .artifact()
                .context("export finished without an artifact")?;

            if data_url {
                println!("{}", artifact.data_url);
                return Ok(());
            }

            let path = match output {
                Some(path) => {
                    write_artifact(artifact, &path)?;
                    path
                }
                None => ExportStorage::from_output_dir(config.output_dir.as_deref())?
                    .save_artifact(artifact)?,
            };
            println!("{}", path.display());
            Ok(())
        }
        Some(Commands::Random {
            format,
            count,
            random,
        }) => {
            let (source, mut rng) = random.resolve(&config);
            for _ in 0..count {
                println!("{}", source.generate(format, &mut rng));
            }
            Ok(())
        }
    }
}

#[cfg(feature = "gui")]
fn run_gui(config: AppConfig) -> Result<()> {
    cornerglow::run(config)?;
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn run_gui(_config: AppConfig) -> Result<()> {
    bail!("built without the `gui` feature; use `cornerglow export` or `cornerglow random`")
}
