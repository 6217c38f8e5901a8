use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use decklist_core::{Deck, RarityIndex};
use decklist_cv::{
    CalibrationSweep, MatchConfig, Region, TemplateCategory, TemplateLoader, TemplateMatcher,
    TemplateStore,
};
use decklist_importer::ImporterConfig;
use image::GrayImage;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "decklist-importer")]
#[command(about = "Template matching tools for the deck importer")]
#[command(version)]
struct Cli {
    /// Importer configuration (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best match of a template in a screenshot.
    Locate {
        #[arg(long)]
        frame: PathBuf,

        /// Directory holding the `images` and `locations` template folders.
        #[arg(long)]
        templates: PathBuf,

        #[arg(long)]
        name: String,

        /// Look the template up among location templates.
        #[arg(long)]
        location: bool,

        /// Restrict the search to `x,y,width,height`.
        #[arg(long)]
        region: Option<Region>,

        #[arg(long)]
        confidence: Option<f64>,
    },

    /// Find every occurrence of a template in a screenshot.
    LocateAll {
        #[arg(long)]
        frame: PathBuf,

        #[arg(long)]
        templates: PathBuf,

        #[arg(long)]
        name: String,

        #[arg(long)]
        region: Option<Region>,

        #[arg(long)]
        confidence: Option<f64>,
    },

    /// Sweep scales to find a custom scale for this screen.
    Calibrate {
        #[arg(long)]
        frame: PathBuf,

        #[arg(long)]
        templates: PathBuf,

        #[arg(long)]
        name: String,

        #[arg(long)]
        confidence: Option<f64>,
    },

    /// Check that every card of a decklist has a known rarity.
    Check {
        #[arg(long)]
        settings: PathBuf,

        #[arg(long)]
        cards: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ImporterConfig::load(path)?,
        None => ImporterConfig::default(),
    };

    match cli.command {
        Commands::Locate {
            frame,
            templates,
            name,
            location,
            region,
            confidence,
        } => {
            let category = if location {
                TemplateCategory::Location
            } else {
                TemplateCategory::Icon
            };
            run_locate(&config.matcher, &frame, &templates, &name, category, region, confidence)
        }
        Commands::LocateAll {
            frame,
            templates,
            name,
            region,
            confidence,
        } => run_locate_all(&config.matcher, &frame, &templates, &name, region, confidence),
        Commands::Calibrate {
            frame,
            templates,
            name,
            confidence,
        } => run_calibrate(config.matcher, &frame, &templates, &name, confidence),
        Commands::Check { settings, cards } => run_check(&settings, &cards),
    }
}

fn load_frame(path: &Path) -> Result<GrayImage> {
    let image = image::open(path).with_context(|| format!("Failed to open frame: {}", path.display()))?;
    Ok(image.to_luma8())
}

fn run_locate(
    config: &MatchConfig,
    frame_path: &Path,
    templates: &Path,
    name: &str,
    category: TemplateCategory,
    region: Option<Region>,
    confidence: Option<f64>,
) -> Result<()> {
    let frame = load_frame(frame_path)?;
    let template = TemplateLoader::new().add_template_dir(templates).get(name, category)?;
    let matcher = TemplateMatcher::new(config.clone());

    let confidence = confidence.unwrap_or(config.thresholds.single);
    let scales = matcher.scales_for(frame.width(), frame.height(), false);
    match matcher.find_in_frame(&frame, &template.image, region, confidence, &scales)? {
        Some(detection) => println!(
            "{} found at {} (score {:.3}, scale {})",
            name, detection.point, detection.score, detection.scale
        ),
        None => println!("{} not found", name),
    }

    Ok(())
}

fn run_locate_all(
    config: &MatchConfig,
    frame_path: &Path,
    templates: &Path,
    name: &str,
    region: Option<Region>,
    confidence: Option<f64>,
) -> Result<()> {
    let frame = load_frame(frame_path)?;
    let template = TemplateLoader::new()
        .add_template_dir(templates)
        .get(name, TemplateCategory::Icon)?;
    let matcher = TemplateMatcher::new(config.clone());

    let confidence = confidence.unwrap_or(config.thresholds.multi);
    let scales = matcher.scales_for(frame.width(), frame.height(), false);
    let points = matcher.find_all_in_frame(&frame, &template.image, region, confidence, &scales)?;

    println!("{} matches of {}", points.len(), name);
    for point in points {
        println!("  {}", point);
    }

    Ok(())
}

fn run_calibrate(
    mut config: MatchConfig,
    frame_path: &Path,
    templates: &Path,
    name: &str,
    confidence: Option<f64>,
) -> Result<()> {
    if let Some(confidence) = confidence {
        config.thresholds.single = confidence;
        config.thresholds.multi = config.thresholds.multi.min(confidence);
    }
    config.validate()?;

    let frame = load_frame(frame_path)?;
    let template = TemplateLoader::new()
        .add_template_dir(templates)
        .get(name, TemplateCategory::Icon)?;
    let matcher = TemplateMatcher::new(config);

    match matcher.calibrate(&frame, &template.image, &CalibrationSweep::default())? {
        Some(calibration) => {
            println!(
                "{} matched at scale {} at {} (score {:.3})",
                name, calibration.scale, calibration.point, calibration.score
            );
            let recommended: Vec<String> = calibration.recommended.iter().map(|s| s.to_string()).collect();
            println!("Recommended custom scales: {}", recommended.join(", "));
        }
        None => println!("{} did not match at any scale", name),
    }

    Ok(())
}

fn run_check(settings: &Path, cards: &Path) -> Result<()> {
    let deck = Deck::load(settings)?;
    let rarities = RarityIndex::load(cards)?;
    let problems = rarities.verify(&deck);

    println!(
        "{} main deck cards, {} extra deck cards, {} known rarities",
        deck.main.len(),
        deck.extra.len(),
        rarities.len()
    );

    if problems.is_empty() {
        println!("Every card has a known rarity");
        return Ok(());
    }

    for problem in &problems {
        println!("  {}", problem);
    }
    anyhow::bail!("{} cards cannot be imported", problems.len())
}
