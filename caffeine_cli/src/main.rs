use caffeine_core::export::{self, ExportFormat};
use caffeine_core::format::{format_clock_12h, format_duration, format_time_label, summary};
use caffeine_core::*;
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "caffeine")]
#[command(about = "Caffeine concentration curve and bedtime estimator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Custom drink as HH:mm,MG[,MINUTES] (repeatable)
    #[arg(long = "drink", value_name = "HH:mm,MG[,MIN]", global = true)]
    drinks: Vec<String>,

    /// Preset drink as ID@HH:mm[,MINUTES] (repeatable, see `presets`)
    #[arg(long = "preset", value_name = "ID@HH:mm[,MIN]", global = true)]
    presets: Vec<String>,

    /// JSON file holding an array of drink events
    #[arg(long, global = true)]
    drinks_file: Option<PathBuf>,

    /// Body weight in pounds (100-300)
    #[arg(long, global = true)]
    weight: Option<u32>,

    /// Caffeine sensitivity, 1 (very tolerant) to 5 (very sensitive)
    #[arg(long, global = true, conflicts_with = "half_life")]
    sensitivity: Option<u8>,

    /// Elimination half-life in hours, instead of a sensitivity level
    #[arg(long, global = true)]
    half_life: Option<f64>,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample the caffeine curve and estimate the earliest bedtime (default)
    Curve {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write the curve to a file instead of stdout (format from extension)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Total caffeine at one time of day (defaults to now)
    At {
        /// Time of day as HH:mm
        time: Option<String>,
    },

    /// List the built-in drink presets
    Presets,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn main() -> Result<()> {
    // Initialize logging
    caffeine_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match &cli.command {
        Some(Commands::Curve { format, output }) => {
            cmd_curve(&cli, &config, *format, output.as_deref())
        }
        Some(Commands::At { time }) => cmd_at(&cli, &config, time.as_deref()),
        Some(Commands::Presets) => cmd_presets(),
        None => {
            // Default to "curve" command
            cmd_curve(&cli, &config, OutputFormat::Table, None)
        }
    }
}

fn cmd_curve(
    cli: &Cli,
    config: &Config,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let drinks = collect_drinks(cli)?;
    let params = sample_parameters(cli, config)?;

    let curve = generate_curve_with(&drinks, &params, &config.curve, &config.model)?;

    if let Some(path) = output {
        let export_format = match format {
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Table => ExportFormat::from_path(path).ok_or_else(|| {
                Error::Validation(format!(
                    "cannot infer export format from {:?}; use --format csv or json",
                    path
                ))
            })?,
        };
        export::export_to_path(&curve, export_format, path)?;
        println!("✓ Wrote {} samples to {}", curve.samples.len(), path.display());
        return Ok(());
    }

    match format {
        OutputFormat::Csv => export::write_csv(&curve, io::stdout().lock())?,
        OutputFormat::Json => export::write_json(&curve, io::stdout().lock())?,
        OutputFormat::Table => display_curve(&curve, &drinks, &params, config),
    }

    Ok(())
}

fn cmd_at(cli: &Cli, config: &Config, time: Option<&str>) -> Result<()> {
    let drinks = collect_drinks(cli)?;
    let params = sample_parameters(cli, config)?;

    let observation: ClockTime = match time {
        Some(t) => t.parse()?,
        None => chrono::Local::now().format("%H:%M").to_string().parse()?,
    };

    let total = compute_concentration_with(observation, &drinks, &params, &config.model)?;

    println!(
        "{:.0} mg of caffeine at {}",
        total,
        format_clock_12h(observation)
    );
    if total < config.curve.threshold_mg {
        println!("  Below the {} mg sleep threshold", config.curve.threshold_mg);
    }
    Ok(())
}

fn cmd_presets() -> Result<()> {
    let catalog = get_default_presets();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Preset catalog errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid preset catalog".into()));
    }

    for preset in catalog.by_caffeine() {
        println!(
            "  {:<16} {:>5.0} mg  {}",
            preset.id, preset.caffeine_mg, preset.label
        );
    }
    Ok(())
}

/// Gather drink events from --drink, --preset and --drinks-file, in that order.
fn collect_drinks(cli: &Cli) -> Result<Vec<DrinkEvent>> {
    let mut events = Vec::new();

    for spec in &cli.drinks {
        events.push(parse_custom_drink(spec)?.to_event()?);
    }
    for spec in &cli.presets {
        events.push(parse_preset_drink(spec)?.to_event()?);
    }
    if let Some(path) = &cli.drinks_file {
        let contents = std::fs::read_to_string(path)?;
        let from_file: Vec<DrinkEvent> = serde_json::from_str(&contents)?;
        tracing::info!("Loaded {} drinks from {:?}", from_file.len(), path);
        events.extend(from_file);
    }

    Ok(events)
}

/// Parse `HH:mm,MG[,MINUTES]`
fn parse_custom_drink(spec: &str) -> Result<Drink> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    let (time, mg, minutes) = match parts.as_slice() {
        [time, mg] => (*time, *mg, None),
        [time, mg, minutes] => (*time, *mg, Some(*minutes)),
        _ => {
            return Err(Error::Validation(format!(
                "drink {:?} must look like HH:mm,MG[,MINUTES]",
                spec
            )))
        }
    };

    let caffeine_mg: f64 = mg
        .parse()
        .map_err(|_| Error::Validation(format!("invalid caffeine amount {:?}", mg)))?;
    Drink::new("Custom", caffeine_mg, time.parse()?, parse_minutes(minutes)?)
}

/// Parse `ID@HH:mm[,MINUTES]`
fn parse_preset_drink(spec: &str) -> Result<Drink> {
    let (id, rest) = spec.split_once('@').ok_or_else(|| {
        Error::Validation(format!("preset {:?} must look like ID@HH:mm[,MINUTES]", spec))
    })?;
    let preset = find_preset(id.trim())
        .ok_or_else(|| Error::Validation(format!("unknown preset '{}'", id.trim())))?;

    let (time, minutes) = match rest.split_once(',') {
        Some((time, minutes)) => (time.trim(), Some(minutes.trim())),
        None => (rest.trim(), None),
    };

    Drink::from_preset(preset, time.parse()?, parse_minutes(minutes)?)
}

fn parse_minutes(minutes: Option<&str>) -> Result<u32> {
    match minutes {
        Some(m) => m
            .parse()
            .map_err(|_| Error::Validation(format!("invalid duration in minutes {:?}", m))),
        None => Ok(MIN_DRINK_DURATION_MIN),
    }
}

/// Resolve half-life and weight from flags, falling back to the config profile.
fn sample_parameters(cli: &Cli, config: &Config) -> Result<SampleParameters> {
    let weight = match cli.weight {
        Some(lbs) => WeightLbs::new(lbs)?,
        None => config.profile.weight,
    };

    let half_life_hrs = match (cli.half_life, cli.sensitivity) {
        (Some(hours), _) => hours,
        (None, Some(level)) => Sensitivity::new(level)?.half_life_hrs(),
        (None, None) => config.profile.sensitivity.half_life_hrs(),
    };

    SampleParameters::new(half_life_hrs, f64::from(weight.lbs()))
}

fn display_curve(
    curve: &CurveResult,
    drinks: &[DrinkEvent],
    params: &SampleParameters,
    config: &Config,
) {
    if curve.is_empty() {
        println!("No drinks given. Add one with --drink HH:mm,MG or --preset ID@HH:mm");
        return;
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  CAFFEINE CURVE");
    println!("╰─────────────────────────────────────────╯");
    println!();

    for drink in drinks {
        let minutes = (drink.duration_hrs * 60.0).round() as u32;
        println!(
            "  ☕ {:>5.0} mg at {} over {}",
            drink.dose_mg,
            format_clock_12h(drink.start_time),
            format_duration(minutes)
        );
    }
    println!();

    let peak_time = curve.peak().map(|p| p.time);
    for sample in &curve.samples {
        let marker = if Some(sample.time) == curve.safe_time {
            "  ← safe to sleep"
        } else if Some(sample.time) == peak_time {
            "  ← peak"
        } else {
            ""
        };
        println!(
            "  {:<22} {:>5.0} mg{}",
            format_time_label(sample.time),
            sample.total_mg,
            marker
        );
    }

    println!();
    println!(
        "  {}",
        summary(curve, drinks.len(), params.weight_lbs, params.half_life_hrs)
    );
    if curve.safe_time.is_none() {
        println!(
            "  Caffeine never dropped below {} mg on a falling curve",
            config.curve.threshold_mg
        );
    }
    println!();
}
