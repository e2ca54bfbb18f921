use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use territory_layout::{
    ExhaustionPolicy, FallbackPlacement, GridReference, LayoutConfig, LayoutEngine,
    PlacementRecorder, Strategy,
};

use crate::error::{CliError, Result};
use crate::input::{self, STDIN};
use crate::logging;
use crate::output::{LayoutReport, OutputFormat};

#[derive(Debug, Parser)]
#[command(
    name = "territory",
    about = "Weight-proportional, non-overlapping square territory layout",
    version
)]
pub struct Cli {
    /// Emit logs and errors as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lay out participants read from a JSON file or stdin.
    Layout(LayoutArgs),

    /// Print the effective configuration after file and flag overrides.
    Config(ConfigArgs),

    /// Print the available placement strategies.
    Strategies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExhaustionArg {
    FailFast,
    Drop,
}

impl From<ExhaustionArg> for ExhaustionPolicy {
    fn from(arg: ExhaustionArg) -> Self {
        match arg {
            ExhaustionArg::FailFast => Self::FailFast,
            ExhaustionArg::Drop => Self::DropParticipant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GridReferenceArg {
    First,
    Largest,
    Smallest,
}

impl From<GridReferenceArg> for GridReference {
    fn from(arg: GridReferenceArg) -> Self {
        match arg {
            GridReferenceArg::First => Self::First,
            GridReferenceArg::Largest => Self::Largest,
            GridReferenceArg::Smallest => Self::Smallest,
        }
    }
}

/// Configuration sources shared by `layout` and `config`.
///
/// Precedence: flags, then the input document's `config`, then `--config`,
/// then defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Placement strategy: grid, spiral or column_pack.
    #[arg(long, short)]
    pub strategy: Option<Strategy>,

    /// Minimum tile side length in cells.
    #[arg(long)]
    pub min_tile_size: Option<u32>,

    /// What spiral placement does with a participant it cannot fit.
    #[arg(long, value_enum)]
    pub exhaustion: Option<ExhaustionArg>,

    /// Fail instead of falling back to column packing.
    #[arg(long)]
    pub no_fallback: bool,

    /// Spiral angular step in degrees.
    #[arg(long)]
    pub angle_step: Option<f64>,

    /// Spiral ring spacing in cells.
    #[arg(long)]
    pub radius_step: Option<u32>,

    /// Largest spiral ring searched.
    #[arg(long)]
    pub max_radius: Option<u32>,

    /// Participant whose share sets the grid tile size.
    #[arg(long, value_enum)]
    pub grid_reference: Option<GridReferenceArg>,
}

impl ConfigOverrides {
    /// Resolve the effective configuration.
    ///
    /// `embedded` is the `config` object of the input document, if any. It
    /// replaces the `--config` file as a whole.
    pub fn resolve(&self, embedded: Option<LayoutConfig>) -> Result<LayoutConfig> {
        let mut config = match (&self.config, embedded) {
            (Some(path), Some(embedded)) => {
                tracing::warn!(
                    path = %path.display(),
                    "input document carries its own config; ignoring config file"
                );
                embedded
            }
            (None, Some(embedded)) => embedded,
            (Some(path), None) => input::load_config(path)?,
            (None, None) => LayoutConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(min) = self.min_tile_size {
            config.min_tile_size = min;
        }
        if let Some(exhaustion) = self.exhaustion {
            config.exhaustion = exhaustion.into();
        }
        if self.no_fallback {
            config.fallback = FallbackPlacement::Disabled;
        }
        if let Some(degrees) = self.angle_step {
            config.spiral.angle_step_degrees = degrees;
        }
        if let Some(step) = self.radius_step {
            config.spiral.radius_step = step;
        }
        if self.max_radius.is_some() {
            config.spiral.max_radius = self.max_radius;
        }
        if let Some(reference) = self.grid_reference {
            config.grid.reference = reference.into();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    /// Participants JSON file, or `-` for stdin.
    #[arg(long, short, default_value = STDIN)]
    pub input: PathBuf,

    /// Total cells available. Overrides the input's `capacity`.
    #[arg(long, short)]
    pub capacity: Option<u32>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Add world-space tile centers using this cell size.
    #[arg(long)]
    pub cell_size: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Re-check layout invariants before printing.
    #[arg(long)]
    pub verify: bool,

    /// Print a per-participant placement report to stderr.
    #[arg(long)]
    pub debug_report: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Parse arguments from the process environment.
pub fn parse_from_env() -> Cli {
    Cli::parse()
}

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_json);
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Layout(args) => run_layout(&args, &mut stdout),
        Commands::Config(args) => run_config(&args, &mut stdout),
        Commands::Strategies => {
            for strategy in Strategy::ALL {
                writeln!(stdout, "{strategy}").map_err(CliError::Write)?;
            }
            Ok(())
        }
    }
}

pub fn run_layout(args: &LayoutArgs, out: &mut impl Write) -> Result<()> {
    if let Some(cell_size) = args.cell_size
        && !(cell_size.is_finite() && cell_size > 0.0)
    {
        return Err(CliError::InvalidArgument(format!(
            "--cell-size must be a positive number, got {cell_size}"
        )));
    }

    let request = input::load_request(&args.input)?;
    let config = args.overrides.resolve(request.config.clone())?;
    let capacity = args
        .capacity
        .or(request.capacity)
        .ok_or(CliError::MissingCapacity)?;

    let recorder = PlacementRecorder::new();
    recorder.set_enabled(args.debug_report);
    let engine = LayoutEngine::new(config).with_recorder(recorder.clone());
    let outcome = engine.layout(&request.participants(), capacity);
    if args.debug_report {
        eprint!("{}", recorder.report());
    }
    let result = outcome?;

    if args.verify {
        result.verify(engine.config().min_tile_size)?;
    }

    let metadata = request.metadata();
    let report = LayoutReport::new(&result, args.cell_size, &metadata);
    let rendered = report.render(args.format)?;
    writeln!(out, "{rendered}").map_err(CliError::Write)
}

pub fn run_config(args: &ConfigArgs, out: &mut impl Write) -> Result<()> {
    let config = args.overrides.resolve(None)?;
    let rendered = serde_json::to_string_pretty(&config).map_err(CliError::Encode)?;
    writeln!(out, "{rendered}").map_err(CliError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn input_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write input");
        file
    }

    fn layout_args(input: &NamedTempFile) -> LayoutArgs {
        LayoutArgs {
            input: input.path().to_path_buf(),
            capacity: None,
            overrides: ConfigOverrides::default(),
            cell_size: None,
            format: OutputFormat::Json,
            verify: true,
            debug_report: false,
        }
    }

    fn run_json(args: &LayoutArgs) -> serde_json::Value {
        let mut out = Vec::new();
        run_layout(args, &mut out).expect("layout command succeeds");
        serde_json::from_slice(&out).expect("output is JSON")
    }

    #[test]
    fn parses_layout_flags() {
        let cli = Cli::try_parse_from([
            "territory",
            "layout",
            "--input",
            "people.json",
            "--capacity",
            "2500",
            "--strategy",
            "column-pack",
            "--exhaustion",
            "drop",
            "--no-fallback",
            "--format",
            "text",
            "--log-json",
        ])
        .expect("flags parse");
        assert!(cli.log_json);
        let Commands::Layout(args) = cli.command else {
            panic!("expected layout command");
        };
        assert_eq!(args.input, PathBuf::from("people.json"));
        assert_eq!(args.capacity, Some(2500));
        assert_eq!(args.overrides.strategy, Some(Strategy::ColumnPack));
        assert_eq!(args.overrides.exhaustion, Some(ExhaustionArg::Drop));
        assert!(args.overrides.no_fallback);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let err = Cli::try_parse_from(["territory", "layout", "--strategy", "hexagon"])
            .expect_err("unknown strategy");
        assert!(err.to_string().contains("hexagon"), "{err}");
    }

    #[test]
    fn layout_from_bare_array() {
        let file = input_file(r#"[{"id":"A","weight":0.7},{"id":"B","weight":0.3}]"#);
        let mut args = layout_args(&file);
        args.capacity = Some(100);
        args.overrides.strategy = Some(Strategy::ColumnPack);
        let json = run_json(&args);
        assert_eq!(json["tiles"][0]["id"], "A");
        assert_eq!(json["tiles"][0]["width"], 8);
        assert_eq!(json["tiles"][1]["width"], 5);
        assert_eq!(json["strategy"], "column_pack");
    }

    #[test]
    fn request_document_supplies_capacity_and_config() {
        let file = input_file(
            r#"{"capacity": 2500,
                "participants": [{"id": "solo", "weight": 1.0, "metadata": {"name": "Solo"}}],
                "config": {"strategy": "grid"}}"#,
        );
        let mut args = layout_args(&file);
        args.cell_size = Some(1.5);
        let json = run_json(&args);
        let tile = &json["tiles"][0];
        assert_eq!(tile["x"], -25);
        assert_eq!(tile["width"], 50);
        assert_eq!(tile["metadata"]["name"], "Solo");
        assert_eq!(tile["world"]["x"], 0.0);
        assert_eq!(json["strategy"], "grid");
    }

    #[test]
    fn capacity_flag_overrides_document() {
        let file = input_file(r#"{"capacity": 9, "participants": [{"id": "a", "weight": 1.0}]}"#);
        let mut args = layout_args(&file);
        args.capacity = Some(400);
        let json = run_json(&args);
        assert_eq!(json["tiles"][0]["width"], 20);
    }

    #[test]
    fn missing_capacity_is_an_input_error() {
        let file = input_file(r#"[{"id":"a","weight":1.0}]"#);
        let err = run_layout(&layout_args(&file), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::MissingCapacity));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn capacity_exceeded_maps_to_layout_exit_code() {
        let file = input_file(
            r#"{"capacity": 9, "participants": [
                {"id": "a", "weight": 1.0}, {"id": "b", "weight": 1.0}, {"id": "c", "weight": 1.0}
            ]}"#,
        );
        let err = run_layout(&layout_args(&file), &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), "capacity_exceeded");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn no_fallback_surfaces_exhaustion() {
        let file = input_file(
            r#"{"capacity": 400, "participants": [{"id": "a", "weight": 1.0}, {"id": "b", "weight": 1.0}]}"#,
        );
        let mut args = layout_args(&file);
        args.overrides.strategy = Some(Strategy::Spiral);
        args.overrides.max_radius = Some(0);
        args.overrides.no_fallback = true;
        let err = run_layout(&args, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), "placement_exhausted");

        args.overrides.no_fallback = false;
        let json = run_json(&args);
        assert_eq!(json["strategy"], "column_pack");
        assert_eq!(json["fallback"]["requested"], "spiral");
        assert_eq!(json["fallback"]["cause"]["error"], "placement_exhausted");
    }

    #[test]
    fn invalid_cell_size_is_rejected_before_reading_input() {
        let file = input_file("not json");
        let mut args = layout_args(&file);
        args.cell_size = Some(-1.0);
        let err = run_layout(&args, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn config_file_then_flags() {
        let config = input_file(r#"{"min_tile_size": 5, "strategy": "grid"}"#);
        let args = ConfigArgs {
            overrides: ConfigOverrides {
                config: Some(config.path().to_path_buf()),
                strategy: Some(Strategy::Spiral),
                radius_step: Some(4),
                grid_reference: Some(GridReferenceArg::First),
                ..ConfigOverrides::default()
            },
        };
        let mut out = Vec::new();
        run_config(&args, &mut out).expect("config command succeeds");
        let resolved: LayoutConfig = serde_json::from_slice(&out).expect("config JSON");
        assert_eq!(resolved.min_tile_size, 5);
        assert_eq!(resolved.strategy, Strategy::Spiral);
        assert_eq!(resolved.spiral.radius_step, 4);
        assert_eq!(resolved.grid.reference, GridReference::First);
    }

    #[test]
    fn invalid_override_fails_validation() {
        let overrides = ConfigOverrides {
            radius_step: Some(0),
            ..ConfigOverrides::default()
        };
        let err = overrides.resolve(None).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(err.exit_code(), 2);
    }
}
