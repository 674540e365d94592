use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use dartbind::binding::{
    render_swift_calls, run_ffigen, validate, HostProps, ParsedBindings, SwiftInjector,
    YamlConfig,
};
use dartbind::config::{BuildConfig, CONFIG_FILE};
use dartbind::error::{BindingError, Result};
use dartbind::logging::{self, LogFormat, LogLevel};
use dartbind::runtime::Runtime;
use dartbind::stage::{BindingUnit, StageRegistry};

#[derive(Parser)]
#[command(name = "dartbind", about = "Post-process cbindgen headers into Dart bindings")]
struct Cli {
    /// Build config, defaults to ./dartbind.yaml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output, repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Worker threads for batch commands.
    #[arg(long, global = true)]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Dart extensions embedded in a header.
    Extract { header: PathBuf },
    /// Validate the accessor surface of one or more headers.
    Check {
        #[arg(required = true)]
        headers: Vec<PathBuf>,
    },
    /// Render the Swift dummy calls for a header.
    Swift {
        header: PathBuf,
        /// Write the calls into the plugin's Swift sources.
        #[arg(long)]
        inject: bool,
    },
    /// Print the ffigen config for the configured project.
    FfigenConfig {
        /// Run `dart run ffigen` with it instead of printing it.
        #[arg(long)]
        run: bool,
    },
    /// Write the generated header and Dart module into the project.
    Generate,
}

fn parse_log_format(s: &str) -> std::result::Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| format!("unknown log format '{}'", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "dartbind failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::discover(Path::new("."))?,
    };
    if let Some(workers) = cli.workers {
        config.worker_count = Some(workers);
    }

    let level: LogLevel = config.log.level.raised_by(cli.verbose);
    logging::init(level, cli.log_format.unwrap_or(config.log.format));
    info!(config = CONFIG_FILE, root = %config.project_root.display(), "starting");

    match cli.command {
        Command::Extract { header } => {
            let bindings = parse_header(&header)?;
            println!("{}", bindings.dart_code());
            Ok(())
        }
        Command::Check { headers } => check(&config, headers),
        Command::Swift { header, inject } => {
            let bindings = parse_header(&header)?;
            let code = render_swift_calls(&bindings);
            if inject {
                let project = config.project();
                let files = SwiftInjector { project: &project }.inject(&config.project_root, &code)?;
                info!(files = files.len(), "injected swift dummy calls");
            } else {
                println!("{}", code);
            }
            Ok(())
        }
        Command::FfigenConfig { run } => ffigen(&config, run),
        Command::Generate => generate(&config),
    }
}

fn read_header(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| BindingError::io(path, e))
}

fn parse_header(path: &Path) -> Result<ParsedBindings> {
    ParsedBindings::parse(&read_header(path)?)
}

fn load_units(paths: &[PathBuf]) -> Result<Vec<BindingUnit>> {
    paths
        .iter()
        .map(|path| Ok(BindingUnit::new(path.display().to_string(), read_header(path)?)))
        .collect()
}

fn check(config: &BuildConfig, headers: Vec<PathBuf>) -> Result<()> {
    let mut runtime = Runtime::with_registry(
        config.runtime_config(),
        StageRegistry::with_dart_settings(config.dart_settings()),
    )?;
    runtime.add_units(load_units(&headers)?);
    runtime.run_parallel()?;

    for unit in runtime.take_completed() {
        let structs: Vec<String> = unit
            .accessors
            .iter()
            .map(|s| format!("{}({})", s.struct_name, s.accessors.len()))
            .collect();
        println!("ok      {}  {}", unit.name, structs.join(" "));
    }

    let failed = runtime.take_failed();
    for unit in &failed {
        println!(
            "failed  {}  {}",
            unit.name,
            unit.error.as_deref().unwrap_or_default()
        );
    }
    if failed.is_empty() {
        Ok(())
    } else {
        Err(BindingError::Config(format!("{} header(s) failed validation", failed.len())))
    }
}

/// The single header a project build works from.
fn project_header(config: &BuildConfig) -> Result<PathBuf> {
    match config.header_paths().as_slice() {
        [header] => Ok(header.clone()),
        [] => Err(BindingError::Config("no 'headers' configured".to_string())),
        _ => Err(BindingError::Config(
            "a project build takes exactly one header".to_string(),
        )),
    }
}

fn ffigen(config: &BuildConfig, run: bool) -> Result<()> {
    let bindings = parse_header(&project_header(config)?)?;
    validate(&bindings)?;

    let project = config.project();
    let yaml = YamlConfig::new(
        &project,
        &HostProps::current()?,
        &config.project_root,
        &bindings.structs,
    );
    if !run {
        println!("{}", yaml.render()?);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(BindingError::Worker)?;
    runtime.block_on(run_ffigen(
        &yaml,
        &config.project_root,
        Duration::from_secs(config.ffigen_timeout),
    ))
}

fn generate(config: &BuildConfig) -> Result<()> {
    let header = project_header(config)?;
    let mut runtime = Runtime::with_registry(
        config.runtime_config(),
        StageRegistry::with_dart_settings(config.dart_settings()),
    )?;
    runtime.add_units(load_units(std::slice::from_ref(&header))?);
    runtime.run_sync();

    if let Some(unit) = runtime.take_failed().into_iter().next() {
        return Err(BindingError::Config(format!(
            "{}: {}",
            unit.name,
            unit.error.unwrap_or_default()
        )));
    }
    let Some(unit) = runtime.take_completed().into_iter().next() else {
        return Err(BindingError::Config("run was cancelled".to_string()));
    };

    let project = config.project();
    let root = &config.project_root;
    for path in project.paths_to_generated_c_bindings(root) {
        write_file(&path, &unit.header)?;
    }
    if let Some(dart) = &unit.dart {
        write_file(&project.path_to_generated_rid(root), dart)?;
    }
    if let Some(swift) = &unit.swift {
        SwiftInjector { project: &project }.inject(root, swift)?;
    }

    info!(header = %header.display(), "generated bindings");
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| BindingError::io(dir, e))?;
    }
    fs::write(path, content).map_err(|e| BindingError::io(path, e))
}
