pub mod commands;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use agenda_core::{AppConfig, Autoescape, ConfigOverrides, LoadOptions, LogFormat};
use anyhow::Context;
use clap::Parser;
use tracing::Level;

use commands::render::RenderArgs;
use commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "agenda",
    about = "Render a talk agenda from tab-separated submissions on stdin",
    long_about = "Reads a tab-separated talk submission sheet from standard input, maps its columns \
                  to talk fields, and renders the talks through a Tera template to standard output.",
    after_help = "Examples:\n  agenda agenda.md.tera < submissions.tsv\n  agenda --json < submissions.tsv"
)]
pub struct Cli {
    #[arg(
        value_name = "TEMPLATE",
        required_unless_present = "json",
        help = "Path to the template the talks are rendered through"
    )]
    pub template: Option<PathBuf>,
    #[arg(long, help = "Print the agenda document as JSON instead of rendering a template")]
    pub json: bool,
    #[arg(long, value_name = "PATH", help = "Read settings from this TOML file")]
    pub config: Option<PathBuf>,
    #[arg(long, value_name = "LEVEL", help = "Log level: trace|debug|info|warn|error")]
    pub log_level: Option<String>,
    #[arg(long, value_name = "FORMAT", help = "Log format: compact|pretty|json")]
    pub log_format: Option<LogFormat>,
    #[arg(long, value_name = "MODE", help = "HTML escaping: extension|always|never")]
    pub autoescape: Option<Autoescape>,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                log_level: self.log_level.clone(),
                log_format: self.log_format,
                autoescape: self.autoescape,
            },
        }
    }

    pub fn render_args(&self) -> RenderArgs {
        RenderArgs { template: self.template.clone(), json: self.json }
    }
}

pub fn init_logging(config: &AppConfig) {
    use LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.load_options()) {
        Ok(config) => config,
        Err(error) => {
            let result = CommandResult::from(&error);
            eprintln!("{}", result.message.unwrap_or_default());
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = commands::render::run(&cli.render_args(), &config, &mut io::stdin().lock());
    if !result.is_success() {
        return ExitCode::from(result.exit_code);
    }

    match write_output(&result.output) {
        Ok(()) => ExitCode::from(result.exit_code),
        Err(error) => {
            tracing::error!(event_name = "agenda.cli.write_failed", "{error:#}");
            ExitCode::from(commands::EXIT_FAILURE)
        }
    }
}

fn write_output(output: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes()).context("could not write rendered agenda to stdout")?;
    stdout.flush().context("could not flush stdout")?;
    Ok(())
}
