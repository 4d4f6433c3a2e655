use std::io::{self, Read};
use std::path::PathBuf;

use agenda_core::{Agenda, AgendaError, AgendaTemplate, AppConfig, TracingSink};
use tracing::{error, info};

use super::CommandResult;

/// Without a template, or with `json` set, the agenda is printed as JSON.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    pub template: Option<PathBuf>,
    pub json: bool,
}

/// Converts the sheet on `input` and returns the document to print.
///
/// The template is loaded before `input` is touched, so an unreadable
/// template fails without consuming stdin.
pub fn run(args: &RenderArgs, config: &AppConfig, input: &mut dyn Read) -> CommandResult {
    match execute(args, config, input) {
        Ok(output) => CommandResult::success(output),
        Err(err) => {
            error!(event_name = "agenda.cli.failed", error_class = err.error_class(), "{err}");
            CommandResult::from(&err)
        }
    }
}

fn execute(
    args: &RenderArgs,
    config: &AppConfig,
    input: &mut dyn Read,
) -> Result<String, AgendaError> {
    let template = match (&args.template, args.json) {
        (Some(path), false) => Some(AgendaTemplate::from_file(path, config.render.autoescape)?),
        _ => None,
    };

    let raw = io::read_to_string(input)?;
    let mut sink = TracingSink::new();
    let agenda = Agenda::from_tsv(&raw, &mut sink)?;

    let mut output = match template {
        Some(template) => template.render(&agenda)?,
        None => agenda.to_json_pretty()?,
    };
    if config.render.trailing_newline && !output.ends_with('\n') {
        output.push('\n');
    }

    info!(
        event_name = "agenda.cli.rendered",
        talks = agenda.talks.len(),
        warnings = sink.warning_count(),
        "agenda rendered"
    );
    Ok(output)
}
