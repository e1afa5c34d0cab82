use std::io::Write;
use std::path::PathBuf;

use savefix::{
    fixed_output_path, load_save_file, write_fixed_save, Policy, PolicyRequest, RepairEngine,
    RepairEvent, RepairObserver, RepairProfile, RunResult, TracingObserver, WrittenSave,
};
use tracing::{error, info, warn};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const PROGRESS_STRIDE: usize = 64;
const PROGRESS_LINE_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub file: PathBuf,
    pub request: PolicyRequest,
    pub profile: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Help,
    Run(CliArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutcome {
    pub runs: Vec<(Policy, RunResult)>,
    pub written: Option<WrittenSave>,
}

impl CliOutcome {
    pub fn changed(&self) -> bool {
        self.runs.iter().any(|(_, result)| result.changed)
    }
}

/// Accepts `-key value` / `-flag` in any case, with one or two leading dashes.
pub fn parse_args(args: &[String]) -> Result<ParsedCommand, String> {
    let mut file = None;
    let mut profile = None;
    let mut output = None;
    let mut fix = false;
    let mut remove = false;

    let mut index = 0usize;
    while index < args.len() {
        let raw = &args[index];
        let Some(key) = raw.strip_prefix("--").or_else(|| raw.strip_prefix('-')) else {
            return Err(format!("unexpected argument '{raw}'"));
        };
        match key.to_ascii_lowercase().as_str() {
            "h" | "help" => return Ok(ParsedCommand::Help),
            "file" => {
                file = Some(PathBuf::from(option_value(args, index, "-file")?));
                index += 2;
            }
            "profile" => {
                profile = Some(PathBuf::from(option_value(args, index, "-profile")?));
                index += 2;
            }
            "output" => {
                output = Some(PathBuf::from(option_value(args, index, "-output")?));
                index += 2;
            }
            "fixdrones" => {
                fix = true;
                index += 1;
            }
            "removedrones" => {
                remove = true;
                index += 1;
            }
            _ => return Err(format!("unknown option '{raw}'")),
        }
    }

    let file = file.ok_or_else(|| "-file parameter is required".to_string())?;
    let request = match (fix, remove) {
        (true, true) => {
            return Err("-fixdrones and -removedrones cannot be used together".to_string())
        }
        (true, false) => PolicyRequest::FixOnly,
        (false, true) => PolicyRequest::RemoveOnly,
        (false, false) => {
            return Err(
                "no fixes specified; provide -fixdrones or -removedrones".to_string(),
            )
        }
    };

    Ok(ParsedCommand::Run(CliArgs {
        file,
        request,
        profile,
        output,
    }))
}

fn option_value<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, String> {
    match args.get(index + 1) {
        Some(value) if !value.starts_with('-') => Ok(value.as_str()),
        _ => Err(format!("missing value for {name}")),
    }
}

/// Loads the save, applies the requested policies in order and writes the
/// result next to the input when anything changed. The input is never
/// overwritten.
pub fn run(args: &CliArgs, observer: &mut dyn RepairObserver) -> Result<CliOutcome, String> {
    let profile = match &args.profile {
        Some(path) => RepairProfile::load(path).map_err(|error| error.to_string())?,
        None => RepairProfile::default(),
    };
    let engine = RepairEngine::new(profile).map_err(|error| error.to_string())?;
    info!(
        archetype = %engine.profile().archetype_path,
        fragment_prefix = %engine.profile().fragment_prefix,
        "repair_profile_ready"
    );

    info!(path = %args.file.display(), "loading_save_file");
    let mut save = load_save_file(&args.file).map_err(|error| error.to_string())?;

    let policies = args.request.policies();
    info!(fix_count = policies.len(), "applying_fixes");
    let mut runs = Vec::with_capacity(policies.len());
    for &policy in policies {
        match engine.apply_policy(&mut save.document, policy, observer) {
            Ok(result) => {
                if result.changed {
                    info!(policy = %policy, deleted = result.deleted, "fix_removed_entities");
                } else {
                    info!(policy = %policy, "fix_found_nothing_to_remove");
                }
                runs.push((policy, result));
            }
            Err(repair_error) => {
                error!(policy = %policy, error = %repair_error, "fix_failed");
            }
        }
    }

    let mut outcome = CliOutcome {
        runs,
        written: None,
    };
    if !outcome.changed() {
        warn!("no_changes_made_to_save_file");
        return Ok(outcome);
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| fixed_output_path(&args.file));
    let written = write_fixed_save(&args.file, &output_path, &save.document)
        .map_err(|error| error.to_string())?;
    info!(
        output = %written.path.display(),
        original = %args.file.display(),
        "fixed_save_written_original_preserved"
    );
    outcome.written = Some(written);
    Ok(outcome)
}

/// Draws a spinner line for scan progress and forwards every event to
/// tracing.
pub struct ConsoleProgress<W: Write> {
    out: W,
    spinner_index: usize,
    inner: TracingObserver,
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            spinner_index: 0,
            inner: TracingObserver,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn clear_line(&mut self) {
        let _ = write!(self.out, "\r{}\r", " ".repeat(PROGRESS_LINE_WIDTH));
        let _ = self.out.flush();
    }
}

impl<W: Write> RepairObserver for ConsoleProgress<W> {
    fn on_event(&mut self, event: &RepairEvent<'_>) {
        match *event {
            RepairEvent::ScanProgress { scanned, total }
                if scanned % PROGRESS_STRIDE == 0 || scanned == total =>
            {
                let spinner = SPINNER[self.spinner_index];
                self.spinner_index = (self.spinner_index + 1) % SPINNER.len();
                let _ = write!(self.out, "\rProcessing {scanned}/{total} entities {spinner}");
                let _ = self.out.flush();
            }
            RepairEvent::RunFinished { .. } => self.clear_line(),
            _ => {}
        }
        self.inner.on_event(event);
    }
}

pub fn usage_text() -> String {
    [
        "savefix - Star Rupture save file fixer",
        "",
        "Usage:",
        "  savefix -file <path-to-save-file> [-profile <profile.json>] [-output <path>] <fix-option>",
        "",
        "Fix options (exactly one):",
        "  -fixdrones        remove drones whose movement target no longer exists",
        "  -removedrones     remove all drones from the save file",
        "",
        "The original file is preserved; the fixed save is written with '_fixed'",
        "appended to the file name unless -output is given.",
        "Log verbosity follows RUST_LOG (default: info).",
    ]
    .join("\n")
}
