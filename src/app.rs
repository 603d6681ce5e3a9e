//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler, and
//! runs the chosen subcommand on the background worker.

use anyhow::{Result, anyhow, bail};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use text_encode_changer::cli::{Args, Command, ConvertArgs, PreviewArgs, ScanArgs};
use text_encode_changer::output as out;
use text_encode_changer::{
    BackgroundWorker, CONFIG_ENV, Config, ConvertRequest, FileDescriptor, JobHandle, JobOutcome,
    PreviewOutcome, ProgressEvent, SelectedFile, TextEncodeError, create_template_config,
    default_config_path, detect_file, load_config, preview, select_for_conversion, shutdown,
    validate_dirs, walk,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle config-only commands before logging init
    if matches!(args.command, Some(Command::InitConfig)) {
        return init_config();
    }

    let (mut cfg, loaded_from) = load_config().inspect_err(|e| {
        out::print_error(&format!("Failed to load config: {e:#}"));
    })?;
    args.apply_overrides(&mut cfg);

    if args.print_config {
        print_config(&cfg, loaded_from.as_deref());
        return Ok(());
    }
    let Some(command) = args.command.clone() else {
        bail!("no command given; try --help");
    };
    cfg.validate()?;

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json)
        .inspect_err(|e| out::print_error(&format!("Failed to initialize logging: {e}")))?;

    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping after the current file...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .map_err(|e| anyhow!("failed to install signal handler: {e}"))?;
    }

    debug!(?args, "starting text_encode_changer");
    if let Some(path) = &loaded_from {
        info!(config = %path.display(), "using config file");
    }

    let result = match &command {
        Command::Scan(a) => run_scan(&cfg, a),
        Command::Convert(a) => run_convert(&cfg, a),
        Command::Preview(a) => run_preview(a),
        Command::InitConfig => Ok(()),
    };
    if let Err(e) = &result {
        log_failure(e);
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn init_config() -> Result<()> {
    let path = default_config_path()?;
    if path.exists() {
        out::print_info(&format!("A config file already exists at: {}", path.display()));
        return Ok(());
    }
    create_template_config(&path)?;
    out::print_success(&format!("A template config was written to: {}", path.display()));
    out::print_info(&format!(
        "Edit it to change the default targets. To use a different location set {CONFIG_ENV}."
    ));
    Ok(())
}

fn print_config(cfg: &Config, loaded_from: Option<&Path>) {
    match (loaded_from, default_config_path()) {
        (Some(p), _) => out::print_info(&format!("Config file:\n  {}\n", p.display())),
        (None, Ok(p)) => out::print_info(&format!(
            "No config file at:\n  {}\nDefaults are in effect; run `init-config` to create one.\n",
            p.display()
        )),
        (None, Err(e)) => out::print_error(&format!("Could not determine a config path: {e}")),
    }
    out::print_user(&cfg.to_string());
}

/// Print progress at debug level until the job's progress channel closes, then
/// return the outcome.
fn wait_with_progress<T>(handle: JobHandle<T>) -> JobOutcome<T> {
    for event in handle.progress().iter() {
        match event {
            ProgressEvent::Title(t) => info!(phase = %t, "progress"),
            ProgressEvent::Message(m) => debug!(item = %m, "progress"),
        }
    }
    handle.wait()
}

fn walk_on(worker: &BackgroundWorker, cfg: &Config, dir: &Path) -> Result<JobOutcome<Vec<FileDescriptor>>> {
    let cond = cfg.search_condition(dir);
    let handle = worker.submit(move |cancel, progress| walk(&cond, cancel, progress))?;
    Ok(wait_with_progress(handle))
}

fn run_scan(cfg: &Config, a: &ScanArgs) -> Result<()> {
    let worker = BackgroundWorker::spawn()?;
    let (files, cancelled) = match walk_on(&worker, cfg, &a.walk.dir)? {
        JobOutcome::Completed(f) => (f, false),
        JobOutcome::Cancelled(f) => (f, true),
        JobOutcome::Failed(e) => return Err(e),
    };

    for fd in &files {
        let selected = fd.needs_conversion(cfg.target_encoding, cfg.target_term);
        out::print_row(selected, fd.encoding, fd.term, &fd.relative.display().to_string());
    }
    if cancelled {
        out::print_warn(&format!("Scan cancelled; {} file(s) listed", files.len()));
    }
    Ok(())
}

/// Files named with `--file`, matched against the walk result. Names that were
/// not found are reported and left out.
fn explicit_selection(files: &[FileDescriptor], wanted: &[PathBuf]) -> Vec<SelectedFile> {
    let mut selected = Vec::new();
    for w in wanted {
        match files.iter().find(|f| f.relative == *w) {
            Some(fd) => selected.push(SelectedFile::from(fd)),
            None => out::print_warn(&format!("Not found under the source directory: {}", w.display())),
        }
    }
    selected
}

fn run_convert(cfg: &Config, a: &ConvertArgs) -> Result<()> {
    let source = a.walk.dir.clone();
    validate_dirs(&source, a.dest.as_deref(), cfg.transfer_mode)?;

    let worker = BackgroundWorker::spawn()?;
    let files = match walk_on(&worker, cfg, &source)? {
        JobOutcome::Completed(f) => f,
        JobOutcome::Cancelled(f) => {
            out::print_warn(&format!("Scan cancelled after {} file(s); nothing converted", f.len()));
            return Ok(());
        }
        JobOutcome::Failed(e) => return Err(e),
    };

    let selection = if !a.file.is_empty() {
        explicit_selection(&files, &a.file)
    } else if a.all {
        files
            .iter()
            .filter(|f| f.encoding.is_some())
            .map(SelectedFile::from)
            .collect()
    } else {
        select_for_conversion(&files, cfg.target_encoding, cfg.target_term)
    };
    if selection.is_empty() {
        out::print_info("Nothing to convert.");
        return Ok(());
    }

    let request = ConvertRequest {
        source_dir: source,
        dest_dir: a.dest.clone(),
        transfer_mode: cfg.transfer_mode,
        overwrite_mode: cfg.overwrite_mode,
        target_encoding: cfg.target_encoding,
        target_term: cfg.target_term,
        files: selection,
    };
    let handle = worker.submit(move |cancel, progress| {
        text_encode_changer::convert_files(&request, cancel, progress)
    })?;

    let (summary, cancelled) = match wait_with_progress(handle) {
        JobOutcome::Completed(s) => (s, false),
        JobOutcome::Cancelled(s) => (s, true),
        JobOutcome::Failed(e) => return Err(e),
    };
    for p in &summary.converted {
        out::print_user(&p.display().to_string());
    }
    for p in &summary.skipped {
        out::print_warn(&format!("Skipped (destination exists): {}", p.display()));
    }
    for p in &summary.ignored {
        out::print_warn(&format!("Ignored (unknown encoding): {}", p.display()));
    }
    if cancelled {
        out::print_warn(&format!(
            "Conversion cancelled; {} file(s) converted",
            summary.converted_count()
        ));
    } else {
        out::print_success(&format!(
            "Converted {} file(s) to {} ({})",
            summary.converted_count(),
            cfg.target_encoding,
            cfg.target_term
        ));
    }
    Ok(())
}

fn run_preview(a: &PreviewArgs) -> Result<()> {
    let hint = match a.encoding {
        Some(e) => Some(e),
        None => detect_file(&a.file)?,
    };
    if hint.is_none() {
        warn!(path = %a.file.display(), fallback = %a.fallback, "encoding not detected; using fallback");
    }
    match preview(&a.file, hint, a.fallback)? {
        PreviewOutcome::Text { text, encoding, term } => {
            out::print_info(&format!("{} / {}", encoding, term));
            print!("{text}");
            if !text.is_empty() && !text.ends_with(['\n', '\r']) {
                println!();
            }
            Ok(())
        }
        PreviewOutcome::DecodeError { encoding, error } => {
            out::print_error(&format!("Cannot decode {} as {encoding}", a.file.display()));
            Err(error.into())
        }
    }
}

fn log_failure(e: &anyhow::Error) {
    match e.downcast_ref::<TextEncodeError>() {
        Some(te) => {
            let code = te.code();
            match te {
                TextEncodeError::BomMismatch { encoding } => {
                    error!(code, kind = "bom_mismatch", %encoding, error = %format!("{e:#}"), "Operation failed")
                }
                TextEncodeError::Malformed { encoding } => {
                    error!(code, kind = "malformed", %encoding, error = %format!("{e:#}"), "Operation failed")
                }
                TextEncodeError::Unmappable { encoding } => {
                    error!(code, kind = "unmappable", %encoding, error = %format!("{e:#}"), "Operation failed")
                }
                TextEncodeError::SourceNotFound(path) => {
                    error!(code, kind = "source_not_found", path = %path.display(), "Operation failed")
                }
                TextEncodeError::NotADirectory(path) => {
                    error!(code, kind = "not_a_directory", path = %path.display(), "Operation failed")
                }
            }
        }
        None => error!(error = %format!("{e:#}"), "Operation failed"),
    }
}
