//! Terminal logging.
//!
//! Commands print through the `log` facade. An `env_logger` logger does the
//! filtering and formatting; [`CapturingLogger`] wraps it to tee output to
//! `--logfile` and to keep every record in the [`DiagnosticLog`].

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{LevelFilter, Log, Metadata, Record};

use nx_content_lib::DiagnosticLog;

pub(crate) type SharedDiagnostics = Arc<Mutex<DiagnosticLog>>;

struct CapturingLogger {
    inner: env_logger::Logger,
    logfile: Option<Mutex<File>>,
    diagnostics: SharedDiagnostics,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.matches(record) {
            return;
        }
        self.inner.log(record);

        let message = strip_ansi_escapes::strip_str(record.args().to_string());
        if let Some(file) = &self.logfile
            && let Ok(mut file) = file.lock()
        {
            let _ = writeln!(file, "{message}");
        }
        // Blank spacer lines carry nothing worth keeping
        if !message.trim().is_empty()
            && let Ok(mut diagnostics) = self.diagnostics.lock()
        {
            diagnostics.record(record.level().into(), record.target(), message);
        }
    }

    fn flush(&self) {
        self.inner.flush();
        if let Some(file) = &self.logfile
            && let Ok(mut file) = file.lock()
        {
            let _ = file.flush();
        }
    }
}

fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `RUST_LOG`, when set, overrides the level
/// chosen by `--quiet`/`--verbose`.
pub(crate) fn init(
    quiet: bool,
    verbose: bool,
    logfile: Option<&Path>,
) -> std::io::Result<SharedDiagnostics> {
    let mut builder = env_logger::Builder::new();
    builder
        .target(env_logger::Target::Stdout)
        .filter_level(level_for(quiet, verbose));
    if verbose {
        builder.format_timestamp_secs().format_target(true);
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }
    builder.parse_default_env();
    let inner = builder.build();

    let logfile = logfile.map(File::create).transpose()?.map(Mutex::new);
    let diagnostics = SharedDiagnostics::default();

    let max_level = inner.filter();
    let logger = CapturingLogger {
        inner,
        logfile,
        diagnostics: Arc::clone(&diagnostics),
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }
    Ok(diagnostics)
}

/// Write the captured diagnostics to `path`.
pub(crate) fn export_diagnostics(diagnostics: &SharedDiagnostics, path: &Path) {
    let result = match diagnostics.lock() {
        Ok(log) => log.write_to_file(path),
        Err(_) => return,
    };
    if let Err(e) = result {
        eprintln!("Failed to write diagnostics to {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), LevelFilter::Info);
        assert_eq!(level_for(true, false), LevelFilter::Warn);
        assert_eq!(level_for(true, true), LevelFilter::Debug);
    }
}
