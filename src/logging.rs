use crate::Result;
use flexi_logger::{
    colored_default_format, opt_format, Cleanup, Criterion, Duplicate, FileSpec, Logger,
    LoggerHandle, Naming,
};
use std::path::Path;

/// Start logging; `RUST_LOG` overrides `default_level`.
///
/// Without a directory logs go to stderr. With one, logs also go to rotating
/// files there. The returned handle must outlive the program's logging.
pub fn setup_logging(default_level: &str, log_dir: Option<&Path>) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(default_level)?.format(colored_default_format);

    let handle = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir).basename("retrosynth"))
            .format_for_files(opt_format)
            .duplicate_to_stderr(Duplicate::Info)
            .rotate(
                Criterion::Size(10 * 1024 * 1024), // Rotate logs after they reach 10 MB
                Naming::Numbers,
                Cleanup::KeepLogFiles(7),
            )
            .start()?,
        None => logger.start()?,
    };
    Ok(handle)
}
