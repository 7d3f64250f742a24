use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Once;

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};

/// One destination for log records.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "debug",
/// "ember_engine=debug,wgpu=warn").
#[derive(Debug, Clone)]
pub enum LogSink {
    /// Standard error, styled according to `LoggingConfig::write_style`.
    Console { filter: String },
    /// Plain-text file. With `truncate` the previous contents are discarded on open.
    File {
        path: PathBuf,
        filter: String,
        truncate: bool,
    },
}

impl LogSink {
    pub fn console(filter: impl Into<String>) -> Self {
        LogSink::Console {
            filter: filter.into(),
        }
    }

    /// File sink that starts from an empty file on every run.
    pub fn file(path: impl Into<PathBuf>, filter: impl Into<String>) -> Self {
        LogSink::File {
            path: path.into(),
            filter: filter.into(),
            truncate: true,
        }
    }
}

/// Logger configuration.
///
/// An empty `sinks` list means a single console sink filtered by `RUST_LOG`
/// (or "info" when unset).
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub sinks: Vec<LogSink>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            sinks: Vec::new(),
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`. A sink that cannot be opened is skipped
/// and reported through the sinks that did open.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let sinks = if config.sinks.is_empty() {
            vec![LogSink::console(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            )]
        } else {
            config.sinks
        };

        let mut loggers = Vec::with_capacity(sinks.len());
        let mut failures = Vec::new();
        for sink in sinks {
            match build_sink(&sink, config.write_style) {
                Ok(logger) => loggers.push(logger),
                Err(e) => failures.push(e),
            }
        }

        let fanout = FanoutLogger::new(loggers);
        let max_level = fanout.max_level();
        if log::set_boxed_logger(Box::new(fanout)).is_err() {
            // Another logger was installed outside this module.
            return;
        }
        log::set_max_level(max_level);

        for e in failures {
            log::warn!("log sink disabled: {e:#}");
        }
        log::debug!("logging initialized");
    });
}

fn build_sink(sink: &LogSink, write_style: env_logger::WriteStyle) -> Result<env_logger::Logger> {
    match sink {
        LogSink::Console { filter } => Ok(sink_logger(
            filter,
            write_style,
            env_logger::Target::Stderr,
        )),
        LogSink::File {
            path,
            filter,
            truncate,
        } => {
            let mut options = OpenOptions::new();
            options.create(true);
            if *truncate {
                options.write(true).truncate(true);
            } else {
                options.append(true);
            }
            let file = options
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;

            Ok(sink_logger(
                filter,
                env_logger::WriteStyle::Never,
                env_logger::Target::Pipe(Box::new(file)),
            ))
        }
    }
}

fn sink_logger(
    filter: &str,
    write_style: env_logger::WriteStyle,
    target: env_logger::Target,
) -> env_logger::Logger {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filter);
    builder.write_style(write_style);
    builder.target(target);
    builder.build()
}

/// Forwards every record to each sink whose own filter accepts it.
struct FanoutLogger {
    sinks: Vec<env_logger::Logger>,
}

impl FanoutLogger {
    fn new(sinks: Vec<env_logger::Logger>) -> Self {
        Self { sinks }
    }

    /// Most verbose level any sink wants; used as the facade's global gate.
    fn max_level(&self) -> LevelFilter {
        self.sinks
            .iter()
            .map(env_logger::Logger::filter)
            .max()
            .unwrap_or(LevelFilter::Off)
    }
}

impl Log for FanoutLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.sinks.iter().any(|s| s.enabled(metadata))
    }

    fn log(&self, record: &Record<'_>) {
        for sink in &self.sinks {
            if sink.matches(record) {
                sink.log(record);
            }
        }
    }

    fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn pipe_sink(filter: &str, buf: &SharedBuf) -> env_logger::Logger {
        sink_logger(
            filter,
            env_logger::WriteStyle::Never,
            env_logger::Target::Pipe(Box::new(buf.clone())),
        )
    }

    fn emit(logger: &FanoutLogger, level: log::Level, msg: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("ember_engine")
                .args(format_args!("{msg}"))
                .build(),
        );
        logger.flush();
    }

    #[test]
    fn each_sink_applies_its_own_level() {
        let console = SharedBuf::default();
        let file = SharedBuf::default();
        let fanout = FanoutLogger::new(vec![pipe_sink("debug", &console), pipe_sink("info", &file)]);

        emit(&fanout, log::Level::Debug, "compiling shader");
        emit(&fanout, log::Level::Info, "shader ready");

        let console = console.contents();
        let file = file.contents();
        assert!(console.contains("compiling shader"));
        assert!(console.contains("shader ready"));
        assert!(!file.contains("compiling shader"));
        assert!(file.contains("shader ready"));
    }

    #[test]
    fn max_level_is_most_verbose_sink() {
        let buf = SharedBuf::default();
        let fanout = FanoutLogger::new(vec![pipe_sink("warn", &buf), pipe_sink("debug", &buf)]);
        assert_eq!(fanout.max_level(), LevelFilter::Debug);
    }

    #[test]
    fn no_sinks_means_logging_off() {
        let fanout = FanoutLogger::new(Vec::new());
        assert_eq!(fanout.max_level(), LevelFilter::Off);
        assert!(!fanout.enabled(&Metadata::builder().level(log::Level::Error).build()));
    }

    #[test]
    fn file_sink_truncates_by_default() {
        let sink = LogSink::file("ember.log", "info");
        let LogSink::File { truncate, .. } = sink else {
            panic!("expected a file sink");
        };
        assert!(truncate);
    }
}
