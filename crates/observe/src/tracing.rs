use {
    crate::Config,
    std::{
        io::{self, IsTerminal},
        panic::PanicHookInfo,
        sync::Once,
    },
    time::macros::format_description,
    tracing::Level,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{
            time::UtcTime,
            writer::{MakeWriterExt as _, OrElse, WithMaxLevel},
        },
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes the global tracing subscriber and routes panics through it.
/// `env_filter` in the config uses the directive syntax documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    std::panic::set_hook(Box::new(tracing_panic_hook));
}

/// Like [`initialize`], but can be called multiple times in a row. Later calls
/// are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(env_filter: &str) {
    // The subscriber is a process wide global, so a second initialization from
    // another test thread would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        set_tracing_subscriber(&Config::default().with_env_filter(env_filter));
        std::panic::set_hook(Box::new(tracing_panic_hook));
    });
}

fn set_tracing_subscriber(config: &Config) {
    let stderr_threshold = config.stderr_threshold.unwrap_or(Level::ERROR);
    let timer = || {
        UtcTime::new(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
    };
    let writer = move || split_writer(stderr_threshold);

    // The json and the plain formatter are different types, so each branch
    // builds its own layer stack.
    if config.use_json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer())
                    .with_timer(timer())
                    .with_filter(EnvFilter::new(&config.env_filter)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer())
                    .with_timer(timer())
                    .with_ansi(std::io::stdout().is_terminal())
                    .with_filter(EnvFilter::new(&config.env_filter)),
            )
            .init();
    }
    tracing::info!(
        filter = %config.env_filter,
        json = config.use_json_format,
        "initialized logging"
    );
}

type SplitWriter = OrElse<WithMaxLevel<fn() -> io::Stderr>, fn() -> io::Stdout>;

/// Writes events at or above `stderr_threshold` to stderr and everything more
/// verbose to stdout.
fn split_writer(stderr_threshold: Level) -> SplitWriter {
    let stderr: fn() -> io::Stderr = io::stderr;
    let stdout: fn() -> io::Stdout = io::stdout;
    stderr.with_max_level(stderr_threshold).or_else(stdout)
}

/// Panic hook that prints roughly the same message as the default panic hook
/// but uses tracing:error instead of stderr.
fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        tracing::{
            Metadata,
            callsite::{DefaultCallsite, Identifier},
            field::FieldSet,
            metadata::Kind,
        },
        tracing_subscriber::fmt::{MakeWriter, writer::EitherWriter},
    };

    macro_rules! event_metadata {
        ($level:expr) => {{
            static CALLSITE: DefaultCallsite = DefaultCallsite::new(&META);
            static META: Metadata<'static> = Metadata::new(
                "event",
                "observe::tracing::tests",
                $level,
                None,
                None,
                None,
                FieldSet::new(&[], Identifier(&CALLSITE)),
                Kind::EVENT,
            );
            &META
        }};
    }

    fn goes_to_stderr(writer: &SplitWriter, metadata: &Metadata<'_>) -> bool {
        matches!(writer.make_writer_for(metadata), EitherWriter::A(_))
    }

    #[test]
    fn error_threshold_only_sends_errors_to_stderr() {
        let writer = split_writer(Level::ERROR);
        assert!(goes_to_stderr(&writer, event_metadata!(Level::ERROR)));
        assert!(!goes_to_stderr(&writer, event_metadata!(Level::WARN)));
        assert!(!goes_to_stderr(&writer, event_metadata!(Level::INFO)));
    }

    #[test]
    fn warn_threshold_sends_warnings_and_errors_to_stderr() {
        let writer = split_writer(Level::WARN);
        assert!(goes_to_stderr(&writer, event_metadata!(Level::ERROR)));
        assert!(goes_to_stderr(&writer, event_metadata!(Level::WARN)));
        assert!(!goes_to_stderr(&writer, event_metadata!(Level::INFO)));
        assert!(!goes_to_stderr(&writer, event_metadata!(Level::DEBUG)));
    }

    #[test]
    fn reentrant_initialization_is_idempotent() {
        initialize_reentrant("debug");
        initialize_reentrant("trace");
        tracing::debug!("logging still works after repeated initialization");
    }
}
