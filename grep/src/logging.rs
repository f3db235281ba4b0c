use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Routes all logging to stderr, keeping stdout for selected lines.
pub fn setup(debug: bool) -> anyhow::Result<()> {
    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{l} {d(%H:%M:%S.%3f)} {f}:{L} {m}{n}",
        )))
        .build();

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let config = Config::builder()
        .appender(Appender::builder().build("stderr-appender", Box::new(stderr_appender)))
        .build(Root::builder().appender("stderr-appender").build(level))?;

    let _handle = log4rs::init_config(config)?;
    Ok(())
}
