//! Responsible for behaviour related to logging statistics with a specific pre-fix and closing
//! lines.

pub mod statistic_logger {
    use std::fmt::Display;

    use once_cell::sync::OnceCell;

    struct StatisticOptions {
        prefix: &'static str,
        after_statistics: Option<&'static str>,
    }

    static STATISTIC_OPTIONS: OnceCell<StatisticOptions> = OnceCell::new();

    /// Configures the statistic logger to use a certain prefix and (an optional) closing line which
    /// can be printed after all of the statistics have been logged. Statistics are only written
    /// when `log_statistics` is true; only the first configuration takes effect.
    pub fn configure(log_statistics: bool, prefix: &'static str, after: Option<&'static str>) {
        if log_statistics {
            let _ = STATISTIC_OPTIONS.get_or_init(|| StatisticOptions {
                prefix,
                after_statistics: after,
            });
        }
    }

    /// Logs the provided statistic with name `name` and value `value`. At the moment it will log in
    /// the format `STATISTIC_PREFIX NAME=VALUE`.
    pub fn log_statistic(name: impl Display, value: impl Display) {
        if let Some(options) = STATISTIC_OPTIONS.get() {
            println!("{} {name}={value}", options.prefix);
        }
    }

    /// Certain formats require that a block of statistics is followed by a closing line; this
    /// function outputs this closing line **if** it is configured.
    pub fn log_statistic_postfix() {
        if let Some(post_fix) = STATISTIC_OPTIONS
            .get()
            .and_then(|options| options.after_statistics)
        {
            println!("{post_fix}");
        }
    }

    /// Returns whether statistics will be written.
    pub fn should_log_statistics() -> bool {
        STATISTIC_OPTIONS.get().is_some()
    }
}
