use chrono::Local;
use colored::Colorize;
use env_logger::{Builder, Env};
use std::io::Write;

/// Installs the process-wide logger: `info` by default, `debug` when
/// `verbose` is set. `RUST_LOG` still takes precedence.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let prefix = format!(
                "[{}] [{}]",
                Local::now().format("%H:%M:%S"),
                record.level()
            );
            writeln!(buf, "{} {}", prefix.red(), record.args())
        })
        .init();
}

/// Command line as it may appear in the log; PASS arguments are masked.
pub fn loggable_command(verb: &str, argument: &str) -> String {
    if argument.is_empty() {
        verb.to_string()
    } else if verb == "PASS" {
        format!("{} ****", verb)
    } else {
        format!("{} {}", verb, argument)
    }
}
