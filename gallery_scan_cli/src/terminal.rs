//! Terminal detection and capability utilities

use is_terminal::IsTerminal;
use std::env;
use std::io::{stderr, stdout};

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    stdout().is_terminal() && !is_non_interactive_session()
}

/// Check if stderr is connected to an interactive terminal
///
/// Progress goes to stderr, so it can still be shown while stdout is piped.
pub fn stderr_is_interactive() -> bool {
    stderr().is_terminal() && !is_non_interactive_session()
}

/// Check if the terminal supports ANSI escape codes for colors
pub fn supports_ansi() -> bool {
    if !is_interactive() {
        return false;
    }

    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    let term = env::var("TERM").unwrap_or_default();
    if cfg!(windows) {
        // Modern Windows consoles handle ANSI even without TERM
        term != "dumb"
    } else {
        !(term == "dumb" || term.is_empty())
    }
}

/// CI runners and frontends that set a TTY but expect plain output
fn is_non_interactive_session() -> bool {
    is_ci_environment() || env::var("DEBIAN_FRONTEND").unwrap_or_default() == "noninteractive"
}

/// Detect if running in a CI environment
fn is_ci_environment() -> bool {
    let ci_vars = [
        "CI",
        "CONTINUOUS_INTEGRATION",
        "JENKINS_URL",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "TRAVIS",
        "CIRCLECI",
        "BUILDKITE",
        "DRONE",
        "TEAMCITY_VERSION",
        "TF_BUILD", // Azure DevOps
    ];

    ci_vars.iter().any(|var| env::var(var).is_ok())
}

/// Determine if the spinner should be shown by default
pub fn should_show_progress_by_default() -> bool {
    stderr_is_interactive() && env::var("TERM").unwrap_or_default() != "dumb"
}
