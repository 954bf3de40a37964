use console::{style, StyledObject};
use std::fmt::Display;

// Terminal styles, named by role. Colors are dropped automatically when
// the stream is not a terminal.

/// Section titles and the OS bucket banners.
pub fn heading(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright()
}

/// Field names such as "Mean:" or "Runs analyzed:".
pub fn label(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

/// Identifiers: repository, measured step.
pub fn ident(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).cyan()
}

/// Counts and other highlighted values; also used for "No data".
pub fn highlight(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

/// A finished progress phase.
pub fn done(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn brand(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}
