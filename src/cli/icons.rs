//! Status markers for terminal output.

use console::{style, StyledObject};

pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

pub fn warning() -> StyledObject<&'static str> {
    style("!").yellow()
}

pub fn alert() -> StyledObject<&'static str> {
    style("✗").red().bold()
}

pub fn arrow() -> StyledObject<&'static str> {
    style("→").dim()
}
