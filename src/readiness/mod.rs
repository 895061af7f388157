//! The readiness loop and its request/outcome types.

pub mod outcome;
pub mod probe;
pub mod request;

use std::fmt::Write;

/// Renders an error together with its source chain, one cause per paragraph.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}
