//! JSON output for one-shot commands
//!
//! One JSON object per line on stdout; logs go to stderr.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response to `out`
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, &data)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn print_response(data: Value) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_response(&mut lock, data)
}
