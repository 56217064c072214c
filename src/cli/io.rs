//! JSON output for one-shot commands
//!
//! Output: one pretty-printed JSON document on stdout, UTF-8.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write `value` as pretty JSON to `writer`, followed by a newline.
pub fn write_json_to<W: Write, T: Serialize>(writer: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write `value` as pretty JSON to stdout.
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json_to(&mut lock, value)
}
