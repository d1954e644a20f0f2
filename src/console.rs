//! Line-oriented console front-end.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::processor::{CommandProcessor, GREETING};
use crate::storage::Storage;

const DIVIDER: &str = "    ____________________________________________________________";

/// Wrap a reply in divider lines with every line indented.
pub fn format_block(text: &str) -> String {
    let mut out = String::from(DIVIDER);
    out.push('\n');
    for line in text.lines() {
        out.push_str("     ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(DIVIDER);
    out.push('\n');
    out
}

/// Run a session until `bye` or end of input, saving after every change.
pub fn run<R: BufRead, W: Write>(
    processor: &mut CommandProcessor,
    storage: &Storage,
    input: R,
    out: &mut W,
) -> Result<()> {
    write!(out, "{}", format_block(GREETING))?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let reply = processor.process(&line);

        let mut text = reply.text;
        if reply.changed {
            if let Err(e) = storage.save(processor.tasks()) {
                text.push_str(&format!("\n(Couldn't save to {}: {e})", storage.path().display()));
            }
        }
        write!(out, "{}", format_block(&text))?;
        out.flush()?;

        if reply.exit {
            break;
        }
    }
    Ok(())
}

/// Run a session on the process's stdin/stdout.
pub fn run_stdio(processor: &mut CommandProcessor, storage: &Storage) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run(processor, storage, stdin.lock(), &mut stdout)
}
