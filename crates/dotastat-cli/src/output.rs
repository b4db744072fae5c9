use std::io::Write;

use serde_json::Value;

use crate::error::CliError;

pub fn render(payload: &Value) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, payload)?;
    handle.write_all(b"\n")?;
    Ok(())
}

/// Prints a failure. Upstream errors go to stdout as JSON in `--json` mode;
/// everything else is plain text on stderr.
pub fn render_error(error: &CliError, json: bool) {
    if let (true, CliError::Upstream(classified)) = (json, error) {
        match serde_json::to_string(classified) {
            Ok(line) => println!("{line}"),
            Err(_) => eprintln!("error: {error}"),
        }
        return;
    }
    eprintln!("error: {error}");
}
