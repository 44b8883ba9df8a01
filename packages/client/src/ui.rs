//! UI utilities for the client.

use std::io::Write;

/// Prompt shown before each input line
pub fn prompt(label: &str) -> String {
    format!("{}> ", label)
}

/// Redisplay the prompt after printing a server frame
pub fn redisplay_prompt(label: &str) {
    print!("{}", prompt(label));
    std::io::stdout().flush().ok();
}
