//! Log formatting and output with ANSI colors and text wrapping
//!
//! Handles:
//! - Colorized console output with tag and level formatting
//! - Text wrapping at word boundaries
//! - Mirroring plain lines to the log file
//! - Broken pipe handling for piped commands

use super::file::write_to_file;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 10;
const LOG_TYPE_WIDTH: usize = 8;

/// Maximum message width before wrapping
const MAX_MESSAGE_WIDTH: usize = 110;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, log_type: &str, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string();

    let tag_str = format_tag(&tag);
    let log_type_str = format_log_type(log_type);

    let chunks = wrap_text(message, MAX_MESSAGE_WIDTH);
    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let tag_clean = tag.to_plain_string();

    let continuation_prefix = " ".repeat(time.len() + TAG_WIDTH + LOG_TYPE_WIDTH + 7);

    for (index, chunk) in chunks.iter().enumerate() {
        let console_line = if index == 0 {
            format!("{} [{}] [{}] {}", time.dimmed(), tag_str, log_type_str, chunk)
        } else {
            format!("{}{}", continuation_prefix, chunk)
        };
        print_stdout_safe(&console_line);

        write_to_file(&format!(
            "{} [{}] [{}] {}",
            timestamp, tag_clean, log_type, chunk
        ));
    }
}

/// Format a tag with appropriate color
fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Cache => label.bright_cyan().bold(),
        LogTag::Rpc => label.bright_blue().bold(),
        LogTag::Scanner => label.bright_green().bold(),
        LogTag::Processor => label.bright_magenta().bold(),
        LogTag::Metadata => label.cyan().bold(),
        LogTag::Score => label.bright_red().bold(),
        LogTag::Wallet => label.magenta().bold(),
    }
}

/// Format the level with its color
fn format_log_type(log_type: &str) -> ColoredString {
    let label = format!("{:<width$}", log_type, width = LOG_TYPE_WIDTH);
    match log_type {
        "ERROR" => label.bright_red().bold(),
        "WARNING" => label.bright_yellow().bold(),
        "INFO" => label.bright_green(),
        "DEBUG" => label.bright_blue(),
        _ => label.dimmed(),
    }
}

/// Wrap text at word boundaries, hard-splitting words longer than the width
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut result = Vec::new();

    for line in text.lines() {
        let mut current = String::new();

        for word in line.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(max_width) {
                    result.push(piece.iter().collect());
                }
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word_len <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        if !current.is_empty() {
            result.push(current);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

/// Print to stdout, ignoring broken pipes (e.g. `mintscout | head`)
fn print_stdout_safe(line: &str) {
    let mut out = stdout().lock();
    if let Err(e) = writeln!(out, "{}", line) {
        if e.kind() != ErrorKind::BrokenPipe {
            eprintln!("{}", line);
        }
    }
}
