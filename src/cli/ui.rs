use colored::*;
use console::Term;
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use flowscribe::{ Category, ExtractionResult, StageCount };

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping
pub fn print_text(text: &str) {
    let width = Term::stdout().size().1 as usize;
    for line in text.lines() {
        for wrapped_line in wrap(line, width.saturating_sub(10).max(20)) {
            println!("{}", wrapped_line);
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Print a stage count, colored by outcome
pub fn print_stage(label: &str, counts: &StageCount) {
    let value = format!("{}/{}", counts.succeeded, counts.attempted);
    let value = if counts.attempted > 0 && counts.failed() == 0 {
        value.green()
    } else if counts.succeeded == 0 {
        value.red()
    } else {
        value.yellow()
    };
    println!("{}: {}", label.bold(), value);
}

/// Print extracted categories with their phrases
pub fn print_extraction(extraction: &ExtractionResult) {
    for category in Category::ALL {
        let phrases = extraction.get(category);
        println!("{} ({})", category.key().cyan().bold(), phrases.len());
        for phrase in phrases {
            println!("  - {}", phrase.replace('\n', " "));
        }
    }
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
