//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::render::{DisplayPayload, HistoryView, SafetyNotice};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print one check-in result to stdout
    pub fn checkin(&self, payload: &DisplayPayload) {
        println!("{}", format_mood_line(&payload.mood, &payload.mood_color, payload.confidence));
        println!();
        if let Some(summary) = &payload.summary {
            println!("{}", summary.italic());
        }
        println!("{}", payload.coaching_text);

        let guidance = guidance_lines(payload);
        if !guidance.is_empty() {
            println!();
            for line in guidance {
                if line.starts_with(' ') {
                    println!("{}", line);
                } else {
                    println!("{}", line.cyan().bold());
                }
            }
        }

        if let Some(notice) = &payload.safety {
            println!();
            self.safety(notice);
        }
    }

    /// Print the emergency card
    pub fn safety(&self, notice: &SafetyNotice) {
        println!("{}", format!("⚠ {}", notice.headline.to_uppercase()).red().bold());
        println!("{}", notice.lead.red());
        for resource in &notice.resources {
            println!("  {} {}: {}", "•".red(), resource.region.bold(), resource.contact);
        }
    }

    /// Print the history panel to stdout
    pub fn history(&self, view: &HistoryView) {
        if view.entries.is_empty() {
            println!("No check-ins yet.");
            return;
        }

        for entry in &view.entries {
            let mood = paint(&format!("{:<11}", entry.mood), &entry.mood_color);
            let risk = if entry.risk { " ⚠".red().to_string() } else { String::new() };
            println!("{}  {}  {}{}", entry.timestamp.dimmed(), mood, entry.excerpt, risk);
            if let Some(summary) = &entry.summary {
                println!("{:>22}{}", "", summary.italic().dimmed());
            }
        }

        println!();
        let counts: Vec<String> = view
            .mood_counts
            .iter()
            .map(|c| format!("{} {}", c.mood, c.count))
            .collect();
        println!("{} {}", "Moods:".cyan(), counts.join(", "));
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// `Mood: Happy (82%)` with the label in its mood colour
/// Coping and journaling lines; headings are unindented, items indented
fn guidance_lines(payload: &DisplayPayload) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(actions) = &payload.actions {
        lines.push("Coping strategy".to_string());
        for (title, text) in actions.entries() {
            lines.push(format!("  {}: {}", title, text));
        }
    }

    if let Some(journaling) = &payload.journaling {
        lines.push("Journaling prompts".to_string());
        if !journaling.themes.is_empty() {
            lines.push(format!("  Themes: {}", journaling.themes.join(", ")));
        }
        for (index, prompt) in journaling.prompts.iter().enumerate() {
            lines.push(format!("  {}. {}", index + 1, prompt));
        }
    }

    lines
}

fn format_mood_line(mood: &str, color: &str, confidence: Option<u8>) -> String {
    let mut line = format!("{} {}", "Mood:".bold(), paint(mood, color).bold());
    if let Some(confidence) = confidence {
        line.push_str(&format!(" ({}%)", confidence));
    }
    line
}

/// Colour `text` with a `#rrggbb` colour, leaving it plain when unparsable
fn paint(text: &str, hex: &str) -> ColoredString {
    match parse_hex_color(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
