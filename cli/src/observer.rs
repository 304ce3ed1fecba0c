//! Live progress display for a streaming session

use colored::Colorize;
use consilium_application::SessionObserver;
use consilium_domain::{ConversationId, Node};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Prints node arrivals and keeps the latest status text on a spinner
/// while a session streams.
pub struct ConsoleObserver {
    spinner: ProgressBar,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    /// Clear the spinner before the final output is printed.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for ConsoleObserver {
    fn on_started(&self, conversation_id: ConversationId) {
        self.spinner.println(format!(
            "{} {}",
            "conversation".dimmed(),
            conversation_id.to_string().bold()
        ));
    }

    fn on_status(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    fn on_node(&self, node: &Node) {
        let by = match &node.model {
            Some(model) => format!(" [{model}]").dimmed().to_string(),
            None => String::new(),
        };
        self.spinner
            .println(format!("{} {}{}", "+".green(), node.kind, by));
    }
}
