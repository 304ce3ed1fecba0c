//! Console rendering of reconstructed sessions
//!
//! The renderer is the one consumer of the log's derived views: the
//! pipeline shape prints categorically (plan / research / critiques /
//! synthesis, whatever order the nodes arrived in), the panel shape prints
//! chronologically, and chat sessions print as turns.

use colored::Colorize;
use consilium_application::ConversationSummary;
use consilium_domain::{
    DeliberationSession, ErrorKind, Node, NodeLog, PanelView, PipelineView, SessionError,
    SessionShape,
};

/// Formats reconstructed sessions for console display
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    /// Render a finished run by its inferred shape.
    pub fn render_session(session: &DeliberationSession) -> String {
        let mut output = String::new();

        if !session.status().is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Status:".cyan().bold(),
                session.status()
            ));
        }
        match session.log().shape() {
            SessionShape::Pipeline(view) => output.push_str(&Self::render_pipeline(&view)),
            SessionShape::Panel(view) => output.push_str(&Self::render_panel(&view)),
        }
        output
    }

    /// Render a multi-turn session grouped into turns.
    pub fn render_turns(log: &NodeLog) -> String {
        let mut output = String::new();

        for turn in log.turns() {
            output.push_str(&format!(
                "\n{} {}\n",
                ">".bold().blue(),
                turn.root.content
            ));
            for reply in &turn.replies {
                output.push_str(&Self::render_node(reply));
            }
        }

        let orphans = log.orphan_replies();
        if !orphans.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                "Replies without a matching prompt:".yellow().bold()
            ));
            for node in orphans {
                output.push_str(&Self::render_node(node));
            }
        }
        output
    }

    /// Render a replayed conversation, inferring how to present it: a log
    /// with parented replies reads as a chat transcript, anything else by
    /// its shape.
    pub fn render_replay(summary: &ConversationSummary, log: &NodeLog) -> String {
        let mut output = format!(
            "{} {}  {}\n",
            "#".dimmed(),
            summary.id.to_string().bold(),
            summary.title
        );
        let chat_like = log.turns().iter().any(|turn| !turn.replies.is_empty());
        if chat_like {
            output.push_str(&Self::render_turns(log));
        } else {
            match log.shape() {
                SessionShape::Pipeline(view) => output.push_str(&Self::render_pipeline(&view)),
                SessionShape::Panel(view) => output.push_str(&Self::render_panel(&view)),
            }
        }
        output
    }

    /// Render the history index.
    pub fn render_history(rows: &[ConversationSummary]) -> String {
        if rows.is_empty() {
            return "No persisted conversations.".dimmed().to_string();
        }

        let mut output = String::new();
        for row in rows {
            output.push_str(&format!(
                "{:>6}  {}  {:<10}  {}\n",
                row.id.to_string().bold(),
                row.created_at.format("%Y-%m-%d %H:%M"),
                row.strategy.as_deref().unwrap_or("-").dimmed(),
                row.title
            ));
        }
        output
    }

    /// Render a terminal error with its provenance.
    pub fn render_error(error: &SessionError) -> String {
        match error.kind {
            ErrorKind::Application => {
                format!("{} {}", "Deliberation failed:".red().bold(), error.message)
            }
            ErrorKind::Transport => format!(
                "{} {}\n{}",
                "Connection failed:".red().bold(),
                error.message,
                "The orchestration never reported a result; retrying may help.".dimmed()
            ),
        }
    }

    fn render_pipeline(view: &PipelineView<'_>) -> String {
        let mut output = String::new();

        if let Some(plan) = view.plan {
            output.push_str(&Self::section("Plan"));
            output.push_str(&Self::render_node(plan));
        }
        if !view.research.is_empty() {
            output.push_str(&Self::section("Research"));
            for node in &view.research {
                output.push_str(&Self::render_node(node));
            }
        }
        if !view.critiques.is_empty() {
            output.push_str(&Self::section("Critiques"));
            for node in &view.critiques {
                output.push_str(&Self::render_node(node));
            }
        }
        if let Some(synthesis) = view.synthesis {
            output.push_str(&Self::section("Synthesis"));
            output.push_str(&Self::render_node(synthesis));
        }
        output
    }

    fn render_panel(view: &PanelView<'_>) -> String {
        let mut output = Self::section("Panel Transcript");
        for node in &view.entries {
            output.push_str(&Self::render_node(node));
        }
        output
    }

    fn render_node(node: &Node) -> String {
        let mut heading = format!("── {}", node.kind);
        if let Some(model) = &node.model {
            heading.push_str(&format!(" · {model}"));
        }
        if let Some(score) = node.score {
            heading.push_str(&format!(" · score {score:.2}"));
        }
        heading.push_str(" ──");
        format!("\n{}\n{}\n", heading.yellow().bold(), node.content)
    }

    fn section(title: &str) -> String {
        format!("\n{}\n", format!("=== {title} ===").cyan().bold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_domain::{NodeKind, NodeLog};

    #[test]
    fn test_pipeline_rendering_is_categorical() {
        let log = NodeLog::replay([
            Node::new(1, NodeKind::Synthesis, "the answer"),
            Node::new(2, NodeKind::Plan, "the plan"),
            Node::new(3, NodeKind::Research, "a finding"),
        ]);
        let out = match log.shape() {
            SessionShape::Pipeline(view) => ConsoleRenderer::render_pipeline(&view),
            SessionShape::Panel(_) => panic!("expected pipeline"),
        };
        // plan renders before synthesis even though it arrived later
        let plan_at = out.find("the plan").unwrap();
        let synthesis_at = out.find("the answer").unwrap();
        assert!(plan_at < synthesis_at);
        assert!(out.contains("a finding"));
    }

    #[test]
    fn test_turn_rendering_includes_orphans_separately() {
        let log = NodeLog::replay([
            Node::new(1, NodeKind::Root, "hello"),
            Node::new(2, NodeKind::Synthesis, "hi").with_parent(1),
            Node::new(3, NodeKind::Research, "stray").with_parent(99),
        ]);
        let out = ConsoleRenderer::render_turns(&log);
        assert!(out.contains("hello"));
        assert!(out.contains("hi"));
        assert!(out.contains("stray"));
        assert!(out.contains("without a matching prompt"));
    }
}
