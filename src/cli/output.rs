//! CLI output formatting

use crate::execution::PipelineEvent;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a pipeline event for display
///
/// Per-action progress is already shown by the status spinner, so only the
/// pipeline boundaries and failures produce a line.
pub fn format_pipeline_event(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::PipelineStarted {
            run_id,
            cluster_name,
            total_actions,
        } => Some(format!(
            "{} Creating cluster {} ({} action(s), run {})",
            ROCKET,
            style(cluster_name).bold(),
            total_actions,
            style(&run_id.to_string()[..8]).dim()
        )),
        PipelineEvent::ActionStarted { .. } | PipelineEvent::ActionCompleted { .. } => None,
        PipelineEvent::ActionFailed { action, error } => Some(format!(
            "{} {}: {}",
            CROSS,
            style(action).red(),
            style(error).dim()
        )),
        PipelineEvent::PipelineCompleted { success, .. } => {
            let status = if *success {
                style("successfully").green().to_string()
            } else {
                style("failed").red().to_string()
            };
            Some(format!("{} Cluster creation finished {}", INFO, status))
        }
    }
}

/// Format captured command output with truncation
pub fn format_output(lines: &[String], max_lines: usize) -> String {
    if lines.len() <= max_lines {
        lines.join("\n")
    } else {
        let tail = lines[lines.len() - max_lines..].join("\n");
        format!(
            "{}... ({} earlier lines)\n{}",
            style("[truncated]").dim(),
            lines.len() - max_lines,
            tail
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_action_progress_events_are_silent() {
        let started = PipelineEvent::ActionStarted {
            action: "kubeadm-init",
            index: 0,
        };
        let completed = PipelineEvent::ActionCompleted {
            action: "kubeadm-init",
        };
        assert!(format_pipeline_event(&started).is_none());
        assert!(format_pipeline_event(&completed).is_none());
    }

    #[test]
    fn test_failure_event_mentions_error() {
        let event = PipelineEvent::ActionFailed {
            action: "kubeadm-init",
            error: "failed to init node with kubeadm".to_string(),
        };
        let line = format_pipeline_event(&event).unwrap();
        assert!(line.contains("kubeadm-init"));
        assert!(line.contains("failed to init node with kubeadm"));
    }

    #[test]
    fn test_started_event_mentions_cluster() {
        let event = PipelineEvent::PipelineStarted {
            run_id: Uuid::new_v4(),
            cluster_name: "kubernetes".to_string(),
            total_actions: 1,
        };
        let line = format_pipeline_event(&event).unwrap();
        assert!(line.contains("kubernetes"));
    }

    #[test]
    fn test_format_output_keeps_tail() {
        let lines: Vec<String> = (1..=5).map(|i| format!("line {}", i)).collect();

        assert_eq!(format_output(&lines, 10), lines.join("\n"));

        let truncated = format_output(&lines, 2);
        assert!(truncated.contains("3 earlier lines"));
        assert!(truncated.ends_with("line 4\nline 5"));
        assert!(!truncated.contains("line 3"));
    }
}
