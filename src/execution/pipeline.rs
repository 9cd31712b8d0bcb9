//! Action pipeline - runs provisioning actions in order

use crate::actions::{Action, ActionError, KubeadmInitAction};
use crate::core::ActionContext;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Events that can occur during a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    PipelineStarted {
        run_id: Uuid,
        cluster_name: String,
        total_actions: usize,
    },
    ActionStarted {
        action: &'static str,
        index: usize,
    },
    ActionCompleted {
        action: &'static str,
    },
    ActionFailed {
        action: &'static str,
        error: String,
    },
    PipelineCompleted {
        run_id: Uuid,
        success: bool,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&PipelineEvent) + Send + Sync>;

/// Ordered list of actions executed sequentially against one context
///
/// The first failing action stops the run; later actions are not executed.
/// There are no retries.
#[derive(Default)]
pub struct ActionPipeline {
    actions: Vec<Box<dyn Action>>,
    event_handlers: Vec<EventHandler>,
}

impl ActionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline that brings up a single control-plane node
    pub fn control_plane() -> Self {
        Self::new().with_action(KubeadmInitAction::new())
    }

    /// Append an action
    pub fn with_action<A: Action + 'static>(mut self, action: A) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&PipelineEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Names of the actions, in execution order
    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    fn emit_event(&self, event: PipelineEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute every action in order
    pub async fn run(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        let span = info_span!("provision", run_id = %ctx.run_id, cluster = %ctx.cluster.name);
        self.run_actions(ctx).instrument(span).await
    }

    async fn run_actions(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        info!("Starting pipeline with {} action(s)", self.actions.len());
        self.emit_event(PipelineEvent::PipelineStarted {
            run_id: ctx.run_id,
            cluster_name: ctx.cluster.name.clone(),
            total_actions: self.actions.len(),
        });

        for (index, action) in self.actions.iter().enumerate() {
            info!("Executing action: {}", action.name());
            self.emit_event(PipelineEvent::ActionStarted {
                action: action.name(),
                index,
            });

            if let Err(e) = action.execute(ctx).await {
                error!("Action {} failed: {}", action.name(), e);
                self.emit_event(PipelineEvent::ActionFailed {
                    action: action.name(),
                    error: e.chain().join(": "),
                });
                self.emit_event(PipelineEvent::PipelineCompleted {
                    run_id: ctx.run_id,
                    success: false,
                });
                return Err(e);
            }

            info!("Action {} completed", action.name());
            self.emit_event(PipelineEvent::ActionCompleted {
                action: action.name(),
            });
        }

        self.emit_event(PipelineEvent::PipelineCompleted {
            run_id: ctx.run_id,
            success: true,
        });
        Ok(())
    }
}
