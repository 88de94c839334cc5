//! Prompt rendering and degrade-gracefully advice generation.

use super::ports::AdviceGenerator;
use crate::task::domain::{Comment, Task};
use minijinja::{Environment, context};
use std::sync::Arc;
use tracing::{debug, warn};

/// Returned when no advice generator is configured.
pub const OFFLINE_NOTICE: &str = "AI Service is in offline mode (check your API key or model name).";

/// Prefix of the text returned when the generator fails.
pub const FALLBACK_NOTE: &str = "Note: AI Cloud is currently busy.";

const PROMPT_TEMPLATE: &str = "\
Analyze this task as a PM:
Title: {{ title }}
Desc: {{ description }}
Discussion:
{% for line in comments %}- {{ line }}
{% else %}No comments yet.
{% endfor %}Give 3 actionable tips.
";

/// The task facts an analysis is based on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContext {
    /// Task title.
    pub title: String,
    /// Task description, if any.
    pub description: Option<String>,
    /// Comment texts, oldest first.
    pub comments: Vec<String>,
}

impl TaskContext {
    /// Collects the analysis context from a task and its comments.
    #[must_use]
    pub fn from_task(task: &Task, comments: &[Comment]) -> Self {
        Self {
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            comments: comments
                .iter()
                .map(|comment| comment.text().as_str().to_owned())
                .collect(),
        }
    }

    /// Renders the analysis prompt.
    ///
    /// Returns `None` if the template cannot be rendered.
    #[must_use]
    pub fn render_prompt(&self) -> Option<String> {
        let environment = Environment::new();
        environment
            .render_str(
                PROMPT_TEMPLATE,
                context! {
                    title => &self.title,
                    description => self.description.as_deref().unwrap_or("None"),
                    comments => &self.comments,
                },
            )
            .inspect_err(|error| warn!(%error, "advice prompt rendering failed"))
            .ok()
    }

    fn fallback(&self) -> String {
        format!(
            "{FALLBACK_NOTE} Local analysis of '{}': Task seems clear, ensure the team has access to DB.",
            self.title
        )
    }
}

/// Produces task advice, falling back to local text on any failure.
#[derive(Clone, Default)]
pub struct AdviceService {
    generator: Option<Arc<dyn AdviceGenerator>>,
}

impl AdviceService {
    /// Creates a service backed by `generator`.
    #[must_use]
    pub fn new(generator: Arc<dyn AdviceGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Creates a service with no generator; every analysis is offline.
    #[must_use]
    pub const fn offline() -> Self {
        Self { generator: None }
    }

    /// Returns `true` when a generator is configured.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.generator.is_some()
    }

    /// Analyses a task. Never fails.
    pub async fn analyze(&self, task: &TaskContext) -> String {
        let Some(generator) = &self.generator else {
            return OFFLINE_NOTICE.to_owned();
        };
        let Some(prompt) = task.render_prompt() else {
            return task.fallback();
        };
        match generator.generate(&prompt).await {
            Ok(advice) => {
                debug!(title = %task.title, "advice generated");
                advice
            }
            Err(error) => {
                warn!(title = %task.title, %error, "advice generation failed, using local fallback");
                task.fallback()
            }
        }
    }
}
