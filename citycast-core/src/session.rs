//! Long-lived search entry point shared by every input trigger.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, instrument};

use crate::{
    error::SearchError,
    search::SearchFlow,
    view::{Notice, Presenter, SearchView},
};

/// What started a run. Both triggers share one code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    SearchButton,
    EnterKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Blank input; the user was notified and nothing was fetched.
    Rejected,
    /// Every pipeline failed; the user was notified once.
    Failed,
    /// `sections` sections were handed to the presenter.
    Rendered { sections: usize },
    /// A newer run started before this one resolved; its result was dropped.
    Superseded,
}

/// Owns the search flow and presenter, and numbers each run so a slow run
/// can never overwrite the output of a newer one.
#[derive(Debug)]
pub struct SearchSession<P> {
    flow: SearchFlow,
    presenter: P,
    generation: AtomicU64,
}

impl<P: Presenter> SearchSession<P> {
    pub fn new(flow: SearchFlow, presenter: P) -> Self {
        Self { flow, presenter, generation: AtomicU64::new(0) }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub async fn on_search_clicked(&self, input: &str) -> RunStatus {
        self.submit(Trigger::SearchButton, input).await
    }

    /// Only the Enter key submits; any other key yields `None`.
    pub async fn on_key_pressed(&self, key: &str, input: &str) -> Option<RunStatus> {
        if key != "Enter" {
            return None;
        }
        Some(self.submit(Trigger::EnterKey, input).await)
    }

    #[instrument(skip(self))]
    pub async fn submit(&self, trigger: Trigger, input: &str) -> RunStatus {
        if input.trim().is_empty() {
            self.presenter.notify(Notice::EmptyInput);
            return RunStatus::Rejected;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.flow.run(input).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            info!(generation, "Discarding result of superseded run");
            return RunStatus::Superseded;
        }

        match result {
            Ok(outcome) => {
                let view = SearchView::new(&outcome, &self.flow.config().icon_base_url);
                RunStatus::Rendered { sections: view.present(&self.presenter) }
            }
            Err(SearchError::EmptyInput) => {
                self.presenter.notify(Notice::EmptyInput);
                RunStatus::Rejected
            }
            Err(SearchError::AllPipelinesFailed) => {
                self.presenter.notify(Notice::FetchFailed);
                RunStatus::Failed
            }
        }
    }
}
