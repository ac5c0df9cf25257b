//! Task panel: the submit → loading → result/alert cycle shared by every tool.

use crate::client::{DispatchError, Dispatcher};
use crate::models::{StudyRequest, StudyResult, TaskKind};

/// What a panel is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    /// Waiting for input
    Idle,
    /// A request is in flight; the submit trigger is disabled
    Loading,
    /// A result is on screen
    Showing(StudyResult),
    /// An alert is on screen
    Failed(String),
}

/// Returned by [`TaskPanel::begin`] while a request is already in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a request is already in progress")]
pub struct PanelBusy;

/// State for one tool's page.
///
/// Each panel owns its state exclusively; nothing is shared between tools.
#[derive(Debug)]
pub struct TaskPanel {
    kind: TaskKind,
    state: PanelState,
    attached: bool,
}

impl TaskPanel {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            state: PanelState::Idle,
            attached: true,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == PanelState::Loading
    }

    /// Whether the panel is still on screen
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The result being shown, if any
    pub fn result(&self) -> Option<&StudyResult> {
        match &self.state {
            PanelState::Showing(result) => Some(result),
            _ => None,
        }
    }

    /// Enter `Loading`. Refused while a request is already in flight.
    pub fn begin(&mut self) -> Result<(), PanelBusy> {
        if self.is_loading() {
            return Err(PanelBusy);
        }
        self.state = PanelState::Loading;
        Ok(())
    }

    /// Apply the outcome of a dispatch.
    ///
    /// Outcomes arriving after [`detach`](Self::detach) are dropped.
    pub fn settle(&mut self, outcome: Result<StudyResult, DispatchError>) {
        if !self.attached {
            tracing::debug!("Dropping {} outcome for detached panel", self.kind);
            return;
        }

        self.state = match outcome {
            Ok(result) => PanelState::Showing(result),
            Err(err) => PanelState::Failed(err.user_message(self.kind)),
        };
    }

    /// Close the result or alert
    pub fn dismiss(&mut self) {
        if matches!(self.state, PanelState::Showing(_) | PanelState::Failed(_)) {
            self.state = PanelState::Idle;
        }
    }

    /// The user navigated away; later outcomes are ignored
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Submit `request` through `dispatcher` and settle with the outcome
    pub async fn submit(
        &mut self,
        dispatcher: &Dispatcher,
        request: &StudyRequest,
    ) -> Result<&PanelState, PanelBusy> {
        self.begin()?;
        let outcome = dispatcher.dispatch(request).await;
        self.settle(outcome);
        Ok(&self.state)
    }
}
