use crate::error::app_error::ClientError;
use tracing::debug;

/// Load lifecycle of one page's data.
///
/// `Loading` and `Failed` keep whatever was shown before, so a refresh or a
/// recoverable error does not blank the page.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading { previous: Option<T> },
    Loaded(T),
    Failed { message: String, previous: Option<T> },
    /// The page cannot work at all, e.g. no warehouse is selected.
    Unavailable { message: String },
}

/// Identifies one load. Results carrying an older ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// The ticket was superseded or the page was left; nothing changed.
    Stale,
    RedirectToLogin,
}

#[derive(Debug)]
pub struct Page<T> {
    state: LoadState<T>,
    generation: u64,
    active: Option<u64>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            generation: 0,
            active: None,
        }
    }
}

impl<T> Page<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Data currently on screen, if any.
    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(data) => Some(data),
            LoadState::Loading { previous } | LoadState::Failed { previous, .. } => previous.as_ref(),
            LoadState::Idle | LoadState::Unavailable { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { message, .. } | LoadState::Unavailable { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    /// Starts a load. Any ticket handed out before is invalidated.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.active = Some(self.generation);
        let previous = self.take_data();
        self.state = LoadState::Loading { previous };
        LoadTicket(self.generation)
    }

    /// Applies a load result if `ticket` is still the active one.
    pub fn finish(&mut self, ticket: LoadTicket, result: Result<T, ClientError>) -> LoadOutcome {
        if self.active != Some(ticket.0) {
            debug!(ticket = ticket.0, active = ?self.active, "discarding stale page result");
            return LoadOutcome::Stale;
        }
        self.active = None;

        match result {
            Ok(data) => {
                self.state = LoadState::Loaded(data);
                LoadOutcome::Applied
            }
            Err(error) => self.fail(&error),
        }
    }

    /// The user navigated away: in-flight results will be dropped.
    pub fn abandon(&mut self) {
        self.active = None;
        if matches!(self.state, LoadState::Loading { .. }) {
            self.state = match self.take_data() {
                Some(data) => LoadState::Loaded(data),
                None => LoadState::Idle,
            };
        }
    }

    /// Records an error from a page action (submit, delete) without a ticket.
    ///
    /// Session expiry drops the data so nothing stale is shown before the
    /// redirect. A missing context makes the page unavailable. Anything else
    /// becomes a banner over the existing data.
    pub fn fail(&mut self, error: &ClientError) -> LoadOutcome {
        if error.requires_login() {
            self.state = LoadState::Idle;
            return LoadOutcome::RedirectToLogin;
        }

        if error.is_fatal_for_page() {
            self.state = LoadState::Unavailable {
                message: error.to_string(),
            };
            return LoadOutcome::Applied;
        }

        let previous = self.take_data();
        self.state = LoadState::Failed {
            message: error.to_string(),
            previous,
        };
        LoadOutcome::Applied
    }

    /// Passes an action's result through, recording a failure on the page.
    pub fn track<R>(&mut self, result: Result<R, ClientError>) -> Result<R, ClientError> {
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }

    /// Applies a local change to loaded data, e.g. after a successful delete.
    /// Returns false when there is no data to change.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> bool {
        match &mut self.state {
            LoadState::Loaded(data) => {
                f(data);
                true
            }
            LoadState::Loading { previous: Some(data) } | LoadState::Failed { previous: Some(data), .. } => {
                f(data);
                true
            }
            _ => false,
        }
    }

    /// Clears an error banner, keeping the data.
    pub fn dismiss_error(&mut self) {
        if let LoadState::Failed { .. } = self.state {
            self.state = match self.take_data() {
                Some(data) => LoadState::Loaded(data),
                None => LoadState::Idle,
            };
        }
    }

    fn take_data(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, LoadState::Idle) {
            LoadState::Loaded(data) => Some(data),
            LoadState::Loading { previous } | LoadState::Failed { previous, .. } => previous,
            LoadState::Idle | LoadState::Unavailable { .. } => None,
        }
    }
}
