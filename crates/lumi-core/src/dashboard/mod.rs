//! Dashboard state for a signed-in user.
//!
//! A `Dashboard` is opened through the session gate for one destination and
//! owns the per-view state: selected tab, exercise outcome and chat log.
//! Every handler takes the storage explicitly; nothing here is global.
//!
//! - `tabs`: tab set, remembered tab, fallback rules
//! - `theme`: light/dark preference
//! - `exercise`: the scripted exercise check
//! - `chat`: persisted chat log and delayed reply task
//! - `report`: daily report text

pub mod chat;
pub mod exercise;
pub mod report;
pub mod tabs;
pub mod theme;

pub use chat::{ChatLog, ChatMessage, PendingReply, Sender, COUNTERPART_REPLY, DEFAULT_REPLY_DELAY};
pub use exercise::{check_answer, ExerciseOutcome, EXERCISE_QUESTION};
pub use report::daily_report;
pub use tabs::Tab;
pub use theme::Theme;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::auth::{Destination, GateDecision, Session, SessionGate};
use crate::error::PortalError;
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct Dashboard {
    destination: Destination,
    session: Session,
    pub tab: Tab,
    pub exercise: Option<ExerciseOutcome>,
    pub chat: ChatLog,
}

impl Dashboard {
    /// Run the destination's guard and build its state. On denial the
    /// redirect target comes back as the error.
    pub fn open(
        gate: &SessionGate,
        storage: &dyn Storage,
        destination: Destination,
    ) -> Result<Self, Destination> {
        if !destination.is_dashboard() {
            return Err(Destination::Entry);
        }
        let session = match gate.require_auth(storage, destination.allowed_roles()) {
            GateDecision::Admit(session) => session,
            GateDecision::Redirect(target) => return Err(target),
        };

        let tab = tabs::restore_tab(storage, destination.tabs());
        let chat = ChatLog::load(storage, Some(&session.identifier));
        debug!(view = destination.view_id(), tab = tab.id(), "Dashboard opened");

        Ok(Self {
            destination,
            session,
            tab,
            exercise: None,
            chat,
        })
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tabs(&self) -> &'static [Tab] {
        self.destination.tabs()
    }

    pub fn has_tab(&self, tab: Tab) -> bool {
        self.tabs().contains(&tab)
    }

    fn require_tab(&self, tab: Tab, element: &'static str) -> Result<(), PortalError> {
        if self.has_tab(tab) {
            Ok(())
        } else {
            Err(PortalError::MissingElement(element))
        }
    }

    /// Switch tab and remember it. A storage failure is logged, the switch
    /// still happens.
    pub fn select_tab(&mut self, storage: &mut dyn Storage, tab: Tab) -> Result<(), PortalError> {
        self.require_tab(tab, "tab button")?;
        self.tab = tab;
        if let Err(e) = tabs::remember_tab(storage, tab) {
            warn!(error = %e, "Failed to remember tab");
        }
        Ok(())
    }

    pub fn next_tab(&mut self, storage: &mut dyn Storage) -> Result<(), PortalError> {
        let tab = self.tab.next_in(self.tabs());
        self.select_tab(storage, tab)
    }

    pub fn prev_tab(&mut self, storage: &mut dyn Storage) -> Result<(), PortalError> {
        let tab = self.tab.prev_in(self.tabs());
        self.select_tab(storage, tab)
    }

    pub fn check_exercise(&mut self, answer: &str) -> Result<ExerciseOutcome, PortalError> {
        self.require_tab(Tab::Exercise, "exercise feedback")?;
        let outcome = check_answer(answer);
        debug!(?outcome, "Exercise checked");
        self.exercise = Some(outcome);
        Ok(outcome)
    }

    /// Append a user chat message. `Ok(false)` when the text was blank.
    pub fn send_chat(&mut self, storage: &mut dyn Storage, text: &str) -> Result<bool, PortalError> {
        self.require_tab(Tab::Chat, "chat box")?;
        Ok(self.chat.send(storage, text)?)
    }

    pub fn accept_reply(&mut self, storage: &mut dyn Storage, reply: PendingReply) -> Result<bool, PortalError> {
        self.require_tab(Tab::Chat, "chat box")?;
        Ok(self.chat.accept_reply(storage, reply)?)
    }

    pub fn report(&self, date: NaiveDate) -> Result<String, PortalError> {
        self.require_tab(Tab::Report, "report box")?;
        Ok(daily_report(Some(&self.session.identifier), date, self.exercise))
    }
}
