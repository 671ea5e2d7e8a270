//! Application state management for Lumi.
//!
//! This module contains the core `App` struct that owns the storage, the
//! session gate, the open dashboard and all form state, and coordinates the
//! background tasks (credential check, delayed chat replies).

use anyhow::Result;
use chrono::Local;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lumi_core::auth::{authenticate, Destination, LoginForm, SessionGate, UserRecord};
use lumi_core::dashboard::{Dashboard, PendingReply, Tab, Theme};
use lumi_core::storage::{FileStorage, MemoryStorage, Storage};
use lumi_core::{Config, PortalError};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channels.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for identifier input.
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Maximum length for secret input.
const MAX_SECRET_LENGTH: usize = 128;

/// Maximum length of an exercise answer.
const MAX_ANSWER_LENGTH: usize = 16;

/// Maximum length of one chat message.
const MAX_CHAT_LENGTH: usize = 280;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Identifier,
    Secret,
    Remember,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Identifier => LoginFocus::Secret,
            LoginFocus::Secret => LoginFocus::Remember,
            LoginFocus::Remember => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Identifier,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Identifier => LoginFocus::Button,
            LoginFocus::Secret => LoginFocus::Identifier,
            LoginFocus::Remember => LoginFocus::Secret,
            LoginFocus::Button => LoginFocus::Remember,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result of a credential check run off the input path
struct LoginChecked {
    form: LoginForm,
    record: Option<&'static UserRecord>,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub storage: Box<dyn Storage>,
    pub gate: SessionGate,
    save_config: bool,

    // UI State
    pub state: AppState,
    pub theme: Theme,
    pub dashboard: Option<Dashboard>,

    // Login form state
    pub login_identifier: String,
    pub login_secret: String,
    pub login_remember: bool,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    /// A submit is being checked; further submits are ignored
    pub login_pending: bool,

    // Dashboard inputs
    pub exercise_input: String,
    pub chat_input: String,
    pub report_text: Option<String>,

    // Background task channels
    login_rx: mpsc::Receiver<LoginChecked>,
    login_tx: mpsc::Sender<LoginChecked>,
    reply_rx: mpsc::Receiver<PendingReply>,
    reply_tx: mpsc::Sender<PendingReply>,
    /// Cancels pending chat replies when the dashboard goes away
    reply_token: CancellationToken,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create the application with on-disk configuration and storage
    pub fn new() -> Result<Self> {
        let config = Config::load();

        let storage: Box<dyn Storage> = match config.data_dir().map(|dir| FileStorage::open(&dir)) {
            Ok(Ok(storage)) => {
                debug!(path = %storage.path().display(), "Using file storage");
                Box::new(storage)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to open storage, nothing will be persisted");
                Box::new(MemoryStorage::new())
            }
            Err(e) => {
                warn!(error = %e, "No data directory, nothing will be persisted");
                Box::new(MemoryStorage::new())
            }
        };

        let mut app = Self::with_storage(config, storage);
        app.save_config = true;

        if let Ok(identifier) = std::env::var("LUMI_IDENTIFIER") {
            app.login_identifier = identifier;
        }

        Ok(app)
    }

    /// Create the application over an explicit storage. Configuration is
    /// never written back.
    pub fn with_storage(config: Config, storage: Box<dyn Storage>) -> Self {
        let (login_tx, login_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (reply_tx, reply_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let gate = SessionGate::with_lifetime_hours(config.session_ttl_hours);
        let theme = Theme::load(storage.as_ref());
        let login_identifier = config.last_identifier.clone().unwrap_or_default();

        Self {
            config,
            storage,
            gate,
            save_config: false,

            state: AppState::Normal,
            theme,
            dashboard: None,

            login_identifier,
            login_secret: String::new(),
            login_remember: false,
            login_focus: LoginFocus::Identifier,
            login_error: None,
            login_pending: false,

            exercise_input: String::new(),
            chat_input: String::new(),
            report_text: None,

            login_rx,
            login_tx,
            reply_rx,
            reply_tx,
            reply_token: CancellationToken::new(),

            status_message: None,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Open the dashboard for a stored session, or show the login form
    pub fn resume(&mut self) {
        match self.gate.current(self.storage.as_ref()) {
            Some(session) => {
                info!(role = %session.role, "Resuming stored session");
                self.open_dashboard(Destination::for_role(session.role));
            }
            None => self.start_login(),
        }
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_identifier.is_empty() {
            LoginFocus::Identifier
        } else {
            LoginFocus::Secret
        };
        self.login_error = None;
    }

    /// Submit the login form. The check runs as a background task; the
    /// result is applied by `check_background_tasks`.
    pub fn submit_login(&mut self) {
        if self.login_pending {
            debug!("Login already pending, ignoring submit");
            return;
        }
        self.login_pending = true;
        self.login_error = None;

        let form = LoginForm {
            identifier: self.login_identifier.clone(),
            secret: self.login_secret.clone(),
            remember: self.login_remember,
        };
        let tx = self.login_tx.clone();
        tokio::spawn(async move {
            let record = authenticate(&form.identifier, &form.secret);
            if tx.send(LoginChecked { form, record }).await.is_err() {
                warn!("Login result receiver dropped");
            }
        });
    }

    fn finish_login(&mut self, checked: LoginChecked) {
        self.login_pending = false;

        let result = match checked.record {
            Some(record) => self.gate.establish(self.storage.as_mut(), record, &checked.form),
            None => Err(PortalError::InvalidCredentials),
        };

        match result {
            Ok((session, destination)) => {
                self.login_secret.clear();
                if self.save_config {
                    self.config.last_identifier = Some(session.identifier.clone());
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save config");
                    }
                }
                self.open_dashboard(destination);
            }
            Err(e) => {
                debug!(error = %e, "Login failed");
                self.login_error = Some(e.user_message());
            }
        }
    }

    /// Guard and open a dashboard; a denied guard sends the user to login
    pub fn open_dashboard(&mut self, destination: Destination) {
        match Dashboard::open(&self.gate, self.storage.as_ref(), destination) {
            Ok(dashboard) => {
                info!(view = destination.view_id(), "Dashboard open");
                self.dashboard = Some(dashboard);
                self.exercise_input.clear();
                self.chat_input.clear();
                self.report_text = None;
                self.state = AppState::Normal;
            }
            Err(redirect) => {
                debug!(view = destination.view_id(), redirect = redirect.view_id(), "Guard redirected");
                self.close_dashboard();
                self.start_login();
            }
        }
    }

    fn close_dashboard(&mut self) {
        self.reply_token.cancel();
        self.reply_token = CancellationToken::new();
        self.dashboard = None;
    }

    pub fn logout(&mut self) {
        self.close_dashboard();
        self.gate.logout(self.storage.as_mut());
        self.status_message = Some("Sessão terminada.".to_string());
        self.start_login();
    }

    /// Stop background work before the loop exits
    pub fn shutdown(&mut self) {
        self.reply_token.cancel();
        self.state = AppState::Quitting;
    }

    // =========================================================================
    // Dashboard actions
    // =========================================================================

    pub fn current_tab(&self) -> Option<Tab> {
        self.dashboard.as_ref().map(|d| d.tab)
    }

    /// Whether typed characters go to a text field on the current tab
    pub fn is_typing(&self) -> bool {
        matches!(self.current_tab(), Some(Tab::Exercise) | Some(Tab::Chat))
    }

    pub fn toggle_theme(&mut self) {
        if let Err(e) = self.theme.toggle(self.storage.as_mut()) {
            warn!(error = %e, "Failed to save theme");
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if let Some(dashboard) = self.dashboard.as_mut() {
            log_skipped(dashboard.select_tab(self.storage.as_mut(), tab));
        }
    }

    pub fn select_tab_index(&mut self, index: usize) {
        let tab = self.dashboard.as_ref().and_then(|d| d.tabs().get(index).copied());
        if let Some(tab) = tab {
            self.select_tab(tab);
        }
    }

    pub fn next_tab(&mut self) {
        if let Some(dashboard) = self.dashboard.as_mut() {
            log_skipped(dashboard.next_tab(self.storage.as_mut()));
        }
    }

    pub fn prev_tab(&mut self) {
        if let Some(dashboard) = self.dashboard.as_mut() {
            log_skipped(dashboard.prev_tab(self.storage.as_mut()));
        }
    }

    pub fn check_exercise(&mut self) {
        if let Some(dashboard) = self.dashboard.as_mut() {
            log_skipped(dashboard.check_exercise(&self.exercise_input));
        }
    }

    /// Send the chat input and schedule the counterpart reply
    pub fn send_chat(&mut self) {
        let Some(dashboard) = self.dashboard.as_mut() else {
            return;
        };
        let text = std::mem::take(&mut self.chat_input);
        match dashboard.send_chat(self.storage.as_mut(), &text) {
            Ok(true) => {
                dashboard.chat.schedule_reply(
                    self.config.reply_delay(),
                    self.reply_token.child_token(),
                    self.reply_tx.clone(),
                );
            }
            Ok(false) => {}
            Err(PortalError::Storage(e)) => {
                warn!(error = %e, "Failed to persist chat");
                self.status_message = Some("Mensagem não guardada.".to_string());
                dashboard.chat.schedule_reply(
                    self.config.reply_delay(),
                    self.reply_token.child_token(),
                    self.reply_tx.clone(),
                );
            }
            Err(e) => {
                debug!(error = %e, "Chat send skipped");
                self.chat_input = text;
            }
        }
    }

    pub fn generate_report(&mut self) {
        if let Some(dashboard) = self.dashboard.as_ref() {
            match dashboard.report(Local::now().date_naive()) {
                Ok(text) => self.report_text = Some(text),
                Err(e) => debug!(error = %e, "Report skipped"),
            }
        }
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    /// Apply finished background work. Called once per loop iteration.
    pub fn check_background_tasks(&mut self) {
        while let Ok(checked) = self.login_rx.try_recv() {
            self.finish_login(checked);
        }

        while let Ok(reply) = self.reply_rx.try_recv() {
            match self.dashboard.as_mut() {
                Some(dashboard) => match dashboard.accept_reply(self.storage.as_mut(), reply) {
                    Ok(_) => {}
                    Err(PortalError::Storage(e)) => warn!(error = %e, "Failed to persist chat reply"),
                    Err(e) => debug!(error = %e, "Chat reply skipped"),
                },
                None => debug!("Chat reply arrived with no dashboard open"),
            }
        }
    }
}

/// Actions aimed at elements the current dashboard lacks are dropped quietly
fn log_skipped<T>(result: Result<T, PortalError>) {
    if let Err(e) = result {
        debug!(error = %e, "Action skipped");
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_identifier_char(current_len: usize, c: char) -> bool {
    current_len < MAX_IDENTIFIER_LENGTH && is_valid_input_char(c)
}

pub fn can_add_secret_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SECRET_LENGTH && is_valid_input_char(c)
}

pub fn can_add_answer_char(current_len: usize, c: char) -> bool {
    current_len < MAX_ANSWER_LENGTH && is_valid_input_char(c)
}

pub fn can_add_chat_char(current_len: usize, c: char) -> bool {
    current_len < MAX_CHAT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lumi_core::dashboard::{ExerciseOutcome, Sender, COUNTERPART_REPLY};
    use lumi_core::storage::{SESSION_KEY, THEME_KEY};

    fn app() -> App {
        App::with_storage(Config::default(), Box::new(MemoryStorage::new()))
    }

    async fn login(app: &mut App, identifier: &str, secret: &str) {
        app.login_identifier = identifier.to_string();
        app.login_secret = secret.to_string();
        app.submit_login();
        for _ in 0..16 {
            tokio::task::yield_now().await;
            app.check_background_tasks();
            if !app.login_pending {
                break;
            }
        }
        assert!(!app.login_pending, "login never completed");
    }

    #[tokio::test]
    async fn test_resume_without_session_shows_login() {
        let mut app = app();
        app.resume();
        assert_eq!(app.state, AppState::LoggingIn);
        assert!(app.dashboard.is_none());
    }

    #[tokio::test]
    async fn test_admin_login_opens_admin_dashboard() {
        let mut app = app();
        app.start_login();
        login(&mut app, "admin@escola.pt", "Admin123!").await;

        assert_eq!(app.state, AppState::Normal);
        assert!(app.login_error.is_none());
        assert!(app.login_secret.is_empty());
        let dashboard = app.dashboard.as_ref().unwrap();
        assert_eq!(dashboard.destination(), Destination::AdminDashboard);
        assert!(app.storage.get(SESSION_KEY).unwrap().contains("\"role\":\"admin\""));
    }

    #[tokio::test]
    async fn test_wrong_secret_shows_generic_error() {
        let mut app = app();
        app.start_login();
        login(&mut app, "admin@escola.pt", "wrong").await;

        assert_eq!(app.state, AppState::LoggingIn);
        assert_eq!(app.login_error.as_deref(), Some("Credenciais inválidas."));
        assert!(app.storage.get(SESSION_KEY).is_none());
        assert!(app.dashboard.is_none());
    }

    #[tokio::test]
    async fn test_double_submit_is_ignored() {
        let mut app = app();
        app.start_login();
        app.login_identifier = "ee@escola.pt".to_string();
        app.login_secret = "EE123!".to_string();
        app.submit_login();
        app.submit_login();
        assert!(app.login_pending);

        for _ in 0..16 {
            tokio::task::yield_now().await;
            app.check_background_tasks();
        }
        assert!(!app.login_pending);
        assert!(app.login_rx.try_recv().is_err());
        assert_eq!(
            app.dashboard.as_ref().map(|d| d.destination()),
            Some(Destination::GuardianDashboard)
        );
    }

    #[tokio::test]
    async fn test_resume_reopens_stored_session() {
        let mut app = app();
        login(&mut app, "professor@escola.pt", "Prof123!").await;

        let storage = std::mem::replace(&mut app.storage, Box::new(MemoryStorage::new()));
        let mut restarted = App::with_storage(Config::default(), storage);
        restarted.resume();
        assert_eq!(
            restarted.dashboard.as_ref().map(|d| d.destination()),
            Some(Destination::TeacherDashboard)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_message_and_delayed_reply() {
        let mut app = app();
        login(&mut app, "aluno@escola.pt", "Aluno123!").await;
        app.select_tab(Tab::Chat);
        assert!(app.is_typing());

        app.chat_input = "oi".to_string();
        app.send_chat();
        assert!(app.chat_input.is_empty());

        let chat = &app.dashboard.as_ref().unwrap().chat;
        assert_eq!(chat.len(), 1);
        assert_eq!(chat.messages()[0].sender, Sender::User);
        assert_eq!(chat.messages()[0].text, "oi");

        tokio::time::sleep(Duration::from_millis(650)).await;
        app.check_background_tasks();

        let chat = &app.dashboard.as_ref().unwrap().chat;
        assert_eq!(chat.len(), 2);
        assert_eq!(chat.messages()[1].sender, Sender::Counterpart);
        assert_eq!(chat.messages()[1].text, COUNTERPART_REPLY);

        let stored = app.storage.get("chat_aluno@escola.pt").unwrap();
        let persisted: Vec<serde_json::Value> = serde_json::from_str(&stored).unwrap();
        assert_eq!(persisted.len(), 2);

        // No further replies
        tokio::time::sleep(Duration::from_secs(5)).await;
        app.check_background_tasks();
        assert_eq!(app.dashboard.as_ref().unwrap().chat.len(), 2);
    }

    /// Memory storage that refuses to write chat history
    struct ChatWriteFails(MemoryStorage);

    impl Storage for ChatWriteFails {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), lumi_core::StorageError> {
            if key.starts_with("chat_") {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), lumi_core::StorageError> {
            self.0.remove(key)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_write_failure_still_replies() {
        let storage = ChatWriteFails(MemoryStorage::new());
        let mut app = App::with_storage(Config::default(), Box::new(storage));
        login(&mut app, "aluno@escola.pt", "Aluno123!").await;
        app.select_tab(Tab::Chat);

        app.chat_input = "oi".to_string();
        app.send_chat();
        assert_eq!(app.status_message.as_deref(), Some("Mensagem não guardada."));
        assert!(app.chat_input.is_empty());
        assert_eq!(app.dashboard.as_ref().unwrap().chat.len(), 1);

        tokio::time::sleep(Duration::from_millis(650)).await;
        app.check_background_tasks();

        let chat = &app.dashboard.as_ref().unwrap().chat;
        assert_eq!(chat.len(), 2);
        assert_eq!(chat.messages()[1].text, COUNTERPART_REPLY);
        assert!(app.storage.get("chat_aluno@escola.pt").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_cancels_pending_reply() {
        let mut app = app();
        login(&mut app, "aluno@escola.pt", "Aluno123!").await;
        app.select_tab(Tab::Chat);
        app.chat_input = "até amanhã".to_string();
        app.send_chat();

        app.logout();
        assert_eq!(app.state, AppState::LoggingIn);
        assert!(app.storage.get(SESSION_KEY).is_none());

        tokio::time::sleep(Duration::from_secs(1)).await;
        app.check_background_tasks();

        let stored = app.storage.get("chat_aluno@escola.pt").unwrap();
        let persisted: Vec<serde_json::Value> = serde_json::from_str(&stored).unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[tokio::test]
    async fn test_exercise_and_report() {
        let mut app = app();
        login(&mut app, "aluno@escola.pt", "Aluno123!").await;

        app.select_tab(Tab::Exercise);
        app.exercise_input = "60".to_string();
        app.check_exercise();
        assert_eq!(
            app.dashboard.as_ref().unwrap().exercise,
            Some(ExerciseOutcome::Correct)
        );

        app.select_tab(Tab::Report);
        app.generate_report();
        let report = app.report_text.as_deref().unwrap();
        assert!(report.starts_with("=== Relatório Diário ===\nAluno: Aluno\n"));
        assert!(report.contains("✅ Correto! Boa!"));
    }

    #[tokio::test]
    async fn test_theme_toggle_persists() {
        let mut app = app();
        assert_eq!(app.theme, Theme::Dark);
        app.toggle_theme();
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(app.storage.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_login_focus_cycle() {
        assert_eq!(LoginFocus::Identifier.next(), LoginFocus::Secret);
        assert_eq!(LoginFocus::Button.next(), LoginFocus::Identifier);
        assert_eq!(LoginFocus::Identifier.prev(), LoginFocus::Button);
        assert_eq!(LoginFocus::Remember.prev(), LoginFocus::Secret);
    }

    #[test]
    fn test_can_add_identifier_char() {
        assert!(can_add_identifier_char(0, 'a'));
        assert!(can_add_identifier_char(63, '@'));
        assert!(!can_add_identifier_char(64, 'a'));
        assert!(!can_add_identifier_char(0, '\x00'));
        assert!(!can_add_identifier_char(0, '\n'));
    }

    #[test]
    fn test_can_add_secret_char() {
        assert!(can_add_secret_char(0, 'a'));
        assert!(can_add_secret_char(127, '!'));
        assert!(!can_add_secret_char(128, 'a'));
        assert!(!can_add_secret_char(0, '\r'));
    }

    #[test]
    fn test_can_add_chat_and_answer_chars() {
        assert!(can_add_chat_char(279, 'ã'));
        assert!(!can_add_chat_char(280, 'a'));
        assert!(can_add_answer_char(0, '6'));
        assert!(!can_add_answer_char(16, '0'));
    }
}
