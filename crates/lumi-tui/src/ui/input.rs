//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use lumi_core::dashboard::Tab;

use crate::app::{
    can_add_answer_char, can_add_chat_char, can_add_identifier_char, can_add_secret_char, App,
    AppState, LoginFocus,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
        app.state = AppState::Quitting;
        return true;
    }

    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('y') | KeyCode::Char('Y')
            | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Shortcuts that work even while a text field has the keyboard
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('t') => app.toggle_theme(),
            KeyCode::Char('l') => app.logout(),
            _ => {}
        }
        return false;
    }

    // Tab navigation
    match key.code {
        KeyCode::Right | KeyCode::Tab => {
            app.next_tab();
            return false;
        }
        KeyCode::Left | KeyCode::BackTab => {
            app.prev_tab();
            return false;
        }
        _ => {}
    }

    match app.current_tab() {
        Some(Tab::Exercise) => handle_exercise_input(app, key),
        Some(Tab::Chat) => handle_chat_input(app, key),
        Some(Tab::Report) if matches!(key.code, KeyCode::Enter | KeyCode::Char('g')) => {
            app.generate_report();
        }
        _ => handle_global_key(app, key),
    }

    app.state == AppState::Quitting
}

/// Single-letter shortcuts, used on tabs without a text field
fn handle_global_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Char(c @ '1'..='5') => {
            let index = (c as usize) - ('1' as usize);
            app.select_tab_index(index);
        }
        _ => {}
    }
}

fn handle_exercise_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.check_exercise(),
        KeyCode::Backspace => {
            app.exercise_input.pop();
        }
        KeyCode::Esc => {
            if app.exercise_input.is_empty() {
                app.state = AppState::ConfirmingQuit;
            } else {
                app.exercise_input.clear();
            }
        }
        KeyCode::Char(c) => {
            if can_add_answer_char(app.exercise_input.chars().count(), c) {
                app.exercise_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_chat_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.send_chat(),
        KeyCode::Backspace => {
            app.chat_input.pop();
        }
        KeyCode::Esc => {
            if app.chat_input.is_empty() {
                app.state = AppState::ConfirmingQuit;
            } else {
                app.chat_input.clear();
            }
        }
        KeyCode::Char(c) => {
            if can_add_chat_char(app.chat_input.chars().count(), c) {
                app.chat_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Identifier => app.login_focus = LoginFocus::Secret,
            LoginFocus::Secret => app.submit_login(),
            LoginFocus::Remember => app.login_remember = !app.login_remember,
            LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Identifier => {
                app.login_identifier.pop();
            }
            LoginFocus::Secret => {
                app.login_secret.pop();
            }
            LoginFocus::Remember | LoginFocus::Button => {}
        },
        KeyCode::Char(' ') if app.login_focus == LoginFocus::Remember => {
            app.login_remember = !app.login_remember;
        }
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Identifier => {
                if can_add_identifier_char(app.login_identifier.chars().count(), c) {
                    app.login_identifier.push(c);
                }
            }
            LoginFocus::Secret => {
                if can_add_secret_char(app.login_secret.chars().count(), c) {
                    app.login_secret.push(c);
                }
            }
            LoginFocus::Remember | LoginFocus::Button => {}
        },
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumi_core::auth::Destination;
    use lumi_core::storage::MemoryStorage;
    use lumi_core::Config;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            handle_input(app, key(KeyCode::Char(c)));
        }
    }

    async fn signed_in(identifier: &str, secret: &str) -> App {
        let mut app = App::with_storage(Config::default(), Box::new(MemoryStorage::new()));
        app.resume();
        type_str(&mut app, identifier);
        handle_input(&mut app, key(KeyCode::Tab));
        type_str(&mut app, secret);
        handle_input(&mut app, key(KeyCode::Enter));
        for _ in 0..16 {
            tokio::task::yield_now().await;
            app.check_background_tasks();
        }
        app
    }

    #[tokio::test]
    async fn test_login_through_keyboard() {
        let app = signed_in("professor@escola.pt", "Prof123!").await;
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(
            app.dashboard.as_ref().map(|d| d.destination()),
            Some(Destination::TeacherDashboard)
        );
    }

    #[tokio::test]
    async fn test_space_toggles_remember() {
        let mut app = App::with_storage(Config::default(), Box::new(MemoryStorage::new()));
        app.start_login();
        app.login_focus = LoginFocus::Remember;
        handle_input(&mut app, key(KeyCode::Char(' ')));
        assert!(app.login_remember);
        handle_input(&mut app, key(KeyCode::Enter));
        assert!(!app.login_remember);
    }

    #[tokio::test]
    async fn test_digits_select_tabs() {
        let mut app = signed_in("aluno@escola.pt", "Aluno123!").await;
        handle_input(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.current_tab(), Some(Tab::Report));
        handle_input(&mut app, key(KeyCode::Char('g')));
        assert!(app.report_text.is_some());
    }

    #[tokio::test]
    async fn test_letters_go_to_exercise_field() {
        let mut app = signed_in("aluno@escola.pt", "Aluno123!").await;
        app.select_tab(Tab::Exercise);

        type_str(&mut app, "60 q");
        assert_eq!(app.exercise_input, "60 q");
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.dashboard.as_ref().and_then(|d| d.exercise),
            Some(lumi_core::dashboard::ExerciseOutcome::Correct)
        );
    }

    #[tokio::test]
    async fn test_ctrl_shortcuts_work_while_typing() {
        let mut app = signed_in("aluno@escola.pt", "Aluno123!").await;
        app.select_tab(Tab::Chat);
        let before = app.theme;

        handle_input(&mut app, ctrl('t'));
        assert_ne!(app.theme, before);
        assert!(app.chat_input.is_empty());

        handle_input(&mut app, ctrl('l'));
        assert_eq!(app.state, AppState::LoggingIn);
        assert!(app.dashboard.is_none());
    }

    #[tokio::test]
    async fn test_quit_confirmation() {
        let mut app = signed_in("ee@escola.pt", "EE123!").await;
        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))));
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q')));
        assert!(handle_input(&mut app, key(KeyCode::Enter)));
    }
}
