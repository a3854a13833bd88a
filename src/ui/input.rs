//! Keyboard input handling for the TUI.
//!
//! This module translates keyboard events into application state changes.
//! Returns `true` from `handle_input` when the app should quit.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_password_char, can_add_username_char, App, LoginFocus, View};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.view {
        View::Login => handle_login_input(app, key),
        View::Home => handle_home_input(app, key),
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => {
                app.login_focus = LoginFocus::Password;
            }
            LoginFocus::Password | LoginFocus::Button => {
                app.submit_login();
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.chars().count(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }

    Ok(false)
}

fn handle_home_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            return Ok(true);
        }
        KeyCode::Char('l') => {
            app.logout();
        }
        KeyCode::Char('u') => {
            app.reload_home();
        }
        _ => {}
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SessionClient;
    use crate::config::Config;
    use crossterm::event::KeyModifiers;

    fn test_app() -> App {
        let api = SessionClient::new("http://127.0.0.1:1").unwrap();
        App::with_client(Config::default(), api)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_login_typing_appends_to_focused_field() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('a'))).unwrap();
        handle_input(&mut app, key(KeyCode::Char('l'))).unwrap();
        assert_eq!(app.login_username, "al");

        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        handle_input(&mut app, key(KeyCode::Char('p'))).unwrap();
        assert_eq!(app.login_password, "p");
        assert_eq!(app.login_username, "al");
    }

    #[test]
    fn test_multibyte_input_caps_by_characters_not_bytes() {
        let mut app = test_app();
        // 49 three-byte characters: well past the cap in bytes, one short
        // of it in characters
        app.login_username = "あ".repeat(49);
        handle_input(&mut app, key(KeyCode::Char('あ'))).unwrap();
        assert_eq!(app.login_username.chars().count(), 50);

        // At the cap, further input is dropped
        handle_input(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.login_username.chars().count(), 50);
    }

    #[test]
    fn test_login_backspace_edits_focused_field() {
        let mut app = test_app();
        app.login_username = "alice".to_string();
        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.login_username, "alic");
    }

    #[test]
    fn test_login_focus_cycles() {
        let mut app = test_app();
        assert_eq!(app.login_focus, LoginFocus::Username);
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.login_focus, LoginFocus::Password);
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.login_focus, LoginFocus::Button);
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.login_focus, LoginFocus::Username);
        handle_input(&mut app, key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.login_focus, LoginFocus::Button);
    }

    #[test]
    fn test_login_esc_quits() {
        let mut app = test_app();
        assert!(handle_input(&mut app, key(KeyCode::Esc)).unwrap());
    }

    #[tokio::test]
    async fn test_enter_on_password_submits() {
        let mut app = test_app();
        app.login_focus = LoginFocus::Password;
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.submitting);
    }

    #[tokio::test]
    async fn test_home_logout_key_navigates_to_login() {
        let mut app = test_app();
        app.navigate_to_home();
        handle_input(&mut app, key(KeyCode::Char('l'))).unwrap();
        assert_eq!(app.view, View::Login);
    }

    #[tokio::test]
    async fn test_home_quit_keys() {
        let mut app = test_app();
        app.navigate_to_home();
        assert!(handle_input(&mut app, key(KeyCode::Char('q'))).unwrap());
        assert!(handle_input(&mut app, key(KeyCode::Esc)).unwrap());
    }
}
