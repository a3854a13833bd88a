use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, HomeState, LoginFocus, View};

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    match app.view {
        View::Login => render_login(frame, app, chunks[1]),
        View::Home => render_home(frame, app, chunks[1]),
    }
    render_status_bar(frame, app, chunks[2]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  hallpass";
    let right = format!("{} ", app.api.base_url());

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + right.len()),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    // Fixed size dialog - taller when an error line is shown
    let height = if app.login_error.is_some() { 11 } else { 9 };
    let dialog = centered_rect_fixed(46, height, area);

    frame.render_widget(Clear, dialog);

    let mut lines = vec![
        Line::from(Span::styled("  Sign in", styles::title_style())),
        Line::from(""),
    ];

    // Username field (44 interior, field 16 chars)
    let username_focused = app.login_focus == LoginFocus::Username;
    let username_style = if username_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    let username_display = format!("{:<16}", app.login_username);
    let cursor = if username_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Username: [", styles::muted_style()),
        Span::styled(format!("{}{}", username_display, cursor), username_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field (masked)
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    let password_masked: String = "*".repeat(app.login_password.chars().count().min(16));
    let password_display = format!("{:<16}", password_masked);
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{}{}", password_display, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Login button
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_label = if app.submitting {
        "  Signing in...  "
    } else if button_focused {
        "   ▶ Login ◀   "
    } else {
        "     Login     "
    };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("           ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    // Inline error below the form
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.home {
        HomeState::Loading => vec![
            Line::from(""),
            Line::from(Span::styled("  Loading...", styles::muted_style())),
        ],
        HomeState::Loaded(ref message) => vec![
            Line::from(Span::styled("  Protected Home", styles::title_style())),
            Line::from(""),
            Line::from(Span::raw(format!("  {}", message))),
        ],
        HomeState::Error(ref reason) => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  Error: {}", reason),
                styles::error_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Press [u] to retry.",
                styles::muted_style(),
            )),
        ],
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.view {
        View::Login if app.submitting => " Signing in... ".to_string(),
        View::Login => " Enter credentials ".to_string(),
        View::Home => " Session active ".to_string(),
    };

    let shortcuts = match app.view {
        View::Login => "[Tab] Next field | [Enter] Submit | [Esc] Quit",
        View::Home => "[l]ogout | [u]pdate | [q]uit",
    };
    let right_text = format!(" {} ", shortcuts);

    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside_parent() {
        let parent = Rect::new(0, 0, 100, 40);
        let rect = centered_rect_fixed(46, 10, parent);
        assert_eq!(rect.width, 46);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.x, 27);
        assert_eq!(rect.y, 15);
    }

    #[test]
    fn test_centered_rect_clamps_to_small_parent() {
        let parent = Rect::new(0, 0, 30, 6);
        let rect = centered_rect_fixed(46, 10, parent);
        assert!(rect.width <= parent.width);
        assert!(rect.height <= parent.height);
    }
}
