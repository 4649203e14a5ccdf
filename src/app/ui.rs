//! UI rendering for the pushbell TUI.
//!
//! One screen: the push token, the current notification (title, body, raw
//! data), and the available actions. Alerts and the permission prompt are
//! drawn as centered modal dialogs on top.

// Rust guideline compliant 2026-02

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{App, AppMode};
use crate::controller::ScreenState;

/// Creates a centered rectangle within a parent area.
///
/// # Arguments
///
/// * `percent_x` - Width of the centered rect as a percentage of parent width
/// * `percent_y` - Height of the centered rect as a percentage of parent height
/// * `parent` - The parent rectangle to center within
pub fn centered_rect(percent_x: u16, percent_y: u16, parent: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(parent);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Draws the whole screen.
pub fn render(frame: &mut Frame<'_>, screen: &ScreenState, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(7),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_token(frame, chunks[0], screen);
    render_notification(frame, chunks[1], screen);
    render_actions(frame, chunks[2]);
    render_status(frame, chunks[3], app);

    match app.mode() {
        AppMode::Normal => {}
        AppMode::Alert(message) => render_alert(frame, message),
        AppMode::PermissionPrompt => render_permission_prompt(frame),
    }
}

fn render_token(frame: &mut Frame<'_>, area: Rect, screen: &ScreenState) {
    let line = Line::from(vec![
        Span::raw("Your expo push token: "),
        Span::styled(screen.token.as_str(), Style::default().fg(Color::Cyan)),
    ]);
    let widget = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(" pushbell "))
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_notification(frame: &mut Frame<'_>, area: Rect, screen: &ScreenState) {
    let lines = vec![
        Line::from(format!("Title: {} ", screen.title.as_deref().unwrap_or_default())),
        Line::from(format!("Body: {}", screen.body.as_deref().unwrap_or_default())),
        Line::from(format!("Data: {}", screen.data.as_deref().unwrap_or_default())),
    ];
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Last notification "))
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_actions(frame: &mut Frame<'_>, area: Rect) {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("[l] ", key),
            Span::raw("Press to schedule a notification"),
        ]),
        Line::from(vec![
            Span::styled("[r] ", key),
            Span::raw("Press to schedule a notification (Remote)"),
        ]),
        Line::from(Span::styled(
            "This notification will not show up if you stay with the app opened! \
             So press [r] and quickly press [b] to put the app in background.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled("[b] ", key),
            Span::raw("Foreground/background   "),
            Span::styled("[t] ", key),
            Span::raw("Tap last notification   "),
            Span::styled("[q] ", key),
            Span::raw("Quit"),
        ]),
    ];
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Actions "))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let state = if app.is_foreground() {
        "foreground"
    } else {
        "background"
    };
    let text = match app.status() {
        Some(status) => format!(" {} | {} | {}", app.mode().display_name(), state, status),
        None => format!(" {} | {}", app.mode().display_name(), state),
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Black).bg(Color::Gray)),
        area,
    );
}

fn render_alert(frame: &mut Frame<'_>, message: &str) {
    let area = centered_rect(60, 30, frame.area());
    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Style::default().fg(Color::Yellow))),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Alert "))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_permission_prompt(frame: &mut Frame<'_>) {
    let area = centered_rect(60, 30, frame.area());
    let lines = vec![
        Line::from("\"pushbell\" would like to send you notifications"),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Allow", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[n] Don't Allow", Style::default().fg(Color::Red)),
        ]),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Notifications "))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::UiRequest;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                if let Some(cell) = buffer.cell((x, y)) {
                    text.push_str(cell.symbol());
                }
            }
            text.push('\n');
        }
        text
    }

    fn draw(screen: &ScreenState, app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("terminal");
        terminal
            .draw(|frame| render(frame, screen, app))
            .expect("draw");
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_centered_rect() {
        let parent = Rect::new(0, 0, 100, 50);
        let modal = centered_rect(50, 30, parent);
        assert_eq!(modal.width, 50);
        assert_eq!(modal.height, 15);
        assert_eq!(modal.x, 25);
    }

    #[test]
    fn test_renders_token_and_notification() {
        let screen = ScreenState {
            token: "ExponentPushToken[abc]".to_string(),
            title: Some("Hello".to_string()),
            body: Some("World".to_string()),
            data: Some(r#"{"data":"goes here"}"#.to_string()),
        };
        let text = draw(&screen, &App::new());
        assert!(text.contains("Your expo push token: ExponentPushToken[abc]"));
        assert!(text.contains("Title: Hello"));
        assert!(text.contains("Body: World"));
        assert!(text.contains(r#"Data: {"data":"goes here"}"#));
        assert!(text.contains("Press to schedule a notification (Remote)"));
    }

    #[test]
    fn test_renders_alert_modal() {
        let mut app = App::new();
        app.push_request(UiRequest::Alert("Must use physical device".into()));
        let text = draw(&ScreenState::default(), &app);
        assert!(text.contains("Must use physical device"));
        assert!(text.contains("[Enter] OK"));
    }

    #[test]
    fn test_renders_permission_prompt() {
        let mut app = App::new();
        let (tx, _rx) = tokio::sync::oneshot::channel();
        app.push_request(UiRequest::Permission(tx));
        let text = draw(&ScreenState::default(), &app);
        assert!(text.contains("Don't Allow"));
    }
}
