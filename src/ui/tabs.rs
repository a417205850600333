use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};
use crate::core::Status;
use crate::games::{Cabinet, Game};

/// Marker after a game's title: lost, won or paused, then the running score.
fn badge(cabinet: &Cabinet) -> String {
    let mark = if cabinet.is_game_over() {
        " ✗"
    } else if cabinet.session().status() == Status::Cleared {
        " ✓"
    } else if cabinet.is_paused() {
        " ‖"
    } else {
        ""
    };
    match cabinet.get_score() {
        0 => mark.to_string(),
        score => format!("{mark} {score}"),
    }
}

fn cabinet(app: &App, tab: Tab) -> Option<&Cabinet> {
    match tab {
        Tab::Home => None,
        Tab::Hockey => Some(&app.hockey),
        Tab::CoinRun => Some(&app.coin_run),
        Tab::Platformer => Some(&app.platformer),
        Tab::Invaders => Some(&app.invaders),
    }
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|&t| {
            let game = cabinet(app, t);
            let accent = game.map_or(Color::Rgb(120, 120, 140), |g| g.marquee().accent);
            let style = if t == app.current_tab {
                Style::default()
                    .fg(Color::Rgb(255, 220, 80))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(accent)
            };
            let mut spans = vec![Span::styled(t.title().to_string(), style)];
            if let Some(g) = game {
                let mark = badge(g);
                if !mark.is_empty() {
                    spans.push(Span::styled(mark, Style::default().fg(Color::Rgb(160, 160, 180))));
                }
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
                .border_type(BorderType::Rounded)
                .title(" 🕹 RustCade Classics ")
                .title_style(
                    Style::default()
                        .fg(Color::Rgb(200, 120, 255))
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(app.current_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}
