use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::GAME_COUNT;
use crate::games::{coin_run, hockey, invaders, platformer, Marquee};

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════╗
 ║   ▄▀▀ █   ▄▀▄ ▄▀▀ ▄▀▀ █ ▄▀▀ ▄▀▀     ▄▀▄ █▀▄ ▄▀▀ ▄▀▄ █▀▄ █▀▀   ║
 ║   █   █   █▀█  ▀▄  ▀▄ █ █    ▀▄     █▀█ █▀▄ █   █▀█ █ █ █▀▀   ║
 ║    ▀▀ ▀▀▀ ▀ ▀ ▀▀  ▀▀  ▀  ▀▀ ▀▀      ▀ ▀ ▀ ▀  ▀▀ ▀ ▀ ▀▀  ▀▀▀   ║
 ╚═══════════════════════════════════════════════════════════════╝"#;

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    pitch: &'static str,
    marquee: Marquee,
    border_color: Color,
}

const GAME_TILES: [GameTile; GAME_COUNT] = [
    GameTile {
        key: "1",
        icon: "🏒",
        name: "Air Hockey",
        desc: "Outscore the\nCPU paddle!",
        pitch: "Knock the puck into the right-hand goal.",
        marquee: hockey::MARQUEE,
        border_color: Color::Rgb(40, 100, 140),
    },
    GameTile {
        key: "2",
        icon: "🪙",
        name: "Coin Run",
        desc: "Grab every coin,\ndodge the spikes!",
        pitch: "One life. Collect all seven coins to win.",
        marquee: coin_run::MARQUEE,
        border_color: Color::Rgb(140, 110, 20),
    },
    GameTile {
        key: "3",
        icon: "🍄",
        name: "Platformer",
        desc: "Four stages,\none castle boss!",
        pitch: "Stomp, power up, and topple the castle boss.",
        marquee: platformer::MARQUEE,
        border_color: Color::Rgb(140, 40, 40),
    },
    GameTile {
        key: "4",
        icon: "👾",
        name: "Invaders",
        desc: "Hold the line\nwave after wave!",
        pitch: "A mothership follows every fifth wave.",
        marquee: invaders::MARQUEE,
        border_color: Color::Rgb(40, 140, 40),
    },
];

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.marquee.accent };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("[{}] ", tile.key),
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];

    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };
    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(Span::styled(desc_line, Style::default().fg(desc_color))));
    }

    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn control_line(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<17}", key), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(action.to_string(), Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn game_controls(tile: &GameTile) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} {}", tile.icon, tile.name),
            Style::default().fg(tile.marquee.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", tile.pitch),
            Style::default().fg(Color::Rgb(100, 100, 120)),
        )),
        Line::from(""),
    ];
    lines.extend(
        tile.marquee
            .help
            .iter()
            .map(|(key, action)| control_line(key, action)),
    );
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize) {
    let selected_game = selected_game.min(GAME_COUNT - 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),  // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(7),  // Game tiles
            Constraint::Min(10),    // Controls area
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  ⚡ Four arcade classics, one terminal ⚡  ",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games: ←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, GAME_COUNT as u32); GAME_COUNT])
        .split(games_inner);
    for (i, tile) in GAME_TILES.iter().enumerate() {
        render_game_tile(frame, cols[i], tile, selected_game == i);
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let nav = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  🔧 Navigation",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )),
        control_line("Tab / Shift+Tab", "Switch tabs"),
        control_line("1-4", "Launch game"),
        control_line("← →", "Select game"),
        control_line("Enter", "Play selected"),
        control_line("Esc", "Return to Home"),
        control_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  🎮 In game",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )),
        control_line("R", "Restart"),
        control_line("P", "Pause / Unpause"),
        control_line("Enter", "Play again after the end"),
    ];
    let controls = Paragraph::new(nav).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    let tile = &GAME_TILES[selected_game];
    let game_ctrl = Paragraph::new(game_controls(tile)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tile.border_color))
            .title(format!(" 🎮 {} Control ", tile.name))
            .title_style(Style::default().fg(tile.marquee.accent).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Rgb(80, 80, 100)),
        ),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("RUST_LOG", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" sets the log level", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}
