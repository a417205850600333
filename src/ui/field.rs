use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::core::entity::{
    AttackMode, BossScript, Breed, Owner, PickupKind, PowerState, Solid, Tint,
};
use crate::core::session::{Hud, Scoreboard};
use crate::core::{Entity, Kind, Session, Status};
use crate::games::Marquee;

const BG: Color = Color::Rgb(0, 0, 5);
const EDGE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinKey {
    Player,
    PlayerBig,
    PlayerFire,
    Paddle,
    Puck,
    Spiky,
    Goomba,
    Koopa,
    Invader,
    Boss,
    BossAngry,
    Mothership,
    PlayerShot,
    EnemyShot,
    Coin,
    Mushroom,
    Flower,
    Star,
    Ground,
    Ledge,
    Pipe,
    Castle,
    Spark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skin {
    pub glyph: char,
    pub fg: Color,
}

const fn skin(glyph: char, fg: Color) -> Skin {
    Skin { glyph, fg }
}

/// Indexed by `SkinKey as usize`.
const SKINS: [Skin; 23] = [
    skin('█', Color::Rgb(230, 60, 60)),
    skin('█', Color::Rgb(255, 110, 80)),
    skin('█', Color::Rgb(255, 255, 255)),
    skin('▆', Color::Rgb(255, 80, 80)),
    skin('●', Color::Rgb(240, 240, 240)),
    skin('▲', Color::Rgb(255, 80, 80)),
    skin('▄', Color::Rgb(160, 90, 40)),
    skin('▄', Color::Rgb(60, 200, 60)),
    skin('▼', Color::Rgb(80, 255, 150)),
    skin('█', Color::Rgb(200, 50, 50)),
    skin('█', Color::Rgb(255, 120, 0)),
    skin('▀', Color::Rgb(200, 80, 255)),
    skin('│', Color::Rgb(255, 255, 200)),
    skin('╏', Color::Rgb(255, 100, 100)),
    skin('○', Color::Rgb(255, 215, 0)),
    skin('♠', Color::Rgb(255, 60, 60)),
    skin('✿', Color::Rgb(255, 140, 0)),
    skin('★', Color::Rgb(255, 255, 0)),
    skin('▓', Color::Rgb(139, 69, 19)),
    skin('▀', Color::Rgb(200, 120, 60)),
    skin('█', Color::Rgb(0, 170, 0)),
    skin('▒', Color::Rgb(110, 110, 120)),
    skin('·', Color::Rgb(255, 255, 255)),
];

impl SkinKey {
    pub fn of(entity: &Entity) -> SkinKey {
        match &entity.kind {
            Kind::Player(hero) => match hero.power {
                PowerState::Small => SkinKey::Player,
                PowerState::Big => SkinKey::PlayerBig,
                PowerState::Fire => SkinKey::PlayerFire,
            },
            Kind::Opponent(_) => SkinKey::Paddle,
            Kind::Puck(_) => SkinKey::Puck,
            Kind::Enemy(walker) => match walker.breed {
                Breed::Spiky => SkinKey::Spiky,
                Breed::Goomba => SkinKey::Goomba,
                Breed::Koopa => SkinKey::Koopa,
                Breed::Invader => SkinKey::Invader,
            },
            Kind::Boss(boss) => match (boss.script, boss.mode) {
                (BossScript::Mothership { .. }, _) => SkinKey::Mothership,
                (_, AttackMode::Fire) => SkinKey::BossAngry,
                _ => SkinKey::Boss,
            },
            Kind::Projectile(shot) => match shot.owner {
                Owner::Player => SkinKey::PlayerShot,
                Owner::Enemy => SkinKey::EnemyShot,
            },
            Kind::Pickup(pickup) => match pickup.kind {
                PickupKind::Coin => SkinKey::Coin,
                PickupKind::Mushroom => SkinKey::Mushroom,
                PickupKind::Flower => SkinKey::Flower,
                PickupKind::Star => SkinKey::Star,
            },
            Kind::Particle(_) => SkinKey::Spark,
            Kind::Solid(solid) => match solid {
                Solid::Ground => SkinKey::Ground,
                Solid::Ledge => SkinKey::Ledge,
                Solid::Pipe => SkinKey::Pipe,
                Solid::Castle => SkinKey::Castle,
            },
        }
    }

    pub fn skin(self) -> Skin {
        SKINS[self as usize]
    }
}

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Red => Color::Rgb(255, 60, 60),
        Tint::Orange => Color::Rgb(255, 140, 0),
        Tint::Yellow => Color::Rgb(255, 255, 0),
        Tint::Gold => Color::Rgb(255, 215, 0),
        Tint::Green => Color::Rgb(80, 255, 80),
        Tint::White => Color::Rgb(255, 255, 255),
    }
}

#[derive(Debug, Clone, Copy)]
struct Viewport {
    cols: usize,
    rows: usize,
    left: f32,
    top: f32,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(session: &Session, cols: usize, rows: usize) -> Self {
        let rules = session.rules();
        Self {
            cols,
            rows,
            left: session.camera_x(),
            top: rules.field.top,
            sx: cols as f32 / rules.view_width,
            sy: rows as f32 / rules.field.height(),
        }
    }

    fn col(&self, x: f32) -> i32 {
        ((x - self.left) * self.sx).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        ((y - self.top) * self.sy).floor() as i32
    }

    /// First column past `x`; an edge landing exactly on a cell boundary
    /// does not claim the next cell.
    fn col_end(&self, x: f32) -> i32 {
        ((x - self.left) * self.sx - EDGE_EPSILON).ceil() as i32
    }

    fn row_end(&self, y: f32) -> i32 {
        ((y - self.top) * self.sy - EDGE_EPSILON).ceil() as i32
    }

    /// Cell span covering `[a, b)`, at least one cell wide, clipped to
    /// the grid. `None` when entirely off screen.
    fn span(start: i32, end_exclusive: i32, limit: usize) -> Option<(usize, usize)> {
        let end = end_exclusive.max(start + 1);
        let lo = start.max(0);
        let hi = end.min(limit as i32);
        (lo < hi).then_some((lo as usize, hi as usize))
    }
}

type Grid = Vec<Vec<(char, Style)>>;

pub fn build_grid(session: &Session, cols: usize, rows: usize) -> Grid {
    let mut grid: Grid = vec![vec![(' ', Style::default().bg(BG)); cols]; rows];
    if cols == 0 || rows == 0 {
        return grid;
    }
    let view = Viewport::new(session, cols, rows);

    if let Some(span) = session.rules().goal_span {
        draw_rink(&mut grid, &view, session, span);
    }

    let hud = session.hud();
    let blink = (session.tick() / 4) % 2 == 0;
    for entity in session.world().renderable() {
        if matches!(entity.kind, Kind::Player(_))
            && hud.invulnerable
            && blink
            && hud.status == Status::Playing
        {
            continue;
        }
        let mut skin = SkinKey::of(entity).skin();
        if let Kind::Particle(spark) = entity.kind {
            skin.fg = tint_color(spark.tint);
            // bright while fresh, dots once mostly spent
            if spark.life * 2 > spark.max_life {
                skin.glyph = '*';
            }
        }
        let bold = matches!(entity.kind, Kind::Player(_) | Kind::Boss(_) | Kind::Puck(_));
        paint(&mut grid, &view, entity, skin, bold);
    }
    grid
}

fn paint(grid: &mut Grid, view: &Viewport, entity: &Entity, skin: Skin, bold: bool) {
    let b = entity.body.aabb();
    let Some((c0, c1)) = Viewport::span(view.col(b.left), view.col_end(b.right), view.cols) else {
        return;
    };
    let Some((r0, r1)) = Viewport::span(view.row(b.top), view.row_end(b.bottom), view.rows) else {
        return;
    };

    let mut style = Style::default().fg(skin.fg).bg(BG);
    if bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    for row in &mut grid[r0..r1] {
        for cell in &mut row[c0..c1] {
            *cell = (skin.glyph, style);
        }
    }
}

fn draw_rink(grid: &mut Grid, view: &Viewport, session: &Session, span: f32) {
    let field = session.rules().field;
    let line = Style::default().fg(Color::Rgb(60, 60, 90)).bg(BG);
    let mouth = Style::default().fg(Color::Rgb(255, 80, 80)).bg(BG);

    let mid = view.col(field.center().x).clamp(0, view.cols as i32 - 1) as usize;
    let goal_top = view.row(field.center().y - span).max(0) as usize;
    let goal_bottom = (view.row(field.center().y + span).max(0) as usize).min(view.rows - 1);
    for (r, row) in grid.iter_mut().enumerate() {
        row[mid] = ('┊', line);
        if (goal_top..=goal_bottom).contains(&r) {
            row[0] = ('▐', mouth);
            row[view.cols - 1] = ('▌', mouth);
        }
    }
}

pub fn render_cabinet(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    marquee: &Marquee,
    paused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(marquee.accent))
        .title(marquee.title)
        .title_style(
            Style::default()
                .fg(marquee.accent)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    let hud = session.hud();
    frame.render_widget(Paragraph::new(status_line(&hud)), chunks[0]);

    let fw = chunks[1].width as usize;
    let fh = chunks[1].height as usize;
    if fw > 0 && fh > 0 {
        let lines: Vec<Line> = build_grid(session, fw, fh)
            .into_iter()
            .map(|row| {
                Line::from(
                    row.into_iter()
                        .map(|(ch, style)| Span::styled(ch.to_string(), style))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    frame.render_widget(Paragraph::new(footer_line(&hud, marquee, paused)), chunks[2]);
}

fn sep() -> Span<'static> {
    Span::styled(" | ", Style::default().fg(Color::DarkGray))
}

fn score_span(label: &str, score: u32) -> Span<'static> {
    Span::styled(
        format!("{}: {} ", label, score),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )
}

fn lives_span(lives: u32) -> Span<'static> {
    Span::styled(
        format!("Lives: {}", "\u{2666} ".repeat(lives as usize)),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )
}

fn health_bar(health: i32, max: i32) -> String {
    const WIDTH: i32 = 10;
    let filled = if max > 0 {
        (health.max(0) * WIDTH + max - 1) / max
    } else {
        0
    };
    format!(
        "[{}{}] {}",
        "█".repeat(filled as usize),
        "░".repeat((WIDTH - filled) as usize),
        health.max(0)
    )
}

pub fn status_line(hud: &Hud) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    match hud.scoreboard {
        Scoreboard::Versus => {
            spans.push(score_span("You", hud.score));
            spans.push(sep());
            spans.push(Span::styled(
                format!("CPU: {} ", hud.opponent_score),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }
        Scoreboard::Collect => {
            spans.push(score_span("Score", hud.score));
            spans.push(sep());
            spans.push(Span::styled(
                format!("Coins left: {} ", hud.pickups_left),
                Style::default().fg(Color::Rgb(255, 215, 0)),
            ));
        }
        Scoreboard::WorldStage => {
            spans.push(score_span("Score", hud.score));
            spans.push(sep());
            spans.push(lives_span(hud.lives));
            spans.push(sep());
            spans.push(Span::styled(
                format!("World {}-{} ", hud.level, hud.stage),
                Style::default().fg(Color::Green),
            ));
            spans.push(sep());
            let power = match hud.power {
                PowerState::Small => "Small",
                PowerState::Big => "Big",
                PowerState::Fire => "Fire",
            };
            spans.push(Span::styled(
                format!("{} ", power),
                Style::default().fg(Color::Rgb(255, 140, 0)),
            ));
            if hud.invulnerable {
                spans.push(Span::styled(
                    "\u{2605} ",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ));
            }
        }
        Scoreboard::Waves => {
            spans.push(score_span("Score", hud.score));
            spans.push(sep());
            spans.push(lives_span(hud.lives));
            spans.push(sep());
            spans.push(Span::styled(
                format!("Wave: {} ", hud.level),
                Style::default().fg(Color::Green),
            ));
        }
    }
    if let Some((health, max)) = hud.boss_health {
        spans.push(sep());
        spans.push(Span::styled(
            format!("Boss {}", health_bar(health, max)),
            Style::default().fg(Color::Rgb(255, 80, 80)).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn footer_line(hud: &Hud, marquee: &Marquee, paused: bool) -> Line<'static> {
    match hud.status {
        Status::GameOver => Line::from(vec![
            Span::styled(
                " GAME OVER! ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Press ENTER to restart, Esc for menu",
                Style::default().fg(Color::Gray),
            ),
        ]),
        Status::Cleared => Line::from(vec![
            Span::styled(
                " YOU WIN! ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Press ENTER to play again, Esc for menu",
                Style::default().fg(Color::Gray),
            ),
        ]),
        Status::Playing if paused => Line::from(Span::styled(
            " PAUSED - Press P to resume ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Status::Playing => {
            let mut spans = vec![Span::raw(" ")];
            for (i, (key, action)) in marquee.help.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))));
                }
                spans.push(Span::styled(
                    format!("{} ", key),
                    Style::default().fg(marquee.accent).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(
                    format!("{} ", action),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{hockey, invaders, platformer};
    use glam::Vec2;

    fn glyph_count(grid: &Grid, glyph: char) -> usize {
        grid.iter().flatten().filter(|(c, _)| *c == glyph).count()
    }

    #[test]
    fn test_skin_table_matches_keys() {
        assert_eq!(SkinKey::Spark as usize, SKINS.len() - 1);
        assert_eq!(SkinKey::Coin.skin().glyph, '○');
        assert_eq!(SkinKey::Puck.skin().glyph, '●');
    }

    #[test]
    fn test_grid_has_requested_size() {
        let session = Session::new(hockey::rules(), 1);
        let grid = build_grid(&session, 80, 20);
        assert_eq!(grid.len(), 20);
        assert!(grid.iter().all(|row| row.len() == 80));
    }

    #[test]
    fn test_hockey_puck_sits_on_the_centre_line() {
        let session = Session::new(hockey::rules(), 1);
        let grid = build_grid(&session, 80, 40);
        // puck at (400, 200) with radius 8 covers columns 39..41
        assert_eq!(grid[20][39].0, '●');
        assert_eq!(grid[0][40].0, '┊');
        assert_eq!(grid[20][0].0, '▐');
        assert_eq!(grid[0][0].0, ' ');
    }

    #[test]
    fn test_formation_is_drawn() {
        let session = Session::new(invaders::rules(), 1);
        let grid = build_grid(&session, 80, 60);
        // 4x3 cells per invader, 50 of them
        assert_eq!(glyph_count(&grid, '▼'), 50 * 4 * 3);
    }

    #[test]
    fn test_camera_follows_the_player() {
        let pipe = SkinKey::Pipe.skin().fg;
        let mut session = Session::new(platformer::rules(), 1);
        // first pipe spans x 450..510; row 43 is below every coin
        let grid = build_grid(&session, 80, 51);
        assert_eq!(grid[43][48].1.fg, Some(pipe));

        session
            .world_mut()
            .player
            .body
            .place_box_at(Vec2::new(2000.0, 300.0));
        assert_eq!(session.camera_x(), 1600.0);
        let grid = build_grid(&session, 80, 51);
        // third pipe spans x 2000..2060, now columns 40..46
        assert_eq!(grid[43][45].1.fg, Some(pipe));
        assert_eq!(grid[43][48].0, ' ');
    }

    #[test]
    fn test_health_bar_rounds_up() {
        assert_eq!(health_bar(30, 30), format!("[{}] 30", "█".repeat(10)));
        assert!(health_bar(1, 30).starts_with("[█░"));
        assert!(health_bar(-2, 30).ends_with(" 0"));
    }

    #[test]
    fn test_status_line_shows_boss_health() {
        let mut session = Session::new(invaders::rules(), 1);
        session.counters_mut().level = 5;
        session.world_mut().enemies.clear();
        session.update(&crate::core::InputState::new(1), 16);
        assert_eq!(session.hud().boss_health, Some((20, 20)));

        let text: String = status_line(&session.hud())
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("Wave: 5"));
        assert!(text.contains("Boss ["));
    }
}
