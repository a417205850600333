use glam::Vec2;
use rand::rngs::StdRng;
use ratatui::style::Color;

use crate::core::collision::{Combat, Pair, Payouts};
use crate::core::entity::{Aabb, Body, Chaos, Hero, Kind, Paddle, Puck, World};
use crate::core::physics::Locomotion;
use crate::core::session::{Counters, Ruleset, Scoreboard, Weapon};

use super::Marquee;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 400.0;

const PADDLE_W: f32 = 40.0;
const PADDLE_H: f32 = 20.0;
const PLAYER_HOME: Vec2 = Vec2::new(100.0, HEIGHT / 2.0);
const PLAYER_SPEED: f32 = 5.0;
const CPU_HOME: Vec2 = Vec2::new(WIDTH - 140.0, HEIGHT / 2.0);
const CPU_SPEED: f32 = 3.0;

const PUCK_RADIUS: f32 = 8.0;
const PUCK_BASE_SPEED: f32 = 7.0;
const PUCK_MAX_SPEED: f32 = 12.0;
const PUCK_ACCELERATION: f32 = 1.03;

const SHOT_REACH: f32 = 50.0;
pub const GOAL_SPAN: f32 = 60.0;

pub const MARQUEE: Marquee = Marquee {
    title: " Air Hockey ",
    accent: Color::Rgb(80, 200, 255),
    help: &[
        ("\u{2190}\u{2191}\u{2192}\u{2193}", "Move"),
        ("Space", "Shoot"),
        ("P", "Pause"),
        ("R", "Reset"),
        ("Esc", "Menu"),
    ],
};

pub fn rules() -> Ruleset {
    Ruleset {
        name: "hockey",
        field: Aabb::new(0.0, 0.0, WIDTH, HEIGHT),
        view_width: WIDTH,
        locomotion: Locomotion::Free {
            region: Aabb::new(0.0, 0.0, WIDTH / 2.0, HEIGHT),
        },
        weapon: Some(Weapon::PuckShot { reach: SHOT_REACH }),
        pairs: &[Pair::PuckWall, Pair::PuckGoal, Pair::PuckPaddle],
        payouts: Payouts::default(),
        combat: Combat::default(),
        burst: None,
        enemy_fire: None,
        start_lives: 0,
        fall_limit: None,
        goal_span: Some(GOAL_SPAN),
        verdicts: &[],
        carry_shots: false,
        scoreboard: Scoreboard::Versus,
        spawn_player,
        populate,
        advance,
    }
}

fn spawn_player() -> (Body, Hero) {
    (
        Body::rect(PLAYER_HOME.x, PLAYER_HOME.y, PADDLE_W, PADDLE_H),
        Hero::new(PLAYER_SPEED, PLAYER_HOME),
    )
}

fn populate(world: &mut World, _counters: &Counters, _rng: &mut StdRng) {
    world.spawn(
        Body::rect(CPU_HOME.x, CPU_HOME.y, PADDLE_W, PADDLE_H),
        Kind::Opponent(Paddle {
            speed: CPU_SPEED,
            home: CPU_HOME,
            region: Aabb::new(WIDTH / 2.0, 0.0, WIDTH / 2.0, HEIGHT),
        }),
    );
    world.spawn(
        Body::circle(WIDTH / 2.0, HEIGHT / 2.0, PUCK_RADIUS),
        Kind::Puck(Puck {
            base_speed: PUCK_BASE_SPEED,
            max_speed: PUCK_MAX_SPEED,
            acceleration: PUCK_ACCELERATION,
            wall_chaos: Chaos {
                chance: 0.15,
                boost: 1.15,
            },
            end_chaos: Chaos {
                chance: 0.1,
                boost: 1.1,
            },
        }),
    );
}

fn advance(_counters: &mut Counters) {}
