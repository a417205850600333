use glam::Vec2;
use rand::rngs::StdRng;
use ratatui::style::Color;

use crate::core::behavior::EnemyFire;
use crate::core::collision::{Burst, Combat, Pair, Payouts};
use crate::core::entity::{
    Aabb, AttackMode, Body, Boss, BossScript, Breed, Hero, Kind, Motion, Muzzle, ShotSpec, Walker,
    World,
};
use crate::core::physics::Locomotion;
use crate::core::session::{Counters, Ruleset, Scoreboard, Verdict, Weapon};

use super::Marquee;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;

const CANNON_W: f32 = 50.0;
const CANNON_H: f32 = 30.0;
const SPAWN: Vec2 = Vec2::new(WIDTH / 2.0 - CANNON_W / 2.0, HEIGHT - 60.0);

const ROWS: usize = 5;
const COLS: usize = 10;
const INVADER_W: f32 = 40.0;
const INVADER_H: f32 = 30.0;

/// A mothership follows every wave divisible by this.
pub const BOSS_EVERY: u32 = 5;
/// `Counters::stage` while the mothership is up.
const BOSS_STAGE: u32 = 2;
const MOTHERSHIP_W: f32 = 120.0;
const MOTHERSHIP_H: f32 = 80.0;
const MOTHERSHIP_HP: i32 = 20;

const BULLET: ShotSpec = ShotSpec {
    size: Vec2::new(4.0, 10.0),
    vel: Vec2::new(0.0, -8.0),
    gravity: 0.0,
    bounce: None,
    muzzle: Muzzle::Top,
};

const fn bomb(speed: f32) -> ShotSpec {
    ShotSpec {
        size: Vec2::new(4.0, 10.0),
        vel: Vec2::new(0.0, speed),
        gravity: 0.0,
        bounce: None,
        muzzle: Muzzle::Bottom,
    }
}

pub const MARQUEE: Marquee = Marquee {
    title: " Invaders ",
    accent: Color::Rgb(80, 255, 80),
    help: &[
        ("\u{2190}\u{2192}", "Move"),
        ("Space", "Shoot"),
        ("P", "Pause"),
        ("R", "Restart"),
        ("Esc", "Menu"),
    ],
};

pub fn rules() -> Ruleset {
    Ruleset {
        name: "invaders",
        field: Aabb::new(0.0, 0.0, WIDTH, HEIGHT),
        view_width: WIDTH,
        locomotion: Locomotion::Rail,
        weapon: Some(Weapon::Blaster {
            cooldown_ms: 200,
            shot: BULLET,
            requires: None,
        }),
        pairs: &[Pair::ShotEnemy, Pair::ShotBoss, Pair::ShotPlayer],
        payouts: Payouts {
            shot_kill: 10,
            boss_hit: 50,
            boss_bonus: 500,
            ..Payouts::default()
        },
        combat: Combat::default(),
        burst: Some(Burst {
            count: 5,
            spread: Vec2::new(4.0, 4.0),
            bias_y: 0.5,
            lift: 0.0,
            gravity: 0.1,
            life: 20,
            size: 3.0,
        }),
        enemy_fire: Some(EnemyFire {
            chance: 0.005,
            shot: bomb(4.0),
        }),
        start_lives: 3,
        fall_limit: None,
        goal_span: None,
        verdicts: &[Verdict::InvadedLoses, Verdict::ClearedAdvances],
        carry_shots: true,
        scoreboard: Scoreboard::Waves,
        spawn_player,
        populate,
        advance,
    }
}

fn spawn_player() -> (Body, Hero) {
    (
        Body::rect(SPAWN.x, SPAWN.y, CANNON_W, CANNON_H),
        Hero::new(5.0, SPAWN),
    )
}

fn populate(world: &mut World, counters: &Counters, _rng: &mut StdRng) {
    if counters.stage == BOSS_STAGE {
        mothership(world);
    } else {
        formation(world);
    }
}

/// Wave N is followed by wave N+1, except that a wave divisible by
/// [`BOSS_EVERY`] is followed by the mothership first.
fn advance(counters: &mut Counters) {
    if counters.stage == BOSS_STAGE {
        counters.stage = 1;
        counters.level += 1;
    } else if counters.level % BOSS_EVERY == 0 {
        counters.stage = BOSS_STAGE;
    } else {
        counters.level += 1;
    }
}

fn formation(world: &mut World) {
    for row in 0..ROWS {
        for col in 0..COLS {
            world.spawn(
                Body::rect(
                    col as f32 * 60.0 + 100.0,
                    row as f32 * 40.0 + 50.0,
                    INVADER_W,
                    INVADER_H,
                ),
                Kind::Enemy(Walker {
                    breed: Breed::Invader,
                    speed: 1.0,
                    dir: 1.0,
                    motion: Motion::Formation { drop: 20.0 },
                }),
            );
        }
    }
}

fn mothership(world: &mut World) {
    world.spawn(
        Body::rect(WIDTH / 2.0 - MOTHERSHIP_W / 2.0, 50.0, MOTHERSHIP_W, MOTHERSHIP_H),
        Kind::Boss(Boss {
            script: BossScript::Mothership { fire_chance: 0.02 },
            health: MOTHERSHIP_HP,
            max_health: MOTHERSHIP_HP,
            speed: 2.0,
            dir: 1.0,
            mode: AttackMode::Walk,
            mode_timer: 0,
            grounded: true,
            shot: bomb(5.0),
        }),
    );
}
