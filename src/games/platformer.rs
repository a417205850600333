use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::style::Color;

use crate::core::collision::{Burst, Combat, Pair, Payouts};
use crate::core::entity::{
    Aabb, AttackMode, Body, Boss, BossScript, Bounce, Breed, Hero, Kind, Motion, Muzzle, Pickup,
    PickupKind, PowerState, ShotSpec, Solid, Walker, World,
};
use crate::core::physics::Locomotion;
use crate::core::session::{Counters, Ruleset, Scoreboard, Verdict, Weapon};

use super::Marquee;

pub const VIEW_WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 512.0;
pub const STAGE_WIDTH: f32 = 3200.0;
pub const GROUND_Y: f32 = 462.0;
pub const STAGES_PER_WORLD: u32 = 4;

const PLAYER_W: f32 = 32.0;
const PLAYER_H: f32 = 48.0;
const PLAYER_SPEED: f32 = 5.0;
const SPAWN: Vec2 = Vec2::new(100.0, GROUND_Y - 50.0);

const BOSS_SIZE: f32 = 80.0;
const BOSS_HEALTH: i32 = 30;

const FIREBALL: ShotSpec = ShotSpec {
    size: Vec2::new(8.0, 8.0),
    vel: Vec2::new(6.0, -1.0),
    gravity: 0.4,
    bounce: Some(Bounce {
        floor: 450.0,
        rebound: -4.0,
        damping: 0.8,
        remaining: 2,
    }),
    muzzle: Muzzle::Side,
};

const BOSS_FIREBALL: ShotSpec = ShotSpec {
    size: Vec2::new(16.0, 16.0),
    vel: Vec2::new(4.0, -2.0),
    gravity: 0.2,
    bounce: None,
    muzzle: Muzzle::Center,
};

/// (x, height above ground, width)
const LEDGES: [(f32, f32, f32); 8] = [
    (300.0, 100.0, 128.0),
    (500.0, 150.0, 96.0),
    (800.0, 120.0, 160.0),
    (1200.0, 180.0, 128.0),
    (1500.0, 100.0, 96.0),
    (1800.0, 200.0, 128.0),
    (2200.0, 120.0, 160.0),
    (2600.0, 150.0, 128.0),
];

/// (x, height)
const PIPES: [(f32, f32); 3] = [(450.0, 80.0), (1100.0, 120.0), (2000.0, 100.0)];

const PATROL_XS: [f32; 8] = [400.0, 650.0, 950.0, 1300.0, 1650.0, 2100.0, 2500.0, 2800.0];

const POWER_UPS: [(f32, f32, PickupKind); 3] = [
    (350.0, 130.0, PickupKind::Mushroom),
    (850.0, 150.0, PickupKind::Flower),
    (1550.0, 130.0, PickupKind::Star),
];

/// (x, height above ground, width)
const CASTLE_LEDGES: [(f32, f32, f32); 4] = [
    (200.0, 100.0, 200.0),
    (500.0, 150.0, 150.0),
    (800.0, 200.0, 200.0),
    (1200.0, 120.0, 300.0),
];

pub const MARQUEE: Marquee = Marquee {
    title: " Platformer ",
    accent: Color::Rgb(255, 90, 90),
    help: &[
        ("\u{2190}\u{2192}", "Run"),
        ("\u{2191}", "Jump"),
        ("Space", "Fireball"),
        ("P", "Pause"),
        ("R", "Restart"),
        ("Esc", "Menu"),
    ],
};

pub fn rules() -> Ruleset {
    Ruleset {
        name: "platformer",
        field: Aabb::new(0.0, 0.0, STAGE_WIDTH, HEIGHT),
        view_width: VIEW_WIDTH,
        locomotion: Locomotion::Platformer {
            jump: -15.0,
            gravity: 0.8,
            friction: None,
            jump_on_shoot: false,
        },
        weapon: Some(Weapon::Blaster {
            cooldown_ms: 300,
            shot: FIREBALL,
            requires: Some(PowerState::Fire),
        }),
        pairs: &[
            Pair::ShotPlayer,
            Pair::PlayerEnemy,
            Pair::PlayerBoss,
            Pair::ShotEnemy,
            Pair::PlayerPickup,
        ],
        payouts: Payouts {
            stomp: 100,
            touch_kill: 100,
            shot_kill: 200,
            boss_stomp: 200,
            boss_hit: 0,
            boss_bonus: 5000,
            coin: 200,
            power_up: 1000,
        },
        combat: Combat {
            stomp_zone: Some(0.5),
            stomp_bounce: -10.0,
            boss_stomp_zone: 0.25,
            boss_stomp_damage: 2,
            boss_bounce: -12.0,
            shot_damage: 1,
            grace_ms: 2000,
            star_ms: 8000,
        },
        burst: Some(Burst {
            count: 5,
            spread: Vec2::new(8.0, 8.0),
            bias_y: 0.5,
            lift: 2.0,
            gravity: 0.3,
            life: 30,
            size: 4.0,
        }),
        enemy_fire: None,
        start_lives: 3,
        fall_limit: Some(HEIGHT + 100.0),
        goal_span: None,
        verdicts: &[Verdict::ClearedAdvances],
        carry_shots: false,
        scoreboard: Scoreboard::WorldStage,
        spawn_player,
        populate,
        advance,
    }
}

fn spawn_player() -> (Body, Hero) {
    (
        Body::rect(SPAWN.x, SPAWN.y, PLAYER_W, PLAYER_H),
        Hero::new(PLAYER_SPEED, SPAWN),
    )
}

fn populate(world: &mut World, counters: &Counters, rng: &mut StdRng) {
    if counters.stage == STAGES_PER_WORLD {
        castle_stage(world);
    } else {
        regular_stage(world, rng);
    }
}

fn advance(counters: &mut Counters) {
    counters.stage += 1;
    if counters.stage > STAGES_PER_WORLD {
        counters.stage = 1;
        counters.level += 1;
    }
}

fn ground(world: &mut World, kind: Solid) {
    world.spawn(
        Body::rect(0.0, GROUND_Y, STAGE_WIDTH, HEIGHT - GROUND_Y),
        Kind::Solid(kind),
    );
}

fn koopa(world: &mut World, x: f32) {
    walker(world, x, Breed::Koopa, 28.0, 32.0, 1.5);
}

fn goomba(world: &mut World, x: f32) {
    walker(world, x, Breed::Goomba, 24.0, 24.0, 1.0);
}

fn walker(world: &mut World, x: f32, breed: Breed, w: f32, h: f32, speed: f32) {
    world.spawn(
        Body::rect(x, GROUND_Y - h, w, h),
        Kind::Enemy(Walker {
            breed,
            speed,
            dir: -1.0,
            motion: Motion::Patrol {
                min_x: 0.0,
                max_x: STAGE_WIDTH,
            },
        }),
    );
}

fn coin(world: &mut World, x: f32, y: f32) {
    world.spawn(
        Body::circle(x + 8.0, y + 8.0, 8.0),
        Kind::Pickup(Pickup {
            kind: PickupKind::Coin,
            phase: 0.0,
            bob: 0.0,
        }),
    );
}

fn regular_stage(world: &mut World, rng: &mut StdRng) {
    ground(world, Solid::Ground);
    for (x, rise, w) in LEDGES {
        world.spawn(Body::rect(x, GROUND_Y - rise, w, 20.0), Kind::Solid(Solid::Ledge));
    }
    for (x, h) in PIPES {
        world.spawn(Body::rect(x, GROUND_Y - h, 60.0, h), Kind::Solid(Solid::Pipe));
    }

    // every third patrol is a koopa
    for (i, x) in PATROL_XS.into_iter().enumerate() {
        if i % 3 == 0 {
            koopa(world, x);
        } else {
            goomba(world, x);
        }
    }

    for i in 0..15 {
        let x = 200.0 + i as f32 * 200.0 + rng.gen::<f32>() * 100.0;
        let y = GROUND_Y - 60.0 - rng.gen::<f32>() * 100.0;
        coin(world, x, y);
    }

    for (x, rise, kind) in POWER_UPS {
        world.spawn(
            Body::rect(x, GROUND_Y - rise, 24.0, 24.0),
            Kind::Pickup(Pickup {
                kind,
                phase: 0.0,
                bob: 0.5,
            }),
        );
    }
}

fn castle_stage(world: &mut World) {
    ground(world, Solid::Castle);
    for (x, rise, w) in CASTLE_LEDGES {
        world.spawn(Body::rect(x, GROUND_Y - rise, w, 20.0), Kind::Solid(Solid::Castle));
    }

    let anchor_x = 1400.0;
    let floor_y = GROUND_Y - BOSS_SIZE;
    world.spawn(
        Body::rect(anchor_x, floor_y, BOSS_SIZE, BOSS_SIZE),
        Kind::Boss(Boss {
            script: BossScript::Castle {
                anchor_x,
                range: 100.0,
                floor_y,
                jump: -15.0,
                gravity: 0.8,
            },
            health: BOSS_HEALTH,
            max_health: BOSS_HEALTH,
            speed: 1.5,
            dir: -1.0,
            mode: AttackMode::Walk,
            mode_timer: 0,
            grounded: true,
            shot: BOSS_FIREBALL,
        }),
    );

    koopa(world, 300.0);
    koopa(world, 600.0);

    for i in 0..8 {
        coin(world, 300.0 + i as f32 * 150.0, GROUND_Y - 80.0);
    }
}
