use glam::Vec2;
use rand::rngs::StdRng;
use ratatui::style::Color;

use crate::core::collision::{Burst, Combat, Pair, Payouts};
use crate::core::entity::{
    Aabb, Body, Breed, Hero, Kind, Motion, Pickup, PickupKind, Solid, Walker, World,
};
use crate::core::physics::Locomotion;
use crate::core::session::{Counters, Ruleset, Scoreboard, Verdict};

use super::Marquee;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 400.0;
pub const GROUND_Y: f32 = HEIGHT - 60.0;

const PLAYER_W: f32 = 30.0;
const PLAYER_H: f32 = 40.0;
const PLAYER_SPEED: f32 = 5.0;
const SPAWN: Vec2 = Vec2::new(100.0, GROUND_Y - 60.0);

const COIN_SIZE: f32 = 20.0;
const SPIKY_SIZE: f32 = 25.0;

/// (x, height above ground, width)
const LEDGES: [(f32, f32, f32); 5] = [
    (200.0, 100.0, 150.0),
    (400.0, 180.0, 150.0),
    (600.0, 120.0, 150.0),
    (150.0, 260.0, 100.0),
    (500.0, 300.0, 150.0),
];

/// Top-left corners as (x, height above ground).
const COINS: [(f32, f32); 7] = [
    (250.0, 140.0),
    (450.0, 220.0),
    (650.0, 160.0),
    (200.0, 300.0),
    (550.0, 340.0),
    (300.0, 40.0),
    (500.0, 40.0),
];

/// (x, height above ground, patrol min, patrol max)
const SPIKIES: [(f32, f32, f32, f32); 2] = [
    (300.0, 30.0, 200.0, 350.0),
    (450.0, 200.0, 400.0, 550.0),
];

pub const MARQUEE: Marquee = Marquee {
    title: " Coin Run ",
    accent: Color::Rgb(255, 215, 0),
    help: &[
        ("\u{2190}\u{2192}", "Run"),
        ("\u{2191}/Space", "Jump"),
        ("P", "Pause"),
        ("R", "Restart"),
        ("Esc", "Menu"),
    ],
};

pub fn rules() -> Ruleset {
    Ruleset {
        name: "coin-run",
        field: Aabb::new(0.0, 0.0, WIDTH, HEIGHT),
        view_width: WIDTH,
        locomotion: Locomotion::Platformer {
            jump: -15.0,
            gravity: 0.8,
            friction: Some(0.8),
            jump_on_shoot: true,
        },
        weapon: None,
        pairs: &[Pair::PlayerPickup, Pair::PlayerEnemy],
        payouts: Payouts {
            coin: 100,
            ..Payouts::default()
        },
        combat: Combat::default(),
        burst: Some(Burst {
            count: 5,
            spread: Vec2::new(4.0, 3.0),
            bias_y: 1.0,
            lift: 1.0,
            gravity: 0.1,
            life: 30,
            size: 3.0,
        }),
        enemy_fire: None,
        start_lives: 1,
        fall_limit: Some(HEIGHT),
        goal_span: None,
        verdicts: &[Verdict::CollectedAllWins],
        carry_shots: false,
        scoreboard: Scoreboard::Collect,
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

fn populate(world: &mut World, _counters: &Counters, _rng: &mut StdRng) {
    world.spawn(
        Body::rect(0.0, GROUND_Y, WIDTH, HEIGHT - GROUND_Y),
        Kind::Solid(Solid::Ground),
    );
    for (x, rise, w) in LEDGES {
        world.spawn(Body::rect(x, GROUND_Y - rise, w, 20.0), Kind::Solid(Solid::Ledge));
    }

    let r = COIN_SIZE / 2.0;
    for (x, rise) in COINS {
        world.spawn(
            Body::circle(x + r, GROUND_Y - rise + r, r),
            Kind::Pickup(Pickup {
                kind: PickupKind::Coin,
                phase: 0.0,
                bob: 0.0,
            }),
        );
    }

    for (x, rise, min_x, max_x) in SPIKIES {
        world.spawn(
            Body::rect(x, GROUND_Y - rise, SPIKY_SIZE, SPIKY_SIZE),
            Kind::Enemy(Walker {
                breed: Breed::Spiky,
                speed: 1.0,
                dir: 1.0,
                motion: Motion::Patrol { min_x, max_x },
            }),
        );
    }
}

fn advance(_counters: &mut Counters) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{GameEvent, Session, Status};
    use crate::core::InputState;

    #[test]
    fn test_layout() {
        let session = Session::new(rules(), 0);
        let world = session.world();
        assert_eq!(world.solids.len(), 6);
        assert_eq!(world.pickups.len(), 7);
        assert_eq!(world.enemies.len(), 2);
    }

    #[test]
    fn test_last_coin_wins() {
        let mut session = Session::new(rules(), 0);
        let keep = session.world().pickups[0];
        let world = session.world_mut();
        world.pickups.retain(|e| e.id == keep.id);
        world.player.body.place_box_at(keep.body.aabb().center() - Vec2::new(15.0, 20.0));

        session.update(&InputState::new(1), 16);
        assert_eq!(session.status(), Status::Cleared);
        assert_eq!(session.counters().score, 100);
        assert!(session.events().contains(&GameEvent::Won));
        // the pickup burst
        assert_eq!(session.world().particles.len(), 5);
    }

    #[test]
    fn test_falling_off_ends_the_run() {
        let mut session = Session::new(rules(), 0);
        session.world_mut().solids.clear();
        let input = InputState::new(1);
        for t in 0..60 {
            session.update(&input, t * 16);
        }
        assert_eq!(session.status(), Status::GameOver);
        assert_eq!(session.counters().lives, 0);
    }
}
