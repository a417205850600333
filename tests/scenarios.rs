//! End-to-end gameplay scenarios driven through the public session API.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rustcade_classics::core::collision::{self, Pair, Scene};
use rustcade_classics::core::entity::{
    AttackMode, Body, Boss, BossScript, Breed, Hero, Kind, Muzzle, Owner, PowerState, Shot,
    ShotSpec, World,
};
use rustcade_classics::core::session::{Counters, GameEvent};
use rustcade_classics::core::{Action, InputState, Session, Status};
use rustcade_classics::games::{hockey, invaders, platformer};

fn idle() -> InputState {
    InputState::new(1)
}

#[test]
fn test_shooting_a_resting_puck_sets_it_moving() {
    let mut session = Session::new(hockey::rules(), 3);
    // paddle centre 40 units left of the puck, no overlap
    session
        .world_mut()
        .player
        .body
        .place_box_at(Vec2::new(340.0, 190.0));
    assert_eq!(session.world().pucks[0].body.vel, Vec2::ZERO);

    let mut input = InputState::new(1);
    input.press(Action::Shoot);
    session.update(&input, 16);

    let vel = session.world().pucks[0].body.vel;
    assert_ne!(vel, Vec2::ZERO);
    assert!(vel.x > 0.0, "puck should travel away from the shooter: {vel:?}");
}

#[test]
fn test_shot_out_of_reach_does_nothing() {
    let mut session = Session::new(hockey::rules(), 3);
    let mut input = InputState::new(1);
    input.press(Action::Shoot);
    session.update(&input, 16);
    assert_eq!(session.world().pucks[0].body.vel, Vec2::ZERO);
}

#[test]
fn test_puck_through_left_mouth_scores_for_cpu() {
    let mut session = Session::new(hockey::rules(), 3);
    let puck = &mut session.world_mut().pucks[0];
    puck.body.pos = Vec2::new(5.0, 200.0);
    puck.body.vel = Vec2::new(-8.0, 0.0);

    session.update(&idle(), 16);

    assert_eq!(session.counters().opponent_score, 1);
    assert_eq!(session.counters().score, 0);
    assert!(session
        .events()
        .contains(&GameEvent::Goal { by_player: false }));
    let puck = session.world().pucks[0];
    assert_eq!(puck.body.center(), Vec2::new(400.0, 200.0));
    assert_eq!(puck.body.vel, Vec2::ZERO);
}

#[test]
fn test_puck_outside_mouth_rebounds() {
    let mut session = Session::new(hockey::rules(), 3);
    let puck = &mut session.world_mut().pucks[0];
    puck.body.pos = Vec2::new(795.0, 30.0);
    puck.body.vel = Vec2::new(8.0, 0.0);

    session.update(&idle(), 16);

    assert_eq!(session.counters().score, 0);
    assert_eq!(session.counters().opponent_score, 0);
    let puck = session.world().pucks[0];
    assert!(puck.body.aabb().right <= 800.0);
    assert_ne!(puck.body.vel, Vec2::ZERO);
}

/// Puts a weakened player right next to the first goomba, feet on the
/// ground, and runs one tick.
fn side_hit(lives: u32) -> Session {
    let mut session = Session::new(platformer::rules(), 21);
    session.counters_mut().lives = lives;
    let goomba = *session
        .world()
        .enemies
        .iter()
        .find(|e| matches!(e.kind, Kind::Enemy(w) if w.breed == Breed::Goomba))
        .expect("regular stage has goombas");
    let at = Vec2::new(goomba.body.pos.x - 10.0, platformer::GROUND_Y - 48.0);
    session.world_mut().player.body.place_box_at(at);
    assert!(session.world().hero().power.is_weakened());

    session.update(&idle(), 16);
    session
}

#[test]
fn test_weakened_side_hit_costs_a_life() {
    let session = side_hit(3);
    assert_eq!(session.counters().lives, 2);
    assert_eq!(session.status(), Status::Playing);
    assert!(session
        .events()
        .contains(&GameEvent::LifeLost { remaining: 2 }));
    // back at the spawn point
    assert_eq!(session.world().player.body.pos, Vec2::new(100.0, platformer::GROUND_Y - 50.0));
}

#[test]
fn test_last_life_lost_ends_the_game() {
    let session = side_hit(1);
    assert_eq!(session.counters().lives, 0);
    assert_eq!(session.status(), Status::GameOver);
    assert!(session.events().contains(&GameEvent::GameOver));
}

#[test]
fn test_player_shot_destroys_invader() {
    let mut session = Session::new(invaders::rules(), 8);
    let target = session.world().enemies[0];
    // formation marches 1 unit right before collisions run
    let at = target.body.center() + Vec2::new(1.0, 0.0);
    session.world_mut().spawn(
        Body::rect(at.x, at.y, 4.0, 10.0),
        Kind::Projectile(Shot {
            owner: Owner::Player,
            gravity: 0.0,
            bounce: None,
            spent: false,
        }),
    );

    session.update(&idle(), 16);

    let world = session.world();
    assert!(world.find(target.id).is_none());
    assert_eq!(world.enemies.len(), 49);
    assert!(world
        .projectiles
        .iter()
        .all(|e| e.shot().map(|s| s.owner) != Some(Owner::Player)));
    assert_eq!(session.counters().score, 10);
    assert_eq!(world.particles.len(), 5);
}

const BOSS_TOP: f32 = 382.0;

fn castle_world() -> World {
    let mut world = World::new(
        Body::rect(0.0, 0.0, 32.0, 48.0),
        Hero::new(5.0, Vec2::new(100.0, 412.0)),
    );
    world.spawn(
        Body::rect(1400.0, BOSS_TOP, 80.0, 80.0),
        Kind::Boss(Boss {
            script: BossScript::Castle {
                anchor_x: 1400.0,
                range: 100.0,
                floor_y: BOSS_TOP,
                jump: -15.0,
                gravity: 0.8,
            },
            health: 30,
            max_health: 30,
            speed: 1.5,
            dir: -1.0,
            mode: AttackMode::Walk,
            mode_timer: 0,
            grounded: true,
            shot: ShotSpec {
                size: Vec2::new(16.0, 16.0),
                vel: Vec2::new(4.0, -2.0),
                gravity: 0.2,
                bounce: None,
                muzzle: Muzzle::Center,
            },
        }),
    );
    world
}

/// Drops the player onto the boss's head and resolves the contact.
fn stomp(world: &mut World, counters: &mut Counters, events: &mut Vec<GameEvent>, rng: &mut StdRng) {
    let player = &mut world.player;
    player.body.place_box_at(Vec2::new(1420.0, BOSS_TOP - 40.0));
    player.body.vel = Vec2::new(0.0, 5.0);
    let rules = platformer::rules();
    let mut scene = Scene {
        world,
        counters,
        events,
        rng,
        now: 0,
    };
    collision::resolve(Pair::PlayerBoss, &mut scene, &rules);
}

fn boss_health(world: &World) -> Option<i32> {
    world.bosses.first().and_then(|e| e.boss()).map(|b| b.health)
}

#[test]
fn test_boss_takes_fifteen_stomps_and_pays_bonus_once() {
    let mut world = castle_world();
    let mut counters = Counters::default();
    let mut events = Vec::new();
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..5 {
        stomp(&mut world, &mut counters, &mut events, &mut rng);
    }
    assert_eq!(boss_health(&world), Some(20));
    assert_eq!(world.player.body.vel.y, -12.0);

    for _ in 5..15 {
        stomp(&mut world, &mut counters, &mut events, &mut rng);
    }
    assert_eq!(boss_health(&world), None);
    assert!(world.bosses.is_empty());
    assert_eq!(counters.score, 15 * 200 + 5000);
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == GameEvent::BossDefeated)
            .count(),
        1
    );

    // nothing left to hit
    stomp(&mut world, &mut counters, &mut events, &mut rng);
    assert_eq!(counters.score, 15 * 200 + 5000);
}

#[test]
fn test_boss_hurts_through_invulnerability() {
    let mut world = castle_world();
    {
        let hero = world.hero_mut();
        hero.power = PowerState::Big;
        hero.grant_invulnerability(0, 8000);
    }
    // side contact, level with the boss
    world
        .player
        .body
        .place_box_at(Vec2::new(1380.0, BOSS_TOP + 30.0));

    let mut counters = Counters {
        lives: 3,
        ..Counters::default()
    };
    let mut events = Vec::new();
    let mut rng = StdRng::seed_from_u64(1);
    let rules = platformer::rules();
    let mut scene = Scene {
        world: &mut world,
        counters: &mut counters,
        events: &mut events,
        rng: &mut rng,
        now: 100,
    };
    collision::resolve(Pair::PlayerBoss, &mut scene, &rules);

    assert_eq!(world.hero().power, PowerState::Small);
    // the star is cut down to the 2000 ms grace window
    assert_eq!(world.hero().invulnerable_until, 2100);
    assert!(events.contains(&GameEvent::PowerLost));
    assert_eq!(counters.lives, 3);
    assert_eq!(boss_health(&world), Some(30));
}

#[test]
fn test_removing_twice_is_a_no_op() {
    let mut session = Session::new(invaders::rules(), 2);
    let id = session.world().enemies[3].id;
    assert!(session.world_mut().remove(id).is_some());
    assert!(session.world_mut().remove(id).is_none());
    assert_eq!(session.world().enemies.len(), 49);
}

#[test]
fn test_restart_matches_a_fresh_session_for_every_game() {
    for rules in [
        hockey::rules(),
        rustcade_classics::games::coin_run::rules(),
        platformer::rules(),
        invaders::rules(),
    ] {
        let mut session = Session::new(rules, 99);
        let mut input = InputState::new(3);
        input.press(Action::MoveRight);
        input.press(Action::Shoot);
        for t in 0..30 {
            session.update(&input, t * 16);
        }
        session.counters_mut().score += 1234;

        let mut reset = InputState::new(1);
        reset.press(Action::Reset);
        session.update(&reset, 10_000);
        assert!(session.events().contains(&GameEvent::Restarted));

        let fresh = Session::new(rules, 99);
        assert_eq!(session.world(), fresh.world(), "{}", rules.name);
        assert_eq!(session.counters(), fresh.counters(), "{}", rules.name);
        assert_eq!(session.status(), Status::Playing);
    }
}
