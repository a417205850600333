use glam::Vec2;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rustcade_classics::core::collision::{self, Pair, Scene};
use rustcade_classics::core::entity::{
    Aabb, AttackMode, Body, Boss, BossScript, Hero, Kind, Muzzle, Owner, Shot, ShotSpec, Spark,
    Tint, World,
};
use rustcade_classics::core::physics;
use rustcade_classics::core::session::Counters;
use rustcade_classics::games::invaders;

fn coord() -> impl Strategy<Value = f32> {
    -1000.0f32..1000.0
}

fn extent() -> impl Strategy<Value = f32> {
    0.5f32..300.0
}

fn rect() -> impl Strategy<Value = Body> {
    (coord(), coord(), extent(), extent()).prop_map(|(x, y, w, h)| Body::rect(x, y, w, h))
}

fn circle() -> impl Strategy<Value = Body> {
    (coord(), coord(), 0.5f32..50.0).prop_map(|(x, y, r)| Body::circle(x, y, r))
}

fn body() -> impl Strategy<Value = Body> {
    prop_oneof![rect(), circle()]
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in body(), b in body()) {
        prop_assert_eq!(collision::overlaps(&a, &b), collision::overlaps(&b, &a));
    }

    #[test]
    fn a_body_overlaps_itself(a in body()) {
        prop_assert!(collision::overlaps(&a, &a));
    }

    #[test]
    fn integration_adds_one_tick_of_velocity(
        a in body(),
        vx in -20.0f32..20.0,
        vy in -20.0f32..20.0,
    ) {
        let mut moved = a.with_vel(Vec2::new(vx, vy));
        physics::integrate(&mut moved);
        prop_assert_eq!(moved.pos, a.pos + Vec2::new(vx, vy));
        prop_assert_eq!(moved.size(), a.size());
    }

    #[test]
    fn clamped_body_stays_inside(a in rect(), vx in -50.0f32..50.0, vy in -50.0f32..50.0) {
        let bounds = Aabb::new(0.0, 0.0, 800.0, 600.0);
        let mut moved = a.with_vel(Vec2::new(vx, vy));
        physics::integrate(&mut moved);
        physics::clamp_into(&mut moved, bounds);
        let b = moved.aabb();
        if a.size().x <= 800.0 && a.size().y <= 600.0 {
            prop_assert!(b.left >= 0.0 && b.right <= 800.0 + 1e-3);
            prop_assert!(b.top >= 0.0 && b.bottom <= 600.0 + 1e-3);
        }
    }

    #[test]
    fn particle_life_counts_down_then_expires(life in 1u32..120, gravity in 0.0f32..1.0) {
        let mut world = World::new(
            Body::rect(0.0, 0.0, 1.0, 1.0),
            Hero::new(1.0, Vec2::ZERO),
        );
        world.spawn(
            Body::rect(10.0, 10.0, 2.0, 2.0).with_vel(Vec2::new(1.0, -1.0)),
            Kind::Particle(Spark { life, max_life: life, gravity, tint: Tint::White }),
        );

        for _ in 0..life {
            let before = match world.particles[0].kind {
                Kind::Particle(s) => s.life,
                _ => unreachable!(),
            };
            let entity = &mut world.particles[0];
            if let Kind::Particle(spark) = &mut entity.kind {
                physics::step_spark(&mut entity.body, spark);
                prop_assert_eq!(spark.life, before - 1);
            }
        }
        prop_assert!(!world.particles[0].is_alive_particle());
        prop_assert_eq!(world.renderable().count(), 1);
    }

    #[test]
    fn mothership_bonus_is_paid_exactly_once(hits in 1usize..40) {
        let rules = invaders::rules();
        let mut world = World::new(
            Body::rect(375.0, 540.0, 50.0, 30.0),
            Hero::new(5.0, Vec2::new(375.0, 540.0)),
        );
        world.spawn(
            Body::rect(340.0, 50.0, 120.0, 80.0),
            Kind::Boss(Boss {
                script: BossScript::Mothership { fire_chance: 0.0 },
                health: 20,
                max_health: 20,
                speed: 2.0,
                dir: 1.0,
                mode: AttackMode::Walk,
                mode_timer: 0,
                grounded: true,
                shot: ShotSpec {
                    size: Vec2::new(4.0, 10.0),
                    vel: Vec2::new(0.0, 5.0),
                    gravity: 0.0,
                    bounce: None,
                    muzzle: Muzzle::Bottom,
                },
            }),
        );
        let mut counters = Counters::default();
        let mut events = Vec::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mut last_health = 20;

        for _ in 0..hits {
            world.spawn(
                Body::rect(400.0, 100.0, 4.0, 10.0),
                Kind::Projectile(Shot { owner: Owner::Player, gravity: 0.0, bounce: None, spent: false }),
            );
            let mut scene = Scene {
                world: &mut world,
                counters: &mut counters,
                events: &mut events,
                rng: &mut rng,
                now: 0,
            };
            collision::resolve(Pair::ShotBoss, &mut scene, &rules);

            let health = world.bosses.first().and_then(|e| e.boss()).map_or(0, |b| b.health);
            prop_assert!(health <= last_health);
            last_health = health;
        }

        let landed = hits.min(20) as u32;
        let bonus = if hits >= 20 { 500 } else { 0 };
        prop_assert_eq!(counters.score, landed * 50 + bonus);
        prop_assert_eq!(world.bosses.is_empty(), hits >= 20);
    }
}
