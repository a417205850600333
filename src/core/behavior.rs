use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use super::entity::{
    Aabb, AttackMode, Body, BossScript, Entity, Kind, Motion, Muzzle, Owner, Shot, ShotSpec,
};
use super::physics::{clamp_into, integrate};

/// Ticks a castle boss stays in one attack mode.
pub const MODE_TICKS: u32 = 120;
const JUMP_EVERY: u32 = 45;
const FIRE_EVERY: u32 = 20;
const MIRROR_EVERY: u32 = 40;

/// Distance from the centre line at which the CPU paddle turns defensive.
const DEFENSIVE_MARGIN: f32 = 50.0;
/// The CPU nudges toward a puck this close horizontally...
const NUDGE_RANGE: f32 = 100.0;
/// ...as long as its horizontal speed is below this.
const NUDGE_MAX_DX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyFire {
    pub chance: f64,
    pub shot: ShotSpec,
}

/// Builds a projectile leaving `shooter` in direction `dir` (+1 or -1).
pub fn launch(spec: &ShotSpec, shooter: &Aabb, dir: f32, owner: Owner) -> (Body, Kind) {
    let center = shooter.center();
    let top_left = match spec.muzzle {
        Muzzle::Top => Vec2::new(center.x - spec.size.x / 2.0, shooter.top),
        Muzzle::Bottom => Vec2::new(center.x - spec.size.x / 2.0, shooter.bottom),
        Muzzle::Side => {
            let x = if dir > 0.0 { shooter.right } else { shooter.left };
            Vec2::new(x, center.y)
        }
        Muzzle::Center => center,
    };
    let body = Body::rect(top_left.x, top_left.y, spec.size.x, spec.size.y)
        .with_vel(Vec2::new(spec.vel.x * dir, spec.vel.y));
    let shot = Shot {
        owner,
        gravity: spec.gravity,
        bounce: spec.bounce,
        spent: false,
    };
    (body, Kind::Projectile(shot))
}

pub fn patrol(entity: &mut Entity) {
    let Kind::Enemy(walker) = &mut entity.kind else {
        return;
    };
    let Motion::Patrol { min_x, max_x } = walker.motion else {
        return;
    };
    entity.body.pos.x += walker.speed * walker.dir;
    let b = entity.body.aabb();
    if b.left <= min_x || b.left >= max_x - b.width() {
        walker.dir = -walker.dir;
    }
}

/// Marches every formation member sideways. If any of them reached a field
/// edge, the whole formation drops one row and turns around.
pub fn march_formation(enemies: &mut [Entity], field: Aabb) {
    let mut edge = false;
    let mut drop = 0.0;
    for entity in enemies.iter_mut() {
        let Kind::Enemy(walker) = &entity.kind else {
            continue;
        };
        let Motion::Formation { drop: d } = walker.motion else {
            continue;
        };
        drop = d;
        entity.body.pos.x += walker.speed * walker.dir;
        let b = entity.body.aabb();
        if b.left <= field.left || b.left >= field.right - b.width() {
            edge = true;
        }
    }
    if !edge {
        return;
    }
    for entity in enemies.iter_mut() {
        if let Kind::Enemy(walker) = &mut entity.kind {
            if matches!(walker.motion, Motion::Formation { .. }) {
                entity.body.pos.y += drop;
                walker.dir = -walker.dir;
            }
        }
    }
}

pub fn step_enemies(enemies: &mut [Entity], field: Aabb) {
    for entity in enemies.iter_mut() {
        patrol(entity);
    }
    march_formation(enemies, field);
}

/// Two-phase hockey heuristic. Defends while the puck is near its half,
/// otherwise drifts back toward its home position.
pub fn cpu_paddle(entity: &mut Entity, puck: Option<&Body>, field: Aabb) {
    let Kind::Opponent(paddle) = entity.kind else {
        return;
    };
    let Some(puck) = puck else {
        return;
    };
    let body = &mut entity.body;
    let own = body.center();
    let mid = field.center();
    let speed = paddle.speed;

    if puck.pos.x > mid.x - DEFENSIVE_MARGIN {
        if puck.pos.y < own.y {
            body.pos.y -= speed;
        } else if puck.pos.y > own.y {
            body.pos.y += speed;
        }
        if (puck.pos.x - own.x).abs() < NUDGE_RANGE && puck.vel.x.abs() < NUDGE_MAX_DX {
            if puck.pos.x < own.x {
                body.pos.x -= speed * 0.5;
            } else {
                body.pos.x += speed * 0.5;
            }
        }
    } else {
        if own.y < mid.y {
            body.pos.y += speed * 0.3;
        } else if own.y > mid.y {
            body.pos.y -= speed * 0.3;
        }
        if body.pos.x < paddle.home.x {
            body.pos.x += speed * 0.2;
        }
    }
    clamp_into(body, paddle.region);
}

/// Advances a boss one tick and returns the projectiles it fired.
/// `target_x` is the player's current x, used to aim.
pub fn boss_step(
    entity: &mut Entity,
    target_x: f32,
    field: Aabb,
    rng: &mut StdRng,
) -> Vec<(Body, Kind)> {
    let mut volley = Vec::new();
    let Kind::Boss(boss) = &mut entity.kind else {
        return volley;
    };
    let body = &mut entity.body;

    match boss.script {
        BossScript::Castle {
            anchor_x,
            range,
            floor_y,
            jump,
            gravity,
        } => {
            boss.mode_timer += 1;
            if boss.mode_timer > MODE_TICKS {
                const MODES: [AttackMode; 3] = [AttackMode::Walk, AttackMode::Jump, AttackMode::Fire];
                boss.mode = MODES[rng.gen_range(0..MODES.len())];
                boss.mode_timer = 0;
            }

            match boss.mode {
                AttackMode::Walk => {
                    body.pos.x += boss.speed * boss.dir;
                    if body.pos.x <= anchor_x - range || body.pos.x >= anchor_x + range {
                        boss.dir = -boss.dir;
                    }
                }
                AttackMode::Jump => {
                    if boss.grounded && boss.mode_timer % JUMP_EVERY == 0 {
                        body.vel.y = jump;
                        boss.grounded = false;
                    }
                }
                AttackMode::Fire => {
                    if boss.mode_timer % FIRE_EVERY == 0 {
                        let aim = if target_x > body.pos.x { 1.0 } else { -1.0 };
                        let from = body.aabb();
                        volley.push(launch(&boss.shot, &from, aim, Owner::Enemy));
                        if boss.mode_timer % MIRROR_EVERY == 0 {
                            volley.push(launch(&boss.shot, &from, -aim, Owner::Enemy));
                        }
                    }
                }
            }

            if !boss.grounded {
                body.vel.y += gravity;
                body.pos.y += body.vel.y;
                if body.pos.y >= floor_y {
                    body.pos.y = floor_y;
                    body.vel.y = 0.0;
                    boss.grounded = true;
                }
            }
        }
        BossScript::Mothership { fire_chance } => {
            body.vel = Vec2::new(boss.speed * boss.dir, 0.0);
            integrate(body);
            let b = body.aabb();
            if b.left <= field.left || b.left >= field.right - b.width() {
                boss.dir = -boss.dir;
            }
            if rng.gen_bool(fire_chance) {
                volley.push(launch(&boss.shot, &b, 1.0, Owner::Enemy));
            }
        }
    }
    volley
}

pub fn enemy_volley(enemies: &[Entity], fire: &EnemyFire, rng: &mut StdRng) -> Option<(Body, Kind)> {
    if enemies.is_empty() || !rng.gen_bool(fire.chance) {
        return None;
    }
    let shooter = &enemies[rng.gen_range(0..enemies.len())];
    Some(launch(&fire.shot, &shooter.body.aabb(), 1.0, Owner::Enemy))
}

pub fn bob_pickup(entity: &mut Entity) {
    if let Kind::Pickup(pickup) = &mut entity.kind {
        pickup.phase += 0.1;
        entity.body.pos.y += pickup.phase.sin() * pickup.bob;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Boss, Breed, Paddle, Walker};
    use rand::SeedableRng;

    fn walker(x: f32, y: f32, motion: Motion) -> Entity {
        Entity {
            id: 1,
            body: Body::rect(x, y, 25.0, 25.0),
            kind: Kind::Enemy(Walker {
                breed: Breed::Spiky,
                speed: 1.0,
                dir: 1.0,
                motion,
            }),
        }
    }

    fn dir_of(e: &Entity) -> f32 {
        match e.kind {
            Kind::Enemy(w) => w.dir,
            _ => 0.0,
        }
    }

    fn shot_spec(muzzle: Muzzle) -> ShotSpec {
        ShotSpec {
            size: Vec2::new(16.0, 16.0),
            vel: Vec2::new(4.0, -2.0),
            gravity: 0.2,
            bounce: None,
            muzzle,
        }
    }

    fn castle_boss(mode: AttackMode, timer: u32) -> Entity {
        Entity {
            id: 5,
            body: Body::rect(1400.0, 382.0, 80.0, 80.0),
            kind: Kind::Boss(Boss {
                script: BossScript::Castle {
                    anchor_x: 1400.0,
                    range: 100.0,
                    floor_y: 382.0,
                    jump: -15.0,
                    gravity: 0.8,
                },
                health: 30,
                max_health: 30,
                speed: 1.5,
                dir: -1.0,
                mode,
                mode_timer: timer,
                grounded: true,
                shot: shot_spec(Muzzle::Center),
            }),
        }
    }

    #[test]
    fn test_patrol_reverses_at_limit() {
        let mut e = walker(323.0, 310.0, Motion::Patrol { min_x: 200.0, max_x: 350.0 });
        patrol(&mut e);
        assert_eq!(e.body.pos.x, 324.0);
        assert_eq!(dir_of(&e), 1.0);
        patrol(&mut e);
        assert_eq!(e.body.pos.x, 325.0);
        assert_eq!(dir_of(&e), -1.0);
    }

    #[test]
    fn test_formation_drops_together_at_edge() {
        let field = Aabb::new(0.0, 0.0, 800.0, 600.0);
        let motion = Motion::Formation { drop: 20.0 };
        let mut row = vec![walker(100.0, 50.0, motion), walker(774.0, 50.0, motion)];
        march_formation(&mut row, field);
        assert!(row.iter().all(|e| e.body.pos.y == 70.0));
        assert!(row.iter().all(|e| dir_of(e) == -1.0));
        assert_eq!(row[0].body.pos.x, 101.0);
    }

    #[test]
    fn test_cpu_tracks_puck_when_defending() {
        let field = Aabb::new(0.0, 0.0, 800.0, 400.0);
        let mut cpu = Entity {
            id: 2,
            body: Body::rect(660.0, 200.0, 40.0, 20.0),
            kind: Kind::Opponent(Paddle {
                speed: 3.0,
                home: Vec2::new(660.0, 200.0),
                region: Aabb::new(400.0, 0.0, 400.0, 400.0),
            }),
        };
        let puck = Body::circle(600.0, 100.0, 8.0).with_vel(Vec2::new(5.0, 0.0));
        cpu_paddle(&mut cpu, Some(&puck), field);
        assert_eq!(cpu.body.pos, Vec2::new(660.0, 197.0));

        // puck in the far half: drift back toward the centre line
        let far = Body::circle(100.0, 100.0, 8.0);
        cpu.body.pos = Vec2::new(600.0, 100.0);
        cpu_paddle(&mut cpu, Some(&far), field);
        assert!((cpu.body.pos.y - 100.9).abs() < 1e-4);
        assert!((cpu.body.pos.x - 600.6).abs() < 1e-4);
    }

    #[test]
    fn test_castle_boss_fires_toward_player_and_mirrors() {
        let field = Aabb::new(0.0, 0.0, 3200.0, 512.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut boss = castle_boss(AttackMode::Fire, 39);
        let shots = boss_step(&mut boss, 100.0, field, &mut rng);
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].0.vel.x, -4.0);
        assert_eq!(shots[1].0.vel.x, 4.0);

        let mut boss = castle_boss(AttackMode::Fire, 19);
        let shots = boss_step(&mut boss, 2000.0, field, &mut rng);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].0.vel.x, 4.0);
    }

    #[test]
    fn test_castle_boss_jumps_and_lands() {
        let field = Aabb::new(0.0, 0.0, 3200.0, 512.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut boss = castle_boss(AttackMode::Jump, 44);
        boss_step(&mut boss, 0.0, field, &mut rng);
        assert!(boss.body.pos.y < 382.0);
        // airborne for 37 ticks; the next jump is not due until tick 90
        for _ in 0..40 {
            boss_step(&mut boss, 0.0, field, &mut rng);
        }
        assert_eq!(boss.body.pos.y, 382.0);
        assert!(boss.boss().map(|b| b.grounded).unwrap_or(false));
    }

    #[test]
    fn test_launch_muzzles() {
        let from = Aabb::new(375.0, 540.0, 50.0, 30.0);
        let mut spec = shot_spec(Muzzle::Top);
        spec.size = Vec2::new(4.0, 10.0);
        let (body, _) = launch(&spec, &from, 1.0, Owner::Player);
        assert_eq!(body.pos, Vec2::new(398.0, 540.0));

        spec.muzzle = Muzzle::Side;
        let (body, _) = launch(&spec, &from, -1.0, Owner::Player);
        assert_eq!(body.pos, Vec2::new(375.0, 555.0));
        assert_eq!(body.vel.x, -4.0);
    }

    #[test]
    fn test_no_volley_without_shooters() {
        let mut rng = StdRng::seed_from_u64(1);
        let fire = EnemyFire {
            chance: 1.0,
            shot: shot_spec(Muzzle::Bottom),
        };
        assert!(enemy_volley(&[], &fire, &mut rng).is_none());
        let shooters = [walker(10.0, 10.0, Motion::Formation { drop: 20.0 })];
        assert!(enemy_volley(&shooters, &fire, &mut rng).is_some());
    }
}
