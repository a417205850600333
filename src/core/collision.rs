use std::f32::consts::TAU;

use glam::Vec2;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::Rng;

use super::entity::{
    Aabb, Body, Entity, EntityId, Kind, Millis, Owner, PickupKind, PowerState, Spark, Tint, World,
};
use super::session::{Counters, GameEvent, Ruleset};

/// Collision pair kinds. A ruleset lists the ones its game checks, in the
/// order they are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pair {
    PlayerEnemy,
    PlayerBoss,
    PlayerPickup,
    ShotEnemy,
    ShotBoss,
    ShotPlayer,
    PuckPaddle,
    PuckWall,
    PuckGoal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Payouts {
    pub stomp: u32,
    /// Enemy destroyed by touching it while invulnerable.
    pub touch_kill: u32,
    pub shot_kill: u32,
    pub boss_stomp: u32,
    pub boss_hit: u32,
    pub boss_bonus: u32,
    pub coin: u32,
    pub power_up: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combat {
    /// Upper fraction of an enemy's height that counts as a stomp. `None`
    /// means every touch hurts the player.
    pub stomp_zone: Option<f32>,
    pub stomp_bounce: f32,
    pub boss_stomp_zone: f32,
    pub boss_stomp_damage: i32,
    pub boss_bounce: f32,
    pub shot_damage: i32,
    pub grace_ms: Millis,
    pub star_ms: Millis,
}

impl Default for Combat {
    fn default() -> Self {
        Self {
            stomp_zone: None,
            stomp_bounce: 0.0,
            boss_stomp_zone: 0.0,
            boss_stomp_damage: 0,
            boss_bounce: 0.0,
            shot_damage: 1,
            grace_ms: 0,
            star_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub count: usize,
    /// Full width of the random velocity range on each axis.
    pub spread: Vec2,
    /// Where zero sits in the vertical range: 0.5 is symmetric, 1.0 is
    /// upward only.
    pub bias_y: f32,
    pub lift: f32,
    pub gravity: f32,
    pub life: u32,
    pub size: f32,
}

pub struct Scene<'a> {
    pub world: &'a mut World,
    pub counters: &'a mut Counters,
    pub events: &'a mut Vec<GameEvent>,
    pub rng: &'a mut StdRng,
    pub now: Millis,
}

/// Strict AABB overlap between two bodies. Circles use their bounding
/// square.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.aabb().overlaps(&b.aabb())
}

pub fn resolve(pair: Pair, scene: &mut Scene<'_>, rules: &Ruleset) {
    match pair {
        Pair::PlayerEnemy => player_vs_enemies(scene, rules),
        Pair::PlayerBoss => player_vs_bosses(scene, rules),
        Pair::PlayerPickup => player_vs_pickups(scene, rules),
        Pair::ShotEnemy => shots_vs_enemies(scene, rules),
        Pair::ShotBoss => shots_vs_bosses(scene, rules),
        Pair::ShotPlayer => shots_vs_player(scene, rules),
        Pair::PuckPaddle => puck_vs_paddles(scene),
        Pair::PuckWall => puck_vs_walls(scene, rules.field),
        Pair::PuckGoal => puck_vs_ends(scene, rules),
    }
}

// Resolvers walk a snapshot of ids and look each one up again; an id that
// no longer resolves was consumed earlier in the pass.
fn ids(list: &[Entity]) -> Vec<EntityId> {
    list.iter().map(|e| e.id).collect()
}

fn player_vs_enemies(scene: &mut Scene<'_>, rules: &Ruleset) {
    let combat = &rules.combat;
    for id in ids(&scene.world.enemies) {
        let Some(enemy) = scene.world.find(id).copied() else {
            continue;
        };
        let player = scene.world.player;
        if !overlaps(&player.body, &enemy.body) {
            continue;
        }

        if scene.world.hero().is_invulnerable(scene.now) {
            defeat_enemy(scene, rules, id, rules.payouts.touch_kill, Tint::Red);
            continue;
        }

        if let Some(zone) = combat.stomp_zone {
            let target = enemy.body.aabb();
            if player.body.vel.y > 0.0 && player.body.pos.y < target.top + target.height() * zone {
                defeat_enemy(scene, rules, id, rules.payouts.stomp, Tint::Red);
                scene.world.player.body.vel.y = combat.stomp_bounce;
                continue;
            }
        }

        hurt_player(scene, rules, false);
        return;
    }
}

fn defeat_enemy(scene: &mut Scene<'_>, rules: &Ruleset, id: EntityId, points: u32, tint: Tint) {
    let Some(enemy) = scene.world.remove(id) else {
        return;
    };
    scene.counters.score += points;
    scene.events.push(GameEvent::EnemyDefeated { points });
    trace!("enemy {} defeated for {} points", id, points);
    if let Some(burst) = &rules.burst {
        spawn_burst(scene.world, scene.rng, burst, enemy.body.center(), tint);
    }
}

fn player_vs_bosses(scene: &mut Scene<'_>, rules: &Ruleset) {
    let combat = &rules.combat;
    for id in ids(&scene.world.bosses) {
        let Some(boss) = scene.world.find(id).copied() else {
            continue;
        };
        let player = scene.world.player;
        if !overlaps(&player.body, &boss.body) {
            continue;
        }

        let target = boss.body.aabb();
        let stomped = player.body.vel.y > 0.0
            && player.body.pos.y < target.top + target.height() * combat.boss_stomp_zone;
        if stomped {
            scene.world.player.body.vel.y = combat.boss_bounce;
            damage_boss(
                scene,
                rules,
                id,
                combat.boss_stomp_damage,
                rules.payouts.boss_stomp,
            );
            continue;
        }

        // Bosses ignore invulnerability, whether from a star or a prior hit.
        hurt_player(scene, rules, true);
        return;
    }
}

/// Applies damage to a boss and removes it once its health runs out. The
/// defeat bonus is paid only by the call that actually removes it.
fn damage_boss(scene: &mut Scene<'_>, rules: &Ruleset, id: EntityId, damage: i32, points: u32) {
    let Some(entity) = scene.world.find_mut(id) else {
        return;
    };
    let center = entity.body.center();
    let Kind::Boss(boss) = &mut entity.kind else {
        return;
    };
    boss.health -= damage.max(0);
    let remaining = boss.health;

    scene.counters.score += points;
    scene.events.push(GameEvent::BossHit { remaining });
    if let Some(burst) = &rules.burst {
        spawn_burst(scene.world, scene.rng, burst, center, Tint::Orange);
    }

    if remaining <= 0 && scene.world.remove(id).is_some() {
        scene.counters.score += rules.payouts.boss_bonus;
        scene.events.push(GameEvent::BossDefeated);
        debug!("boss {} defeated, bonus {}", id, rules.payouts.boss_bonus);
    }
}

fn player_vs_pickups(scene: &mut Scene<'_>, rules: &Ruleset) {
    for id in ids(&scene.world.pickups) {
        let Some(item) = scene.world.find(id).copied() else {
            continue;
        };
        if !overlaps(&scene.world.player.body, &item.body) {
            continue;
        }
        let Kind::Pickup(pickup) = item.kind else {
            continue;
        };
        if scene.world.remove(id).is_none() {
            continue;
        }

        let hero = scene.world.hero_mut();
        let (points, tint) = match pickup.kind {
            PickupKind::Coin => (rules.payouts.coin, Tint::Gold),
            PickupKind::Mushroom => {
                if hero.power == PowerState::Small {
                    hero.power = PowerState::Big;
                }
                (rules.payouts.power_up, Tint::Green)
            }
            PickupKind::Flower => {
                hero.power = PowerState::Fire;
                (rules.payouts.power_up, Tint::Green)
            }
            PickupKind::Star => {
                hero.grant_invulnerability(scene.now, rules.combat.star_ms);
                (rules.payouts.power_up, Tint::Green)
            }
        };
        scene.counters.score += points;
        scene.events.push(GameEvent::PickupCollected(pickup.kind));
        if let Some(burst) = &rules.burst {
            spawn_burst(scene.world, scene.rng, burst, item.body.center(), tint);
        }
    }
}

fn shots_vs_enemies(scene: &mut Scene<'_>, rules: &Ruleset) {
    for shot_id in player_shots(scene.world) {
        for enemy_id in ids(&scene.world.enemies) {
            let (Some(shot), Some(enemy)) =
                (scene.world.find(shot_id).copied(), scene.world.find(enemy_id).copied())
            else {
                continue;
            };
            if !overlaps(&shot.body, &enemy.body) {
                continue;
            }
            scene.world.remove(shot_id);
            defeat_enemy(scene, rules, enemy_id, rules.payouts.shot_kill, Tint::Yellow);
            break;
        }
    }
}

fn shots_vs_bosses(scene: &mut Scene<'_>, rules: &Ruleset) {
    for shot_id in player_shots(scene.world) {
        for boss_id in ids(&scene.world.bosses) {
            let (Some(shot), Some(boss)) =
                (scene.world.find(shot_id).copied(), scene.world.find(boss_id).copied())
            else {
                continue;
            };
            if !overlaps(&shot.body, &boss.body) {
                continue;
            }
            scene.world.remove(shot_id);
            damage_boss(
                scene,
                rules,
                boss_id,
                rules.combat.shot_damage,
                rules.payouts.boss_hit,
            );
            break;
        }
    }
}

fn player_shots(world: &World) -> Vec<EntityId> {
    world
        .projectiles
        .iter()
        .filter(|e| matches!(e.shot(), Some(s) if s.owner == Owner::Player))
        .map(|e| e.id)
        .collect()
}

fn shots_vs_player(scene: &mut Scene<'_>, rules: &Ruleset) {
    let hostile: Vec<EntityId> = scene
        .world
        .projectiles
        .iter()
        .filter(|e| matches!(e.shot(), Some(s) if s.owner == Owner::Enemy))
        .map(|e| e.id)
        .collect();

    for id in hostile {
        let Some(shot) = scene.world.find(id).copied() else {
            continue;
        };
        if !overlaps(&shot.body, &scene.world.player.body) {
            continue;
        }
        scene.world.remove(id);
        if scene.world.hero().is_invulnerable(scene.now) {
            trace!("shot {} absorbed", id);
            continue;
        }
        hurt_player(scene, rules, false);
        return;
    }
}

/// Side contact: the weakened tier loses a life, any other tier drops to
/// the weakened one with a grace window. Boss contact grants the window
/// either way.
fn hurt_player(scene: &mut Scene<'_>, rules: &Ruleset, from_boss: bool) {
    let now = scene.now;
    let grace = rules.combat.grace_ms;
    let hero = scene.world.hero_mut();
    if hero.power.is_weakened() {
        lose_life(scene);
    } else {
        hero.power = PowerState::Small;
        hero.grant_invulnerability(now, grace);
        scene.events.push(GameEvent::PowerLost);
    }
    if from_boss {
        scene.world.hero_mut().grant_invulnerability(now, grace);
    }
}

pub fn lose_life(scene: &mut Scene<'_>) {
    scene.counters.lives = scene.counters.lives.saturating_sub(1);
    scene.events.push(GameEvent::LifeLost {
        remaining: scene.counters.lives,
    });
    debug!("life lost, {} remaining", scene.counters.lives);
    if scene.counters.lives > 0 {
        respawn(scene.world);
    }
}

pub fn respawn(world: &mut World) {
    let spawn = world.hero().spawn;
    let player = &mut world.player;
    player.body.place_box_at(spawn);
    player.body.vel = Vec2::ZERO;
    if let Some(hero) = player.hero_mut() {
        hero.grounded = true;
        hero.power = PowerState::Small;
    }
}

fn puck_vs_paddles(scene: &mut Scene<'_>) {
    let mut paddles: Vec<Body> = vec![scene.world.player.body];
    paddles.extend(scene.world.opponents.iter().map(|e| e.body));

    for entity in &mut scene.world.pucks {
        let Kind::Puck(puck) = entity.kind else {
            continue;
        };
        for paddle in &paddles {
            if !overlaps(&entity.body, paddle) {
                continue;
            }
            let offset = entity.body.center() - paddle.center();
            if let Some(dir) = offset.try_normalize() {
                let speed = (entity.body.vel.length() * 0.9).max(puck.base_speed * 0.6);
                entity.body.vel = dir * speed;
            }
        }
    }
}

fn chaos_redirect(vel: Vec2, boost: f32, rng: &mut StdRng) -> Vec2 {
    let angle = rng.gen::<f32>() * TAU;
    Vec2::from_angle(angle) * vel.length() * boost
}

fn puck_vs_walls(scene: &mut Scene<'_>, field: Aabb) {
    for entity in &mut scene.world.pucks {
        let Kind::Puck(puck) = entity.kind else {
            continue;
        };
        let b = entity.body.aabb();
        if b.top > field.top && b.bottom < field.bottom {
            continue;
        }
        if scene.rng.gen_bool(puck.wall_chaos.chance) {
            entity.body.vel = chaos_redirect(entity.body.vel, puck.wall_chaos.boost, scene.rng);
        } else {
            entity.body.vel.y = -entity.body.vel.y;
        }
        let top = b.top.clamp(field.top, field.bottom - b.height());
        entity.body.place_box_at(Vec2::new(b.left, top));
    }
}

fn puck_vs_ends(scene: &mut Scene<'_>, rules: &Ruleset) {
    let field = rules.field;
    let mid = field.center().y;
    let span = rules.goal_span.unwrap_or(0.0);

    for entity in &mut scene.world.pucks {
        let Kind::Puck(puck) = entity.kind else {
            continue;
        };
        let b = entity.body.aabb();
        let at_left = b.left <= field.left;
        let at_right = b.right >= field.right;
        if !at_left && !at_right {
            continue;
        }

        let y = entity.body.center().y;
        if rules.goal_span.is_some() && y >= mid - span && y <= mid + span {
            let by_player = at_right;
            if by_player {
                scene.counters.score += 1;
            } else {
                scene.counters.opponent_score += 1;
            }
            scene.events.push(GameEvent::Goal { by_player });
            debug!(
                "goal for {} ({} - {})",
                if by_player { "player" } else { "cpu" },
                scene.counters.score,
                scene.counters.opponent_score
            );
            entity.body.pos = field.center();
            entity.body.vel = Vec2::ZERO;
            continue;
        }

        if scene.rng.gen_bool(puck.end_chaos.chance) {
            entity.body.vel = chaos_redirect(entity.body.vel, puck.end_chaos.boost, scene.rng);
        } else {
            entity.body.vel.x = -entity.body.vel.x;
        }
        let left = if at_left {
            field.left
        } else {
            field.right - b.width()
        };
        entity.body.place_box_at(Vec2::new(left, b.top));
    }
}

pub fn spawn_burst(world: &mut World, rng: &mut StdRng, burst: &Burst, at: Vec2, tint: Tint) {
    for _ in 0..burst.count {
        let vel = Vec2::new(
            (rng.gen::<f32>() - 0.5) * burst.spread.x,
            (rng.gen::<f32>() - burst.bias_y) * burst.spread.y - burst.lift,
        );
        let body = Body::rect(at.x, at.y, burst.size, burst.size).with_vel(vel);
        world.spawn(
            body,
            Kind::Particle(Spark {
                life: burst.life,
                max_life: burst.life,
                gravity: burst.gravity,
                tint,
            }),
        );
    }
}
