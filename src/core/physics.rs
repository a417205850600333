use glam::Vec2;

use super::entity::{Aabb, Body, Entity, Hero, Kind, Puck, Shot, Solid, Spark};
use super::input::{Action, InputState};

/// Below this speed a puck is considered at rest.
pub const REST_SPEED: f32 = 0.1;
/// How far below a ledge top the feet may sink and still land.
const LEDGE_TOLERANCE: f32 = 10.0;
/// Height of the pipe rim that can be landed on.
const PIPE_LIP: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Locomotion {
    Free { region: Aabb },
    Rail,
    Platformer {
        jump: f32,
        gravity: f32,
        friction: Option<f32>,
        jump_on_shoot: bool,
    },
}

pub fn integrate(body: &mut Body) {
    body.pos += body.vel;
}

pub fn apply_gravity(body: &mut Body, gravity: f32) {
    body.vel.y += gravity;
}

pub fn apply_friction(body: &mut Body, factor: f32) {
    body.vel.x *= factor;
}

/// Speeds up a moving puck until it reaches its cap and zeroes one that
/// has all but stopped.
pub fn regulate_speed(vel: Vec2, puck: &Puck) -> Vec2 {
    let speed = vel.length();
    if speed > REST_SPEED && speed < puck.max_speed {
        vel * puck.acceleration
    } else if speed <= REST_SPEED {
        Vec2::ZERO
    } else {
        vel
    }
}

pub fn clamp_into(body: &mut Body, bounds: Aabb) {
    let size = body.size();
    let b = body.aabb();
    let left = b.left.clamp(bounds.left, (bounds.right - size.x).max(bounds.left));
    let top = b.top.clamp(bounds.top, (bounds.bottom - size.y).max(bounds.top));
    body.place_box_at(Vec2::new(left, top));
}

/// Horizontal clamp only; platformer bodies may fall out of the bottom.
pub fn clamp_x(body: &mut Body, bounds: Aabb) {
    let size = body.size();
    let b = body.aabb();
    let left = b.left.clamp(bounds.left, (bounds.right - size.x).max(bounds.left));
    body.place_box_at(Vec2::new(left, b.top));
}

pub fn is_outside(body: &Body, bounds: Aabb, margin: f32) -> bool {
    !body.aabb().overlaps(&bounds.expanded(margin))
}

pub fn steer_player(player: &mut Entity, locomotion: &Locomotion, input: &InputState) {
    let Kind::Player(hero) = &mut player.kind else {
        return;
    };
    let body = &mut player.body;
    let axis = |neg: Action, pos: Action| -> f32 {
        match (input.is_pressed(neg), input.is_pressed(pos)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    };

    match *locomotion {
        Locomotion::Free { .. } => {
            body.vel = Vec2::new(
                axis(Action::MoveLeft, Action::MoveRight),
                axis(Action::MoveUp, Action::MoveDown),
            ) * hero.speed;
        }
        Locomotion::Rail => {
            body.vel = Vec2::new(axis(Action::MoveLeft, Action::MoveRight) * hero.speed, 0.0);
        }
        Locomotion::Platformer {
            jump,
            friction,
            jump_on_shoot,
            ..
        } => {
            if input.is_pressed(Action::MoveLeft) {
                body.vel.x = -hero.speed;
                hero.facing = -1.0;
            } else if input.is_pressed(Action::MoveRight) {
                body.vel.x = hero.speed;
                hero.facing = 1.0;
            } else {
                match friction {
                    Some(f) => apply_friction(body, f),
                    None => body.vel.x = 0.0,
                }
            }

            let wants_jump = input.is_pressed(Action::MoveUp)
                || (jump_on_shoot && input.is_pressed(Action::Shoot));
            if wants_jump && hero.grounded {
                body.vel.y = jump;
                hero.grounded = false;
            }
        }
    }
}

pub fn move_player(player: &mut Entity, locomotion: &Locomotion, field: Aabb, solids: &[Entity]) {
    let Kind::Player(hero) = &mut player.kind else {
        return;
    };
    let body = &mut player.body;
    match *locomotion {
        Locomotion::Free { region } => {
            integrate(body);
            clamp_into(body, region);
        }
        Locomotion::Rail => {
            integrate(body);
            clamp_into(body, field);
        }
        Locomotion::Platformer { gravity, .. } => {
            apply_gravity(body, gravity);
            integrate(body);
            clamp_x(body, field);
            land_on_solids(body, hero, solids);
        }
    }
}

/// Snaps a falling body onto ledges and pipe tops and pushes it out of
/// pipe sides.
pub fn land_on_solids(body: &mut Body, hero: &mut Hero, solids: &[Entity]) {
    hero.grounded = false;
    for solid in solids {
        let Kind::Solid(kind) = solid.kind else {
            continue;
        };
        let s = solid.body.aabb();
        let size = body.size();
        let b = body.aabb();
        let x_overlap = b.left < s.right && b.right > s.left;

        let depth = if kind == Solid::Pipe {
            s.top + PIPE_LIP
        } else {
            s.bottom + LEDGE_TOLERANCE
        };
        if body.vel.y >= 0.0 && x_overlap && b.bottom > s.top && b.bottom < depth {
            body.pos.y = s.top - size.y;
            body.vel.y = 0.0;
            hero.grounded = true;
            continue;
        }

        if kind == Solid::Pipe
            && x_overlap
            && b.top < s.bottom
            && b.bottom > s.top + PIPE_LIP
        {
            body.pos.x = if b.left < s.left {
                s.left - size.x
            } else {
                s.right
            };
        }
    }
}

pub fn step_shot(body: &mut Body, shot: &mut Shot) {
    apply_gravity(body, shot.gravity);
    integrate(body);
    if let Some(bounce) = &mut shot.bounce {
        if body.pos.y > bounce.floor {
            body.pos.y = bounce.floor;
            body.vel.y = bounce.rebound;
            body.vel.x *= bounce.damping;
            if bounce.remaining == 0 {
                shot.spent = true;
            } else {
                bounce.remaining -= 1;
            }
        }
    }
}

/// Decorative particle step; life only ever counts down.
pub fn step_spark(body: &mut Body, spark: &mut Spark) {
    integrate(body);
    apply_gravity(body, spark.gravity);
    spark.life = spark.life.saturating_sub(1);
}
