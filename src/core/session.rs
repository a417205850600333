use glam::Vec2;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::behavior::{self, EnemyFire};
use super::collision::{self, Burst, Combat, Pair, Payouts, Scene};
use super::entity::{
    Aabb, Body, Hero, Kind, Millis, Owner, PickupKind, PowerState, ShotSpec, World,
};
use super::input::{Action, InputState};
use super::physics::{self, Locomotion};

/// Projectiles and particles are dropped once this far outside the field.
const SHOT_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    GameOver,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub score: u32,
    pub lives: u32,
    /// Wave or world number, depending on the game.
    pub level: u32,
    pub stage: u32,
    pub opponent_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Goal { by_player: bool },
    EnemyDefeated { points: u32 },
    BossHit { remaining: i32 },
    BossDefeated,
    PickupCollected(PickupKind),
    PowerLost,
    LifeLost { remaining: u32 },
    LevelCleared { level: u32, stage: u32 },
    Restarted,
    GameOver,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weapon {
    /// Sets a resting puck in motion when it is within `reach`.
    PuckShot { reach: f32 },
    /// Fires while Shoot is held, at most once per cooldown.
    Blaster {
        cooldown_ms: Millis,
        shot: ShotSpec,
        requires: Option<PowerState>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    ClearedAdvances,
    CollectedAllWins,
    InvadedLoses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoreboard {
    Versus,
    Collect,
    WorldStage,
    Waves,
}

#[derive(Debug, Clone, Copy)]
pub struct Ruleset {
    pub name: &'static str,
    /// Simulation bounds; wider than the view for scrolling stages.
    pub field: Aabb,
    pub view_width: f32,
    pub locomotion: Locomotion,
    pub weapon: Option<Weapon>,
    pub pairs: &'static [Pair],
    pub payouts: Payouts,
    pub combat: Combat,
    pub burst: Option<Burst>,
    pub enemy_fire: Option<EnemyFire>,
    /// Zero means the game has no lives and never ends on its own.
    pub start_lives: u32,
    /// A player whose top edge passes this line loses a life.
    pub fall_limit: Option<f32>,
    /// Half height of the goal mouths, measured from the field's centre.
    pub goal_span: Option<f32>,
    pub verdicts: &'static [Verdict],
    /// Projectiles in flight survive a level advance.
    pub carry_shots: bool,
    pub scoreboard: Scoreboard,
    pub spawn_player: fn() -> (Body, Hero),
    pub populate: fn(&mut World, &Counters, &mut StdRng),
    pub advance: fn(&mut Counters),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub scoreboard: Scoreboard,
    pub status: Status,
    pub score: u32,
    pub opponent_score: u32,
    pub lives: u32,
    pub level: u32,
    pub stage: u32,
    pub power: PowerState,
    pub invulnerable: bool,
    pub boss_health: Option<(i32, i32)>,
    pub pickups_left: usize,
}

#[derive(Debug, Clone)]
pub struct Session {
    rules: Ruleset,
    seed: u64,
    rng: StdRng,
    world: World,
    counters: Counters,
    status: Status,
    tick: u64,
    now: Millis,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(rules: Ruleset, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let (body, hero) = (rules.spawn_player)();
        let mut world = World::new(body, hero);
        let counters = Counters {
            score: 0,
            lives: rules.start_lives,
            level: 1,
            stage: 1,
            opponent_score: 0,
        };
        (rules.populate)(&mut world, &counters, &mut rng);
        debug!(
            "{}: session seeded with {} ({} entities)",
            rules.name,
            seed,
            world.entity_count()
        );

        Self {
            rules,
            seed,
            rng,
            world,
            counters,
            status: Status::Playing,
            tick: 0,
            now: 0,
            events: Vec::new(),
        }
    }

    /// Discards all state and rebuilds it exactly as a fresh session with
    /// the same seed would.
    pub fn restart(&mut self) {
        info!("{}: restart", self.rules.name);
        *self = Session::new(self.rules, self.seed);
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Left edge of the visible window, following the player and clamped
    /// to the stage.
    pub fn camera_x(&self) -> f32 {
        let field = self.rules.field;
        let max = (field.width() - self.rules.view_width).max(0.0);
        (self.world.player.body.pos.x - self.rules.view_width / 2.0 - field.left).clamp(0.0, max)
            + field.left
    }

    pub fn hud(&self) -> Hud {
        let hero = self.world.hero();
        Hud {
            scoreboard: self.rules.scoreboard,
            status: self.status,
            score: self.counters.score,
            opponent_score: self.counters.opponent_score,
            lives: self.counters.lives,
            level: self.counters.level,
            stage: self.counters.stage,
            power: hero.power,
            invulnerable: hero.is_invulnerable(self.now),
            boss_health: self
                .world
                .bosses
                .iter()
                .filter_map(|e| e.boss())
                .map(|b| (b.health, b.max_health))
                .next(),
            pickups_left: self.world.pickups.len(),
        }
    }

    /// Runs one tick. `now` is read once by the caller and used for every
    /// timed effect in this tick.
    pub fn update(&mut self, input: &InputState, now: Millis) {
        self.events.clear();

        if input.triggered(Action::Reset) {
            self.restart();
            self.events.push(GameEvent::Restarted);
            return;
        }
        if self.status != Status::Playing {
            return;
        }

        self.now = now;
        self.tick += 1;

        self.control(input);
        physics::move_player(
            &mut self.world.player,
            &self.rules.locomotion,
            self.rules.field,
            &self.world.solids,
        );
        self.run_behavior();
        self.run_projectiles();
        self.resolve_collisions();
        self.cleanup();
        self.check_fall();
        self.evaluate();

        trace!(
            "{}: tick {} score {} entities {}",
            self.rules.name,
            self.tick,
            self.counters.score,
            self.world.entity_count()
        );
    }

    fn control(&mut self, input: &InputState) {
        physics::steer_player(&mut self.world.player, &self.rules.locomotion, input);

        match self.rules.weapon {
            Some(Weapon::PuckShot { reach }) if input.triggered(Action::Shoot) => {
                self.shoot_puck(reach);
            }
            Some(Weapon::Blaster {
                cooldown_ms,
                shot,
                requires,
            }) if input.is_pressed(Action::Shoot) => {
                self.fire_blaster(cooldown_ms, &shot, requires);
            }
            _ => {}
        }
    }

    fn shoot_puck(&mut self, reach: f32) {
        let paddle = self.world.player.body.center();
        for entity in &mut self.world.pucks {
            let Kind::Puck(puck) = entity.kind else {
                continue;
            };
            if entity.body.vel != Vec2::ZERO {
                continue;
            }
            if (entity.body.center() - paddle).length() < reach {
                let spread = self.rng.gen::<f32>() - 0.5;
                entity.body.vel = Vec2::new(puck.base_speed * 0.3, spread * puck.base_speed * 0.2);
                trace!("puck {} shot", entity.id);
            }
        }
    }

    fn fire_blaster(&mut self, cooldown_ms: Millis, shot: &ShotSpec, requires: Option<PowerState>) {
        let now = self.now;
        let from = self.world.player.body.aabb();
        let hero = self.world.hero_mut();
        if requires.is_some_and(|power| hero.power != power) {
            return;
        }
        if hero
            .last_shot
            .is_some_and(|last| now.saturating_sub(last) <= cooldown_ms)
        {
            return;
        }
        hero.last_shot = Some(now);
        let facing = hero.facing;
        let (body, kind) = behavior::launch(shot, &from, facing, Owner::Player);
        self.world.spawn(body, kind);
    }

    fn run_behavior(&mut self) {
        let field = self.rules.field;
        behavior::step_enemies(&mut self.world.enemies, field);

        let puck = self.world.pucks.first().map(|e| e.body);
        for paddle in &mut self.world.opponents {
            behavior::cpu_paddle(paddle, puck.as_ref(), field);
        }

        let target_x = self.world.player.body.pos.x;
        let mut volley = Vec::new();
        for boss in &mut self.world.bosses {
            volley.extend(behavior::boss_step(boss, target_x, field, &mut self.rng));
        }
        if let Some(fire) = &self.rules.enemy_fire {
            volley.extend(behavior::enemy_volley(&self.world.enemies, fire, &mut self.rng));
        }
        for (body, kind) in volley {
            self.world.spawn(body, kind);
        }

        for pickup in &mut self.world.pickups {
            behavior::bob_pickup(pickup);
        }
    }

    fn run_projectiles(&mut self) {
        for entity in &mut self.world.projectiles {
            if let Kind::Projectile(shot) = &mut entity.kind {
                physics::step_shot(&mut entity.body, shot);
            }
        }
        for entity in &mut self.world.pucks {
            physics::integrate(&mut entity.body);
        }
        for entity in &mut self.world.particles {
            if let Kind::Particle(spark) = &mut entity.kind {
                physics::step_spark(&mut entity.body, spark);
            }
        }
    }

    fn resolve_collisions(&mut self) {
        let mut scene = Scene {
            world: &mut self.world,
            counters: &mut self.counters,
            events: &mut self.events,
            rng: &mut self.rng,
            now: self.now,
        };
        for &pair in self.rules.pairs {
            collision::resolve(pair, &mut scene, &self.rules);
        }

        for entity in &mut self.world.pucks {
            if let Kind::Puck(puck) = entity.kind {
                entity.body.vel = physics::regulate_speed(entity.body.vel, &puck);
            }
        }
    }

    fn cleanup(&mut self) {
        let bounds = self.rules.field;
        self.world.particles.retain(|e| {
            e.is_alive_particle() && !physics::is_outside(&e.body, bounds, SHOT_MARGIN)
        });
        self.world.projectiles.retain(|e| {
            let spent = e.shot().map_or(true, |s| s.spent);
            !spent && !physics::is_outside(&e.body, bounds, SHOT_MARGIN)
        });
    }

    fn check_fall(&mut self) {
        let Some(limit) = self.rules.fall_limit else {
            return;
        };
        if self.world.player.body.aabb().top <= limit {
            return;
        }
        let mut scene = Scene {
            world: &mut self.world,
            counters: &mut self.counters,
            events: &mut self.events,
            rng: &mut self.rng,
            now: self.now,
        };
        collision::lose_life(&mut scene);
    }

    fn evaluate(&mut self) {
        if self.rules.start_lives > 0 && self.counters.lives == 0 {
            self.finish(Status::GameOver);
            return;
        }

        for verdict in self.rules.verdicts {
            match verdict {
                Verdict::InvadedLoses => {
                    let line = self.world.player.body.aabb().top;
                    let invaded = self
                        .world
                        .enemies
                        .iter()
                        .chain(&self.world.bosses)
                        .any(|e| e.body.aabb().bottom >= line);
                    if invaded {
                        self.finish(Status::GameOver);
                        return;
                    }
                }
                Verdict::CollectedAllWins => {
                    if self.world.pickups.is_empty() {
                        self.finish(Status::Cleared);
                        return;
                    }
                }
                Verdict::ClearedAdvances => {
                    if self.world.enemies.is_empty() && self.world.bosses.is_empty() {
                        self.advance_level();
                    }
                }
            }
        }
    }

    fn finish(&mut self, status: Status) {
        self.status = status;
        match status {
            Status::Cleared => {
                self.events.push(GameEvent::Won);
                info!("{}: cleared with {} points", self.rules.name, self.counters.score);
            }
            _ => {
                self.events.push(GameEvent::GameOver);
                info!("{}: game over with {} points", self.rules.name, self.counters.score);
            }
        }
    }

    fn advance_level(&mut self) {
        (self.rules.advance)(&mut self.counters);
        let shots = if self.rules.carry_shots {
            std::mem::take(&mut self.world.projectiles)
        } else {
            Vec::new()
        };
        self.world.clear_level();
        self.world.projectiles = shots;
        (self.rules.populate)(&mut self.world, &self.counters, &mut self.rng);

        if matches!(self.rules.locomotion, Locomotion::Platformer { .. }) {
            let spawn = self.world.hero().spawn;
            let player = &mut self.world.player;
            player.body.place_box_at(spawn);
            player.body.vel = Vec2::ZERO;
            if let Some(hero) = player.hero_mut() {
                hero.grounded = true;
            }
        }

        self.events.push(GameEvent::LevelCleared {
            level: self.counters.level,
            stage: self.counters.stage,
        });
        info!(
            "{}: advanced to {}-{}",
            self.rules.name, self.counters.level, self.counters.stage
        );
    }
}
