use glam::Vec2;

pub type EntityId = u32;

/// Milliseconds on the session clock. One value is read per tick.
pub type Millis = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Strict overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn expanded(&self, margin: f32) -> Aabb {
        Aabb {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect { w: f32, h: f32 },
    Circle { r: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
}

impl Body {
    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            shape: Shape::Rect { w, h },
        }
    }

    pub fn circle(cx: f32, cy: f32, r: f32) -> Self {
        Self {
            pos: Vec2::new(cx, cy),
            vel: Vec2::ZERO,
            shape: Shape::Circle { r },
        }
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Bounding box; circles use their radius-derived bounding square.
    pub fn aabb(&self) -> Aabb {
        match self.shape {
            Shape::Rect { w, h } => Aabb::new(self.pos.x, self.pos.y, w, h),
            Shape::Circle { r } => Aabb::new(self.pos.x - r, self.pos.y - r, 2.0 * r, 2.0 * r),
        }
    }

    pub fn center(&self) -> Vec2 {
        match self.shape {
            Shape::Rect { w, h } => self.pos + Vec2::new(w / 2.0, h / 2.0),
            Shape::Circle { .. } => self.pos,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self.shape {
            Shape::Rect { w, h } => Vec2::new(w, h),
            Shape::Circle { r } => Vec2::splat(2.0 * r),
        }
    }

    pub fn place_box_at(&mut self, top_left: Vec2) {
        self.pos = match self.shape {
            Shape::Rect { .. } => top_left,
            Shape::Circle { r } => top_left + Vec2::splat(r),
        };
    }
}

/// Player upgrade tier. `Small` is the weakened tier: a hit costs a life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Small,
    Big,
    Fire,
}

impl PowerState {
    pub fn is_weakened(self) -> bool {
        self == PowerState::Small
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hero {
    pub speed: f32,
    pub power: PowerState,
    pub facing: f32,
    pub grounded: bool,
    pub invulnerable_until: Millis,
    pub last_shot: Option<Millis>,
    pub spawn: Vec2,
}

impl Hero {
    pub fn new(speed: f32, spawn: Vec2) -> Self {
        Self {
            speed,
            power: PowerState::Small,
            facing: 1.0,
            grounded: false,
            invulnerable_until: 0,
            last_shot: None,
            spawn,
        }
    }

    pub fn is_invulnerable(&self, now: Millis) -> bool {
        now < self.invulnerable_until
    }

    /// Replaces whatever window is running, so a hit cuts a star short.
    pub fn grant_invulnerability(&mut self, now: Millis, duration: Millis) {
        self.invulnerable_until = now + duration;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub speed: f32,
    pub home: Vec2,
    pub region: Aabb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chaos {
    pub chance: f64,
    pub boost: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Puck {
    pub base_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub wall_chaos: Chaos,
    pub end_chaos: Chaos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breed {
    Spiky,
    Goomba,
    Koopa,
    Invader,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Walk back and forth between two x limits.
    Patrol { min_x: f32, max_x: f32 },
    /// March with the whole formation, dropping a row at either edge.
    Formation { drop: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Walker {
    pub breed: Breed,
    pub speed: f32,
    pub dir: f32,
    pub motion: Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackMode {
    Walk,
    Jump,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossScript {
    Castle {
        anchor_x: f32,
        range: f32,
        floor_y: f32,
        jump: f32,
        gravity: f32,
    },
    Mothership { fire_chance: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boss {
    pub script: BossScript,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub dir: f32,
    pub mode: AttackMode,
    pub mode_timer: u32,
    pub grounded: bool,
    pub shot: ShotSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub floor: f32,
    pub rebound: f32,
    pub damping: f32,
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Muzzle {
    Top,
    Bottom,
    Side,
    Center,
}

/// Template for projectiles a shooter spawns. `vel.x` is mirrored by the
/// shooting direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub size: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    pub bounce: Option<Bounce>,
    pub muzzle: Muzzle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub owner: Owner,
    pub gravity: f32,
    pub bounce: Option<Bounce>,
    pub spent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Coin,
    Mushroom,
    Flower,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub phase: f32,
    /// Vertical float amplitude per tick; zero for coins.
    pub bob: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Red,
    Orange,
    Yellow,
    Gold,
    Green,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub life: u32,
    pub max_life: u32,
    pub gravity: f32,
    pub tint: Tint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solid {
    Ground,
    Ledge,
    Pipe,
    Castle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    Player(Hero),
    Opponent(Paddle),
    Puck(Puck),
    Enemy(Walker),
    Boss(Boss),
    Projectile(Shot),
    Pickup(Pickup),
    Particle(Spark),
    Solid(Solid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Player,
    Opponent,
    Puck,
    Enemy,
    Boss,
    Projectile,
    Pickup,
    Particle,
    Solid,
}

impl Kind {
    pub fn tag(&self) -> KindTag {
        match self {
            Kind::Player(_) => KindTag::Player,
            Kind::Opponent(_) => KindTag::Opponent,
            Kind::Puck(_) => KindTag::Puck,
            Kind::Enemy(_) => KindTag::Enemy,
            Kind::Boss(_) => KindTag::Boss,
            Kind::Projectile(_) => KindTag::Projectile,
            Kind::Pickup(_) => KindTag::Pickup,
            Kind::Particle(_) => KindTag::Particle,
            Kind::Solid(_) => KindTag::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub kind: Kind,
}

impl Entity {
    pub fn hero(&self) -> Option<&Hero> {
        match &self.kind {
            Kind::Player(h) => Some(h),
            _ => None,
        }
    }

    pub fn hero_mut(&mut self) -> Option<&mut Hero> {
        match &mut self.kind {
            Kind::Player(h) => Some(h),
            _ => None,
        }
    }

    pub fn boss(&self) -> Option<&Boss> {
        match &self.kind {
            Kind::Boss(b) => Some(b),
            _ => None,
        }
    }

    pub fn shot(&self) -> Option<&Shot> {
        match &self.kind {
            Kind::Projectile(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_alive_particle(&self) -> bool {
        !matches!(self.kind, Kind::Particle(Spark { life: 0, .. }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub player: Entity,
    pub opponents: Vec<Entity>,
    pub pucks: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub bosses: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    pub pickups: Vec<Entity>,
    pub particles: Vec<Entity>,
    pub solids: Vec<Entity>,
    next_id: EntityId,
}

impl World {
    pub fn new(body: Body, hero: Hero) -> Self {
        Self {
            player: Entity {
                id: 0,
                body,
                kind: Kind::Player(hero),
            },
            opponents: Vec::new(),
            pucks: Vec::new(),
            enemies: Vec::new(),
            bosses: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            solids: Vec::new(),
            next_id: 1,
        }
    }

    pub fn hero(&self) -> &Hero {
        match &self.player.kind {
            Kind::Player(h) => h,
            _ => unreachable!("player slot always holds a hero"),
        }
    }

    pub fn hero_mut(&mut self) -> &mut Hero {
        match &mut self.player.kind {
            Kind::Player(h) => h,
            _ => unreachable!("player slot always holds a hero"),
        }
    }

    /// Adds an entity to the collection matching its kind. Spawning a
    /// player replaces the current one.
    pub fn spawn(&mut self, body: Body, kind: Kind) -> EntityId {
        if let Kind::Player(_) = kind {
            self.player.body = body;
            self.player.kind = kind;
            return self.player.id;
        }
        let id = self.next_id;
        self.next_id += 1;
        let entity = Entity { id, body, kind };
        if let Some(list) = self.collection_mut(kind.tag()) {
            list.push(entity);
        }
        id
    }

    fn collection_mut(&mut self, tag: KindTag) -> Option<&mut Vec<Entity>> {
        match tag {
            KindTag::Player => None,
            KindTag::Opponent => Some(&mut self.opponents),
            KindTag::Puck => Some(&mut self.pucks),
            KindTag::Enemy => Some(&mut self.enemies),
            KindTag::Boss => Some(&mut self.bosses),
            KindTag::Projectile => Some(&mut self.projectiles),
            KindTag::Pickup => Some(&mut self.pickups),
            KindTag::Particle => Some(&mut self.particles),
            KindTag::Solid => Some(&mut self.solids),
        }
    }

    fn collections(&self) -> [&Vec<Entity>; 8] {
        [
            &self.solids,
            &self.pickups,
            &self.enemies,
            &self.bosses,
            &self.opponents,
            &self.pucks,
            &self.projectiles,
            &self.particles,
        ]
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        if id == self.player.id {
            return Some(&self.player);
        }
        self.collections()
            .into_iter()
            .flat_map(|list| list.iter())
            .find(|e| e.id == id)
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if id == self.player.id {
            return Some(&mut self.player);
        }
        [
            &mut self.solids,
            &mut self.pickups,
            &mut self.enemies,
            &mut self.bosses,
            &mut self.opponents,
            &mut self.pucks,
            &mut self.projectiles,
            &mut self.particles,
        ]
        .into_iter()
        .flatten()
        .find(|e| e.id == id)
    }

    /// Removes a non-player entity. A missing id means it was already
    /// resolved earlier in the tick, so this is a no-op returning `None`.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        for list in [
            &mut self.solids,
            &mut self.pickups,
            &mut self.enemies,
            &mut self.bosses,
            &mut self.opponents,
            &mut self.pucks,
            &mut self.projectiles,
            &mut self.particles,
        ] {
            if let Some(idx) = list.iter().position(|e| e.id == id) {
                return Some(list.remove(idx));
            }
        }
        None
    }

    pub fn clear_level(&mut self) {
        self.opponents.clear();
        self.pucks.clear();
        self.enemies.clear();
        self.bosses.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.particles.clear();
        self.solids.clear();
    }

    /// Entities in draw order, player last. Expired particles are skipped.
    pub fn renderable(&self) -> impl Iterator<Item = &Entity> {
        self.collections()
            .into_iter()
            .flat_map(|list| list.iter())
            .filter(|e| e.is_alive_particle())
            .chain(std::iter::once(&self.player))
    }

    pub fn entity_count(&self) -> usize {
        self.collections().iter().map(|l| l.len()).sum::<usize>() + 1
    }
}
