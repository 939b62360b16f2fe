//! Physical things living in the world space. The closed [`Thing`] enum
//! covers every kind of entity, capability checks dispatch on the variant.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::block::Block;
use crate::effect::Effect;
use crate::item::Item;
use crate::world::Body;

/// The default movement tempo of a mob, zero meaning no movement and
/// further from zero meaning faster.
pub const MOB_DEFAULT_TEMPO: f32 = 40.0;

/// Constant upward component of the bird's impulse, countering gravity.
const BIRD_GRAVITY_FACTOR: f32 = 150.0;
/// Horizontal stretch of the bird's movement circle into an ellipse.
const BIRD_X_SCALE: f32 = 1.61803;


/// A clamped gauge used for health and food bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    /// Current value, always in `[0, max]`.
    pub value: f32,
    /// Maximum value.
    pub max: f32,
}

impl Health {

    /// A full gauge with the given maximum.
    pub fn new(max: f32) -> Self {
        Self { value: max, max }
    }

    /// Change the gauge by the given delta, clamped to `[0, max]`.
    pub fn change(&mut self, delta: f32) {
        self.value = (self.value + delta).clamp(0.0, self.max);
    }

    /// Return true iff the gauge is fully drained.
    pub fn is_dead(&self) -> bool {
        self.value <= 0.0
    }

}


/// A boundary wall preventing movement off the edge of the game world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wall {
    /// The side this wall closes off, such as `top` or `left`.
    pub id: &'static str,
}

/// A player in the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub health: Health,
    pub food: Health,
}

impl Player {

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: Health::new(20.0),
            food: Health::new(20.0),
        }
    }

}

impl Default for Player {
    fn default() -> Self {
        Self::new("Allan")
    }
}

/// The physical carrier of a conceptual item lying in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedItem {
    pub item: Item,
    pub health: Health,
}

impl DroppedItem {

    pub fn new(item: Item) -> Self {
        Self {
            item,
            health: Health::new(20.0),
        }
    }

}

/// The behavioural kind of a mob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobKind {
    /// A friendly bird, nonchalant with a dash of cheerfulness.
    Bird,
}

/// A creature in the sandbox game. Can be friend, foe, or neither.
#[derive(Debug, Clone, PartialEq)]
pub struct Mob {
    /// A unique id for this type of mob.
    pub id: &'static str,
    /// The physical size of this mob.
    pub size: Vec2,
    /// The movement tempo of this mob.
    pub tempo: f32,
    pub health: Health,
    pub kind: MobKind,
    steps: u32,
}

impl Mob {

    /// Construct a bird mob with the default tempo.
    pub fn bird(id: &'static str, size: Vec2) -> Self {
        Self {
            id,
            size,
            tempo: MOB_DEFAULT_TEMPO,
            health: Health::new(20.0),
            kind: MobKind::Bird,
            steps: 0,
        }
    }

    /// Advance this mob by one time step. A step counter is used instead of
    /// accumulating time deltas, which works well enough assuming steps
    /// occur at a roughly constant cadence.
    fn step(&mut self, _time_delta: f32, body: &mut Body, rand: &mut SmallRng) {

        match self.kind {
            MobKind::Bird => {
                if self.steps % 20 == 0 {
                    // A random point on a movement circle of radius tempo,
                    // scaled by the percentage of health remaining, then
                    // stretched onto an ellipse wider on the x axis.
                    let health_percentage = self.health.value / self.health.max;
                    let angle = rand.gen_range(0.0..TAU);
                    let radius = self.tempo * health_percentage;
                    let dx = radius * angle.cos() * BIRD_X_SCALE;
                    let dy = radius * angle.sin();
                    body.velocity += Vec2::new(dx, dy - BIRD_GRAVITY_FACTOR);
                }
            }
        }

        self.steps += 1;

    }

}


/// A physical thing in the game world.
#[derive(Debug, Clone, PartialEq)]
pub enum Thing {
    Wall(Wall),
    Block(Block),
    Item(DroppedItem),
    Player(Player),
    Mob(Mob),
}

impl Thing {

    /// Return true iff this thing is able to be mined.
    pub fn is_mineable(&self) -> bool {
        match self {
            Thing::Block(block) => block.is_mineable(),
            _ => false,
        }
    }

    /// Return true iff this thing is able to be used.
    pub fn is_useable(&self) -> bool {
        match self {
            Thing::Block(block) => block.can_use(),
            _ => false,
        }
    }

    /// Use this thing, returning the resulting effect if any.
    pub fn use_thing(&self) -> Option<Effect> {
        match self {
            Thing::Block(block) => block.use_block(),
            _ => None,
        }
    }

    /// Advance this thing by one time step, before physics are resolved.
    pub fn step<D>(&mut self, time_delta: f32, body: &mut Body, _data: &mut D, rand: &mut SmallRng) {
        if let Thing::Mob(mob) = self {
            mob.step(time_delta, body, rand);
        }
    }

    /// Drain the health of a dynamic thing, flagging it for despawn at the
    /// end of the current step. Walls and blocks are unaffected.
    pub fn kill(&mut self) {
        match self {
            Thing::Item(item) => item.health.value = 0.0,
            Thing::Player(player) => player.health.value = 0.0,
            Thing::Mob(mob) => mob.health.value = 0.0,
            Thing::Wall(_) | Thing::Block(_) => {}
        }
    }

    /// Return true iff this thing is a dead dynamic thing, due to be swept
    /// out of the world at the end of the step.
    pub fn should_despawn(&self) -> bool {
        match self {
            Thing::Item(item) => item.health.is_dead(),
            Thing::Player(player) => player.health.is_dead(),
            Thing::Mob(mob) => mob.health.is_dead(),
            Thing::Wall(_) | Thing::Block(_) => false,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Thing::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Thing::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&DroppedItem> {
        match self {
            Thing::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Thing::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Thing::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_mob(&self) -> Option<&Mob> {
        match self {
            Thing::Mob(mob) => Some(mob),
            _ => None,
        }
    }

}


#[cfg(test)]
mod tests {

    use rand::SeedableRng;

    use super::*;

    #[test]
    fn health_is_clamped() {

        let mut health = Health::new(20.0);
        health.change(-25.0);
        assert_eq!(health.value, 0.0);
        assert!(health.is_dead());

        health.change(50.0);
        assert_eq!(health.value, 20.0);

    }

    #[test]
    fn bird_impulse_every_20_steps() {

        let mut bird = Mob::bird("friendly_bird", Vec2::new(12.0, 12.0));
        let mut body = Body::dynamic(Vec2::new(400.0, 100.0), Vec2::new(12.0, 12.0), 100.0, 1.0);
        let mut rand = SmallRng::seed_from_u64(42);

        // The impulse fires on the very first step.
        bird.step(1.0 / 60.0, &mut body, &mut rand);
        let first = body.velocity;
        assert_ne!(first, Vec2::ZERO);
        // Always carries the gravity countering component.
        assert!(first.y <= -(BIRD_GRAVITY_FACTOR - MOB_DEFAULT_TEMPO));

        // The next 19 steps leave the velocity alone.
        for _ in 0..19 {
            bird.step(1.0 / 60.0, &mut body, &mut rand);
        }
        assert_eq!(body.velocity, first);

        bird.step(1.0 / 60.0, &mut body, &mut rand);
        assert_ne!(body.velocity, first);

    }

    #[test]
    fn capability_dispatch() {

        let table = Thing::Block(crate::block::Block::from_parts(&["crafting_table"]).unwrap());
        assert!(table.is_mineable());
        assert!(table.is_useable());

        let wall = Thing::Wall(Wall { id: "left" });
        assert!(!wall.is_mineable());
        assert!(!wall.is_useable());
        assert_eq!(wall.use_thing(), None);

    }

    #[test]
    fn kill_flags_despawn() {
        let item = Item::from_parts(&["apple"]).unwrap();
        let mut dropped = Thing::Item(DroppedItem::new(item));
        assert!(!dropped.should_despawn());
        dropped.kill();
        assert!(dropped.should_despawn());
    }

}
