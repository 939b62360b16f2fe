//! The game world: sole owner of all physical state. Space is subdivided
//! into grid cells, blocks take up all of the space within their cell while
//! other things can be any size.
//!
//! Motion and collisions are handled in a step-wise fashion, accounting for
//! velocity and general gravity. Components outside the world hold only
//! opaque [`ThingId`] handles, never references into it.

use std::collections::HashSet;
use std::time::Instant;

use glam::{IVec2, Vec2};
use indexmap::IndexMap;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{trace, instrument};

use crate::geom::BoundingBox;
use crate::thing::{Thing, Wall, Player, DroppedItem, Mob};
use crate::block::Block;
use crate::GameError;

/// Default downward gravity, the y axis points down.
const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 300.0);
/// Default thickness of the boundary walls.
const DEFAULT_BOUNDARY_THICKNESS: f32 = 50.0;
/// Contact detection margin, resting contacts count as touching.
const CONTACT_MARGIN: f32 = 0.1;


/// Query category of a physical thing, each a unique power of 2 bit so that
/// point queries can filter on a bitwise combination of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Wall,
    Block,
    Player,
    Item,
    Mob,
}

impl Category {

    /// Every category combined.
    pub const ALL: u32 =
        Category::Wall.bit() |
        Category::Block.bit() |
        Category::Player.bit() |
        Category::Item.bit() |
        Category::Mob.bit();

    /// The unique bit of this category.
    pub const fn bit(self) -> u32 {
        match self {
            Category::Wall => 1 << 1,
            Category::Block => 1 << 2,
            Category::Player => 1 << 3,
            Category::Item => 1 << 4,
            Category::Mob => 1 << 5,
        }
    }

    /// Parse a category from its collision type name.
    pub fn from_name(name: &str) -> Result<Self, GameError> {
        Ok(match name {
            "wall" => Category::Wall,
            "block" => Category::Block,
            "player" => Category::Player,
            "item" => Category::Item,
            "mob" => Category::Mob,
            _ => return Err(GameError::UnknownCollisionType(name.to_string())),
        })
    }

}


/// An opaque handle to a thing registered in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThingId(u32);

/// The physical body of a thing: an axis-aligned box with motion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Centre position of the body.
    pub position: Vec2,
    /// Velocity of the body, ignored for static bodies.
    pub velocity: Vec2,
    pub mass: f32,
    pub friction: f32,
    /// True while the body rests on something below it.
    pub on_ground: bool,
    half: Vec2,
    statik: bool,
}

impl Body {

    /// A moving body centred at the given position.
    pub fn dynamic(position: Vec2, size: Vec2, mass: f32, friction: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            friction,
            on_ground: false,
            half: size / 2.0,
            statik: false,
        }
    }

    /// A static body filling the given bounding box.
    pub fn fixed(bb: BoundingBox, friction: f32) -> Self {
        Self {
            position: bb.center(),
            velocity: Vec2::ZERO,
            mass: f32::INFINITY,
            friction,
            on_ground: false,
            half: bb.size() / 2.0,
            statik: true,
        }
    }

    pub fn is_static(&self) -> bool {
        self.statik
    }

    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// The world-space bounding box of this body.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_center(self.position, self.half)
    }

}


/// Contact information handed to collision callbacks, carrying the handles
/// of both things in callback argument order.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: ThingId,
    pub b: ThingId,
}

/// A single collision callback. Returning false makes the contact
/// pass-through: it is not physically resolved.
pub type CollisionCallback<D> = Box<dyn FnMut(&mut Thing, &mut Thing, &mut D, &Contact) -> bool>;

/// Up to four optional callbacks attached to a pair of collision types.
/// `begin` fires exactly once when a contact starts and `separate` once
/// when it ends; `pre_solve` and `post_solve` fire around the resolution
/// of every step the contact lasts.
pub struct CollisionHandler<D> {
    begin: Option<CollisionCallback<D>>,
    separate: Option<CollisionCallback<D>>,
    pre_solve: Option<CollisionCallback<D>>,
    post_solve: Option<CollisionCallback<D>>,
}

impl<D> CollisionHandler<D> {

    pub fn new() -> Self {
        Self {
            begin: None,
            separate: None,
            pre_solve: None,
            post_solve: None,
        }
    }

    pub fn on_begin(mut self, callback: impl FnMut(&mut Thing, &mut Thing, &mut D, &Contact) -> bool + 'static) -> Self {
        self.begin = Some(Box::new(callback));
        self
    }

    pub fn on_separate(mut self, callback: impl FnMut(&mut Thing, &mut Thing, &mut D, &Contact) -> bool + 'static) -> Self {
        self.separate = Some(Box::new(callback));
        self
    }

    pub fn on_pre_solve(mut self, callback: impl FnMut(&mut Thing, &mut Thing, &mut D, &Contact) -> bool + 'static) -> Self {
        self.pre_solve = Some(Box::new(callback));
        self
    }

    pub fn on_post_solve(mut self, callback: impl FnMut(&mut Thing, &mut Thing, &mut D, &Contact) -> bool + 'static) -> Self {
        self.post_solve = Some(Box::new(callback));
        self
    }

}

impl<D> Default for CollisionHandler<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Callback {
    Begin,
    Separate,
    PreSolve,
    PostSolve,
}


/// A thing registered in the world, together with its physical body. The
/// thing is temporarily taken out while its step hook or a collision
/// callback runs on it.
struct Component {
    thing: Option<Thing>,
    body: Body,
    category: Category,
}

/// Game world containing things in physical space, generic over the
/// arbitrary per-step context handed to step hooks and collision callbacks.
pub struct World<D = ()> {
    grid_size: IVec2,
    cell_expanse: f32,
    pixel_size: Vec2,
    gravity: Vec2,
    things: IndexMap<ThingId, Component>,
    next_id: u32,
    handlers: Vec<((Category, Category), CollisionHandler<D>)>,
    /// Pairs of things currently in contact, ordered by id.
    touching: HashSet<(ThingId, ThingId)>,
    /// Touching pairs whose begin callback made the contact pass-through.
    passing: HashSet<(ThingId, ThingId)>,
    rand: SmallRng,
    last_time: Option<Instant>,
}

impl<D> World<D> {

    /// Create a new world of the given grid size and cell expanse, with
    /// four boundary walls placed just outside the pixel area.
    pub fn new(grid_size: IVec2, cell_expanse: f32) -> Self {
        Self::with_rng(grid_size, cell_expanse, SmallRng::from_entropy())
    }

    /// Same as [`World::new`] but with a deterministic random source.
    pub fn new_seeded(grid_size: IVec2, cell_expanse: f32, seed: u64) -> Self {
        Self::with_rng(grid_size, cell_expanse, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(grid_size: IVec2, cell_expanse: f32, rand: SmallRng) -> Self {

        let mut world = Self {
            grid_size,
            cell_expanse,
            pixel_size: grid_size.as_vec2() * cell_expanse,
            gravity: DEFAULT_GRAVITY,
            things: IndexMap::new(),
            next_id: 0,
            handlers: Vec::new(),
            touching: HashSet::new(),
            passing: HashSet::new(),
            rand,
            last_time: None,
        };

        world.create_boundaries(DEFAULT_BOUNDARY_THICKNESS);
        world

    }

    fn create_boundaries(&mut self, thickness: f32) {

        let Vec2 { x: width, y: height } = self.pixel_size;
        let t2 = thickness * 2.0;

        let walls = [
            ("top", BoundingBox::new(-t2, -t2, width + t2, 0.0)),
            ("bottom", BoundingBox::new(-t2, height, width + t2, height + t2)),
            ("left", BoundingBox::new(-t2, -t2, 0.0, height + t2)),
            ("right", BoundingBox::new(width, -t2, width + t2, height + t2)),
        ];

        for (wall_id, bb) in walls {
            self.insert(Thing::Wall(Wall { id: wall_id }), Body::fixed(bb, 1.0), Category::Wall);
        }

    }

    /// Set the gravity of the world, the y axis points down.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// The `(width, height)` pixel size of the world.
    pub fn pixel_size(&self) -> Vec2 {
        self.pixel_size
    }

    /// The `(column, row)` size of the world grid.
    pub fn grid_size(&self) -> IVec2 {
        self.grid_size
    }

    /// The expanse (width/height) of each grid cell.
    pub fn cell_expanse(&self) -> f32 {
        self.cell_expanse
    }

    /// The world's random source.
    pub fn rand_mut(&mut self) -> &mut SmallRng {
        &mut self.rand
    }

    /// Convert a pixel position to the grid cell containing it.
    pub fn xy_to_grid(&self, point: Vec2) -> IVec2 {
        (point / self.cell_expanse).floor().as_ivec2()
    }

    /// Convert a grid cell to the pixel position of its top-left corner.
    pub fn grid_to_xy(&self, cell: IVec2) -> Vec2 {
        cell.as_vec2() * self.cell_expanse
    }

    /// Convert a grid cell to the pixel position of its centre.
    pub fn grid_to_xy_centre(&self, cell: IVec2) -> Vec2 {
        (cell.as_vec2() + 0.5) * self.cell_expanse
    }

    fn insert(&mut self, thing: Thing, body: Body, category: Category) -> ThingId {
        let id = ThingId(self.next_id);
        self.next_id += 1;
        self.things.insert(id, Component {
            thing: Some(thing),
            body,
            category,
        });
        id
    }

    /// Add a thing centred at the given position with an explicit category.
    pub fn add_thing(&mut self, thing: Thing, position: Vec2, size: Vec2,
                     category: Category, mass: f32, friction: f32) -> ThingId {
        self.insert(thing, Body::dynamic(position, size, mass, friction), category)
    }

    /// Add a player centred at the given position, sized relative to the
    /// cell expanse.
    pub fn add_player(&mut self, player: Player, position: Vec2) -> ThingId {
        let half = (self.cell_expanse * 0.4 - 2.0).floor();
        let size = Vec2::splat(half * 2.0);
        self.add_thing(Thing::Player(player), position, size, Category::Player, 50.0, 0.5)
    }

    /// Add a block at the given grid cell, as a static body snapped to the
    /// cell's boundaries.
    pub fn add_block_to_grid(&mut self, block: Block, cell: IVec2) -> ThingId {
        let min = self.grid_to_xy(cell);
        let max = min + self.cell_expanse;
        let bb = BoundingBox { min, max };
        self.insert(Thing::Block(block), Body::fixed(bb, 1.0), Category::Block)
    }

    /// Add a block at the grid cell containing the given pixel position.
    pub fn add_block(&mut self, block: Block, point: Vec2) -> ThingId {
        self.add_block_to_grid(block, self.xy_to_grid(point))
    }

    /// Add a dropped item centred at the given position.
    pub fn add_item(&mut self, item: DroppedItem, position: Vec2) -> ThingId {
        self.add_thing(Thing::Item(item), position, Vec2::new(8.0, 8.0), Category::Item, 2.0, 1.0)
    }

    /// Add a mob centred at the given position, sized by the mob itself.
    pub fn add_mob(&mut self, mob: Mob, position: Vec2) -> ThingId {
        let size = mob.size;
        self.add_thing(Thing::Mob(mob), position, size, Category::Mob, 100.0, 1.0)
    }

    /// Remove a thing from the world, returning it. Contacts it was part
    /// of are forgotten without firing their separate callbacks.
    pub fn remove_thing(&mut self, id: ThingId) -> Option<Thing> {
        let component = self.things.shift_remove(&id)?;
        self.touching.retain(|&(a, b)| a != id && b != id);
        self.passing.retain(|&(a, b)| a != id && b != id);
        component.thing
    }

    /// The thing behind the given handle, none while a callback runs on it
    /// or once it has been removed.
    pub fn get(&self, id: ThingId) -> Option<&Thing> {
        self.things.get(&id)?.thing.as_ref()
    }

    pub fn get_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.get_mut(&id)?.thing.as_mut()
    }

    /// The physical body of the given thing.
    pub fn body(&self, id: ThingId) -> Option<&Body> {
        self.things.get(&id).map(|component| &component.body)
    }

    pub fn body_mut(&mut self, id: ThingId) -> Option<&mut Body> {
        self.things.get_mut(&id).map(|component| &mut component.body)
    }

    /// The world-space bounding box of the given thing.
    pub fn thing_bb(&self, id: ThingId) -> Option<BoundingBox> {
        self.body(id).map(Body::bounding_box)
    }

    /// Iterate over every thing in the world, boundary walls included.
    pub fn iter_things(&self) -> impl Iterator<Item = (ThingId, &Thing, BoundingBox)> {
        self.things.iter().filter_map(|(&id, component)| {
            component.thing.as_ref().map(|thing| (id, thing, component.body.bounding_box()))
        })
    }

    /// Handles of all things within the given distance of a point, filtered
    /// by a bitwise combination of category bits.
    pub fn point_query(&self, point: Vec2, max_distance: f32, mask: u32) -> Vec<ThingId> {
        self.things.iter()
            .filter(|(_, component)| component.category.bit() & mask != 0)
            .filter(|(_, component)| component.body.bounding_box().distance(point) <= max_distance)
            .map(|(&id, _)| id)
            .collect()
    }

    /// The block on the given point, if any.
    pub fn get_block(&self, point: Vec2) -> Option<ThingId> {
        self.point_query(point, 0.0, Category::Block.bit()).into_iter().next()
    }

    /// All things on the given point, boundary walls excluded.
    pub fn get_things(&self, point: Vec2) -> Vec<ThingId> {
        self.point_query(point, 0.0, Category::ALL ^ Category::Wall.bit())
    }

    /// A thing on the given point, if any, boundary walls excluded.
    pub fn get_thing(&self, point: Vec2) -> Option<ThingId> {
        self.get_things(point).into_iter().next()
    }

    /// All dropped items within the given distance of a point.
    pub fn get_items(&self, point: Vec2, max_distance: f32) -> Vec<ThingId> {
        self.point_query(point, max_distance, Category::Item.bit())
    }

    /// All mobs within the given distance of a point.
    pub fn get_mobs(&self, point: Vec2, max_distance: f32) -> Vec<ThingId> {
        self.point_query(point, max_distance, Category::Mob.bit())
    }

    /// Add a collision handler between two named collision types. The
    /// callbacks receive both things in the order the types were given.
    pub fn add_collision_handler(&mut self, type_a: &str, type_b: &str,
                                 handler: CollisionHandler<D>) -> Result<(), GameError> {
        let a = Category::from_name(type_a)?;
        let b = Category::from_name(type_b)?;
        self.handlers.push(((a, b), handler));
        Ok(())
    }

    /// Step the world forward by the wall-clock time elapsed since the
    /// previous call. The first call steps by a zero delta.
    #[instrument(skip_all)]
    pub fn step(&mut self, data: &mut D) {
        let now = Instant::now();
        let time_delta = self.last_time
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_time = Some(now);
        self.advance(time_delta, data);
    }

    /// Step the world forward by an explicit time delta, in seconds.
    ///
    /// 1. Every live thing's step hook runs first.
    /// 2. Physics are applied: gravity, velocity integration and collision
    ///    resolution, with the collision lifecycle callbacks firing along
    ///    the way.
    /// 3. Dead things are swept out of the world.
    pub fn advance(&mut self, time_delta: f32, data: &mut D) {

        trace!("advance time_delta: {time_delta}");
        let Self { things, handlers, touching, passing, rand, gravity, .. } = self;

        // Step hooks run before any physics.
        for index in 0..things.len() {
            if let Some((_, component)) = things.get_index_mut(index) {
                if let Some(mut thing) = component.thing.take() {
                    let mut body = component.body;
                    thing.step(time_delta, &mut body, data, rand);
                    component.body = body;
                    component.thing = Some(thing);
                }
            }
        }

        // Integrate and resolve each dynamic body in turn.
        for index in 0..things.len() {

            let (id, mut body) = {
                let Some((&id, component)) = things.get_index(index) else { continue };
                if component.body.is_static() {
                    continue;
                }
                (id, component.body)
            };

            body.velocity += *gravity * time_delta;
            let delta = body.velocity * time_delta;
            let bb = body.bounding_box();
            let broad = bb.expand(delta).inflate(Vec2::splat(CONTACT_MARGIN));

            let candidates = things.iter()
                .filter(|&(&other_id, _)| other_id != id)
                .map(|(&other_id, component)| (other_id, component.body.bounding_box()))
                .filter(|&(_, other_bb)| other_bb.intersects(broad))
                .collect::<Vec<_>>();

            let mut obstacles = Vec::new();
            let mut solid_contacts = Vec::new();

            for (other_id, other_bb) in candidates {

                let pair = (id.min(other_id), id.max(other_id));
                if touching.insert(pair) {
                    let solid = Self::fire(things, handlers, Callback::Begin, id, other_id, data);
                    if !solid {
                        passing.insert(pair);
                    }
                }

                if passing.contains(&pair) {
                    continue;
                }
                if !Self::fire(things, handlers, Callback::PreSolve, id, other_id, data) {
                    continue;
                }

                obstacles.push(other_bb);
                solid_contacts.push(other_id);

            }

            // Resolve the y axis before the x axis.
            let mut dy = delta.y;
            for other_bb in &obstacles {
                dy = other_bb.calc_y_delta(bb, dy);
            }
            let bb = bb.offset(Vec2::new(0.0, dy));
            let mut dx = delta.x;
            for other_bb in &obstacles {
                dx = other_bb.calc_x_delta(bb, dx);
            }

            body.position += Vec2::new(dx, dy);

            if dx != delta.x {
                body.velocity.x = 0.0;
            }
            if dy != delta.y {
                body.on_ground = delta.y > 0.0;
                body.velocity.y = 0.0;
            } else if delta.y != 0.0 {
                body.on_ground = false;
            }

            // Surface friction damps horizontal motion while grounded.
            if body.on_ground {
                body.velocity.x /= 1.0 + body.friction * time_delta * 10.0;
            }

            if let Some(component) = things.get_mut(&id) {
                component.body = body;
            }

            for other_id in solid_contacts {
                Self::fire(things, handlers, Callback::PostSolve, id, other_id, data);
            }

        }

        // Contacts that no longer overlap have ended.
        let ended = touching.iter().copied()
            .filter(|&(a, b)| {
                match (things.get(&a), things.get(&b)) {
                    (Some(ca), Some(cb)) => {
                        let bb = ca.body.bounding_box().inflate(Vec2::splat(CONTACT_MARGIN));
                        !bb.intersects(cb.body.bounding_box())
                    }
                    _ => true,
                }
            })
            .collect::<Vec<_>>();

        for (a, b) in ended {
            touching.remove(&(a, b));
            passing.remove(&(a, b));
            Self::fire(things, handlers, Callback::Separate, a, b, data);
        }

        // Sweep dead things out of the world.
        let dead = things.iter()
            .filter(|(_, component)| component.thing.as_ref().is_some_and(Thing::should_despawn))
            .map(|(&id, _)| id)
            .collect::<Vec<_>>();

        for id in dead {
            trace!("sweeping dead thing {id:?}");
            things.shift_remove(&id);
            touching.retain(|&(a, b)| a != id && b != id);
            passing.retain(|&(a, b)| a != id && b != id);
        }

    }

    /// Fire the callbacks of the given kind for a contact between two
    /// things. Returns false iff any callback made the contact
    /// pass-through. The callback arguments follow the registration order
    /// of the handler's collision types.
    fn fire(things: &mut IndexMap<ThingId, Component>,
            handlers: &mut [((Category, Category), CollisionHandler<D>)],
            which: Callback, id_a: ThingId, id_b: ThingId, data: &mut D) -> bool {

        let Some(cat_a) = things.get(&id_a).map(|component| component.category) else { return true };
        let Some(cat_b) = things.get(&id_b).map(|component| component.category) else { return true };

        let mut solid = true;

        for ((type_a, type_b), handler) in handlers.iter_mut() {

            let (first, second) = if (*type_a, *type_b) == (cat_a, cat_b) {
                (id_a, id_b)
            } else if (*type_a, *type_b) == (cat_b, cat_a) {
                (id_b, id_a)
            } else {
                continue;
            };

            let Some(callback) = (match which {
                Callback::Begin => handler.begin.as_mut(),
                Callback::Separate => handler.separate.as_mut(),
                Callback::PreSolve => handler.pre_solve.as_mut(),
                Callback::PostSolve => handler.post_solve.as_mut(),
            }) else {
                continue;
            };

            let Some(mut thing_a) = things.get_mut(&first).and_then(|c| c.thing.take()) else {
                continue;
            };
            let Some(mut thing_b) = things.get_mut(&second).and_then(|c| c.thing.take()) else {
                if let Some(component) = things.get_mut(&first) {
                    component.thing = Some(thing_a);
                }
                continue;
            };

            let contact = Contact { a: first, b: second };
            solid &= callback(&mut thing_a, &mut thing_b, data, &contact);

            if let Some(component) = things.get_mut(&first) {
                component.thing = Some(thing_a);
            }
            if let Some(component) = things.get_mut(&second) {
                component.thing = Some(thing_b);
            }

        }

        solid

    }

}


#[cfg(test)]
mod tests {

    use crate::item::Item;

    use super::*;

    fn new_world() -> World {
        World::new_seeded(IVec2::new(10, 10), 32.0, 7)
    }

    #[test]
    fn boundaries_are_created() {
        let world = new_world();
        let walls = world.iter_things()
            .filter(|(_, thing, _)| matches!(thing, Thing::Wall(_)))
            .count();
        assert_eq!(walls, 4);
        // Walls are excluded from generic point queries.
        assert!(world.get_things(Vec2::new(-10.0, 160.0)).is_empty());
    }

    #[test]
    fn grid_conversions() {
        let world = new_world();
        assert_eq!(world.xy_to_grid(Vec2::new(33.0, 95.0)), IVec2::new(1, 2));
        assert_eq!(world.grid_to_xy(IVec2::new(1, 2)), Vec2::new(32.0, 64.0));
        assert_eq!(world.grid_to_xy_centre(IVec2::new(1, 2)), Vec2::new(48.0, 80.0));
        assert_eq!(world.pixel_size(), Vec2::new(320.0, 320.0));
    }

    #[test]
    fn block_queries() {

        let mut world = new_world();
        let block = Block::from_parts(&["dirt"]).unwrap();
        let id = world.add_block_to_grid(block, IVec2::new(3, 4));

        assert_eq!(world.get_block(world.grid_to_xy_centre(IVec2::new(3, 4))), Some(id));
        assert_eq!(world.get_block(world.grid_to_xy_centre(IVec2::new(3, 5))), None);

        let removed = world.remove_thing(id).unwrap();
        assert!(matches!(removed, Thing::Block(_)));
        assert_eq!(world.get_block(world.grid_to_xy_centre(IVec2::new(3, 4))), None);

    }

    #[test]
    fn gravity_pulls_items_down() {

        let mut world = new_world();
        let item = DroppedItem::new(Item::from_parts(&["apple"]).unwrap());
        let id = world.add_item(item, Vec2::new(100.0, 50.0));

        world.advance(0.1, &mut ());
        let body = world.body(id).unwrap();
        assert!(body.velocity.y > 0.0);
        assert!(body.position.y > 50.0);

    }

    #[test]
    fn player_lands_on_block() {

        let mut world = new_world();
        world.add_block_to_grid(Block::from_parts(&["stone"]).unwrap(), IVec2::new(3, 5));

        let spawn = world.grid_to_xy_centre(IVec2::new(3, 3));
        let id = world.add_player(Player::new("Allan"), spawn);
        let half = world.body(id).unwrap().size().y / 2.0;

        for _ in 0..200 {
            world.advance(1.0 / 60.0, &mut ());
        }

        let body = world.body(id).unwrap();
        assert!(body.on_ground);
        assert_eq!(body.velocity.y, 0.0);
        // Resting on the block's top face, within the contact margin.
        let block_top = world.grid_to_xy(IVec2::new(3, 5)).y;
        assert!((body.position.y + half - block_top).abs() <= CONTACT_MARGIN + 1e-3);

    }

    #[test]
    fn begin_fires_once_and_passes_through() {

        let mut world: World<u32> = World::with_rng(IVec2::new(10, 10), 32.0, SmallRng::seed_from_u64(7));
        world.add_block_to_grid(Block::from_parts(&["stone"]).unwrap(), IVec2::new(3, 5));

        let spawn = world.grid_to_xy_centre(IVec2::new(3, 4));
        world.add_player(Player::new("Allan"), spawn);
        let item = DroppedItem::new(Item::from_parts(&["apple"]).unwrap());
        world.add_item(item, spawn);

        world.add_collision_handler("player", "item", CollisionHandler::new()
            .on_begin(|player, item, begins: &mut u32, _contact| {
                assert!(matches!(player, Thing::Player(_)));
                assert!(matches!(item, Thing::Item(_)));
                *begins += 1;
                false
            })).unwrap();

        let mut begins = 0;
        for _ in 0..30 {
            world.advance(1.0 / 60.0, &mut begins);
        }
        assert_eq!(begins, 1);

    }

    #[test]
    fn killed_things_are_swept() {

        let mut world = new_world();
        world.add_block_to_grid(Block::from_parts(&["stone"]).unwrap(), IVec2::new(3, 5));

        let spawn = world.grid_to_xy_centre(IVec2::new(3, 4));
        world.add_player(Player::new("Allan"), spawn);
        let id = world.add_item(DroppedItem::new(Item::from_parts(&["apple"]).unwrap()), spawn);

        world.add_collision_handler("player", "item", CollisionHandler::new()
            .on_begin(|_, item, _, _| {
                item.kill();
                false
            })).unwrap();

        world.advance(1.0 / 60.0, &mut ());
        assert!(world.get(id).is_none());
        assert!(world.get_items(spawn, 100.0).is_empty());

    }

    #[test]
    fn range_queries_filter_by_category() {

        let mut world = new_world();
        let centre = Vec2::new(100.0, 100.0);
        let item = world.add_item(DroppedItem::new(Item::from_parts(&["apple"]).unwrap()), centre);
        let mob = world.add_mob(Mob::bird("friendly_bird", Vec2::new(12.0, 12.0)), centre + Vec2::new(20.0, 0.0));

        assert_eq!(world.get_items(centre, 10.0), vec![item]);
        assert_eq!(world.get_mobs(centre, 30.0), vec![mob]);
        assert!(world.get_mobs(centre, 5.0).is_empty());

    }

    #[test]
    fn unknown_collision_type_is_an_error() {
        let mut world = new_world();
        assert!(world.add_collision_handler("player", "ghost", CollisionHandler::new()).is_err());
    }

}
