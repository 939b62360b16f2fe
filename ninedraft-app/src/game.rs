//! The high-level game controller. It owns the world, the player's
//! containers and the current targeting state, and translates semantic
//! inputs (move, click, use) into world mutations.

use glam::{IVec2, Vec2};
use rand::Rng;
use tracing::{debug, info, warn};

use ninedraft::block::Block;
use ninedraft::craft::{CraftingSession, GridCrafter, Selection};
use ninedraft::effect::{CraftKind, Effect, Stat};
use ninedraft::geom::positions_in_range;
use ninedraft::inventory::{Grid, SelectableGrid, Stack};
use ninedraft::item::Item;
use ninedraft::thing::{DroppedItem, Mob, Player, Thing};
use ninedraft::world::{CollisionHandler, Contact, ThingId, World};
use ninedraft::GameError;

use crate::draw::{DrawCommand, DrawError, WorldViewRouter};

/// Side length of a grid cell, in pixels.
pub const BLOCK_SIZE: f32 = 32.0;
/// Width of the world, in cells.
pub const GRID_WIDTH: i32 = 32;
/// Height of the world, in cells.
pub const GRID_HEIGHT: i32 = 16;

/// Impulse added per movement input.
const MOVE_IMPULSE: f32 = 80.0;
/// Upward impulse of a jump.
const JUMP_IMPULSE: f32 = 200.0;


/// The player-owned containers, threaded through the world step so that
/// collision callbacks can reach them.
pub struct GameData {
    pub hot_bar: SelectableGrid,
    pub inventory: Grid,
}

/// The controller of a running game.
pub struct Ninedraft {
    world: World<GameData>,
    data: GameData,
    player: ThingId,
    hands: Item,
    target_position: Vec2,
    target_in_range: bool,
    crafting: Option<CraftingSession>,
    seed: Option<u64>,
    dead: bool,
}

impl Ninedraft {

    /// Start a new game, optionally forcing the world seed.
    pub fn new(seed: Option<u64>) -> Result<Self, GameError> {

        let grid_size = IVec2::new(GRID_WIDTH, GRID_HEIGHT);
        let mut world = match seed {
            Some(seed) => World::new_seeded(grid_size, BLOCK_SIZE, seed),
            None => World::new(grid_size, BLOCK_SIZE),
        };

        load_simple_world(&mut world)?;

        let player = world.add_player(Player::default(), Vec2::new(250.0, 150.0));

        world.add_collision_handler("player", "item",
            CollisionHandler::new().on_begin(handle_player_collide_item))?;

        let mut hot_bar = SelectableGrid::new(1, 10);
        hot_bar.select((0, 0))?;

        let starting_hotbar = [
            Stack::new(Item::from_parts(&["dirt"])?, 20),
            Stack::new(Item::from_parts(&["apple"])?, 4),
            Stack::new(Item::from_parts(&["pickaxe", "diamond"])?, 1),
            Stack::new(Item::from_parts(&["axe", "iron"])?, 1),
            Stack::new(Item::from_parts(&["crafting_table"])?, 1),
        ];

        for (i, stack) in starting_hotbar.into_iter().enumerate() {
            hot_bar.set((0, i), Some(stack))?;
        }

        let starting_inventory = [
            ((1, 5), Stack::new(Item::from_parts(&["dirt"])?, 10)),
            ((0, 2), Stack::new(Item::from_parts(&["wood"])?, 10)),
            ((2, 5), Stack::new(Item::from_parts(&["stick"])?, 4)),
            ((0, 0), Stack::new(Item::from_parts(&["stone"])?, 10)),
        ];

        let mut inventory = Grid::new(3, 10);
        for (position, stack) in starting_inventory {
            inventory.set(position, Some(stack))?;
        }

        Ok(Self {
            world,
            data: GameData { hot_bar, inventory },
            player,
            hands: Item::hand(),
            target_position: Vec2::ZERO,
            target_in_range: false,
            crafting: None,
            seed,
            dead: false,
        })

    }

    /// Throw the current game away and start over with the same seed.
    pub fn restart(&mut self) -> Result<(), GameError> {
        *self = Self::new(self.seed)?;
        Ok(())
    }

    pub fn world(&self) -> &World<GameData> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<GameData> {
        &mut self.world
    }

    pub fn hot_bar(&self) -> &SelectableGrid {
        &self.data.hot_bar
    }

    pub fn inventory(&self) -> &Grid {
        &self.data.inventory
    }

    /// The player, none once they have been swept out of the world.
    pub fn player(&self) -> Option<&Player> {
        self.world.get(self.player)?.as_player()
    }

    /// Return true iff the player has died.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Return true iff the target is within the held item's reach.
    pub fn target_in_range(&self) -> bool {
        self.target_in_range
    }

    /// The target position snapped to the centre of its grid cell, where a
    /// frontend would draw the target cursor.
    pub fn target_cursor(&self) -> Vec2 {
        self.world.grid_to_xy_centre(self.world.xy_to_grid(self.target_position))
    }

    /// Step the world forward by the elapsed wall-clock time.
    pub fn step(&mut self) {
        self.world.step(&mut self.data);
        self.check_death();
    }

    /// Step the world forward by an explicit time delta.
    pub fn advance(&mut self, time_delta: f32) {
        self.world.advance(time_delta, &mut self.data);
        self.check_death();
    }

    fn check_death(&mut self) {
        let alive = self.world.get(self.player)
            .and_then(Thing::as_player)
            .is_some_and(|player| !player.health.is_dead());
        if !alive && !self.dead {
            warn!("the player has died");
            self.dead = true;
        }
    }

    /// Process a horizontal or vertical movement input.
    pub fn move_player(&mut self, dx: f32, dy: f32) {
        self.check_target();
        if let Some(body) = self.world.body_mut(self.player) {
            body.velocity += Vec2::new(dx * MOVE_IMPULSE, dy * MOVE_IMPULSE);
        }
    }

    /// Process a jump input. The horizontal velocity is damped a little so
    /// repeated jumping does not accelerate the player forever.
    pub fn jump(&mut self) {
        self.check_target();
        if let Some(body) = self.world.body_mut(self.player) {
            body.velocity = Vec2::new(body.velocity.x * 0.8, body.velocity.y - JUMP_IMPULSE);
        }
    }

    /// Process the cursor moving to the given pixel position.
    pub fn mouse_move(&mut self, position: Vec2) {
        self.target_position = position;
        self.check_target();
    }

    /// Process the cursor leaving the playing field.
    pub fn mouse_leave(&mut self) {
        self.target_in_range = false;
    }

    /// Process a primary click: mine the targeted block, if any.
    pub fn left_click(&mut self) -> Result<(), GameError> {
        if self.target_in_range {
            if let Some(block_id) = self.world.get_block(self.target_position) {
                self.mine_block(block_id)?;
            }
        }
        Ok(())
    }

    /// Process a secondary click: use the targeted thing, or place the
    /// selected item onto the target cell.
    pub fn right_click(&mut self) -> Result<(), GameError> {

        if let Some(target) = self.world.get_thing(self.target_position) {
            let effect = self.world.get(target).and_then(Thing::use_thing);
            if let Some(effect) = effect {
                debug!("used {target:?} and got {effect:?}");
                self.run_effect(effect)?;
            }
            return Ok(());
        }

        let Some(selected) = self.data.hot_bar.selected() else {
            return Ok(());
        };
        let Some(stack) = self.data.hot_bar.get_mut(selected) else {
            return Ok(());
        };

        let drops = stack.item().place();

        stack.subtract(1);
        if stack.quantity() == 0 {
            self.data.hot_bar.set(selected, None)?;
        }

        if drops.is_empty() {
            return Ok(());
        }
        // Handling multiple drops would be somewhat finicky, so prevent it.
        if drops.len() > 1 {
            return Err(GameError::Unsupported("cannot handle dropping more than 1 thing"));
        }

        match drops[0] {
            Effect::Block(spec) => {
                if self.world.get_block(self.target_position).is_none() {
                    self.world.add_block(Block::from_spec(spec)?, self.target_position);
                } else {
                    return Err(GameError::Unsupported(
                        "automatically placing a block nearby if the target cell is full is not yet implemented"));
                }
            }
            Effect::Stat { .. } | Effect::Crafting(_) => self.run_effect(drops[0])?,
            Effect::Item(_) => return Err(GameError::Unsupported("unknown placement drop category")),
        }

        Ok(())

    }

    /// Toggle the selection of the given hotbar cell.
    pub fn activate_item(&mut self, index: usize) -> Result<(), GameError> {
        debug!("activating {index}");
        self.data.hot_bar.toggle_selection((0, index))
    }

    /// Apply an effect produced by using or consuming something.
    pub fn run_effect(&mut self, effect: Effect) -> Result<(), GameError> {
        match effect {
            Effect::Crafting(kind) => {
                match kind {
                    CraftKind::Basic => debug!("can't craft much on a 2x2 grid"),
                    CraftKind::CraftingTable => debug!("let's get our craft on"),
                }
                self.trigger_crafting(kind)
            }
            Effect::Stat { stat, strength } => {
                let Some(player) = self.world.get_mut(self.player).and_then(Thing::as_player_mut) else {
                    return Ok(());
                };
                if player.food.value < player.food.max {
                    info!("gaining {strength} {stat:?}");
                    match stat {
                        Stat::Food => player.food.change(strength),
                        Stat::Health => player.health.change(strength),
                    }
                } else if player.food.value == player.food.max
                        && player.health.value < player.food.max {
                    // At a full food bar the gain spills over into health.
                    info!("gaining {strength} health");
                    player.health.change(strength);
                }
                Ok(())
            }
            _ => Err(GameError::Unsupported("no effect defined")),
        }
    }

    fn trigger_crafting(&mut self, kind: CraftKind) -> Result<(), GameError> {
        let crafter = match kind {
            CraftKind::Basic => GridCrafter::basic()?,
            CraftKind::CraftingTable => GridCrafter::crafting_table()?,
        };
        self.crafting = Some(CraftingSession::new(crafter));
        Ok(())
    }

    /// Toggle the basic crafting window open or closed.
    pub fn toggle_crafting(&mut self) -> Result<(), GameError> {
        if self.crafting.take().is_none() {
            self.run_effect(Effect::Crafting(CraftKind::Basic))?;
        }
        Ok(())
    }

    /// Close the crafting window, if one is open.
    pub fn close_crafting(&mut self) {
        self.crafting = None;
    }

    pub fn crafting(&self) -> Option<&CraftingSession> {
        self.crafting.as_ref()
    }

    /// Process a primary movement in the open crafting window.
    pub fn craft_move_primary(&mut self, selection: Selection, ctrl: bool) -> Result<(), GameError> {
        match &mut self.crafting {
            Some(session) => session.move_primary(selection, ctrl,
                &mut self.data.hot_bar, &mut self.data.inventory),
            None => Ok(()),
        }
    }

    /// Process a secondary movement in the open crafting window.
    pub fn craft_move_secondary(&mut self, selection: Selection) -> Result<(), GameError> {
        match &mut self.crafting {
            Some(session) => session.move_secondary(selection,
                &mut self.data.hot_bar, &mut self.data.inventory),
            None => Ok(()),
        }
    }

    /// Craft in the open crafting window. Returns true iff anything moved
    /// to the output.
    pub fn craft(&mut self) -> Result<bool, GameError> {
        match &mut self.crafting {
            Some(session) => session.craft(),
            None => Ok(false),
        }
    }

    /// Produce the draw commands for every physical thing in the world.
    pub fn render(&self, router: &WorldViewRouter) -> Result<Vec<DrawCommand>, DrawError> {
        self.world.iter_things()
            .map(|(_, thing, bb)| router.draw(thing, bb))
            .collect()
    }

    /// The active item (the selected hotbar stack, or bare hands) and the
    /// effective item actually swung (the active item when it can attack,
    /// otherwise bare hands).
    fn holding(&self) -> (Item, Item) {
        let active = match self.data.hot_bar.selected_stack() {
            Some(stack) => stack.item().clone(),
            None => self.hands.clone(),
        };
        let effective = if active.can_attack() {
            active.clone()
        } else {
            self.hands.clone()
        };
        (active, effective)
    }

    fn check_target(&mut self) {
        let (active, _) = self.holding();
        let pixel_range = active.attack_range * self.world.cell_expanse();
        let Some(body) = self.world.body(self.player) else {
            self.target_in_range = false;
            return;
        };
        self.target_in_range = positions_in_range(body.position, self.target_position, pixel_range);
    }

    fn mine_block(&mut self, block_id: ThingId) -> Result<(), GameError> {

        let luck: f32 = self.world.rand_mut().gen_range(0.0..1.0);
        let (active, effective) = self.holding();

        let Some(block_position) = self.world.body(block_id).map(|body| body.position) else {
            return Ok(());
        };
        let Some(block) = self.world.get_mut(block_id).and_then(Thing::as_block_mut) else {
            return Ok(());
        };

        let (was_item_suitable, was_attack_successful) = block.mine(&effective, &active, luck);
        let mined = block.is_mined();
        let drops = mined
            .then(|| block.get_drops(luck, was_item_suitable))
            .flatten();

        // The effective item only differs from the active one when the
        // active item cannot attack, so the wear lands on the held stack.
        if active.can_attack() {
            if let Some(stack) = self.data.hot_bar.selected_stack_mut() {
                stack.item_mut().attack(was_attack_successful);
            }
        }

        if !mined {
            return Ok(());
        }

        // Swinging works up an appetite.
        if let Some(player) = self.world.get_mut(self.player).and_then(Thing::as_player_mut) {
            if player.food.value > 0.0 {
                player.food.change(-1.0);
            } else {
                player.health.change(-1.0);
            }
        }

        self.world.remove_thing(block_id);

        let Some(drops) = drops else {
            return Ok(());
        };

        for (i, effect) in drops.into_iter().enumerate() {
            debug!("dropped {effect:?}");
            match effect {
                Effect::Item(spec) => {
                    let physical = DroppedItem::new(Item::from_spec(spec)?);
                    // Scatter the drops over the vacated cell.
                    let rand = self.world.rand_mut();
                    let x = block_position.x - BLOCK_SIZE / 2.0 + 5.0
                        + (i % 3) as f32 * 11.0 + rand.gen_range(0..=2) as f32;
                    let y = block_position.y - BLOCK_SIZE / 2.0 + 5.0
                        + ((i / 3) % 3) as f32 * 11.0 + rand.gen_range(0..=2) as f32;
                    self.world.add_item(physical, Vec2::new(x, y));
                }
                Effect::Block(spec) => {
                    self.world.add_block(Block::from_spec(spec)?, self.target_position);
                }
                _ => return Err(GameError::Unsupported("unknown mining drop category")),
            }
        }

        Ok(())

    }

}


/// Collision callback picking a dropped item up into the hotbar, spilling
/// into the inventory. Returns true (a solid contact) only when both
/// containers are full.
fn handle_player_collide_item(_player: &mut Thing, dropped: &mut Thing,
                              data: &mut GameData, _contact: &Contact) -> bool {

    let Some(item) = dropped.as_item().map(|dropped| dropped.item.clone()) else {
        return true;
    };
    let id = item.id;

    if data.hot_bar.add_item(item.clone()) {
        debug!("added 1 {id:?} to the hotbar");
    } else if data.inventory.add_item(item) {
        debug!("added 1 {id:?} to the inventory");
    } else {
        debug!("found 1 {id:?}, but both hotbar & inventory are full");
        return true;
    }

    dropped.kill();
    false

}

/// Load the fixed demo terrain: a flat expanse of mostly dirt with a slope
/// on the right, a tree, a trick candle and a single bird.
fn load_simple_world(world: &mut World<GameData>) -> Result<(), GameError> {

    let size = world.grid_size();

    for x in 0..size.x {
        for y in 0..size.y {
            if x < 22 {
                if y <= 8 {
                    continue;
                }
            } else if x + y < 30 {
                continue;
            }
            // Mostly dirt with the occasional stone outcrop.
            let id = if world.rand_mut().gen_range(0..130) < 100 { "dirt" } else { "stone" };
            world.add_block_to_grid(Block::from_parts(&[id])?, IVec2::new(x, y));
        }
    }

    // The trunk and canopy of a tree.
    for y in 5..=8 {
        world.add_block_to_grid(Block::from_parts(&["wood"])?, IVec2::new(3, y));
    }
    for x in 2..=4 {
        for y in 2..=4 {
            world.add_block_to_grid(Block::from_parts(&["leaf"])?, IVec2::new(x, y));
        }
    }

    world.add_block_to_grid(Block::from_parts(&["mayhem", "0"])?, IVec2::new(14, 8));

    world.add_mob(Mob::bird("friendly_bird", Vec2::new(12.0, 12.0)), Vec2::new(400.0, 100.0));

    Ok(())

}
