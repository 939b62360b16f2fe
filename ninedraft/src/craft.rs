//! Crafting recipes and the grid crafters that apply them, together with
//! the stack-juggling model of an open crafting window.

use tracing::debug;

use crate::effect::ItemSpec;
use crate::inventory::{Grid, SelectableGrid, Stack, GridPos};
use crate::item::{Item, ToolKind, Material};
use crate::GameError;


/// A crafting recipe: an exact pattern of item ids and the stack it
/// crafts into.
#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    /// The required pattern, one row of optional item ids per grid row.
    pub pattern: &'static [&'static [Option<&'static str>]],
    /// The crafted item and its quantity.
    pub result: (ItemSpec, u32),
}

impl Recipe {

    /// The `(rows, columns)` size of this recipe's pattern.
    pub fn size(&self) -> (usize, usize) {
        (self.pattern.len(), self.pattern.first().map_or(0, |row| row.len()))
    }

    /// Return true iff the given row-major pattern matches this recipe
    /// exactly.
    pub fn matches(&self, pattern: &[Option<&str>]) -> bool {
        self.pattern.iter().flat_map(|row| row.iter()).map(|id| id.as_deref())
            .eq(pattern.iter().map(|id| id.as_deref()))
    }

}

/// Recipes available on the player's own 2x2 crafting grid.
pub static RECIPES_2X2: &[Recipe] = &[
    Recipe {
        pattern: &[
            &[None, Some("wood")],
            &[None, Some("wood")],
        ],
        result: (ItemSpec::Simple("stick"), 4),
    },
    Recipe {
        pattern: &[
            &[None, Some("dirt")],
            &[None, Some("wood")],
        ],
        result: (ItemSpec::Simple("stone"), 4),
    },
    Recipe {
        pattern: &[
            &[None, Some("dirt")],
            &[None, Some("dirt")],
        ],
        result: (ItemSpec::Simple("wood"), 4),
    },
    Recipe {
        pattern: &[
            &[Some("stone"), None],
            &[None, Some("stick")],
        ],
        result: (ItemSpec::Simple("stick"), 4),
    },
    Recipe {
        pattern: &[
            &[Some("wood"), Some("wood")],
            &[Some("wood"), Some("wood")],
        ],
        result: (ItemSpec::Simple("crafting_table"), 1),
    },
];

/// Recipes available on the 3x3 grid of a crafting table.
pub static RECIPES_3X3: &[Recipe] = &[
    Recipe {
        pattern: &[
            &[None, None, None],
            &[None, Some("wood"), None],
            &[None, Some("wood"), None],
        ],
        result: (ItemSpec::Simple("stick"), 16),
    },
    Recipe {
        pattern: &[
            &[Some("wood"), Some("wood"), Some("wood")],
            &[None, Some("stick"), None],
            &[None, Some("stick"), None],
        ],
        result: (ItemSpec::Tool(ToolKind::Pickaxe, Material::Wood), 1),
    },
    Recipe {
        pattern: &[
            &[Some("wood"), Some("wood"), None],
            &[Some("wood"), Some("stick"), None],
            &[None, Some("stick"), None],
        ],
        result: (ItemSpec::Tool(ToolKind::Axe, Material::Wood), 1),
    },
    Recipe {
        pattern: &[
            &[None, Some("wood"), None],
            &[None, Some("stick"), None],
            &[None, Some("stick"), None],
        ],
        result: (ItemSpec::Tool(ToolKind::Shovel, Material::Wood), 1),
    },
    Recipe {
        pattern: &[
            &[None, Some("stone"), None],
            &[None, Some("stone"), None],
            &[None, Some("stick"), None],
        ],
        result: (ItemSpec::Tool(ToolKind::Sword, Material::Wood), 1),
    },
    Recipe {
        pattern: &[
            &[Some("stone"), Some("stone"), Some("stone")],
            &[None, None, None],
            &[Some("wood"), Some("wood"), Some("wood")],
        ],
        result: (ItemSpec::Tool(ToolKind::Sword, Material::Stone), 1),
    },
    Recipe {
        pattern: &[
            &[Some("dirt"), Some("dirt"), Some("dirt")],
            &[None, None, None],
            &[Some("stone"), Some("stone"), Some("stone")],
        ],
        result: (ItemSpec::Tool(ToolKind::Axe, Material::Stone), 1),
    },
    Recipe {
        pattern: &[
            &[Some("wood"), Some("wood"), Some("wood")],
            &[None, None, None],
            &[Some("stone"), Some("stone"), Some("stone")],
        ],
        result: (ItemSpec::Tool(ToolKind::Axe, Material::Wood), 1),
    },
];


/// A crafter with a grid of input cells and a single output cell.
#[derive(Debug, Clone)]
pub struct GridCrafter {
    input: SelectableGrid,
    output: Option<Stack>,
    recipes: &'static [Recipe],
}

impl GridCrafter {

    /// Construct a crafter of the given input size. Every recipe must
    /// match the input dimensions.
    pub fn new(recipes: &'static [Recipe], rows: usize, columns: usize) -> Result<Self, GameError> {

        for recipe in recipes {
            let (recipe_rows, recipe_columns) = recipe.size();
            if (recipe_rows, recipe_columns) != (rows, columns) {
                return Err(GameError::RecipeDimensions {
                    expected_rows: rows,
                    expected_columns: columns,
                    rows: recipe_rows,
                    columns: recipe_columns,
                });
            }
        }

        Ok(Self {
            input: SelectableGrid::new(rows, columns),
            output: None,
            recipes,
        })

    }

    /// The 2x2 crafter backed by the basic recipes.
    pub fn basic() -> Result<Self, GameError> {
        Self::new(RECIPES_2X2, 2, 2)
    }

    /// The 3x3 crafter backed by the crafting table recipes.
    pub fn crafting_table() -> Result<Self, GameError> {
        Self::new(RECIPES_3X3, 3, 3)
    }

    pub fn input(&self) -> &SelectableGrid {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut SelectableGrid {
        &mut self.input
    }

    pub fn output(&self) -> Option<&Stack> {
        self.output.as_ref()
    }

    pub fn output_mut(&mut self) -> &mut Option<Stack> {
        &mut self.output
    }

    /// Find the first recipe that matches the given pattern.
    pub fn find_match(&self, pattern: &[Option<&str>]) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.matches(pattern))
    }

    /// Craft the input to the output, consuming one of each ingredient.
    /// Returns true iff something was crafted; nothing happens when no
    /// recipe matches or the output has no room for the result.
    pub fn craft(&mut self) -> Result<bool, GameError> {

        let pattern = self.input.crafting_pattern();
        let Some(recipe) = self.find_match(&pattern) else {
            debug!("no matching recipe");
            return Ok(false);
        };

        let (spec, quantity) = recipe.result;
        let mut result = Stack::new(Item::from_spec(spec)?, quantity);
        debug!("crafts to {} {:?}", result.quantity(), result.item().id);

        match &mut self.output {
            output @ None => *output = Some(result),
            Some(output) if output.matches(&result) && output.space() > 0 => {
                output.absorb(&mut result, None);
            }
            Some(_) => {
                debug!("cannot craft when the output is full");
                return Ok(false);
            }
        }

        self.consume();
        Ok(true)

    }

    /// Consume one of each input ingredient, clearing depleted cells.
    fn consume(&mut self) {
        let (rows, columns) = self.input.size();
        for row in 0..rows {
            for column in 0..columns {
                if let Some(stack) = self.input.get_mut((row, column)) {
                    if !stack.decrement() {
                        self.input.pop((row, column));
                    }
                }
            }
        }
    }

}


/// The container a crafting window cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    HotBar,
    Inventory,
    Crafter,
}

/// A cell within a crafting window source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Cell(usize, usize),
    /// The crafter's single output cell.
    Output,
}

/// A cell in the crafting window, as a source and a slot within it.
pub type Selection = (Source, Slot);

/// The model of an open crafting window, juggling stacks between the
/// hotbar, the inventory and a grid crafter. The hotbar and inventory stay
/// owned by the game and are passed into each movement.
#[derive(Debug, Clone)]
pub struct CraftingSession {
    crafter: GridCrafter,
    selection: Option<Selection>,
}

impl CraftingSession {

    pub fn new(crafter: GridCrafter) -> Self {
        Self {
            crafter,
            selection: None,
        }
    }

    pub fn crafter(&self) -> &GridCrafter {
        &self.crafter
    }

    pub fn crafter_mut(&mut self) -> &mut GridCrafter {
        &mut self.crafter
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Craft the crafter's input to its output.
    pub fn craft(&mut self) -> Result<bool, GameError> {
        self.crafter.craft()
    }

    fn cell(slot: Slot) -> Option<GridPos> {
        match slot {
            Slot::Cell(row, column) => Some((row, column)),
            Slot::Output => None,
        }
    }

    fn take(&mut self, hot_bar: &mut SelectableGrid, inventory: &mut Grid,
            (source, slot): Selection) -> Option<Stack> {
        match source {
            Source::HotBar => hot_bar.pop(Self::cell(slot)?),
            Source::Inventory => inventory.pop(Self::cell(slot)?),
            Source::Crafter => match slot {
                Slot::Cell(row, column) => self.crafter.input.pop((row, column)),
                Slot::Output => self.crafter.output.take(),
            },
        }
    }

    fn peek<'a>(&'a self, hot_bar: &'a SelectableGrid, inventory: &'a Grid,
                (source, slot): Selection) -> Option<&'a Stack> {
        match source {
            Source::HotBar => hot_bar.get(Self::cell(slot)?),
            Source::Inventory => inventory.get(Self::cell(slot)?),
            Source::Crafter => match slot {
                Slot::Cell(row, column) => self.crafter.input.get((row, column)),
                Slot::Output => self.crafter.output.as_ref(),
            },
        }
    }

    fn put(&mut self, hot_bar: &mut SelectableGrid, inventory: &mut Grid,
           (source, slot): Selection, stack: Option<Stack>) -> Result<(), GameError> {
        match source {
            Source::HotBar => match Self::cell(slot) {
                Some(pos) => hot_bar.set(pos, stack),
                None => Err(GameError::Unsupported("only the crafter has an output cell")),
            },
            Source::Inventory => match Self::cell(slot) {
                Some(pos) => inventory.set(pos, stack),
                None => Err(GameError::Unsupported("only the crafter has an output cell")),
            },
            Source::Crafter => match slot {
                Slot::Cell(row, column) => self.crafter.input.set((row, column), stack),
                Slot::Output => {
                    self.crafter.output = stack;
                    Ok(())
                }
            },
        }
    }

    /// Process a primary movement to the given cell: select a stack, drop
    /// a whole stack with ctrl held, drip a single item into an empty cell,
    /// merge matching stacks, or re-select on a mismatch.
    pub fn move_primary(&mut self, selection: Selection, ctrl: bool,
                        hot_bar: &mut SelectableGrid, inventory: &mut Grid) -> Result<(), GameError> {

        let Some(current) = self.selection else {
            if self.peek(hot_bar, inventory, selection).is_some() {
                self.selection = Some(selection);
            }
            return Ok(());
        };

        if selection == current {
            self.selection = None;
            return Ok(());
        }

        let Some(mut from_stack) = self.take(hot_bar, inventory, current) else {
            // The selected cell was emptied under us, drop the selection.
            self.selection = None;
            return Ok(());
        };

        match self.take(hot_bar, inventory, selection) {
            None => {
                if ctrl {
                    // Move the whole stack across.
                    self.put(hot_bar, inventory, selection, Some(from_stack))?;
                    self.selection = None;
                    return Ok(());
                } else {
                    // Drip a single item into the empty cell.
                    let dripped = from_stack.split(Some(1));
                    self.put(hot_bar, inventory, selection, Some(dripped))?;
                }
            }
            Some(mut to_stack) => {
                if to_stack.matches(&from_stack) && from_stack.item().is_stackable() {
                    to_stack.absorb(&mut from_stack, if ctrl { None } else { Some(1) });
                    self.put(hot_bar, inventory, selection, Some(to_stack))?;
                } else {
                    // Mismatched cells, re-select the destination.
                    self.put(hot_bar, inventory, selection, Some(to_stack))?;
                    self.put(hot_bar, inventory, current, Some(from_stack))?;
                    self.selection = Some(selection);
                    return Ok(());
                }
            }
        }

        if from_stack.is_empty() {
            self.selection = None;
        } else {
            self.put(hot_bar, inventory, current, Some(from_stack))?;
        }

        Ok(())

    }

    /// Process a secondary movement to the given cell: split the selected
    /// stack in half into an empty cell, otherwise swap the two cells.
    pub fn move_secondary(&mut self, selection: Selection,
                          hot_bar: &mut SelectableGrid, inventory: &mut Grid) -> Result<(), GameError> {

        let Some(current) = self.selection else {
            return Ok(());
        };

        if self.attempt_split(current, selection, hot_bar, inventory)? {
            self.selection = None;
        } else {
            let from_stack = self.take(hot_bar, inventory, current);
            let to_stack = self.take(hot_bar, inventory, selection);
            self.put(hot_bar, inventory, selection, from_stack)?;
            self.put(hot_bar, inventory, current, to_stack)?;
        }

        Ok(())

    }

    /// Attempt to split the stack at `from` in half into the empty cell at
    /// `to`. Returns true iff anything was split off.
    fn attempt_split(&mut self, from: Selection, to: Selection,
                     hot_bar: &mut SelectableGrid, inventory: &mut Grid) -> Result<bool, GameError> {

        if self.peek(hot_bar, inventory, to).is_some() {
            return Ok(false);
        }

        let Some(mut from_stack) = self.take(hot_bar, inventory, from) else {
            return Ok(false);
        };

        let half = from_stack.split(None);
        let split = !half.is_empty();
        if split {
            self.put(hot_bar, inventory, to, Some(half))?;
        }
        self.put(hot_bar, inventory, from, Some(from_stack))?;

        Ok(split)

    }

}


#[cfg(test)]
mod tests {

    use super::*;

    fn stack(id: &str, quantity: u32) -> Stack {
        Stack::new(Item::from_parts(&[id]).unwrap(), quantity)
    }

    #[test]
    fn recipe_dimensions_are_validated() {
        assert!(GridCrafter::new(RECIPES_2X2, 2, 2).is_ok());
        assert!(matches!(
            GridCrafter::new(RECIPES_2X2, 3, 3),
            Err(GameError::RecipeDimensions { expected_rows: 3, rows: 2, .. }),
        ));
    }

    #[test]
    fn craft_sticks() {

        let mut crafter = GridCrafter::basic().unwrap();
        crafter.input_mut().set((0, 1), Some(stack("wood", 3))).unwrap();
        crafter.input_mut().set((1, 1), Some(stack("wood", 1))).unwrap();

        assert!(crafter.craft().unwrap());
        let output = crafter.output().unwrap();
        assert_eq!(output.item().id, "stick");
        assert_eq!(output.quantity(), 4);

        // One of each ingredient was consumed, depleted cells cleared.
        assert_eq!(crafter.input().get((0, 1)).unwrap().quantity(), 2);
        assert_eq!(crafter.input().get((1, 1)), None);

        // No recipe matches the remaining single wood.
        assert!(!crafter.craft().unwrap());

    }

    #[test]
    fn craft_absorbs_into_matching_output() {

        let mut crafter = GridCrafter::basic().unwrap();
        crafter.input_mut().set((0, 1), Some(stack("wood", 2))).unwrap();
        crafter.input_mut().set((1, 1), Some(stack("wood", 2))).unwrap();

        assert!(crafter.craft().unwrap());
        assert!(crafter.craft().unwrap());
        assert_eq!(crafter.output().unwrap().quantity(), 8);

    }

    #[test]
    fn craft_refuses_mismatched_output() {

        let mut crafter = GridCrafter::basic().unwrap();
        crafter.input_mut().set((0, 1), Some(stack("wood", 2))).unwrap();
        crafter.input_mut().set((1, 1), Some(stack("wood", 2))).unwrap();
        *crafter.output_mut() = Some(stack("dirt", 1));

        assert!(!crafter.craft().unwrap());
        // Ingredients must not be consumed on a refused craft.
        assert_eq!(crafter.input().get((0, 1)).unwrap().quantity(), 2);

    }

    #[test]
    fn craft_wood_pickaxe() {

        let mut crafter = GridCrafter::crafting_table().unwrap();
        for column in 0..3 {
            crafter.input_mut().set((0, column), Some(stack("wood", 1))).unwrap();
        }
        crafter.input_mut().set((1, 1), Some(stack("stick", 1))).unwrap();
        crafter.input_mut().set((2, 1), Some(stack("stick", 1))).unwrap();

        assert!(crafter.craft().unwrap());
        assert_eq!(crafter.output().unwrap().item().id, "wood_pickaxe");

    }

    #[test]
    fn session_drip_and_move() {

        let mut hot_bar = SelectableGrid::new(1, 10);
        let mut inventory = Grid::new(3, 10);
        hot_bar.set((0, 0), Some(stack("dirt", 10))).unwrap();

        let mut session = CraftingSession::new(GridCrafter::basic().unwrap());

        let from = (Source::HotBar, Slot::Cell(0, 0));
        let to = (Source::Crafter, Slot::Cell(0, 1));

        // First click selects, second click on an empty cell drips one.
        session.move_primary(from, false, &mut hot_bar, &mut inventory).unwrap();
        assert_eq!(session.selection(), Some(from));
        session.move_primary(to, false, &mut hot_bar, &mut inventory).unwrap();
        assert_eq!(hot_bar.get((0, 0)).unwrap().quantity(), 9);
        assert_eq!(session.crafter().input().get((0, 1)).unwrap().quantity(), 1);

        // Ctrl moves the rest across in one go.
        session.move_primary(to, true, &mut hot_bar, &mut inventory).unwrap();
        assert_eq!(hot_bar.get((0, 0)), None);
        assert_eq!(session.crafter().input().get((0, 1)).unwrap().quantity(), 10);
        assert_eq!(session.selection(), None);

    }

    #[test]
    fn session_mismatch_reselects() {

        let mut hot_bar = SelectableGrid::new(1, 10);
        let mut inventory = Grid::new(3, 10);
        hot_bar.set((0, 0), Some(stack("dirt", 5))).unwrap();
        hot_bar.set((0, 1), Some(stack("wood", 5))).unwrap();

        let mut session = CraftingSession::new(GridCrafter::basic().unwrap());
        session.move_primary((Source::HotBar, Slot::Cell(0, 0)), false, &mut hot_bar, &mut inventory).unwrap();
        session.move_primary((Source::HotBar, Slot::Cell(0, 1)), false, &mut hot_bar, &mut inventory).unwrap();

        // Nothing moved, the selection jumped to the mismatching cell.
        assert_eq!(hot_bar.get((0, 0)).unwrap().quantity(), 5);
        assert_eq!(hot_bar.get((0, 1)).unwrap().quantity(), 5);
        assert_eq!(session.selection(), Some((Source::HotBar, Slot::Cell(0, 1))));

    }

    #[test]
    fn session_secondary_split_and_swap() {

        let mut hot_bar = SelectableGrid::new(1, 10);
        let mut inventory = Grid::new(3, 10);
        hot_bar.set((0, 0), Some(stack("dirt", 8))).unwrap();
        inventory.set((0, 0), Some(stack("wood", 3))).unwrap();

        let mut session = CraftingSession::new(GridCrafter::basic().unwrap());

        // Half-split into an empty inventory cell.
        session.move_primary((Source::HotBar, Slot::Cell(0, 0)), false, &mut hot_bar, &mut inventory).unwrap();
        session.move_secondary((Source::Inventory, Slot::Cell(0, 1)), &mut hot_bar, &mut inventory).unwrap();
        assert_eq!(hot_bar.get((0, 0)).unwrap().quantity(), 4);
        assert_eq!(inventory.get((0, 1)).unwrap().quantity(), 4);
        assert_eq!(session.selection(), None);

        // Against an occupied cell the stacks swap instead.
        session.move_primary((Source::HotBar, Slot::Cell(0, 0)), false, &mut hot_bar, &mut inventory).unwrap();
        session.move_secondary((Source::Inventory, Slot::Cell(0, 0)), &mut hot_bar, &mut inventory).unwrap();
        assert_eq!(hot_bar.get((0, 0)).unwrap().item().id, "wood");
        assert_eq!(inventory.get((0, 0)).unwrap().item().id, "dirt");

    }

    #[test]
    fn session_takes_from_output() {

        let mut hot_bar = SelectableGrid::new(1, 10);
        let mut inventory = Grid::new(3, 10);

        let mut session = CraftingSession::new(GridCrafter::basic().unwrap());
        session.crafter_mut().input_mut().set((0, 1), Some(stack("wood", 1))).unwrap();
        session.crafter_mut().input_mut().set((1, 1), Some(stack("wood", 1))).unwrap();
        session.craft().unwrap();

        let output = (Source::Crafter, Slot::Output);
        session.move_primary(output, false, &mut hot_bar, &mut inventory).unwrap();
        session.move_primary((Source::HotBar, Slot::Cell(0, 2)), true, &mut hot_bar, &mut inventory).unwrap();

        assert_eq!(hot_bar.get((0, 2)).unwrap().item().id, "stick");
        assert_eq!(hot_bar.get((0, 2)).unwrap().quantity(), 4);
        assert!(session.crafter().output().is_none());

    }

}
