//! Inventory containers: item stacks and the 2d grids that hold them.

use std::ops::{Deref, DerefMut};

use crate::item::Item;
use crate::GameError;


/// A cell position in a grid, as `(row, column)`.
pub type GridPos = (usize, usize);


/// A quantity of a single kind of item, as stored in an inventory cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    item: Item,
    quantity: u32,
}

impl Stack {

    /// Construct a new stack. The quantity must not exceed the item's
    /// maximum stack size.
    pub fn new(item: Item, quantity: u32) -> Self {
        assert!(
            quantity <= item.max_stack_size,
            "stack creation attempted with quantity of {quantity} for item {:?} \
             that has a maximum stack size of {}",
            item.id, item.max_stack_size,
        );
        Self { item, quantity }
    }

    /// The item held in this stack.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Mutable access to the held item, used to wear tools in place.
    pub fn item_mut(&mut self) -> &mut Item {
        &mut self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Return true iff the other stack contains the same kind of item.
    pub fn matches(&self, other: &Stack) -> bool {
        self.item.id == other.item.id
    }

    /// Add to this stack, stopping at the maximum stack size. Returns the
    /// amount actually added.
    pub fn add(&mut self, quantity: u32) -> u32 {
        let to_add = (self.quantity + quantity).min(self.item.max_stack_size) - self.quantity;
        self.quantity += to_add;
        to_add
    }

    /// Remove up to the given quantity from this stack, flooring at zero.
    /// Returns the quantity remaining in the stack.
    pub fn subtract(&mut self, quantity: u32) -> u32 {
        self.quantity = self.quantity.saturating_sub(quantity);
        self.quantity
    }

    /// Remove a single item from this stack. Returns true iff the stack
    /// still holds items afterward.
    pub fn decrement(&mut self) -> bool {
        self.subtract(1) > 0
    }

    /// Absorb another stack into this one, as much as possible, stopping
    /// when either the other is depleted, this one is full, or the optional
    /// transfer maximum is reached. No action across differing item kinds.
    ///
    /// Returns true iff the other stack was fully absorbed.
    pub fn absorb(&mut self, other: &mut Stack, maximum: Option<u32>) -> bool {
        if self.matches(other) {
            let quantity = maximum.unwrap_or(other.quantity).min(other.quantity);
            let added = self.add(quantity);
            other.subtract(added);
            if other.quantity == 0 {
                return true;
            }
        }
        false
    }

    /// Split this stack in two, returning the new stack. The combined
    /// quantity is unchanged. The count defaults to half the stack size,
    /// rounded down, and is capped at the available quantity.
    pub fn split(&mut self, count: Option<u32>) -> Stack {
        let count = match count {
            Some(count) => count.min(self.quantity),
            None => self.quantity / 2,
        };
        self.quantity -= count;
        Stack::new(self.item.clone(), count)
    }

    /// Return true iff this stack is empty.
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// The number of items this stack is short of being full.
    pub fn space(&self) -> u32 {
        self.item.max_stack_size - self.quantity
    }

}


/// A 2d grid of optional item stacks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Option<Stack>>,
}

impl Grid {

    /// Construct a new empty grid of the given size.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
        }
    }

    /// The `(rows, columns)` size of this grid.
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Return true iff the given position exists on this grid.
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.0 < self.rows && pos.1 < self.columns
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos).then(|| pos.0 * self.columns + pos.1)
    }

    /// The stack at the given position, none if the cell is empty or the
    /// position is off the grid.
    pub fn get(&self, pos: GridPos) -> Option<&Stack> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Stack> {
        self.index(pos).and_then(|i| self.cells[i].as_mut())
    }

    /// Set the cell at the given position, erroring off the grid.
    pub fn set(&mut self, pos: GridPos, stack: Option<Stack>) -> Result<(), GameError> {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = stack;
                Ok(())
            }
            None => Err(GameError::InvalidPosition(pos.0, pos.1)),
        }
    }

    /// Remove and return the stack at the given position, if any.
    pub fn pop(&mut self, pos: GridPos) -> Option<Stack> {
        self.index(pos).and_then(|i| self.cells[i].take())
    }

    /// Iterate over every cell in row-major order with its position.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Option<&Stack>)> {
        self.cells.iter().enumerate()
            .map(|(i, cell)| ((i / self.columns, i % self.columns), cell.as_ref()))
    }

    /// The crafting pattern this grid forms: the item id of each cell in
    /// row-major order, none for empty cells.
    pub fn crafting_pattern(&self) -> Vec<Option<&'static str>> {
        self.cells.iter()
            .map(|cell| cell.as_ref().map(|stack| stack.item().id))
            .collect()
    }

    /// Add a single item, to an existing stack of its kind or the first
    /// available empty cell. Returns true iff the item was added.
    pub fn add_item(&mut self, item: Item) -> bool {
        self.add_items(Stack::new(item, 1)).is_none()
    }

    /// Add a stack to this grid, first combining with existing stacks of
    /// the same kind, then placing the remainder into empty cells. Returns
    /// the remaining sub-stack that could not be added, if any; units are
    /// never lost.
    pub fn add_items(&mut self, mut stack: Stack) -> Option<Stack> {

        // Fill existing stacks first.
        for cell in self.cells.iter_mut().flatten() {
            if cell.matches(&stack) {
                cell.absorb(&mut stack, None);
                if stack.is_empty() {
                    return None;
                }
            }
        }

        // Then fill empty cells.
        for cell in &mut self.cells {
            if cell.is_none() {
                let mut fresh = Stack::new(stack.item().clone(), 0);
                fresh.absorb(&mut stack, None);
                *cell = Some(fresh);
                if stack.is_empty() {
                    return None;
                }
            }
        }

        (!stack.is_empty()).then_some(stack)

    }

}


/// A grid that can have a single cell selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectableGrid {
    grid: Grid,
    selected: Option<GridPos>,
}

impl SelectableGrid {

    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            grid: Grid::new(rows, columns),
            selected: None,
        }
    }

    /// The position of the selected cell, if any.
    pub fn selected(&self) -> Option<GridPos> {
        self.selected
    }

    /// The stack in the selected cell, none when no cell is selected or
    /// the selected cell is empty.
    pub fn selected_stack(&self) -> Option<&Stack> {
        self.selected.and_then(|pos| self.grid.get(pos))
    }

    pub fn selected_stack_mut(&mut self) -> Option<&mut Stack> {
        self.selected.and_then(|pos| self.grid.get_mut(pos))
    }

    /// Select the cell at the given position, erroring off the grid.
    pub fn select(&mut self, pos: GridPos) -> Result<(), GameError> {
        if !self.grid.contains(pos) {
            return Err(GameError::InvalidPosition(pos.0, pos.1));
        }
        self.selected = Some(pos);
        Ok(())
    }

    /// Deselect the currently selected cell.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Toggle the selection of the cell at the given position, erroring
    /// off the grid.
    pub fn toggle_selection(&mut self, pos: GridPos) -> Result<(), GameError> {
        if !self.grid.contains(pos) {
            return Err(GameError::InvalidPosition(pos.0, pos.1));
        }
        self.selected = (self.selected != Some(pos)).then_some(pos);
        Ok(())
    }

}

impl Deref for SelectableGrid {
    type Target = Grid;
    fn deref(&self) -> &Grid {
        &self.grid
    }
}

impl DerefMut for SelectableGrid {
    fn deref_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    fn dirt(quantity: u32) -> Stack {
        Stack::new(Item::from_parts(&["dirt"]).unwrap(), quantity)
    }

    #[test]
    fn absorb_stops_at_capacity() {

        let mut a = dirt(40);
        let mut b = dirt(30);

        assert!(!a.absorb(&mut b, None));
        assert_eq!(a.quantity(), 64);
        assert_eq!(b.quantity(), 6);

    }

    #[test]
    fn absorb_respects_maximum() {
        let mut a = dirt(10);
        let mut b = dirt(5);
        assert!(!a.absorb(&mut b, Some(1)));
        assert_eq!(a.quantity(), 11);
        assert_eq!(b.quantity(), 4);
    }

    #[test]
    fn absorb_ignores_other_items() {
        let mut a = dirt(10);
        let mut b = Stack::new(Item::from_parts(&["wood"]).unwrap(), 10);
        assert!(!a.absorb(&mut b, None));
        assert_eq!(a.quantity(), 10);
        assert_eq!(b.quantity(), 10);
    }

    #[test]
    fn split_conserves_units() {

        let mut stack = dirt(9);
        let half = stack.split(None);
        assert_eq!(half.quantity(), 4);
        assert_eq!(stack.quantity(), 5);

        // A requested count is capped at the available quantity.
        let mut stack = dirt(3);
        let taken = stack.split(Some(10));
        assert_eq!(taken.quantity(), 3);
        assert!(stack.is_empty());

    }

    #[test]
    fn split_then_absorb_round_trips() {
        let mut stack = dirt(9);
        let mut half = stack.split(None);
        assert!(stack.absorb(&mut half, None));
        assert_eq!(stack.quantity(), 9);
    }

    #[test]
    fn subtract_and_decrement() {

        let mut stack = dirt(3);
        assert_eq!(stack.subtract(2), 1);
        assert_eq!(stack.subtract(5), 0);

        let mut stack = dirt(2);
        assert!(stack.decrement());
        assert!(!stack.decrement());
        assert!(stack.is_empty());

    }

    #[test]
    #[should_panic]
    fn stack_over_capacity_panics() {
        let _ = dirt(65);
    }

    #[test]
    fn grid_merges_before_placing() {

        let mut grid = Grid::new(2, 2);
        grid.set((0, 1), Some(dirt(60))).unwrap();

        assert_eq!(grid.add_items(dirt(10)), None);
        // The existing stack fills up first, the remainder goes into the
        // first empty cell.
        assert_eq!(grid.get((0, 1)).unwrap().quantity(), 64);
        assert_eq!(grid.get((0, 0)).unwrap().quantity(), 6);

    }

    #[test]
    fn grid_overflow_is_returned() {

        let mut grid = Grid::new(1, 1);
        grid.set((0, 0), Some(dirt(60))).unwrap();

        let leftover = grid.add_items(dirt(10)).unwrap();
        assert_eq!(leftover.quantity(), 6);
        assert_eq!(grid.get((0, 0)).unwrap().quantity(), 64);

    }

    #[test]
    fn selection_bounds() {

        let mut hot_bar = SelectableGrid::new(1, 10);
        assert!(hot_bar.select((0, 9)).is_ok());
        assert_eq!(hot_bar.selected(), Some((0, 9)));
        assert!(hot_bar.select((1, 0)).is_err());

        hot_bar.toggle_selection((0, 9)).unwrap();
        assert_eq!(hot_bar.selected(), None);
        hot_bar.toggle_selection((0, 3)).unwrap();
        assert_eq!(hot_bar.selected(), Some((0, 3)));

    }

    #[test]
    fn crafting_pattern() {
        let mut grid = Grid::new(2, 2);
        grid.set((0, 1), Some(dirt(1))).unwrap();
        assert_eq!(grid.crafting_pattern(), vec![None, Some("dirt"), None, None]);
    }

}
