//! KD-tree navigation utilities for interactive visualization.

use kd_tree::{KdTree, NodeId};
use macroquad::prelude::*;

use crate::{draw_aabb_wireframe, draw_leaves};

/// Child taken at each internal node on the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Interactive KD-tree navigator for exploring tree structure.
pub struct TreeNavigator {
    path: Vec<Direction>,
}

impl Default for TreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Returns the current navigation path.
    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    /// Returns the current depth in the tree.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to navigate to the left child. Returns true if successful.
    pub fn go_left(&mut self, tree: &KdTree) -> bool {
        if let Some(id) = self.current_node(tree) {
            if tree.node(id).left().is_some() {
                self.path.push(Direction::Left);
                return true;
            }
        }
        false
    }

    /// Attempts to navigate to the right child. Returns true if successful.
    pub fn go_right(&mut self, tree: &KdTree) -> bool {
        if let Some(id) = self.current_node(tree) {
            if tree.node(id).right().is_some() {
                self.path.push(Direction::Right);
                return true;
            }
        }
        false
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Returns to the root node.
    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self, tree: &KdTree) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::L) {
            changed = self.go_left(tree);
        }
        if is_key_pressed(KeyCode::R) {
            changed = self.go_right(tree);
        }
        if is_key_pressed(KeyCode::U) {
            changed = self.go_parent();
        }
        if is_key_pressed(KeyCode::T) {
            if !self.path.is_empty() {
                self.go_root();
                changed = true;
            }
        }

        changed
    }

    /// Returns the id of the current node, if the tree is non-empty.
    pub fn current_node(&self, tree: &KdTree) -> Option<NodeId> {
        let mut current = tree.root()?;
        for direction in &self.path {
            let node = tree.node(current);
            current = match direction {
                Direction::Left => node.left()?,
                Direction::Right => node.right()?,
            };
        }
        Some(current)
    }

    /// Renders the current subtree: leaf-colored triangles plus the current
    /// node's bounds.
    pub fn render(&self, tree: &KdTree) {
        if let Some(id) = self.current_node(tree) {
            draw_leaves(tree, id);
            draw_aabb_wireframe(tree.node(id).bounds(), WHITE);
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, tree: &KdTree, y_offset: f32) {
        let (triangles, split, is_leaf) = if let Some(id) = self.current_node(tree) {
            let node = tree.node(id);
            let split = node
                .axis()
                .zip(node.split_pos())
                .map(|(axis, pos)| format!("split {axis} = {pos:.2}"));
            (tree.subtree_triangle_count(id), split, node.is_leaf())
        } else {
            (0, None, true)
        };

        // Build path string
        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|d| match d {
                    Direction::Left => "L",
                    Direction::Right => "R",
                })
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(
            &format!("Subtree: {} triangles", triangles),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            &match &split {
                Some(split) => format!("{split} | [L]eft [R]ight children"),
                None => "(leaf)".to_string(),
            },
            10.0,
            y_offset + 40.0,
            18.0,
            if is_leaf { ORANGE } else { GREEN },
        );
        draw_text("[U]p to parent | [T]op", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}
