//! Shared visualization utilities for KD-tree examples.

use std::hash::{Hash, Hasher};

use kd_tree::{Aabb, KdTree, NodeId, Triangle, TraversalStack};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};

pub mod navigator;
pub use navigator::TreeNavigator;

/// Generates a deterministic color from a node id using hashing.
/// This ensures a leaf keeps its color across frames and rebuilds.
pub fn leaf_color(id: NodeId) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.index().hash(&mut hasher);
    let hash = hasher.finish();

    // Extract RGB from hash bytes
    let r = ((hash >> 16) & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = (hash & 0xFF) as u8;

    // Ensure colors aren't too dark by adding a minimum brightness
    Color::from_rgba(r.max(40), g.max(40), b.max(40), 255)
}

/// Draws a single triangle as a one-color mesh.
pub fn draw_triangle_3d(triangle: &Triangle, color: Color) {
    let vertices: Vec<Vertex> = triangle
        .vertices()
        .iter()
        .map(|p| Vertex::new2(vec3(p.x, p.y, p.z), vec2(0.0, 0.0), color))
        .collect();

    let mesh = Mesh {
        vertices,
        indices: vec![0, 1, 2],
        texture: None,
    };

    draw_mesh(&mesh);
}

/// Draws the 12 edges of a bounding box as lines.
pub fn draw_aabb_wireframe(bounds: &Aabb, color: Color) {
    let mins = bounds.mins();
    let maxs = bounds.maxs();

    let corners = [
        vec3(mins.x, mins.y, mins.z),
        vec3(maxs.x, mins.y, mins.z),
        vec3(maxs.x, maxs.y, mins.z),
        vec3(mins.x, maxs.y, mins.z),
        vec3(mins.x, mins.y, maxs.z),
        vec3(maxs.x, mins.y, maxs.z),
        vec3(maxs.x, maxs.y, maxs.z),
        vec3(mins.x, maxs.y, maxs.z),
    ];

    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    for (a, b) in EDGES {
        draw_line_3d(corners[a], corners[b], color);
    }
}

/// Draws every leaf in the subtree under `start`: each leaf's triangles in
/// that leaf's color, iteratively via the traversal stack.
pub fn draw_leaves(tree: &KdTree, start: NodeId) {
    let mut stack = TraversalStack::new();
    stack.push(start);

    while let Ok(id) = stack.pop() {
        let node = tree.node(id);
        match (node.left(), node.right()) {
            (Some(left), Some(right)) => {
                stack.push(right);
                stack.push(left);
            }
            _ => {
                let color = leaf_color(id);
                for triangle in tree.leaf_triangles(id) {
                    draw_triangle_3d(triangle, color);
                }
            }
        }
    }
}

/// Draws the bounds of every leaf in the subtree under `start`.
pub fn draw_leaf_bounds(tree: &KdTree, start: NodeId) {
    let mut stack = TraversalStack::new();
    stack.push(start);

    while let Ok(id) = stack.pop() {
        let node = tree.node(id);
        match (node.left(), node.right()) {
            (Some(left), Some(right)) => {
                stack.push(right);
                stack.push(left);
            }
            _ => draw_aabb_wireframe(node.bounds(), leaf_color(id)),
        }
    }
}

/// Generates the 12 surface triangles of an axis-aligned cube.
pub fn generate_cube_triangles(center: Point3<f32>, size: f32) -> Vec<Triangle> {
    let half = size / 2.0;

    // 8 corners of the cube
    let corners = [
        center + Vector3::new(-half, -half, -half), // 0: left-bottom-back
        center + Vector3::new(half, -half, -half),  // 1: right-bottom-back
        center + Vector3::new(half, half, -half),   // 2: right-top-back
        center + Vector3::new(-half, half, -half),  // 3: left-top-back
        center + Vector3::new(-half, -half, half),  // 4: left-bottom-front
        center + Vector3::new(half, -half, half),   // 5: right-bottom-front
        center + Vector3::new(half, half, half),    // 6: right-top-front
        center + Vector3::new(-half, half, half),   // 7: left-top-front
    ];

    // 6 faces with counter-clockwise winding (viewed from outside)
    let faces: [[usize; 4]; 6] = [
        [4, 5, 6, 7], // front (+Z)
        [1, 0, 3, 2], // back (-Z)
        [0, 4, 7, 3], // left (-X)
        [5, 1, 2, 6], // right (+X)
        [7, 6, 2, 3], // top (+Y)
        [0, 1, 5, 4], // bottom (-Y)
    ];

    let mut triangles = Vec::with_capacity(12);
    for indices in faces {
        let [a, b, c, d] = indices.map(|i| corners[i]);
        triangles.push(Triangle::new(a, b, c));
        triangles.push(Triangle::new(a, c, d));
    }
    triangles
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    /// Distance limits as (min, max)
    pub distance_limits: (f32, f32),
}

impl OrbitCamera {
    /// Creates a new orbit camera with the given configuration.
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 0.5,
            distance_limits: (1.0, 50.0),
        }
    }

    /// Sets the zoom distance limits.
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.distance_limits = (min, max);
        self
    }

    /// Sets the camera target point.
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        // Mouse drag for rotation
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        // Arrow keys for rotation
        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }

        // Clamp pitch to avoid gimbal lock
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        // Mouse wheel for zoom
        let scroll = mouse_wheel().1;
        self.distance -= scroll * self.zoom_speed;
        self.distance = self
            .distance
            .clamp(self.distance_limits.0, self.distance_limits.1);
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}
