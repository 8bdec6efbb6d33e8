use kd_tree::{KdTree, Triangle};
use kd_viz::{draw_leaf_bounds, generate_cube_triangles, OrbitCamera, TreeNavigator};
use macroquad::prelude::*;
use nalgebra::Point3;

/// Generates a field of axis-aligned cubes as a triangle soup.
fn generate_cube_field() -> Vec<Triangle> {
    let mut triangles = Vec::new();

    for ix in 0..3 {
        for iy in 0..2 {
            for iz in 0..3 {
                let center = Point3::new(
                    ix as f32 * 2.0 - 2.0,
                    iy as f32 * 2.0 - 1.0,
                    iz as f32 * 2.0 - 2.0,
                );
                let size = 0.5 + 0.15 * ((ix + iy + iz) % 3) as f32;
                triangles.extend(generate_cube_triangles(center, size));
            }
        }
    }

    triangles
}

#[macroquad::main("KD-Tree Cube Field")]
async fn main() {
    println!("Generating cube field...");
    let triangles = generate_cube_field();
    let triangle_count = triangles.len();
    println!("Created {} triangles (18 cubes)", triangle_count);

    println!("Building kd-tree...");
    let tree = KdTree::from_triangles(triangles, 8);
    println!(
        "kd-tree built: {} nodes ({} leaves), depth {}",
        tree.node_count(),
        tree.leaf_count(),
        tree.depth()
    );

    let mut camera = OrbitCamera::new(8.0, 0.4, 0.4).with_distance_limits(2.0, 30.0);
    let mut navigator = TreeNavigator::new();
    let mut show_leaf_bounds = false;

    loop {
        camera.update();
        navigator.update(&tree);
        if is_key_pressed(KeyCode::B) {
            show_leaf_bounds = !show_leaf_bounds;
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        navigator.render(&tree);
        if show_leaf_bounds {
            if let Some(id) = navigator.current_node(&tree) {
                draw_leaf_bounds(&tree, id);
            }
        }

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), BLUE);

        set_default_camera();

        draw_text(
            &format!("KD-Tree Cube Field - {} triangles", tree.triangle_count()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Nodes: {} ({} leaves) | Depth: {}",
                tree.node_count(),
                tree.leaf_count(),
                tree.depth()
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(&tree, 70.0);

        draw_text(
            "Drag mouse to rotate, scroll to zoom, [B] leaf bounds",
            10.0,
            155.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 175.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
