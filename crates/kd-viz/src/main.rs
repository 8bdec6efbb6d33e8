use macroquad::prelude::*;

#[macroquad::main("KD-Tree Visualization")]
async fn main() {
    loop {
        clear_background(BLACK);

        draw_text("KD-Tree Visualization", 20.0, 40.0, 30.0, WHITE);

        next_frame().await
    }
}
