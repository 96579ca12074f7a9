//! Prism Engine demo: renders a scene with the software pipeline and
//! presents the framebuffer through a macroquad window.
//!
//! Controls:
//! - 1-6: render mode (wire+vertices, wire, filled, filled+wire,
//!   textured, textured+wire)
//! - C / X: backface culling on / off
//! - W/S: move forward/back, A/D: yaw, Up/Down: pitch
//! - Escape: quit

use macroquad::prelude::*;

use prism_engine::raster::{
    Color as RasterColor, CullMode, Framebuffer, RenderMode, Renderer, HEIGHT, WIDTH,
};
use prism_engine::scene::Scene;
use prism_engine::VERSION;

const SCENE_PATH: &str = "assets/scene.ron";

const MOVE_SPEED: f32 = 5.0;
const TURN_SPEED: f32 = 1.0;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Prism Engine v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    let mut renderer = Renderer::new(WIDTH, HEIGHT);

    let mut scene = match Scene::load(SCENE_PATH) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("{}", e);
            println!("Falling back to the built-in demo scene");
            Scene::demo()
        }
    };

    println!("=== Prism Engine v{} ===", VERSION);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if is_key_pressed(KeyCode::Key1) {
            renderer.render_mode = RenderMode::WireframeVertices;
        }
        if is_key_pressed(KeyCode::Key2) {
            renderer.render_mode = RenderMode::Wireframe;
        }
        if is_key_pressed(KeyCode::Key3) {
            renderer.render_mode = RenderMode::Filled;
        }
        if is_key_pressed(KeyCode::Key4) {
            renderer.render_mode = RenderMode::FilledWireframe;
        }
        if is_key_pressed(KeyCode::Key5) {
            renderer.render_mode = RenderMode::Textured;
        }
        if is_key_pressed(KeyCode::Key6) {
            renderer.render_mode = RenderMode::TexturedWireframe;
        }
        if is_key_pressed(KeyCode::C) {
            renderer.cull_mode = CullMode::Backface;
        }
        if is_key_pressed(KeyCode::X) {
            renderer.cull_mode = CullMode::None;
        }

        let dt = get_frame_time();

        if is_key_down(KeyCode::W) {
            scene.camera.move_forward(MOVE_SPEED * dt);
        }
        if is_key_down(KeyCode::S) {
            scene.camera.move_forward(-MOVE_SPEED * dt);
        }
        if is_key_down(KeyCode::A) {
            scene.camera.rotate_yaw(-TURN_SPEED * dt);
        }
        if is_key_down(KeyCode::D) {
            scene.camera.rotate_yaw(TURN_SPEED * dt);
        }
        if is_key_down(KeyCode::Up) {
            scene.camera.rotate_pitch(-TURN_SPEED * dt);
        }
        if is_key_down(KeyCode::Down) {
            scene.camera.rotate_pitch(TURN_SPEED * dt);
        }

        for mesh in &mut scene.meshes {
            mesh.rotation = mesh.rotation + mesh.spin * dt;
        }

        fb.clear(RasterColor::BLACK);
        fb.draw_grid(RasterColor::GREY);
        for mesh in &scene.meshes {
            renderer.draw_mesh(&mut fb, mesh, &scene.camera, scene.light);
        }

        // Blit the framebuffer to the window, letterboxed to preserve
        // the aspect ratio
        clear_background(BLACK);
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        let fb_aspect = fb.width as f32 / fb.height as f32;
        let (sw, sh) = (screen_width(), screen_height());
        let (draw_w, draw_h, draw_x, draw_y) = if fb_aspect > sw / sh {
            let h = sw / fb_aspect;
            (sw, h, 0.0, (sh - h) * 0.5)
        } else {
            let w = sh * fb_aspect;
            (w, sh, (sw - w) * 0.5, 0.0)
        };

        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        draw_text(
            &format!(
                "{:?} | cull: {:?} | 1-6 mode, C/X cull, WASD + arrows camera",
                renderer.render_mode, renderer.cull_mode
            ),
            10.0,
            sh - 10.0,
            16.0,
            Color::from_rgba(200, 200, 200, 255),
        );

        next_frame().await;
    }
}
