use crate::render::camera::FOV_RANGE;
use crate::render::transform::{ROTATION_RANGE, Z_OFFSET_RANGE};
use crate::state::AppState;
use egui::{Color32, Context, DragValue, Slider};

/// Menu bar plus the object and camera attribute panels.
#[derive(Debug, Default)]
pub struct Hud {
    /// Exponentially smoothed frame time in seconds.
    smoothed_frame_time: f32,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, ctx: &Context, state: &mut AppState) {
        let delta = state.timer.delta_time();
        self.smoothed_frame_time = if self.smoothed_frame_time == 0.0 {
            delta
        } else {
            self.smoothed_frame_time * 0.9 + delta * 0.1
        };

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Options", |ui| {
                    ui.checkbox(&mut state.fullscreen, "Fullscreen");
                    ui.checkbox(&mut state.wireframe, "Wireframe");
                    ui.checkbox(&mut state.depth_test, "Depth test");
                    ui.separator();
                    ui.checkbox(&mut state.show_object_panel, "Show object panel");
                    ui.checkbox(&mut state.show_camera_panel, "Show camera panel");
                    ui.separator();
                    if ui.button("Reload shaders").clicked() {
                        state.request_reload();
                        ui.close_menu();
                    }
                });
            });
        });

        let transform = &mut state.transform;
        let clear_color = &mut state.clear_color;
        egui::Window::new("Object Attributes")
            .open(&mut state.show_object_panel)
            .default_pos([10.0, 40.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.add(Slider::new(&mut transform.rotation.x, ROTATION_RANGE).text("XRotate"));
                ui.add(Slider::new(&mut transform.rotation.y, ROTATION_RANGE).text("YRotate"));
                ui.add(Slider::new(&mut transform.rotation.z, ROTATION_RANGE).text("ZRotate"));
                ui.add(Slider::new(&mut transform.z_offset, Z_OFFSET_RANGE).text("ZAxis"));
                ui.separator();
                for (value, label) in transform.orientation.iter_mut().zip(["X", "Y", "Z", "W"]) {
                    ui.add(Slider::new(value, 0.0..=1.0).text(label));
                }
                ui.separator();
                ui.add(
                    Slider::new(&mut transform.animation_speed, 0.0..=1.0)
                        .text("Animation Speed"),
                );
                ui.horizontal(|ui| {
                    ui.label("Clear color");
                    ui.color_edit_button_rgba_unmultiplied(clear_color);
                });
            });

        let camera = &mut state.camera;
        let frame_time = self.smoothed_frame_time;
        egui::Window::new("Camera Attributes")
            .open(&mut state.show_camera_panel)
            .default_pos([10.0, 360.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.add(Slider::new(&mut camera.fov, FOV_RANGE).text("Fov"));
                ui.horizontal(|ui| {
                    ui.label("Position");
                    ui.add(DragValue::new(&mut camera.position.x).speed(0.05).prefix("x "));
                    ui.add(DragValue::new(&mut camera.position.y).speed(0.05).prefix("y "));
                    ui.add(DragValue::new(&mut camera.position.z).speed(0.05).prefix("z "));
                });
                ui.label(format!("Yaw {:.1}  Pitch {:.1}", camera.yaw, camera.pitch));
                if frame_time > 0.0 {
                    ui.label(format!(
                        "{:.3} ms/frame ({:.1} FPS)",
                        frame_time * 1000.0,
                        1.0 / frame_time
                    ));
                }
            });

        if let Some(error) = &state.shader_error {
            egui::TopBottomPanel::bottom("shader_status").show(ctx, |ui| {
                ui.colored_label(Color32::LIGHT_RED, format!("Shader error: {error}"));
            });
        }
    }

    pub fn frame_time(&self) -> f32 {
        self.smoothed_frame_time
    }
}
