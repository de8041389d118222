use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard and mouse state polled once per frame.
///
/// Window events are folded in as they arrive; [`InputState::end_frame`]
/// clears the per-frame parts (mouse delta, one-shot requests).
#[derive(Debug, Default)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
    cursor: Option<Vec2>,
    mouse_delta: Vec2,
    look_held: bool,
    quit_requested: bool,
    screenshot_requested: bool,
    reload_requested: bool,
}

impl InputState {
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if !*repeat {
                    self.handle_key(*code, *state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    /// For events the overlay consumed: only releases get through, so a
    /// key or button let go over a focused widget does not stay held.
    pub fn handle_consumed_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Released,
                        ..
                    },
                ..
            } => self.handle_key(*code, false),
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button,
                ..
            } => self.handle_mouse_button(*button, false),
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            match key {
                KeyCode::Escape => self.quit_requested = true,
                KeyCode::F12 => self.screenshot_requested = true,
                KeyCode::F5 => self.reload_requested = true,
                _ => {}
            }
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    pub fn handle_cursor(&mut self, position: Vec2) {
        if let Some(last) = self.cursor {
            self.mouse_delta += position - last;
        }
        self.cursor = Some(position);
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if button == MouseButton::Right {
            self.look_held = pressed;
        }
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn look_held(&self) -> bool {
        self.look_held
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Returns and clears the F12 request.
    pub fn take_screenshot_request(&mut self) -> bool {
        std::mem::take(&mut self.screenshot_requested)
    }

    /// Returns and clears the F5 request.
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    /// Forgets held keys and buttons, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.look_held = false;
    }

    pub fn end_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
    }
}
