use crate::config::DisplayParams;
use crate::display::surface::Surface;
use crate::display::view::Key;
use crate::error::{FinchError, FinchResult};
use crate::raster::Image;
use minifb::{KeyRepeat, Scale, ScaleMode, Window, WindowOptions};
use std::collections::VecDeque;
use tracing::debug;

pub const WINDOW_NAME: &str = "finch";

/// Desktop window backed by `minifb`.
pub struct WindowSurface {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    pending: VecDeque<Key>,
}

impl WindowSurface {
    /// Opens a window sized for `width` x `height` frames. Fullscreen is a
    /// borderless window scaled to fit the screen.
    pub fn open(width: u32, height: u32, params: &DisplayParams) -> FinchResult<Self> {
        let scale = if params.fullscreen {
            Scale::FitScreen
        } else {
            match params.window_scale {
                1 => Scale::X1,
                4 => Scale::X4,
                8 => Scale::X8,
                _ => Scale::X2,
            }
        };

        let options = WindowOptions {
            borderless: params.fullscreen,
            resize: true,
            scale,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        };

        let window = Window::new(WINDOW_NAME, width as usize, height as usize, options)
            .map_err(|e| FinchError::Display(e.to_string()))?;
        debug!(
            "Opened {}x{} window (fullscreen: {})",
            width, height, params.fullscreen
        );

        Ok(Self {
            window,
            buffer: vec![0; width as usize * height as usize],
            width: width as usize,
            height: height as usize,
            pending: VecDeque::new(),
        })
    }

    fn pack(&mut self, frame: &Image) {
        self.width = frame.width() as usize;
        self.height = frame.height() as usize;
        self.buffer.clear();
        match frame.channels() {
            1 => self
                .buffer
                .extend(frame.samples().iter().map(|&v| rgb_pixel(v, v, v))),
            _ => self.buffer.extend(
                frame
                    .samples()
                    .chunks_exact(3)
                    .map(|px| rgb_pixel(px[0], px[1], px[2])),
            ),
        }
    }

    fn collect_keys(&mut self) {
        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            self.pending.push_back(map_key(key));
        }
    }
}

impl Surface for WindowSurface {
    fn is_open(&self) -> bool {
        self.window.is_open()
    }

    fn present(&mut self, frame: &Image) -> FinchResult<()> {
        self.pack(frame);
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| FinchError::Display(e.to_string()))?;
        self.collect_keys();
        Ok(())
    }

    fn poll_key(&mut self) -> Option<Key> {
        self.pending.pop_front()
    }

    fn idle(&mut self) {
        self.window.update();
        self.collect_keys();
    }
}

fn rgb_pixel(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | (b as u32)
}

fn map_key(key: minifb::Key) -> Key {
    use minifb::Key as K;
    let ch = match key {
        K::Escape => return Key::Escape,
        K::A => 'a',
        K::B => 'b',
        K::C => 'c',
        K::D => 'd',
        K::E => 'e',
        K::F => 'f',
        K::G => 'g',
        K::H => 'h',
        K::I => 'i',
        K::J => 'j',
        K::K => 'k',
        K::L => 'l',
        K::M => 'm',
        K::N => 'n',
        K::O => 'o',
        K::P => 'p',
        K::Q => 'q',
        K::R => 'r',
        K::S => 's',
        K::T => 't',
        K::U => 'u',
        K::V => 'v',
        K::W => 'w',
        K::X => 'x',
        K::Y => 'y',
        K::Z => 'z',
        _ => return Key::Other,
    };
    Key::Char(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_lowercase_chars() {
        assert_eq!(map_key(minifb::Key::D), Key::Char('d'));
        assert_eq!(map_key(minifb::Key::Escape), Key::Escape);
        assert_eq!(map_key(minifb::Key::F1), Key::Other);
    }

    #[test]
    fn packs_zero_rgb() {
        assert_eq!(rgb_pixel(0x12, 0x34, 0x56), 0x0012_3456);
    }
}
