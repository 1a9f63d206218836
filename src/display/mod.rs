pub mod overlay;
pub mod pacing;
pub mod render_loop;
pub mod surface;
pub mod view;
pub mod window;

pub use self::pacing::FramePacer;
pub use self::render_loop::{ExitReason, RenderLoop, Step};
pub use self::surface::{NullSurface, Surface};
pub use self::view::{Command, Key, ViewMode};
pub use self::window::WindowSurface;
