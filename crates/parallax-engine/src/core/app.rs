use anyhow::Result;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once per display refresh. Input gathered since the previous
    /// frame is available in `ctx.input_frame`.
    ///
    /// An error ends the loop and is returned from `Runtime::run`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;

    /// Called once before the window, surface and device are released.
    fn on_exit(&mut self) {}
}
