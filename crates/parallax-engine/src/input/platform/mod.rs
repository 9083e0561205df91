//! Window-system event translation.

mod winit;

pub(crate) use self::winit::{resize_event, translate_window_event};
