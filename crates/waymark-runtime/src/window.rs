#![forbid(unsafe_code)]

//! Backdrop window: the viewport with a hole around the active anchor.

use std::fmt::Write as _;

use waymark_core::geometry::{Rect, Sides};

/// The region a backdrop dims, minus the hole it leaves open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowCutout {
    pub outer: Rect,
    /// Anchor grown by the buffer and clipped to `outer`; `None` when the
    /// anchor is entirely off-screen.
    pub hole: Option<Rect>,
}

impl WindowCutout {
    pub fn new(viewport: Rect, anchor: Rect, buffer: f64) -> Self {
        let grown = anchor.outer(Sides::all(buffer.max(0.0)));
        Self {
            outer: viewport,
            hole: grown.intersection_opt(&viewport),
        }
    }

    /// SVG path data for the dimmed region, to be filled with
    /// `fill-rule="evenodd"`.
    pub fn to_svg_path(&self) -> String {
        let mut path = String::new();
        push_rect(&mut path, &self.outer);
        if let Some(hole) = &self.hole {
            path.push(' ');
            push_rect(&mut path, hole);
        }
        path
    }
}

fn push_rect(path: &mut String, rect: &Rect) {
    // Writing into a String cannot fail.
    let _ = write!(
        path,
        "M{} {} H{} V{} H{} Z",
        rect.left(),
        rect.top(),
        rect.right(),
        rect.bottom(),
        rect.left()
    );
}

/// Host surface that dims everything outside the window.
pub trait Backdrop {
    fn set_window(&mut self, window: &WindowCutout);
    fn clear_window(&mut self);
}
