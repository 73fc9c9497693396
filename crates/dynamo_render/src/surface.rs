//! Drawing surface geometry

/// Size of the drawing surface in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Height used to flip raw touch coordinates to a bottom-left origin.
    pub fn flip_height(&self) -> f32 {
        self.height as f32
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}
