//! Registration of the drawable surface.
//!
//! The display subsystem registers its current buffer whenever it flips buffers; the
//! crash screen only borrows whichever buffer is registered when a fault arrives.

use core::ptr::NonNull;
use spin::Mutex;

use super::Framebuffer;
use crate::error::{CrashScreenError, Result};

/// Location and size of registered pixel memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRef {
    buffer: NonNull<u16>,
    width: usize,
    height: usize,
}

// The pointer is only dereferenced by the crash screen worker.
unsafe impl Send for SurfaceRef {}

impl SurfaceRef {
    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }
}

/// Holder for the currently registered surface
pub struct SurfaceSlot {
    current: Mutex<Option<SurfaceRef>>,
}

impl SurfaceSlot {
    pub const fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Register raw pixel memory.
    ///
    /// # Safety
    /// `buffer` must point to `width * height` writable RGBA5551 pixels that stay valid
    /// until another surface is registered. The crash screen writes to them without
    /// further synchronization once a fault is being reported.
    pub unsafe fn set(&self, buffer: *mut u16, width: usize, height: usize) -> Result<()> {
        let buffer = NonNull::new(buffer).ok_or(CrashScreenError::NullSurface)?;
        *self.current.lock() = Some(SurfaceRef { buffer, width, height });
        Ok(())
    }

    /// Register a pixel slice that lives for the rest of the program
    pub fn set_slice(&self, pixels: &'static mut [u16], width: usize, height: usize) -> Result<()> {
        let needed = width * height;
        if pixels.len() < needed {
            return Err(CrashScreenError::SurfaceTooSmall {
                needed,
                available: pixels.len(),
            });
        }

        // SAFETY: the slice is exclusive, 'static and large enough.
        unsafe { self.set(pixels.as_mut_ptr(), width, height) }
    }

    /// The registered surface, if any
    pub fn current(&self) -> Option<SurfaceRef> {
        *self.current.lock()
    }

    /// Run `f` on the registered surface. The registration lock is not held while
    /// `f` runs.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut Framebuffer<'_>) -> R) -> Option<R> {
        let surface = self.current()?;
        // SAFETY: registration guarantees the memory is valid and reserved for us.
        let mut framebuffer =
            unsafe { Framebuffer::from_raw_parts(surface.buffer, surface.width, surface.height) };
        Some(f(&mut framebuffer))
    }
}

impl Default for SurfaceSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_surface_rejected() {
        let slot = SurfaceSlot::new();
        let result = unsafe { slot.set(core::ptr::null_mut(), 320, 240) };
        assert_eq!(result, Err(CrashScreenError::NullSurface));
        assert!(slot.current().is_none());
        assert!(slot.with_surface(|_| ()).is_none());
    }

    #[test]
    fn test_slice_registration() {
        let slot = SurfaceSlot::new();
        let pixels: &'static mut [u16] = Box::leak(vec![0u16; 16].into_boxed_slice());
        assert_eq!(
            slot.set_slice(pixels, 8, 4),
            Err(CrashScreenError::SurfaceTooSmall { needed: 32, available: 16 })
        );

        let pixels: &'static mut [u16] = Box::leak(vec![0u16; 32].into_boxed_slice());
        slot.set_slice(pixels, 8, 4).expect("surface fits");
        let size = slot.with_surface(|fb| {
            fb.set_pixel(7, 3, 0xFFFF);
            (fb.width(), fb.height(), fb.pixel(7, 3))
        });
        assert_eq!(size, Some((8, 4, 0xFFFF)));
    }
}
