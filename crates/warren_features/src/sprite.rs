//! Sprite animation: a lazy, restartable sequence of frame descriptors.

use std::sync::Arc;

/// One frame of an animation: an image reference plus the region of it
/// to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Reference to the backing image (path, atlas key, URL).
    pub image: Arc<str>,
    /// Horizontal offset into the image, in pixels.
    pub offset_x: u32,
    /// Vertical offset into the image, in pixels.
    pub offset_y: u32,
    /// Region width in pixels.
    pub width: u32,
    /// Region height in pixels.
    pub height: u32,
}

impl Frame {
    /// Creates a frame descriptor.
    #[must_use]
    pub fn new(image: impl Into<Arc<str>>, offset_x: u32, offset_y: u32, width: u32, height: u32) -> Self {
        Self {
            image: image.into(),
            offset_x,
            offset_y,
            width,
            height,
        }
    }
}

/// A frame sequence advancing one frame every `frame_duration + 1`
/// ticks.
///
/// A looping sprite wraps to the first frame; a non-looping sprite
/// plays once and holds its final frame. Sprites live in a gob's state
/// bag; the render feature ticks them during the `draw` phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    frames: Vec<Frame>,
    frame_duration: u32,
    looping: bool,
    current: usize,
    elapsed: u32,
}

impl Sprite {
    /// Creates a sprite over a frame sequence. `frame_duration` is the
    /// number of extra ticks each frame lives for (0 advances every
    /// tick).
    #[must_use]
    pub fn new(frames: Vec<Frame>, frame_duration: u32, looping: bool) -> Self {
        Self {
            frames,
            frame_duration,
            looping,
            current: 0,
            elapsed: 0,
        }
    }

    /// Index of the current frame.
    #[must_use]
    pub fn frame(&self) -> usize {
        self.current
    }

    /// Jumps to a frame (clamped to the sequence) and resets the
    /// internal timer.
    pub fn set_frame(&mut self, frame: usize) -> &mut Self {
        self.current = frame.min(self.frames.len().saturating_sub(1));
        self.elapsed = 0;
        self
    }

    /// Advances the internal timer, moving to the next frame when the
    /// current one has lived out its duration.
    pub fn tick(&mut self) -> &mut Self {
        self.elapsed += 1;
        if self.elapsed > self.frame_duration {
            self.elapsed = 0;
            if self.current + 1 < self.frames.len() {
                self.current += 1;
            } else if self.looping {
                self.current = 0;
            }
        }
        self
    }

    /// The current frame's descriptor, `None` for an empty sequence.
    #[must_use]
    pub fn frame_data(&self) -> Option<&Frame> {
        self.frames.get(self.current)
    }

    /// Whether a non-looping sprite has reached and finished its last
    /// frame.
    #[must_use]
    pub fn finished(&self) -> bool {
        !self.looping && !self.frames.is_empty() && self.current + 1 == self.frames.len()
    }
}
