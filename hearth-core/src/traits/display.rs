//! Display surface trait for full-frame output

/// A display that accepts whole frames
///
/// The animation loop only ever clears the screen or replaces it with a
/// complete pre-rendered frame, so this is the entire surface it needs.
/// Frames are passed in controller-native page layout.
pub trait FrameSink {
    /// Error type for display operations
    type Error;

    /// Blank the display
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Replace the display contents with `frame`
    ///
    /// `frame` must be exactly `width * height / 8` bytes; implementations
    /// reject any other length without updating the display.
    fn blit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    type Error = T::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        (**self).clear()
    }

    fn blit(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        (**self).blit(frame)
    }
}
