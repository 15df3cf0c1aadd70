use bitflags::bitflags;

bitflags! {
    /// Flags forwarded to the animator with every animation step
    ///
    /// The drivers never inspect these; they exist so a caller can reach
    /// backend features without the step model knowing about them.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AnimationOptions: u8 {
        /// Keep the animated element interactive while it moves
        const ALLOW_INTERACTION         = 0b0001;
        /// Start from the currently presented value instead of the model value
        const BEGIN_FROM_CURRENT_STATE  = 0b0010;
        /// Ignore the duration of an enclosing animation
        const OVERRIDE_INHERITED_DURATION = 0b0100;
        /// Ignore the curve of an enclosing animation
        const OVERRIDE_INHERITED_CURVE  = 0b1000;
    }
}
