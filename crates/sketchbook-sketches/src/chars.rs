//! Glyphs used by the sketches.

/// Small circle.
pub const CIRCLE: char = '●';

/// Small axis-aligned square.
pub const SQUARE: char = '■';

/// Small square turned by roughly 45°.
pub const DIAMOND: char = '◆';

/// Filled cell for large shapes.
pub const FULL: char = '█';

/// Upper half block; foreground is the top pixel, background the bottom one.
pub const UPPER_HALF: char = '▀';

/// Fill densities from faint to solid.
pub const SHADES: &[char] = &['·', '░', '▒', '▓', '█'];

/// Box drawing set: corners then edges.
pub const BOX_TOP_LEFT: char = '┌';
pub const BOX_TOP_RIGHT: char = '┐';
pub const BOX_BOTTOM_LEFT: char = '└';
pub const BOX_BOTTOM_RIGHT: char = '┘';
pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';
