mod wire;

use smart_leds::RGB8;
pub use wire::{CHANNELS_PER_LED, to_wire_order};

pub type Rgb = RGB8;

/// Color with every channel off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
