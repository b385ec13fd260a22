//! Colour constants shared by the display and export frontends.

/// Plain 8-bit RGB triple; opacity is carried separately by each element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const NODE: Rgb = Rgb(0x4C, 0x72, 0xB0);
pub const ACTIVE: Rgb = Rgb(0x4C, 0x72, 0xB0);
pub const NEUTRAL: Rgb = Rgb(0x80, 0x80, 0x80);
pub const MARKER: Rgb = Rgb(0, 0, 0);

pub const TRAIN_LOSS: Rgb = Rgb(0xD9, 0x53, 0x4F);
pub const VAL_LOSS: Rgb = Rgb(0xF0, 0xAD, 0x4E);
pub const TRAIN_ACC: Rgb = Rgb(0x5C, 0xB8, 0x5C);
pub const VAL_ACC: Rgb = Rgb(0x5B, 0xC0, 0xDE);

