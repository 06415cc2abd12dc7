pub mod entity;
pub mod glyphs;
pub mod messages;
pub mod placement;
pub mod touch;
