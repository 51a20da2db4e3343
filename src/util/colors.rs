use ratatui::style::Color;

pub const BACKGROUND: Color = Color::from_u32(0x000d0d0d);
pub const PRIMARY: Color = Color::from_u32(0x00cc0000);
pub const TEXT: Color = Color::from_u32(0x00e6e6e6);
pub const MUTED: Color = Color::from_u32(0x00808080);
pub const ERROR: Color = Color::from_u32(0x00ff5555);
pub const SUCCESS: Color = Color::from_u32(0x0050fa7b);
