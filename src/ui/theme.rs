use comfy_table::Color;

pub const HEADER: Color = Color::White;

pub const PR_NUMBER: Color = Color::Cyan;

pub const DURATION: Color = Color::Yellow;

pub const EMPTY: Color = Color::DarkGrey;
