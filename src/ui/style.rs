/// Compile-time layout tokens — not user-overridable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub window_min_width: i32,
    pub window_min_height: i32,
    pub text_input_min_height: i32,
    pub spin_input_width_chars: i32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    spacing_12: 12,
    window_default_width: 680,
    window_default_height: 620,
    window_min_width: 520,
    window_min_height: 520,
    text_input_min_height: 140,
    spin_input_width_chars: 6,
};
