mod style;

pub use style::{StyleTokens, LAYOUT_TOKENS};
