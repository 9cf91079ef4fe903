use crate::Board;

/// Strings to draw the three kinds of slots with, indexed by [`Slot::index()`](crate::Slot::index):
/// empty, player one, player two.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TokenGlyphs<'a>(pub [&'a str; 3]);

impl TokenGlyphs<'static> {
    /// Slots drawn as their number.
    pub const DEFAULT: TokenGlyphs<'static> = TokenGlyphs(["0", "1", "2"]);
    /// Coloured disks.
    pub const DISKS: TokenGlyphs<'static> = TokenGlyphs(["⚫", "🔴", "🟡"]);
    /// Zombies and barricades.
    pub const ZOMBIES: TokenGlyphs<'static> = TokenGlyphs(["🟫", "🚧", "🧟"]);
}

impl Default for TokenGlyphs<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Draws the board as text, top row first, for logs and tests.
///
/// Slots in a row are separated by a space, rows by a newline.
pub fn render_with_tokens(board: &Board, glyphs: &TokenGlyphs) -> String {
    (0..board.height())
        .rev()
        .map(|row| {
            board
                .columns()
                .iter()
                .map(|column| glyphs.0[column[row].index()])
                .collect::<Vec<&str>>()
                .join(" ")
        })
        .collect::<Vec<String>>()
        .join("\n")
}

impl Board {
    pub fn render(&self, glyphs: &TokenGlyphs) -> String {
        render_with_tokens(self, glyphs)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(&TokenGlyphs::DEFAULT))
    }
}
