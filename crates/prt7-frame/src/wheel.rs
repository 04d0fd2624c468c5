//! The rotor wheel: a circular A-Z alphabet with a movable reference position.
//!
//! The symbols never move. Rotation only changes which symbol is the
//! reference, so the wheel is an index into a fixed table.

/// Number of symbols on the wheel.
pub const WHEEL_SIZE: usize = 26;

/// The wheel's symbols in circular order, starting at the origin.
pub const ALPHABET: [char; WHEEL_SIZE] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Circular substitution wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotorWheel {
    reference: u8,
}

impl RotorWheel {
    /// A fresh wheel with the reference on `A`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the reference `steps` positions forward (negative: backward).
    ///
    /// Wraps modulo [`WHEEL_SIZE`] in both directions, with the same result as
    /// stepping one position at a time.
    pub fn rotate(&mut self, steps: i64) {
        let delta = steps.rem_euclid(WHEEL_SIZE as i64) as usize;
        self.reference = ((self.reference as usize + delta) % WHEEL_SIZE) as u8;
    }

    /// Decode one symbol.
    ///
    /// Non-letters come back unchanged. A letter is uppercased, its distance
    /// from the wheel origin is measured, and the symbol that same distance
    /// forward from the current reference is returned. On an unrotated wheel
    /// this is the identity.
    pub fn map_symbol(&self, input: char) -> char {
        match origin_steps(input) {
            Some(steps) => self.walk(steps),
            None => input,
        }
    }

    /// Inverse of [`map_symbol`](Self::map_symbol) for letters.
    ///
    /// `wheel.map_symbol(wheel.unmap_symbol(c)) == c.to_ascii_uppercase()`.
    pub fn unmap_symbol(&self, output: char) -> char {
        match origin_steps(output) {
            Some(steps) => ALPHABET[(steps + WHEEL_SIZE - self.offset()) % WHEEL_SIZE],
            None => output,
        }
    }

    /// The symbol currently at the reference position.
    pub fn reference(&self) -> char {
        ALPHABET[self.offset()]
    }

    /// Distance of the reference from the origin, in `0..WHEEL_SIZE`.
    pub fn offset(&self) -> usize {
        self.reference as usize
    }

    fn walk(&self, steps: usize) -> char {
        ALPHABET[(self.offset() + steps) % WHEEL_SIZE]
    }
}

/// Forward steps from the origin to `symbol`, if it is an ASCII letter.
fn origin_steps(symbol: char) -> Option<usize> {
    if !symbol.is_ascii_alphabetic() {
        return None;
    }
    let upper = symbol.to_ascii_uppercase();
    ALPHABET.iter().position(|&s| s == upper)
}
