pub const GRID_SIZE: usize = 5;

/// Row and column of the free cell.
pub const FREE_CELL: (usize, usize) = (2, 2);

/// Column headers, in grid column order.
pub const COLUMN_LETTERS: [char; GRID_SIZE] = ['B', 'I', 'N', 'G', 'O'];

/// Inclusive number range dealt into each column.
pub const COLUMN_RANGES: [(u32, u32); GRID_SIZE] = [(1, 15), (16, 30), (31, 45), (46, 60), (61, 75)];

/// Highest number that can be called.
pub const MAX_NUMBER: u32 = 75;

/// Column index for a header letter (case-insensitive). Returns `None` if the
/// letter is not one of B, I, N, G, O.
pub fn column_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    COLUMN_LETTERS.iter().position(|&l| l == upper)
}

/// Column a called number belongs to.
pub fn column_for_number(n: u32) -> Option<usize> {
    COLUMN_RANGES
        .iter()
        .position(|&(low, high)| (low..=high).contains(&n))
}

/// Whether `(row, col)` is the free cell.
pub fn is_free_cell(row: usize, col: usize) -> bool {
    (row, col) == FREE_CELL
}
