//! Text rendering of cards and win reports.

use crate::core::{
    config::{is_free_cell, COLUMN_LETTERS, GRID_SIZE},
    Board, CellId, WinReport,
};

const INNER_WIDTH: usize = GRID_SIZE * 4 + (GRID_SIZE - 1) + 2;

fn border(left: char, right: char) -> String {
    let mut line = String::from("    ");
    line.push(left);
    line.extend(std::iter::repeat('═').take(INNER_WIDTH));
    line.push(right);
    line
}

fn framed(cells: &[String]) -> String {
    format!("    ║ {} ║", cells.join(" "))
}

/// Render one held card. Marked cells are bracketed, the free cell is `*`.
/// Returns `None` if no card is held at `index`.
pub fn render_card(board: &Board, index: usize) -> Option<String> {
    let card = board.card(index)?;
    let mut lines = Vec::with_capacity(GRID_SIZE + 6);

    lines.push(format!("    Card {}", index + 1));
    lines.push(border('╔', '╗'));
    let header: Vec<String> = COLUMN_LETTERS.iter().map(|l| format!("  {} ", l)).collect();
    lines.push(framed(&header));
    lines.push(border('╠', '╣'));
    for r in 0..GRID_SIZE {
        let cells: Vec<String> = (0..GRID_SIZE)
            .map(|c| {
                if is_free_cell(r, c) {
                    return "  * ".to_string();
                }
                let n = card.grid().number(r, c).unwrap_or_default();
                if board.is_marked(CellId::new(index, r, c)) {
                    format!("[{:>2}]", n)
                } else {
                    format!(" {:>2} ", n)
                }
            })
            .collect();
        lines.push(framed(&cells));
    }
    lines.push(border('╚', '╝'));
    lines.push(format!("    Token: {}", card.token()));
    Some(lines.join("\n"))
}

/// Render every held card, or a hint when there are none.
pub fn render_board(board: &Board) -> String {
    if board.cards().is_empty() {
        return "No cards loaded. Type `add` to load a card.".to_string();
    }
    let mut out = format!(
        "Game Code: {}\nYou are playing with {}\n",
        board.code(),
        card_count(board.cards().len())
    );
    for index in 0..board.cards().len() {
        if let Some(card) = render_card(board, index) {
            out.push('\n');
            out.push_str(&card);
            out.push('\n');
        }
    }
    out
}

/// `"1 card"`, `"3 cards"`.
pub fn card_count(n: usize) -> String {
    format!("{} card{}", n, if n == 1 { "" } else { "s" })
}

/// One-paragraph summary of a win-check batch.
pub fn render_report(report: &WinReport) -> String {
    let mut out = if report.has_winner() {
        let numbers: Vec<String> = report
            .winning_indices()
            .iter()
            .map(|i| (i + 1).to_string())
            .collect();
        format!("BINGO! Winning card(s): {}", numbers.join(", "))
    } else {
        "Not yet! No winning cards yet! Keep playing.".to_string()
    };
    if report.failed() > 0 {
        out.push_str(&format!(
            "\nCould not reach the server for {}.",
            card_count(report.failed())
        ));
    }
    out
}
