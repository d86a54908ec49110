use bingo::{Board, CardCheck, CardToken, CellId, CheckOutcome, GameCode, Grid, Card, WinReport, GRID_SIZE};
use proptest::prelude::*;
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

fn board_with_cards(n: usize) -> Board {
    let mut board = Board::new(GameCode::new("PROP1").unwrap());
    for i in 0..n {
        let token = CardToken::new(&format!("tok-{}", i)).unwrap();
        board
            .add_card(Card::new(token, Grid::from_rows([[i as u32; GRID_SIZE]; GRID_SIZE])))
            .unwrap();
    }
    board
}

fn cell_strategy(cards: usize) -> impl Strategy<Value = CellId> {
    (0..cards, 0..GRID_SIZE, 0..GRID_SIZE)
        .prop_filter("free cell", |&(_, r, c)| (r, c) != (2, 2))
        .prop_map(|(card, r, c)| CellId::new(card, r, c))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transposition_pairs_rows_across_columns(columns in prop::array::uniform5(prop::collection::vec(1u32..=75, 5..8))) {
        let grid = Grid::from_columns([
            &columns[0][..],
            &columns[1][..],
            &columns[2][..],
            &columns[3][..],
            &columns[4][..],
        ]).unwrap();
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                prop_assert_eq!(grid.rows()[r][c], columns[c][r]);
            }
        }
    }

    #[test]
    fn mark_then_unmark_restores_membership(
        premarked in prop::collection::vec(cell_strategy(3), 0..12),
        target in cell_strategy(3),
    ) {
        let mut board = board_with_cards(3);
        for cell in &premarked {
            board.mark(*cell).unwrap();
        }
        let before = board.marks().clone();
        let was_marked = board.is_marked(target);

        board.toggle_mark(target).unwrap();
        prop_assert_ne!(board.is_marked(target), was_marked);
        board.toggle_mark(target).unwrap();

        prop_assert_eq!(board.marks(), &before);
        prop_assert_eq!(board.is_marked(target), was_marked);
    }

    #[test]
    fn marking_twice_is_idempotent(target in cell_strategy(2)) {
        let mut board = board_with_cards(2);
        board.mark(target).unwrap();
        let once = board.marks().clone();
        board.mark(target).unwrap();
        prop_assert_eq!(board.marks(), &once);
        board.unmark(target).unwrap();
        board.unmark(target).unwrap();
        prop_assert!(board.marks().is_empty());
    }

    #[test]
    fn report_ignores_completion_order(
        outcomes in prop::collection::vec(0u8..3, 0..10),
        seed in any::<u64>(),
    ) {
        let checks: Vec<CardCheck> = outcomes
            .iter()
            .enumerate()
            .map(|(index, o)| CardCheck {
                index,
                token: CardToken::new(&format!("tok-{}", index)).unwrap(),
                outcome: match o {
                    0 => CheckOutcome::Winner,
                    1 => CheckOutcome::NotWinner,
                    _ => CheckOutcome::Failed,
                },
            })
            .collect();
        let mut shuffled = checks.clone();
        shuffled.shuffle(&mut SmallRng::seed_from_u64(seed));

        let ordered = WinReport::new(checks);
        let reordered = WinReport::new(shuffled);
        prop_assert_eq!(&ordered, &reordered);

        let expected: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| **o == 0)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(ordered.winning_indices(), expected);
    }
}
