use chess_rules::{Board, ChessError, Colour, Move, Piece, PieceType, Square};

fn sq(name: &str) -> Square {
    Square::parse(name).expect("valid square name")
}

#[test]
fn standard_setup_has_twenty_moves() {
    let mut board = Board::starting_position();
    assert!(board.legal_move_exists(Colour::White));
    assert!(board.legal_move_exists(Colour::Black));

    let moves = board.legal_moves(Colour::White);
    assert_eq!(moves.len(), 20);
    let pawn_moves = moves
        .iter()
        .filter(|m| board.get(m.start()).map(|p| p.kind) == Some(PieceType::Pawn))
        .count();
    assert_eq!(pawn_moves, 16);
    assert!(board.castle_moves(Colour::White).is_empty());
}

#[test]
fn queen_on_open_file_checks_king() {
    let mut board = Board::new();
    board.place(Square::new(4, 7), PieceType::King, Colour::White).unwrap();
    board.place(Square::new(4, 0), PieceType::Queen, Colour::Black).unwrap();
    assert!(board.is_in_check(Colour::White));

    board.place(sq("e4"), PieceType::Pawn, Colour::White).unwrap();
    assert!(!board.is_in_check(Colour::White));
}

#[test]
fn lone_pawn_pushes_one_or_two() {
    let mut board = Board::new();
    board.place(sq("e2"), PieceType::Pawn, Colour::White).unwrap();
    let moves = board.get_piece_moves(sq("e2"));
    assert_eq!(moves.len(), 2);
    assert!(moves.contains(&Move::new(sq("e2"), sq("e3"))));
    assert!(moves.contains(&Move::new(sq("e2"), sq("e4"))));
}

#[test]
fn kingside_castle_moves_king_and_rook() {
    let mut board = Board::new();
    board.place(sq("e1"), PieceType::King, Colour::White).unwrap();
    board.place(sq("h1"), PieceType::Rook, Colour::White).unwrap();
    board.place(sq("e8"), PieceType::King, Colour::Black).unwrap();

    let castle = Move::castle(sq("e1"), sq("g1"));
    assert!(board.is_possible_move(&castle));
    assert!(board.is_valid_move(&castle));
    assert_eq!(board.get_san(&castle), "O-O");

    let captured = board.make_move(&castle).unwrap();
    assert_eq!(board.get(sq("g1")), Some(Piece::new(PieceType::King, Colour::White)));
    assert_eq!(board.get(sq("f1")), Some(Piece::new(PieceType::Rook, Colour::White)));
    assert_eq!(board.get(sq("e1")), Some(Piece::BLANK));
    assert_eq!(board.get(sq("h1")), Some(Piece::BLANK));

    board.unmake_move(&castle, captured).unwrap();
    assert_eq!(board.get(sq("e1")), Some(Piece::new(PieceType::King, Colour::White)));
    assert_eq!(board.get(sq("h1")), Some(Piece::new(PieceType::Rook, Colour::White)));
}

#[test]
fn castling_is_rederived_after_king_returns_home() {
    let mut board = Board::from_forsyth("4k3/8/8/8/8/8/8/4K2R").unwrap();
    let out = Move::new(sq("e1"), sq("e2"));
    let back = Move::new(sq("e2"), sq("e1"));
    board.make_move(&out).unwrap();
    board.make_move(&back).unwrap();
    assert_eq!(board.castle_moves(Colour::White), vec![Move::castle(sq("e1"), sq("g1"))]);
}

#[test]
fn promotion_converts_pawn_in_place() {
    let mut board = Board::new();
    board.place(sq("d8"), PieceType::Pawn, Colour::White).unwrap();
    assert!(board.can_promote_pawn(Colour::White));
    board.promote(Colour::White, PieceType::Queen).unwrap();
    assert_eq!(board.get(sq("d8")), Some(Piece::new(PieceType::Queen, Colour::White)));
    assert!(!board.can_promote_pawn(Colour::White));

    let before = board.clone();
    assert_eq!(
        board.promote(Colour::White, PieceType::Queen),
        Err(ChessError::InvalidPromotion {
            colour: Colour::White,
            kind: PieceType::Queen,
        })
    );
    assert_eq!(board, before);
}

#[test]
fn en_passant_capture_is_caller_supplied() {
    let mut board = Board::from_forsyth("4k3/8/8/3pP3/8/8/8/4K3").unwrap();
    assert!(board
        .get_piece_moves(sq("e5"))
        .iter()
        .all(|m| !m.is_en_passant()));

    let ep = Move::en_passant(sq("e5"), sq("d6"), sq("d5"));
    assert!(board.is_possible_valid_move(&ep));
    let before = board.clone();
    let captured = board.make_move(&ep).unwrap();
    assert_eq!(board.get(sq("d5")), Some(Piece::BLANK));
    board.unmake_move(&ep, captured).unwrap();
    assert_eq!(board, before);
}

#[test]
fn en_passant_exposing_king_is_invalid() {
    // Removing both pawns from the fifth rank opens the rook's line to the king
    let mut board = Board::from_forsyth("8/8/8/K2pP2r/8/8/8/7k").unwrap();
    let ep = Move::en_passant(sq("e5"), sq("d6"), sq("d5"));
    assert!(board.is_possible_move(&ep));
    assert!(!board.is_valid_move(&ep));
}

#[test]
fn checkmate_primitives() {
    // Back-rank mate: in check with no generator move
    let mut board = Board::from_forsyth("3R2k1/5ppp/8/8/8/8/8/6K1").unwrap();
    assert!(board.is_in_check(Colour::Black));
    assert!(!board.legal_move_exists(Colour::Black));

    // Stalemate: not in check, still no move
    let mut board = Board::from_forsyth("7k/5Q2/6K1/8/8/8/8/8").unwrap();
    assert!(!board.is_in_check(Colour::Black));
    assert!(!board.legal_move_exists(Colour::Black));
}

#[test]
fn double_push_block_is_not_mate() {
    // The rook on a4 checks along the fourth rank and only b2-b4 interposes
    let mut board = Board::from_forsyth("4b3/8/8/8/r6K/8/1P6/k4br1").unwrap();
    assert!(board.is_in_check(Colour::White));
    assert!(board.legal_move_exists(Colour::White));
    assert_eq!(
        board.legal_moves(Colour::White),
        vec![Move::new(sq("b2"), sq("b4"))]
    );
}
