//! Tests for the drop token game state machine.

use drop_token::{Action, Cell, Game, GameError, GameStatus, Token};

fn new_game(size: usize, a: &str, b: &str) -> Game {
    Game::new("test".to_string(), size, a.to_string(), b.to_string()).expect("valid game")
}

#[test]
fn test_bottom_row_win() {
    let mut game = new_game(4, "alice", "bob");

    for column in 1..=3 {
        game.attempt_move("alice", column).expect("alice moves");
        game.attempt_move("bob", column).expect("bob moves");
    }
    let outcome = game.attempt_move("alice", 4).expect("winning move");

    assert_eq!(outcome.status, GameStatus::Done);
    assert_eq!(outcome.winner.as_deref(), Some("alice"));
    assert_eq!(game.winner(), Some("alice"));
    assert_eq!(game.board().row_totals()[3], 4);
    let grid = game.grid();
    for column in 0..4 {
        assert_eq!(grid[3][column], Cell::Occupied(Token::First));
    }
    for column in 0..3 {
        assert_eq!(grid[2][column], Cell::Occupied(Token::Second));
    }
    assert_eq!(grid[2][3], Cell::Empty);
}

#[test]
fn test_second_player_cannot_open() {
    let mut game = new_game(4, "a", "b");
    assert_eq!(
        game.attempt_move("b", 1),
        Err(GameError::NotYourTurn {
            expected: "a".to_string()
        })
    );
    assert!(game.moves().is_empty());
}

#[test]
fn test_same_player_twice_is_rejected_for_every_column() {
    let mut game = new_game(4, "a", "b");
    game.attempt_move("a", 1).unwrap();
    for column in 0..=5 {
        assert!(matches!(
            game.attempt_move("a", column),
            Err(GameError::NotYourTurn { .. })
        ));
    }
}

#[test]
fn test_fifth_drop_into_column_is_full() {
    let mut game = new_game(4, "a", "b");
    for (i, player) in ["a", "b", "a", "b"].into_iter().enumerate() {
        let outcome = game.attempt_move(player, 2).unwrap();
        assert_eq!(outcome.placement.row, 3 - i);
        assert_eq!(outcome.placement.column, 1);
        assert_eq!(outcome.status, GameStatus::InProgress);
    }
    assert_eq!(game.attempt_move("a", 2), Err(GameError::ColumnFull(2)));
    assert_eq!(game.moves().len(), 4);
}

#[test]
fn test_vertical_win() {
    let mut game = new_game(4, "a", "b");
    for _ in 0..3 {
        game.attempt_move("a", 1).unwrap();
        game.attempt_move("b", 2).unwrap();
    }
    let outcome = game.attempt_move("a", 1).unwrap();
    assert_eq!(outcome.winner.as_deref(), Some("a"));
}

#[test]
fn test_main_diagonal_win_for_second_player() {
    // Second player builds (0,0),(1,1),(2,2),(3,3): columns 1..=4 at rising heights.
    let mut game = new_game(4, "a", "b");
    let moves = [
        ("a", 1),
        ("b", 4), // (3,3)
        ("a", 3),
        ("b", 3), // (2,2)
        ("a", 2),
        ("b", 1),
        ("a", 2),
        ("b", 2), // (1,1)
        ("a", 1),
        ("b", 4),
        ("a", 4),
        ("b", 3),
        ("a", 3),
    ];
    for (player, column) in moves {
        let outcome = game.attempt_move(player, column).unwrap();
        assert_eq!(outcome.status, GameStatus::InProgress, "{} {}", player, column);
    }
    let outcome = game.attempt_move("b", 1).unwrap(); // (0,0)
    assert_eq!(outcome.placement.row, 0);
    assert_eq!(outcome.winner.as_deref(), Some("b"));
    assert_eq!(game.board().diagonal_totals()[0], -4);
}

#[test]
fn test_full_board_without_line_is_draw() {
    // Final 4x4 grid (top row first), no complete line:
    //   b a b a
    //   b a b a
    //   a b a b
    //   a b a b
    let mut game = new_game(4, "a", "b");
    let columns = [1, 2, 1, 2, 2, 1, 2, 1, 3, 4, 3, 4, 4, 3, 4, 3];
    let players = ["a", "b"];

    for (i, column) in columns.iter().enumerate() {
        let outcome = game.attempt_move(players[i % 2], *column).unwrap();
        if i + 1 < columns.len() {
            assert_eq!(outcome.status, GameStatus::InProgress, "move {}", i + 1);
        } else {
            assert_eq!(outcome.status, GameStatus::Done);
            assert_eq!(outcome.winner, None);
        }
    }
    assert_eq!(game.winner(), None);
    assert!(game.board().is_full());
}

#[test]
fn test_done_is_terminal() {
    let mut game = new_game(2, "a", "b");
    game.attempt_move("a", 1).unwrap();
    game.attempt_move("b", 2).unwrap();
    let outcome = game.attempt_move("a", 1).unwrap();
    assert_eq!(outcome.status, GameStatus::Done);

    assert_eq!(game.attempt_move("b", 2), Err(GameError::GameOver));
    assert_eq!(game.quit("a"), Err(GameError::GameNotQuittable));
    assert_eq!(game.status(), GameStatus::Done);
    assert_eq!(game.moves().len(), 3);
}

#[test]
fn test_quit_by_non_participant() {
    let mut game = new_game(4, "a", "b");
    assert_eq!(
        game.quit("eve"),
        Err(GameError::UnknownPlayer("eve".to_string()))
    );
    assert_eq!(game.status(), GameStatus::InProgress);
    assert!(game.moves().is_empty());
}

#[test]
fn test_quit_is_logged_and_final() {
    let mut game = new_game(4, "a", "b");
    game.attempt_move("a", 1).unwrap();
    game.quit("b").unwrap();

    assert_eq!(
        game.moves().last(),
        Some(&Action::Quit {
            player: "b".to_string()
        })
    );
    assert_eq!(game.quit("b"), Err(GameError::GameNotQuittable));
    assert_eq!(game.attempt_move("b", 1), Err(GameError::GameOver));
}

#[test]
fn test_replay_matches_live_game() {
    let mut live = new_game(4, "a", "b");
    for column in [1, 2, 2, 3, 3, 4, 3] {
        let player = live.to_move().unwrap().to_string();
        live.attempt_move(&player, column).unwrap();
    }

    let replayed = Game::replay(
        "test".to_string(),
        4,
        ["a".to_string(), "b".to_string()],
        live.moves(),
    )
    .unwrap();
    assert_eq!(replayed, live);
}

#[test]
fn test_status_reaches_done_once_for_any_alternating_sequence() {
    // Play column-by-column until the game ends, on several board sizes.
    for size in 2..=6 {
        let mut game = new_game(size, "a", "b");
        let mut transitions = 0;
        let mut column = 1;
        while game.status() == GameStatus::InProgress {
            let player = game.to_move().unwrap().to_string();
            match game.attempt_move(&player, column) {
                Ok(outcome) => {
                    if outcome.status == GameStatus::Done {
                        transitions += 1;
                    }
                }
                Err(GameError::ColumnFull(_)) => column += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(transitions, 1, "size {}", size);
        assert!(game.attempt_move("a", 1).is_err());
        assert_eq!(game.status(), GameStatus::Done);
    }
}
