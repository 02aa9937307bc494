use merge_2048::config::GameConfig;
use merge_2048::engine::{Move, TileId};
use merge_2048::game::Game;
use merge_2048::serialization::{FileStore, KeyValueStore};
use merge_2048::session::Phase;
use merge_2048::source::{RngSource, SequenceSource, SequentialIds};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Game<FileStore, SequenceSource, SequentialIds> {
    Game::open(FileStore::new(dir.path()), GameConfig::default(), SequenceSource::new([0.0]), SequentialIds::new())
}

#[test]
fn game_resumes_from_disk() {
    let dir = TempDir::new().unwrap();
    let mut game = open(&dir);
    assert_eq!(game.board().values()[0], [2, 2, 0, 0]);
    assert!(dir.path().join("2048-game-state").exists());

    let res = game.request_move(Move::Left).unwrap();
    assert_eq!(res.gained, 4);
    assert!(game.is_busy());
    game.animation_finished();
    let board = game.board().clone();
    drop(game);

    let mut reopened = open(&dir);
    assert_eq!(reopened.board(), &board);
    assert_eq!(reopened.score(), 4);
    assert_eq!(reopened.best(), 4);
    assert!(!reopened.is_busy());

    assert!(reopened.request_undo());
    assert_eq!(reopened.board().values()[0], [2, 2, 0, 0]);
    assert_eq!(reopened.score(), 0);
    assert_eq!(reopened.best(), 4);
}

#[test]
fn fresh_ids_continue_after_resume() {
    let dir = TempDir::new().unwrap();
    let mut game = open(&dir);
    game.request_move(Move::Left).unwrap();
    assert_eq!(game.board().max_id(), Some(TileId(4)));
    drop(game);

    let mut reopened = open(&dir);
    reopened.request_move(Move::Right).unwrap();
    assert!(reopened.board().is_well_formed());
    assert_eq!(reopened.board().max_id(), Some(TileId(5)));
}

#[test]
fn corrupt_state_file_starts_over_but_keeps_best() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    store.set("2048-best", "2048").unwrap();
    store.set("2048-game-state", "{\"board\": [[1, 2]]").unwrap();

    let game = open(&dir);
    assert_eq!(game.phase(), Phase::InProgress);
    assert_eq!(game.score(), 0);
    assert_eq!(game.best(), 2048);
    assert_eq!(game.board().tile_count(), 2);

    let raw = store.get("2048-game-state").unwrap().unwrap();
    assert!(raw.contains("\"undoStack\""));
}

#[test]
fn leaderboard_persists_across_games() {
    let dir = TempDir::new().unwrap();
    let mut game = open(&dir);
    game.request_move(Move::Left).unwrap();
    assert_eq!(game.submit_score("ada"), Some(0));
    game.request_new_game();
    assert_eq!(game.submit_score(""), Some(1));
    drop(game);

    let reopened = open(&dir);
    let lb = reopened.leaderboard();
    let names: Vec<_> = lb.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["ada", "Anonymous"]);
    assert_eq!(lb.records()[0].score, 4);
    assert_eq!(lb.records()[1].score, 0);
}

#[test]
fn seeded_game_plays_to_the_end() {
    let dir = TempDir::new().unwrap();
    let config = GameConfig::default();
    let limit = config.undo_limit;
    let mut game = Game::open(FileStore::new(dir.path()), config, RngSource::seeded(2048), SequentialIds::new());

    let mut total = 0;
    let mut attempts = 0;
    while !game.is_game_over() && attempts < 100_000 {
        let mv = Move::ALL[attempts % 4];
        attempts += 1;
        if let Some(res) = game.request_move(mv) {
            total += res.gained;
            game.animation_finished();
        }
        assert!(game.session().undo_len() <= limit);
        assert!(game.board().is_well_formed());
    }

    assert!(game.is_game_over());
    assert!(game.board().is_full());
    assert_eq!(game.score(), total);
    assert_eq!(game.best(), total);
    assert!(game.request_move(Move::Left).is_none());

    // Undo leaves the game-over state behind.
    assert!(game.request_undo());
    assert_eq!(game.phase(), Phase::InProgress);
    assert_eq!(game.best(), total);
}
