//! Integration tests for league storage, the reporting flow and CSV export.

use chrono::NaiveDate;
use std::cell::RefCell;
use tennis_league_web::{
    amend_outcome, export_matches_csv, preview, submit_outcome, Category, League,
    MatchNotification, MatchStorage, Notifier, NotifyError, PlayerId, ScoreSheet, SetScore,
    StorageError, Trophy,
};

/// Remembers what it was asked to send; optionally fails every send.
#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<MatchNotification>>,
    fail: bool,
}

impl Notifier for RecordingNotifier {
    fn notify_opponent(&self, n: &MatchNotification) -> Result<(), NotifyError> {
        self.sent.borrow_mut().push(n.clone());
        if self.fail {
            return Err(NotifyError("smtp down".to_string()));
        }
        Ok(())
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
}

fn sheet(s1: (u8, u8), s2: (u8, u8)) -> ScoreSheet {
    ScoreSheet::new(SetScore::new(s1.0, s1.1), SetScore::new(s2.0, s2.1))
}

/// League with two approved Silver players.
fn league_with_pair() -> (League, PlayerId, PlayerId) {
    let mut league = League::new();
    let ana = league
        .register_player("Ana", "ana@club.test", Category::Silver)
        .unwrap();
    let ben = league
        .register_player("Ben", "ben@club.test", Category::Silver)
        .unwrap();
    league.approve_player(ana).unwrap();
    league.approve_player(ben).unwrap();
    (league, ana, ben)
}

#[test]
fn registration_is_pending_until_approved() {
    let mut league = League::new();
    let id = league
        .register_player("  Carla ", "carla@club.test", Category::Gold)
        .unwrap();
    let p = league.player(id).unwrap();
    assert_eq!(p.name, "Carla");
    assert!(!p.approved);
    assert!(league.players_in(Category::Gold).is_empty());

    league.approve_player(id).unwrap();
    assert_eq!(league.players_in(Category::Gold).len(), 1);
    assert_eq!(league.approve_player(id), Err(StorageError::AlreadyApproved(id)));
}

#[test]
fn registration_rejects_bad_input() {
    let mut league = League::new();
    league
        .register_player("Ana", "ana@club.test", Category::Bronze)
        .unwrap();
    assert_eq!(
        league.register_player("Ana Two", "ANA@club.test", Category::Bronze),
        Err(StorageError::DuplicatePlayerEmail)
    );
    assert_eq!(
        league.register_player("   ", "x@club.test", Category::Bronze),
        Err(StorageError::InvalidName)
    );
    assert_eq!(
        league.register_player("Dan", "not-an-email", Category::Bronze),
        Err(StorageError::InvalidEmail)
    );
}

#[test]
fn only_pending_players_can_be_removed() {
    let mut league = League::new();
    let pending = league
        .register_player("Eve", "eve@club.test", Category::Bronze)
        .unwrap();
    let (mut league2, ana, _) = league_with_pair();

    league.remove_player(pending).unwrap();
    assert!(league.player(pending).is_none());
    assert_eq!(league2.remove_player(ana), Err(StorageError::AlreadyApproved(ana)));
}

#[test]
fn ladder_orders_by_points_then_name() {
    let (mut league, ana, ben) = league_with_pair();
    league.player_mut(ben).unwrap().pro_master_points = 40;
    league.player_mut(ana).unwrap().pro_master_points = 10;
    let ladder: Vec<_> = league
        .players_in(Category::Silver)
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ladder, vec![ben, ana]);

    league.set_category(ben, Category::Gold).unwrap();
    assert_eq!(league.players_in(Category::Silver).len(), 1);
    assert_eq!(league.players_in(Category::Gold)[0].id, ben);
}

#[test]
fn trophies_go_to_approved_players_only() {
    let (mut league, ana, _) = league_with_pair();
    let pending = league
        .register_player("Finn", "finn@club.test", Category::Bronze)
        .unwrap();
    let trophy = Trophy {
        title: "Silver champion".to_string(),
        season: "2026 spring".to_string(),
        awarded_at: chrono::Utc::now(),
    };
    league.assign_trophy(ana, trophy.clone()).unwrap();
    assert_eq!(league.player(ana).unwrap().trophies, vec![trophy.clone()]);
    assert_eq!(
        league.assign_trophy(pending, trophy),
        Err(StorageError::PlayerNotApproved(pending))
    );
}

#[test]
fn storage_requires_two_distinct_approved_players() {
    let (mut league, ana, ben) = league_with_pair();
    let pending = league
        .register_player("Gus", "gus@club.test", Category::Silver)
        .unwrap();
    assert_eq!(
        league.create_match(ana, ana, "6-0 6-0", false, day(1)),
        Err(StorageError::SamePlayer)
    );
    assert_eq!(
        league.create_match(ana, pending, "6-0 6-0", false, day(1)),
        Err(StorageError::PlayerNotApproved(pending))
    );
    assert!(league.create_match(ana, ben, "6-0 6-0", false, day(1)).is_ok());
    assert_eq!(league.matches.len(), 1);
}

#[test]
fn submit_stores_and_notifies_the_opponent() {
    let (mut league, ana, ben) = league_with_pair();
    let notifier = RecordingNotifier::default();
    let outcome = preview(&sheet((6, 4), (6, 3)), ana, ben).unwrap();

    let id = submit_outcome(&mut league, &notifier, &outcome, day(3)).unwrap();

    let stored = league.match_record(id).unwrap();
    assert_eq!(stored.winner_id, ana);
    assert_eq!(stored.loser_id, ben);
    assert_eq!(stored.score, "6-4 6-3");
    assert!(!stored.is_draw);
    assert_eq!(stored.played_at, day(3));

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, "ben@club.test");
    assert_eq!(sent[0].reporter_name, "Ana");
    assert!(!sent[0].recipient_won);
    assert!(sent[0].body().contains("a loss for you"));
}

#[test]
fn opponent_is_notified_when_reporter_lost() {
    let (mut league, ana, ben) = league_with_pair();
    let notifier = RecordingNotifier::default();
    let outcome = preview(&sheet((2, 6), (3, 6)), ana, ben).unwrap();

    submit_outcome(&mut league, &notifier, &outcome, day(4)).unwrap();

    let sent = notifier.sent.borrow();
    assert_eq!(sent[0].to_email, "ben@club.test");
    assert!(sent[0].recipient_won);
    assert_eq!(sent[0].score, "6-2 6-3");
}

#[test]
fn draw_is_stored_with_reporter_as_winner_id() {
    let (mut league, ana, ben) = league_with_pair();
    let notifier = RecordingNotifier::default();
    let outcome = preview(&sheet((6, 0), (0, 6)), ana, ben).unwrap();

    let id = submit_outcome(&mut league, &notifier, &outcome, day(5)).unwrap();

    let stored = league.match_record(id).unwrap();
    assert!(stored.is_draw);
    assert_eq!(stored.winner_id, ana);
    assert_eq!(league.record_for(ana).draws, 1);
    assert_eq!(league.record_for(ben).draws, 1);
    assert!(notifier.sent.borrow()[0].body().contains("a draw"));
}

#[test]
fn notification_failure_keeps_the_stored_result() {
    let (mut league, ana, ben) = league_with_pair();
    let notifier = RecordingNotifier {
        fail: true,
        ..Default::default()
    };
    let outcome = preview(&sheet((6, 1), (6, 1)), ana, ben).unwrap();

    let id = submit_outcome(&mut league, &notifier, &outcome, day(6)).unwrap();

    assert!(league.match_record(id).is_some());
    assert_eq!(notifier.sent.borrow().len(), 1);
}

#[test]
fn storage_failure_sends_nothing() {
    let (mut league, ana, _) = league_with_pair();
    let stranger = uuid::Uuid::new_v4();
    let notifier = RecordingNotifier::default();
    let outcome = preview(&sheet((6, 1), (6, 1)), ana, stranger).unwrap();

    assert_eq!(
        submit_outcome(&mut league, &notifier, &outcome, day(6)),
        Err(StorageError::PlayerNotFound(stranger))
    );
    assert!(league.matches.is_empty());
    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn amend_replaces_the_stored_result() {
    let (mut league, ana, ben) = league_with_pair();
    let notifier = RecordingNotifier::default();
    let first = preview(&sheet((6, 4), (6, 3)), ana, ben).unwrap();
    let id = submit_outcome(&mut league, &notifier, &first, day(7)).unwrap();

    let corrected = preview(&sheet((4, 6), (3, 6)), ana, ben).unwrap();
    amend_outcome(&mut league, id, &corrected, day(8)).unwrap();

    let stored = league.match_record(id).unwrap();
    assert_eq!(stored.winner_id, ben);
    assert_eq!(stored.score, "6-4 6-3");
    assert_eq!(stored.played_at, day(8));
    assert!(stored.updated_at >= stored.created_at);
    assert_eq!(league.record_for(ana).losses, 1);
    assert_eq!(league.record_for(ben).wins, 1);

    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        amend_outcome(&mut league, missing, &corrected, day(8)),
        Err(StorageError::MatchNotFound(missing))
    );
}

#[test]
fn matches_for_lists_most_recent_first() {
    let (mut league, ana, ben) = league_with_pair();
    league.create_match(ana, ben, "6-0 6-0", false, day(2)).unwrap();
    league.create_match(ben, ana, "6-3 6-3", false, day(9)).unwrap();
    let dates: Vec<_> = league.matches_for(ana).iter().map(|m| m.played_at).collect();
    assert_eq!(dates, vec![day(9), day(2)]);
    let record = league.record_for(ana);
    assert_eq!((record.wins, record.losses, record.played()), (1, 1, 2));
}

#[test]
fn csv_export_uses_names_and_play_dates() {
    let (mut league, ana, ben) = league_with_pair();
    league.create_match(ben, ana, "7-5 6-4", false, day(12)).unwrap();
    league.create_match(ana, ben, "6-0 0-6", true, day(10)).unwrap();

    let mut buf = Vec::new();
    export_matches_csv(&league, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "played_at,winner,loser,score,draw");
    assert_eq!(lines[1], "2026-05-10,Ana,Ben,6-0 0-6,true");
    assert_eq!(lines[2], "2026-05-12,Ben,Ana,7-5 6-4,false");
}

#[test]
fn not_found_errors_are_told_apart_from_rejections() {
    let (mut league, ana, _) = league_with_pair();
    let stranger = uuid::Uuid::new_v4();

    let missing = [
        league.approve_player(stranger).unwrap_err(),
        league.set_category(stranger, Category::Gold).unwrap_err(),
        league
            .assign_trophy(
                stranger,
                Trophy {
                    title: "Cup".to_string(),
                    season: "2026".to_string(),
                    awarded_at: chrono::Utc::now(),
                },
            )
            .unwrap_err(),
        league.remove_player(stranger).unwrap_err(),
        StorageError::MatchNotFound(stranger),
    ];
    for e in &missing {
        assert!(e.is_not_found(), "{:?}", e);
    }

    assert!(!league.approve_player(ana).unwrap_err().is_not_found());
    assert!(!StorageError::SamePlayer.is_not_found());
    assert!(!StorageError::PlayerNotApproved(ana).is_not_found());
}

#[test]
fn players_are_found_by_email_ignoring_case() {
    let (league, ana, _) = league_with_pair();
    assert_eq!(league.player_by_email(" ANA@club.test ").map(|p| p.id), Some(ana));
    assert!(league.player_by_email("nobody@club.test").is_none());
}
