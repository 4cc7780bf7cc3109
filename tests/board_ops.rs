//! Board-level behavior: admission control, cascades, rollups, history.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use trk::board::Board;
use trk::error::Error;
use trk::model::Status;

fn at(hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 23)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn minutes(m: i64) -> Option<Duration> {
    Some(Duration::minutes(m))
}

#[test]
fn scheduled_tasks_appear_in_time_order() {
    let mut board = Board::new();
    // Created out of time order on purpose.
    let late = board
        .create_task("Afternoon", "", Status::New, minutes(60), Some(at(13, 0)))
        .unwrap();
    let early = board
        .create_task("Morning", "", Status::New, minutes(120), Some(at(10, 0)))
        .unwrap();

    let plan: Vec<u32> = board.prioritized().iter().map(|item| item.id).collect();
    assert_eq!(plan, vec![early, late]);
}

#[test]
fn overlapping_create_fails_and_changes_nothing() {
    let mut board = Board::new();
    let first = board
        .create_task("First", "", Status::New, minutes(120), Some(at(10, 0)))
        .unwrap();
    board
        .create_task("Second", "", Status::New, minutes(60), Some(at(13, 0)))
        .unwrap();

    let before_count = board.len();
    let before_plan: Vec<u32> = board.prioritized().iter().map(|item| item.id).collect();

    // 11:00-12:00 sits inside 10:00-12:00.
    let result = board.create_task("Clash", "", Status::New, minutes(60), Some(at(11, 0)));
    match result {
        Err(Error::ScheduleConflict { id }) => assert_eq!(id, first),
        other => panic!("expected schedule conflict, got {other:?}"),
    }

    assert_eq!(board.len(), before_count);
    let after_plan: Vec<u32> = board.prioritized().iter().map(|item| item.id).collect();
    assert_eq!(after_plan, before_plan);

    // A rejected create consumes no id.
    let next = board
        .create_task("Free slot", "", Status::New, minutes(30), Some(at(15, 0)))
        .unwrap();
    assert_eq!(next, 3);
}

#[test]
fn touching_endpoints_conflict_on_create() {
    let mut board = Board::new();
    board
        .create_task("Block", "", Status::New, minutes(120), Some(at(10, 0)))
        .unwrap();

    // Ends at exactly 12:00; a 12:00 start shares that instant.
    let result = board.create_task("Back to back", "", Status::New, minutes(60), Some(at(12, 0)));
    assert!(matches!(result, Err(Error::ScheduleConflict { .. })));

    assert!(board
        .create_task("After", "", Status::New, minutes(60), Some(at(12, 1)))
        .is_ok());
}

#[test]
fn update_conflict_leaves_prior_state_untouched() {
    let mut board = Board::new();
    board
        .create_task("Anchor", "", Status::New, minutes(120), Some(at(10, 0)))
        .unwrap();
    let movable = board
        .create_task("Movable", "", Status::New, minutes(60), Some(at(14, 0)))
        .unwrap();

    let mut updated = board.item(movable).cloned().unwrap();
    updated.start = Some(at(10, 30));
    assert!(matches!(
        board.update(updated),
        Err(Error::ScheduleConflict { .. })
    ));

    assert_eq!(board.item(movable).unwrap().start, Some(at(14, 0)));
}

#[test]
fn update_moves_the_schedule_entry() {
    let mut board = Board::new();
    let a = board
        .create_task("A", "", Status::New, minutes(60), Some(at(9, 0)))
        .unwrap();
    let b = board
        .create_task("B", "", Status::New, minutes(60), Some(at(11, 0)))
        .unwrap();

    let mut moved = board.item(a).cloned().unwrap();
    moved.start = Some(at(15, 0));
    board.update(moved).unwrap();

    let plan: Vec<u32> = board.prioritized().iter().map(|item| item.id).collect();
    assert_eq!(plan, vec![b, a]);

    // Clearing the time box removes the item from the plan.
    let mut unscheduled = board.item(a).cloned().unwrap();
    unscheduled.start = None;
    unscheduled.duration = None;
    board.update(unscheduled).unwrap();
    let plan: Vec<u32> = board.prioritized().iter().map(|item| item.id).collect();
    assert_eq!(plan, vec![b]);
}

#[test]
fn update_of_unknown_id_is_not_found() {
    let mut board = Board::new();
    let ghost = trk::model::WorkItem::new_task(42, "ghost", "", Status::New);
    assert!(matches!(board.update(ghost), Err(Error::NotFound(42))));
}

#[test]
fn epic_status_follows_children() {
    let mut board = Board::new();
    let epic = board.create_epic("Release", "");
    assert_eq!(board.item(epic).unwrap().status, Status::New);

    let s1 = board
        .create_subtask("Write notes", "", Status::New, epic, None, None)
        .unwrap();
    let s2 = board
        .create_subtask("Tag build", "", Status::Done, epic, None, None)
        .unwrap();
    assert_eq!(board.item(epic).unwrap().status, Status::InProgress);

    let mut done = board.item(s1).cloned().unwrap();
    done.status = Status::Done;
    board.update(done).unwrap();
    assert_eq!(board.item(epic).unwrap().status, Status::Done);

    // Removing the remaining Done child flips the epic back through the
    // all-New rule once only New children remain.
    board.remove_by_id(s2);
    assert_eq!(board.item(epic).unwrap().status, Status::Done);
    board.remove_by_id(s1);
    assert_eq!(board.item(epic).unwrap().status, Status::New);
}

#[test]
fn epic_time_fields_aggregate_children() {
    let mut board = Board::new();
    let epic = board.create_epic("Sprint", "");
    board
        .create_subtask("am", "", Status::New, epic, minutes(60), Some(at(9, 0)))
        .unwrap();
    board
        .create_subtask("pm", "", Status::New, epic, minutes(90), Some(at(13, 0)))
        .unwrap();

    let item = board.item(epic).unwrap();
    assert_eq!(item.duration, minutes(150));
    assert_eq!(item.start, Some(at(9, 0)));
    assert_eq!(item.end_time(), Some(at(14, 30)));
}

#[test]
fn epic_update_cannot_forge_derived_fields() {
    let mut board = Board::new();
    let epic = board.create_epic("Fixed", "");
    board
        .create_subtask("child", "", Status::New, epic, minutes(30), Some(at(9, 0)))
        .unwrap();

    let mut forged = board.item(epic).cloned().unwrap();
    forged.status = Status::Done;
    forged.start = Some(at(23, 0));
    forged.duration = minutes(999);
    board.update(forged).unwrap();

    let item = board.item(epic).unwrap();
    assert_eq!(item.status, Status::New);
    assert_eq!(item.start, Some(at(9, 0)));
    assert_eq!(item.duration, minutes(30));
}

#[test]
fn subtask_creation_requires_a_live_epic() {
    let mut board = Board::new();
    let task = board
        .create_task("not an epic", "", Status::New, None, None)
        .unwrap();

    assert!(matches!(
        board.create_subtask("s", "", Status::New, 99, None, None),
        Err(Error::EpicNotFound(99))
    ));
    // A task id is not an epic id either.
    assert!(matches!(
        board.create_subtask("s", "", Status::New, task, None, None),
        Err(Error::EpicNotFound(_))
    ));
}

#[test]
fn removing_an_epic_cascades_to_subtasks_everywhere() {
    let mut board = Board::new();
    let epic = board.create_epic("Big", "");
    let s1 = board
        .create_subtask("a", "", Status::New, epic, minutes(60), Some(at(9, 0)))
        .unwrap();
    let s2 = board
        .create_subtask("b", "", Status::New, epic, minutes(60), Some(at(11, 0)))
        .unwrap();

    // Put both subtasks in the history.
    board.get(s1);
    board.get(s2);

    assert!(board.remove_by_id(epic));
    assert!(board.item(epic).is_none());
    assert!(board.item(s1).is_none());
    assert!(board.item(s2).is_none());
    assert!(board.prioritized().is_empty());
    assert!(board.history().is_empty());
}

#[test]
fn removing_a_subtask_rerolls_its_former_parent() {
    let mut board = Board::new();
    let epic = board.create_epic("E", "");
    let done = board
        .create_subtask("done", "", Status::Done, epic, minutes(60), Some(at(9, 0)))
        .unwrap();
    board
        .create_subtask("fresh", "", Status::New, epic, None, None)
        .unwrap();
    assert_eq!(board.item(epic).unwrap().status, Status::InProgress);

    assert!(board.remove_by_id(done));
    let item = board.item(epic).unwrap();
    assert_eq!(item.status, Status::New);
    assert_eq!(item.duration, minutes(0));
    assert_eq!(item.start, None);
    assert_eq!(item.subtask_ids().unwrap().len(), 1);
}

#[test]
fn remove_is_idempotent_for_unknown_ids() {
    let mut board = Board::new();
    assert!(!board.remove_by_id(7));
    let id = board.create_task("t", "", Status::New, None, None).unwrap();
    assert!(board.remove_by_id(id));
    assert!(!board.remove_by_id(id));
}

#[test]
fn get_touches_history_and_removal_scrubs_it() {
    let mut board = Board::new();
    let a = board.create_task("a", "", Status::New, None, None).unwrap();
    let b = board.create_task("b", "", Status::New, None, None).unwrap();

    board.get(a);
    board.get(b);
    board.get(a); // promotes a to most recent

    let ids: Vec<u32> = board.history().iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![b, a]);

    board.remove_by_id(b);
    let ids: Vec<u32> = board.history().iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![a]);

    // Reads through `item` never touch the history.
    board.item(a);
    assert_eq!(board.history().len(), 1);
}

#[test]
fn history_is_capped_at_ten_entries() {
    let mut board = Board::new();
    let mut ids = Vec::new();
    for n in 0..11 {
        ids.push(
            board
                .create_task(format!("t{n}"), "", Status::New, None, None)
                .unwrap(),
        );
    }
    for &id in &ids {
        board.get(id);
    }

    let seen: Vec<u32> = board.history().iter().map(|item| item.id).collect();
    assert_eq!(seen.len(), 10);
    assert_eq!(seen, ids[1..].to_vec());
}

#[test]
fn clear_subtasks_leaves_rerolled_epics() {
    let mut board = Board::new();
    let epic = board.create_epic("E", "");
    board
        .create_subtask("d", "", Status::Done, epic, minutes(60), Some(at(9, 0)))
        .unwrap();
    assert_eq!(board.item(epic).unwrap().status, Status::Done);

    board.clear_subtasks();
    assert!(board.all_subtasks().is_empty());
    assert!(board.prioritized().is_empty());
    let item = board.item(epic).unwrap();
    assert_eq!(item.status, Status::New);
    assert_eq!(item.duration, minutes(0));
    assert!(item.subtask_ids().unwrap().is_empty());
}

#[test]
fn clear_epics_cascades_and_clear_tasks_spares_others() {
    let mut board = Board::new();
    let task = board
        .create_task("keep?", "", Status::New, minutes(30), Some(at(8, 0)))
        .unwrap();
    let epic = board.create_epic("E", "");
    let sub = board
        .create_subtask("s", "", Status::New, epic, minutes(30), Some(at(10, 0)))
        .unwrap();

    board.clear_epics();
    assert!(board.item(epic).is_none());
    assert!(board.item(sub).is_none());
    assert!(board.item(task).is_some());
    assert_eq!(board.prioritized().len(), 1);

    board.clear_tasks();
    assert!(board.is_empty());
    assert!(board.prioritized().is_empty());
}

#[test]
fn duration_only_items_stay_off_the_plan() {
    let mut board = Board::new();
    let floating = board
        .create_task("floating", "", Status::New, minutes(600), None)
        .unwrap();

    assert!(board.prioritized().is_empty());
    // A ten-hour unscheduled task blocks nothing.
    assert!(board
        .create_task("fixed", "", Status::New, minutes(60), Some(at(9, 0)))
        .is_ok());
    assert!(!board.item(floating).unwrap().is_time_boxed());
}

#[test]
fn admitted_intervals_never_overlap_pairwise() {
    let mut board = Board::new();
    let slots: [(u32, i64); 5] = [(8, 30), (9, 60), (11, 45), (13, 120), (16, 15)];
    for (hour, mins) in slots {
        board
            .create_task(
                format!("slot-{hour}"),
                "",
                Status::New,
                minutes(mins),
                Some(at(hour, 0)),
            )
            .unwrap();
    }

    let plan = board.prioritized();
    for a in &plan {
        for b in &plan {
            if a.id == b.id {
                continue;
            }
            let disjoint =
                a.start.unwrap() > b.end_time().unwrap() || a.end_time().unwrap() < b.start.unwrap();
            assert!(disjoint, "items {} and {} overlap", a.id, b.id);
        }
    }
}
