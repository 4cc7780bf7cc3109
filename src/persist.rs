//! File persistence for trk.
//!
//! The board is saved as a row-oriented text file with the header
//! `id,type,name,status,description,epic,duration,startTime`: the epic
//! column is empty for non-subtasks, duration is integer minutes, and
//! startTime is a local `%Y-%m-%dT%H:%M:%S` timestamp (both empty when
//! absent). Legacy rows with fewer columns load fine for tasks and epics.
//! A malformed row is skipped with a warning, never fatal.
//!
//! Recency history ids live in a JSON sidecar next to the data file so
//! `trk history` stays meaningful across short-lived CLI invocations.
//!
//! Writes go through a temp file in the same directory followed by an
//! atomic rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use tracing::warn;

use crate::board::Board;
use crate::error::{Error, Result};
use crate::model::{Kind, Status, WorkItem, TIME_FORMAT};

/// Header of the persisted row format.
pub const HEADER: &str = "id,type,name,status,description,epic,duration,startTime";

/// Sidecar path holding the history id sequence.
pub fn history_path(data_path: &Path) -> PathBuf {
    data_path.with_extension("history.json")
}

/// Save the full board: the row file plus the history sidecar.
pub fn save(board: &Board, path: &Path) -> Result<()> {
    let mut out = String::from(HEADER);
    out.push('\n');
    for item in board
        .all_tasks()
        .into_iter()
        .chain(board.all_epics())
        .chain(board.all_subtasks())
    {
        out.push_str(&to_row(item));
        out.push('\n');
    }
    write_atomic(path, out.as_bytes())?;

    let history = serde_json::to_vec(&board.history_ids())?;
    write_atomic(&history_path(path), &history)?;
    Ok(())
}

/// Load a board from `path`. A missing file yields an empty board. Epics
/// are installed before subtasks so linkage resolves regardless of row
/// order; every loaded epic is re-rolled from its loaded children, the
/// schedule index is rebuilt, and future ids exceed every loaded id.
pub fn load(path: &Path) -> Result<Board> {
    let mut board = Board::new();
    if !path.exists() {
        return Ok(board);
    }

    let content = fs::read_to_string(path)?;
    let mut subtask_rows = Vec::new();
    let mut epic_ids = Vec::new();

    for line in content.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Ok(item) => match item.kind_of() {
                Kind::Subtask => subtask_rows.push(item),
                Kind::Epic => {
                    epic_ids.push(item.id);
                    board.restore_item(item);
                }
                Kind::Task => board.restore_item(item),
            },
            Err(reason) => warn!(row = line, %reason, "skipping malformed row"),
        }
    }

    for subtask in subtask_rows {
        let Some(epic_id) = subtask.epic_id() else {
            continue;
        };
        if board.item(epic_id).map(WorkItem::kind_of) != Some(Kind::Epic) {
            warn!(
                subtask = subtask.id,
                epic = epic_id,
                "skipping subtask with missing epic"
            );
            continue;
        }
        let id = subtask.id;
        board.restore_item(subtask);
        board.link_subtask(epic_id, id);
    }
    for epic_id in epic_ids {
        board.refresh_epic(epic_id);
    }

    load_history(&mut board, &history_path(path));
    Ok(board)
}

fn load_history(board: &mut Board, sidecar: &Path) {
    let Ok(raw) = fs::read(sidecar) else {
        return;
    };
    match serde_json::from_slice::<Vec<u32>>(&raw) {
        Ok(ids) => board.replay_history(&ids),
        Err(err) => warn!(path = %sidecar.display(), %err, "ignoring unreadable history sidecar"),
    }
}

fn to_row(item: &WorkItem) -> String {
    let epic = item
        .epic_id()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let duration = item
        .duration
        .map(|d| d.num_minutes().to_string())
        .unwrap_or_default();
    let start = item
        .start
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default();

    format!(
        "{},{},{},{},{},{},{},{}",
        item.id,
        item.kind_name(),
        field(&item.title),
        item.status.as_str(),
        field(&item.description),
        epic,
        duration,
        start
    )
}

/// The row format is positional, so free text cannot carry the delimiter.
fn field(text: &str) -> String {
    text.replace(',', ";")
}

fn parse_row(line: &str) -> std::result::Result<WorkItem, String> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < 5 {
        return Err(format!("expected at least 5 columns, got {}", parts.len()));
    }

    let id: u32 = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("invalid id '{}'", parts[0]))?;
    let kind = parts[1].trim();
    let title = parts[2].to_string();
    let status: Status = parts[3]
        .parse()
        .map_err(|_| format!("invalid status '{}'", parts[3]))?;
    let description = parts[4].to_string();

    let column = |idx: usize| parts.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty());
    // Duration is a non-negative span; a negative or out-of-range minute
    // count is a malformed row, not a panic.
    let duration = column(6)
        .map(|s| {
            s.parse::<i64>()
                .ok()
                .filter(|&minutes| minutes >= 0)
                .and_then(Duration::try_minutes)
                .ok_or_else(|| format!("invalid duration '{s}'"))
        })
        .transpose()?;
    let start = column(7).map(parse_time).transpose()?;

    match kind {
        "TASK" => {
            let mut task = WorkItem::new_task(id, title, description, status);
            task.duration = duration;
            task.start = start;
            Ok(task)
        }
        // Epic aggregates are recomputed from children after load; any
        // persisted duration/start on the row is informational only.
        "EPIC" => Ok(WorkItem::new_epic(id, title, description)),
        "SUBTASK" => {
            let epic_id: u32 = column(5)
                .ok_or_else(|| "subtask row without epic id".to_string())?
                .parse()
                .map_err(|_| format!("invalid epic id '{}'", parts[5]))?;
            let mut subtask = WorkItem::new_subtask(id, title, description, status, epic_id);
            subtask.duration = duration;
            subtask.start = start;
            Ok(subtask)
        }
        other => Err(format!("unknown item type '{other}'")),
    }
}

/// Accept timestamps with and without seconds.
fn parse_time(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|_| format!("invalid timestamp '{s}'"))
}

/// Write via temp file + rename so readers never observe a partial file.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir)?;
    }

    let mut temp = match parent {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new_in(".")?,
    };
    temp.write_all(data)?;
    temp.flush()?;
    temp.persist(path)
        .map_err(|_| Error::PersistFailed(path.to_path_buf()))?;
    Ok(())
}
