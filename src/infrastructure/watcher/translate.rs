//! notify event translation
//!
//! Reduces raw notify events to `FsEvent`s. Rename halves are paired by
//! tracker id; directory renames are expanded into one move per file.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};

use crate::domain::entities::FsEvent;

/// How many completed rename trackers to remember for `Both` de-duplication
const PAIRED_HISTORY: usize = 64;

/// First half of a rename waiting for its destination
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFrom {
    tracker: Option<usize>,
    path: PathBuf,
}

/// Stateful notify-to-`FsEvent` translator
#[derive(Debug, Default)]
pub struct Translator {
    pending: Option<PendingFrom>,
    paired: VecDeque<usize>,
    ready: VecDeque<FsEvent>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next translated event, if any
    pub fn pop(&mut self) -> Option<FsEvent> {
        self.ready.pop_front()
    }

    /// Is a rename source still waiting for its destination?
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Give up on a pending rename: the file left the tree
    pub fn flush(&mut self) {
        if let Some(from) = self.pending.take() {
            self.emit_deleted(from.path);
        }
    }

    /// Feed one raw event
    pub fn push(&mut self, event: Event) {
        let tracker = event.attrs.tracker();

        match event.kind {
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                self.flush();
                if let Some(path) = event.paths.into_iter().next() {
                    self.pending = Some(PendingFrom { tracker, path });
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                let Some(to) = event.paths.into_iter().next() else {
                    return;
                };
                match self.take_matching(tracker) {
                    Some(from) => {
                        self.remember_paired(tracker);
                        self.emit_moved(from, to);
                    }
                    None => {
                        self.flush();
                        self.emit_created(to);
                    }
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                if tracker.is_some_and(|t| self.paired.contains(&t)) {
                    return;
                }
                let mut paths = event.paths.into_iter();
                let (Some(from), Some(to)) = (paths.next(), paths.next()) else {
                    return;
                };
                if self.take_matching(tracker).is_none() {
                    self.flush();
                }
                self.remember_paired(tracker);
                self.emit_moved(from, to);
            }
            EventKind::Modify(ModifyKind::Name(_)) | EventKind::Any => {
                self.flush();
                for path in event.paths {
                    if path.exists() {
                        self.emit_created(path);
                    } else {
                        self.emit_deleted(path);
                    }
                }
            }
            EventKind::Create(kind) => {
                self.flush();
                for path in event.paths {
                    let is_dir = kind == CreateKind::Folder || path.is_dir();
                    self.emit(FsEvent::created(path), is_dir);
                }
            }
            EventKind::Modify(_) => {
                self.flush();
                for path in event.paths {
                    let is_dir = path.is_dir();
                    self.emit(FsEvent::modified(path), is_dir);
                }
            }
            EventKind::Remove(kind) => {
                self.flush();
                for path in event.paths {
                    self.emit(FsEvent::deleted(path), kind == RemoveKind::Folder);
                }
            }
            EventKind::Access(_) | EventKind::Other => {}
        }
    }

    fn take_matching(&mut self, tracker: Option<usize>) -> Option<PathBuf> {
        match &self.pending {
            Some(pending) if pending.tracker == tracker => self.pending.take().map(|p| p.path),
            _ => None,
        }
    }

    fn remember_paired(&mut self, tracker: Option<usize>) {
        if let Some(tracker) = tracker {
            if self.paired.len() == PAIRED_HISTORY {
                self.paired.pop_front();
            }
            self.paired.push_back(tracker);
        }
    }

    fn emit(&mut self, event: FsEvent, is_dir: bool) {
        let event = if is_dir { event.for_dir() } else { event };
        self.ready.push_back(event);
    }

    fn emit_deleted(&mut self, path: PathBuf) {
        self.ready.push_back(FsEvent::deleted(path));
    }

    /// Something appeared from outside the tree
    fn emit_created(&mut self, path: PathBuf) {
        if !path.is_dir() {
            self.ready.push_back(FsEvent::created(path));
            return;
        }
        let files = files_below(&path);
        if files.is_empty() {
            self.ready.push_back(FsEvent::created(path).for_dir());
        }
        for file in files {
            self.ready.push_back(FsEvent::created(file));
        }
    }

    fn emit_moved(&mut self, from: PathBuf, to: PathBuf) {
        if !to.is_dir() {
            self.ready.push_back(FsEvent::moved(from, to));
            return;
        }
        let files = files_below(&to);
        if files.is_empty() {
            self.ready.push_back(FsEvent::moved(from.clone(), to.clone()).for_dir());
        }
        for file in files {
            let Ok(relative) = file.strip_prefix(&to) else {
                continue;
            };
            let source = from.join(relative);
            self.ready.push_back(FsEvent::moved(source, file));
        }
    }
}

/// Every non-directory entry below `dir`, in walk order
fn files_below(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| !t.is_dir()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FsEventKind;
    use notify::event::{DataChange, MetadataKind};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |e, p| e.add_path(PathBuf::from(p)))
    }

    fn rename(mode: RenameMode, paths: &[&str], tracker: usize) -> Event {
        event(EventKind::Modify(ModifyKind::Name(mode)), paths).set_tracker(tracker)
    }

    fn drain(t: &mut Translator) -> Vec<FsEvent> {
        std::iter::from_fn(|| t.pop()).collect()
    }

    #[test]
    fn data_change_is_modified() {
        let mut t = Translator::new();
        t.push(event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/nonexistent/r/a.txt"],
        ));
        t.push(event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            &["/nonexistent/r/b.txt"],
        ));
        assert_eq!(
            drain(&mut t),
            vec![
                FsEvent::modified("/nonexistent/r/a.txt"),
                FsEvent::modified("/nonexistent/r/b.txt"),
            ]
        );
    }

    #[test]
    fn create_and_remove() {
        let mut t = Translator::new();
        t.push(event(EventKind::Create(CreateKind::File), &["/nonexistent/r/a"]));
        t.push(event(EventKind::Create(CreateKind::Folder), &["/nonexistent/r/d"]));
        t.push(event(EventKind::Remove(RemoveKind::File), &["/nonexistent/r/a"]));
        t.push(event(EventKind::Remove(RemoveKind::Folder), &["/nonexistent/r/d"]));
        assert_eq!(
            drain(&mut t),
            vec![
                FsEvent::created("/nonexistent/r/a"),
                FsEvent::created("/nonexistent/r/d").for_dir(),
                FsEvent::deleted("/nonexistent/r/a"),
                FsEvent::deleted("/nonexistent/r/d").for_dir(),
            ]
        );
    }

    #[test]
    fn access_events_are_dropped() {
        let mut t = Translator::new();
        t.push(event(
            EventKind::Access(notify::event::AccessKind::Read),
            &["/nonexistent/r/a"],
        ));
        assert!(t.pop().is_none());
    }

    #[test]
    fn from_to_pair_becomes_one_move() {
        let mut t = Translator::new();
        t.push(rename(RenameMode::From, &["/nonexistent/r/a"], 7));
        assert!(t.has_pending());
        assert!(t.pop().is_none());

        t.push(rename(RenameMode::To, &["/nonexistent/r/b"], 7));
        t.push(rename(RenameMode::Both, &["/nonexistent/r/a", "/nonexistent/r/b"], 7));

        assert_eq!(
            drain(&mut t),
            vec![FsEvent::moved("/nonexistent/r/a", "/nonexistent/r/b")]
        );
        assert!(!t.has_pending());
    }

    #[test]
    fn lone_both_becomes_move() {
        let mut t = Translator::new();
        t.push(rename(RenameMode::Both, &["/nonexistent/r/a", "/nonexistent/r/b"], 3));
        assert_eq!(
            drain(&mut t),
            vec![FsEvent::moved("/nonexistent/r/a", "/nonexistent/r/b")]
        );
    }

    #[test]
    fn unpaired_from_becomes_delete_on_flush() {
        let mut t = Translator::new();
        t.push(rename(RenameMode::From, &["/nonexistent/r/a"], 1));
        t.flush();
        assert_eq!(drain(&mut t), vec![FsEvent::deleted("/nonexistent/r/a")]);
    }

    #[test]
    fn unpaired_from_is_flushed_before_next_event() {
        let mut t = Translator::new();
        t.push(rename(RenameMode::From, &["/nonexistent/r/a"], 1));
        t.push(event(
            EventKind::Modify(ModifyKind::Data(DataChange::Any)),
            &["/nonexistent/r/c"],
        ));
        assert_eq!(
            drain(&mut t),
            vec![
                FsEvent::deleted("/nonexistent/r/a"),
                FsEvent::modified("/nonexistent/r/c"),
            ]
        );
    }

    #[test]
    fn mismatched_tracker_does_not_pair() {
        let mut t = Translator::new();
        t.push(rename(RenameMode::From, &["/nonexistent/r/a"], 1));
        t.push(rename(RenameMode::To, &["/nonexistent/r/b"], 2));
        assert_eq!(
            drain(&mut t),
            vec![
                FsEvent::deleted("/nonexistent/r/a"),
                FsEvent::created("/nonexistent/r/b"),
            ]
        );
    }

    #[test]
    fn untracked_rename_halves_pair_when_adjacent() {
        let mut t = Translator::new();
        t.push(event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/nonexistent/r/a"],
        ));
        t.push(event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/nonexistent/r/b"],
        ));
        assert_eq!(
            drain(&mut t),
            vec![FsEvent::moved("/nonexistent/r/a", "/nonexistent/r/b")]
        );
    }

    #[test]
    fn ambiguous_rename_uses_existence() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("here.txt");
        std::fs::write(&present, "x").unwrap();
        let gone = dir.path().join("gone.txt");

        let mut t = Translator::new();
        t.push(
            Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Any)))
                .add_path(present.clone())
                .add_path(gone.clone()),
        );
        assert_eq!(
            drain(&mut t),
            vec![FsEvent::created(present), FsEvent::deleted(gone)]
        );
    }

    #[test]
    fn moved_directory_expands_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let to = dir.path().join("new");
        std::fs::create_dir_all(to.join("sub")).unwrap();
        std::fs::write(to.join("a.txt"), "a").unwrap();
        std::fs::write(to.join("sub/.hidden"), "h").unwrap();
        let from = dir.path().join("old");

        let mut t = Translator::new();
        t.push(
            Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
                .add_path(from.clone())
                .add_path(to.clone()),
        );

        let events = drain(&mut t);
        assert_eq!(
            events,
            vec![
                FsEvent::moved(from.join("a.txt"), to.join("a.txt")),
                FsEvent::moved(from.join("sub/.hidden"), to.join("sub/.hidden")),
            ]
        );
        assert!(events
            .iter()
            .all(|e| matches!(e.kind, FsEventKind::Moved { .. }) && !e.is_dir));
    }

    #[test]
    fn directory_moved_into_tree_becomes_creates() {
        let dir = tempfile::tempdir().unwrap();
        let to = dir.path().join("incoming");
        std::fs::create_dir(&to).unwrap();
        std::fs::write(to.join("x"), "x").unwrap();

        let mut t = Translator::new();
        t.push(
            Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To)))
                .add_path(to.clone())
                .set_tracker(9),
        );
        assert_eq!(drain(&mut t), vec![FsEvent::created(to.join("x"))]);
    }

    #[test]
    fn empty_directory_move_stays_a_directory_event() {
        let dir = tempfile::tempdir().unwrap();
        let to = dir.path().join("empty");
        std::fs::create_dir(&to).unwrap();

        let mut t = Translator::new();
        t.push(
            Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
                .add_path(dir.path().join("was"))
                .add_path(to.clone()),
        );
        let events = drain(&mut t);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_dir);
    }
}
