//! The permalink command.
//! Uses trait objects for every collaborator so tests can run without git or a display.

use crate::domain::{resolve_permalink, LineRange, Permalink, PermalinkError, Selection};
use crate::ports::{Clipboard, Notifier, RepositoryLookup};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// How a command invocation ended, short of an unexpected error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A link was produced; `copied` is false when the clipboard was skipped or failed.
    Linked { permalink: Permalink, copied: bool },
    /// A precondition failed and was reported to the user.
    Rejected,
}

pub struct App {
    lookup: Box<dyn RepositoryLookup>,
    clipboard: Option<Box<dyn Clipboard>>,
    notifier: Box<dyn Notifier>,
    json: bool,
}

impl App {
    pub fn new(
        lookup: Box<dyn RepositoryLookup>,
        clipboard: Option<Box<dyn Clipboard>>,
        notifier: Box<dyn Notifier>,
        json: bool,
    ) -> Self {
        Self {
            lookup,
            clipboard,
            notifier,
            json,
        }
    }

    /// Resolve the link for `lines` of `file`, print it to `out` and copy it.
    ///
    /// Precondition failures are reported through the notifier and returned as
    /// [`Outcome::Rejected`]; anything else is an error.
    pub fn copy_permalink<W: Write>(
        &mut self,
        file: &Path,
        lines: LineRange,
        out: &mut W,
    ) -> Result<Outcome> {
        let permalink = match self.resolve(file, lines) {
            Ok(permalink) => permalink,
            Err(e) if e.is_precondition() => {
                debug!(error = %e, "permalink rejected");
                self.notifier.error(&e.to_string());
                return Ok(Outcome::Rejected);
            }
            Err(e) => return Err(e.into()),
        };

        let url = permalink.url();
        if self.json {
            writeln!(out, "{}", permalink.to_json()).context("Failed to write permalink")?;
        } else {
            writeln!(out, "{}", url).context("Failed to write permalink")?;
        }

        let copied = match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.write_text(&url) {
                Ok(()) => {
                    self.notifier.info("Permalink copied to clipboard");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "clipboard write failed");
                    self.notifier
                        .error(&format!("Failed to copy permalink to clipboard: {}", e));
                    false
                }
            },
            None => false,
        };

        Ok(Outcome::Linked { permalink, copied })
    }

    fn resolve(&self, file: &Path, lines: LineRange) -> Result<Permalink, PermalinkError> {
        let file = std::fs::canonicalize(file)
            .ok()
            .filter(|path| path.is_file())
            .ok_or_else(|| PermalinkError::NoActiveFile {
                path: file.to_path_buf(),
            })?;

        let selection = Selection::new(file, lines);
        debug!(file = %selection.file.display(), fragment = %selection.fragment(), "resolving permalink");
        resolve_permalink(self.lookup.as_ref(), &selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Head, Remote, RepositorySnapshot, RepositoryState, WorkingTreeChange};
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct FakeLookup {
        snapshot: Option<RepositorySnapshot>,
        fail: bool,
    }

    impl RepositoryLookup for FakeLookup {
        fn repository_for(&self, _file: &Path) -> Result<Option<RepositorySnapshot>> {
            if self.fail {
                return Err(anyhow!("git exploded"));
            }
            Ok(self.snapshot.clone())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingClipboard {
        text: Rc<RefCell<Option<String>>>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                return Err(anyhow!("no display"));
            }
            *self.text.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        infos: Rc<RefCell<Vec<String>>>,
        errors: Rc<RefCell<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn info(&self, message: &str) {
            self.infos.borrow_mut().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        root: PathBuf,
        file: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        let file = root.join("src").join("lib.rs");
        fs::write(&file, "pub fn answer() -> u32 {\n    42\n}\n").unwrap();
        Fixture {
            _dir: dir,
            root,
            file,
        }
    }

    fn snapshot(root: &Path, changes: Vec<WorkingTreeChange>) -> RepositorySnapshot {
        RepositorySnapshot {
            root: root.to_path_buf(),
            state: RepositoryState {
                remotes: vec![Remote {
                    name: "origin".to_string(),
                    fetch_url: Some("https://github.com/foo/bar.git".to_string()),
                    push_url: None,
                }],
                working_tree_changes: changes,
                head: Some(Head {
                    name: Some("main".to_string()),
                    commit: Some("0123abcd".to_string()),
                }),
            },
        }
    }

    fn app(
        lookup: FakeLookup,
        clipboard: Option<RecordingClipboard>,
        notifier: &RecordingNotifier,
        json: bool,
    ) -> App {
        App::new(
            Box::new(lookup),
            clipboard.map(|c| Box::new(c) as Box<dyn Clipboard>),
            Box::new(notifier.clone()),
            json,
        )
    }

    #[test]
    fn prints_and_copies_link() {
        let fx = fixture();
        let clipboard = RecordingClipboard::default();
        let notifier = RecordingNotifier::default();
        let lookup = FakeLookup {
            snapshot: Some(snapshot(&fx.root, vec![])),
            fail: false,
        };
        let mut app = app(lookup, Some(clipboard.clone()), &notifier, false);

        let mut out = Vec::new();
        let outcome = app
            .copy_permalink(&fx.file, LineRange { start: 2, end: 3 }, &mut out)
            .unwrap();

        let expected = "https://github.com/foo/bar/blob/0123abcd/src/lib.rs#L2-L3";
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", expected));
        assert_eq!(clipboard.text.borrow().as_deref(), Some(expected));
        assert_eq!(*notifier.infos.borrow(), vec!["Permalink copied to clipboard".to_string()]);
        assert!(matches!(outcome, Outcome::Linked { copied: true, .. }));
    }

    #[test]
    fn json_output() {
        let fx = fixture();
        let notifier = RecordingNotifier::default();
        let lookup = FakeLookup {
            snapshot: Some(snapshot(&fx.root, vec![])),
            fail: false,
        };
        let mut app = app(lookup, None, &notifier, true);

        let mut out = Vec::new();
        app.copy_permalink(&fx.file, LineRange::default(), &mut out)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["url"], "https://github.com/foo/bar/blob/0123abcd/src/lib.rs#L1");
        assert_eq!(value["repository"], "bar");
    }

    #[test]
    fn modified_file_is_reported_not_raised() {
        let fx = fixture();
        let clipboard = RecordingClipboard::default();
        let notifier = RecordingNotifier::default();
        let change = WorkingTreeChange {
            path: fx.file.clone(),
        };
        let lookup = FakeLookup {
            snapshot: Some(snapshot(&fx.root, vec![change])),
            fail: false,
        };
        let mut app = app(lookup, Some(clipboard.clone()), &notifier, false);

        let mut out = Vec::new();
        let outcome = app
            .copy_permalink(&fx.file, LineRange::default(), &mut out)
            .unwrap();

        assert_eq!(outcome, Outcome::Rejected);
        assert!(out.is_empty());
        assert!(clipboard.text.borrow().is_none());
        let errors = notifier.errors.borrow();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("lib.rs"));
    }

    #[test]
    fn missing_file_is_rejected() {
        let notifier = RecordingNotifier::default();
        let lookup = FakeLookup {
            snapshot: None,
            fail: false,
        };
        let mut app = app(lookup, None, &notifier, false);

        let outcome = app
            .copy_permalink(
                Path::new("/definitely/not/here.rs"),
                LineRange::default(),
                &mut Vec::new(),
            )
            .unwrap();

        assert_eq!(outcome, Outcome::Rejected);
        assert!(notifier.errors.borrow()[0].contains("No such file"));
    }

    #[test]
    fn backend_failure_is_raised() {
        let fx = fixture();
        let notifier = RecordingNotifier::default();
        let lookup = FakeLookup {
            snapshot: None,
            fail: true,
        };
        let mut app = app(lookup, None, &notifier, false);

        let err = app
            .copy_permalink(&fx.file, LineRange::default(), &mut Vec::new())
            .unwrap_err();

        assert!(err.to_string().contains("git exploded"));
        assert!(notifier.errors.borrow().is_empty());
    }

    #[test]
    fn clipboard_failure_is_reported_separately() {
        let fx = fixture();
        let clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();
        let lookup = FakeLookup {
            snapshot: Some(snapshot(&fx.root, vec![])),
            fail: false,
        };
        let mut app = app(lookup, Some(clipboard), &notifier, false);

        let mut out = Vec::new();
        let outcome = app
            .copy_permalink(&fx.file, LineRange::default(), &mut out)
            .unwrap();

        assert!(matches!(outcome, Outcome::Linked { copied: false, .. }));
        assert!(!out.is_empty());
        assert!(notifier.errors.borrow()[0].contains("no display"));
    }
}
