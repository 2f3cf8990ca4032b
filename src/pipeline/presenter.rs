//! Presentation seam between the orchestrator and whatever renders output.
//!
//! The core emits three event kinds plus a refreshed profile list; it has no
//! opinion on how they are rendered. The binary installs a console
//! implementation; tests install a recording mock.

// ---------------------------------------------------------------------------
// Presenter trait
// ---------------------------------------------------------------------------

/// Receives user-facing events from the orchestrator.
pub trait Presenter {
    /// An instruction the user should act on (e.g. the enrollment phrase).
    fn prompt(&mut self, text: &str);

    /// An informational status message.
    fn info(&mut self, message: &str);

    /// A human-readable error message.
    fn error(&mut self, message: &str);

    /// The full, name-sorted profile list — sent after every successful
    /// enrollment.
    fn profiles(&mut self, names: &[String]);
}

// Compile-time assertion: Box<dyn Presenter> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Presenter>) {}
};

// ---------------------------------------------------------------------------
// ConsolePresenter
// ---------------------------------------------------------------------------

/// Prints events to stdout/stderr.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn prompt(&mut self, text: &str) {
        println!(">> {text}");
    }

    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn profiles(&mut self, names: &[String]) {
        println!("enrolled voices ({}):", names.len());
        for name in names {
            println!("  - {name}");
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingPresenter  (test-only)
// ---------------------------------------------------------------------------

/// Captures every event for later assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub prompts: Vec<String>,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
    pub profile_lists: Vec<Vec<String>>,
}

#[cfg(test)]
impl Presenter for RecordingPresenter {
    fn prompt(&mut self, text: &str) {
        self.prompts.push(text.to_string());
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn profiles(&mut self, names: &[String]) {
        self.profile_lists.push(names.to_vec());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_presenter_collects_events() {
        let mut p = RecordingPresenter::default();
        p.prompt("say something");
        p.info("done");
        p.error("boom");
        p.profiles(&["alice".to_string(), "bob".to_string()]);

        assert_eq!(p.prompts, vec!["say something"]);
        assert_eq!(p.infos, vec!["done"]);
        assert_eq!(p.errors, vec!["boom"]);
        assert_eq!(p.profile_lists.len(), 1);
        assert_eq!(p.profile_lists[0], vec!["alice", "bob"]);
    }

    #[test]
    fn console_presenter_is_constructible_as_trait_object() {
        let _p: Box<dyn Presenter> = Box::new(ConsolePresenter);
    }
}
