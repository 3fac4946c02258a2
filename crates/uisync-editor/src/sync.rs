//! Bidirectional sync engine: canvas ↔ source text.
//!
//! - **Text → Canvas**: a code edit reparses the open file, reusing the UIDs
//!   of its last successful parse. A file that fails to parse keeps its last
//!   good tree, so the canvas stays usable while the code is broken.
//!
//! - **Canvas → Text**: an interaction runs the fittest strategy each frame
//!   and applies its commands to the element tree. Every frame starts again
//!   from the tree captured when the interaction began, so commands never
//!   compound. The code is reprinted when the interaction ends, or whenever
//!   it is asked for.

use crate::commands::{CanvasCommand, CanvasOverlay, CommandsOutcome, apply_commands};
use crate::interaction::{CanvasState, InteractionSession, InteractionState};
use crate::snapping::SnappingConfig;
use crate::strategies::{CanvasStrategy, default_strategies, pick_strategy};
use log::{debug, warn};
use uisync_core::metadata::ElementMetadataMap;
use uisync_core::model::{ErrorMessage, ParseSuccess, ParsedTextFile};
use uisync_core::path::ElementPath;
use uisync_core::printer::{PrintOptions, PrintableFile, print_code};
use uisync_core::project::{ProjectContents, ProjectFile, RevisionsState, TextFile};

/// Holds the project and keeps the open file's code and tree in step.
pub struct SyncEngine {
    /// Every file of the project; the open file is the one being edited.
    pub project: ProjectContents,

    pub print_options: PrintOptions,

    /// Live overlay of the current interaction frame.
    pub overlay: CanvasOverlay,

    open_file: String,

    strategies: Vec<Box<dyn CanvasStrategy>>,

    /// The open file as it was when the current interaction started.
    interaction_base: Option<TextFile>,
}

impl SyncEngine {
    /// A project holding just `file_name`, parsed.
    pub fn from_text(file_name: &str, text: &str) -> Result<Self, Vec<ErrorMessage>> {
        let mut engine = Self::new(ProjectContents::new(), file_name);
        engine.set_text(text)?;
        Ok(engine)
    }

    pub fn new(project: ProjectContents, open_file: &str) -> Self {
        Self {
            project,
            print_options: PrintOptions::default(),
            overlay: CanvasOverlay::default(),
            open_file: open_file.to_string(),
            strategies: default_strategies(&SnappingConfig::default()),
            interaction_base: None,
        }
    }

    /// Replace the strategies, e.g. to change snapping settings.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn CanvasStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn open_file(&self) -> &str {
        &self.open_file
    }

    /// Switch the file being edited. Pending tree edits of the previous
    /// file are printed first.
    pub fn set_open_file(&mut self, path: &str) {
        self.flush_to_text();
        self.open_file = path.to_string();
    }

    // ─── Text → Canvas direction ─────────────────────────────────────────

    /// Replace the open file's code and reparse it.
    ///
    /// # Errors
    /// The parser's messages when the code does not parse; the last good
    /// tree stays available through [`Self::parsed`].
    pub fn set_text(&mut self, new_text: &str) -> Result<(), Vec<ErrorMessage>> {
        self.project.update_code(&self.open_file, new_text);
        match self.project.reparse(&self.open_file) {
            Some(ParsedTextFile::Failure(errors)) => {
                warn!(
                    "{} does not parse: {}",
                    self.open_file,
                    errors.first().map_or("", |e| e.message.as_str())
                );
                Err(errors.clone())
            }
            _ => Ok(()),
        }
    }

    // ─── Canvas → Text direction ─────────────────────────────────────────

    /// Apply commands to the open file's tree. Transient commands only set
    /// the overlay.
    pub fn apply_commands(&mut self, commands: &[CanvasCommand]) -> CommandsOutcome {
        let outcome = apply_commands(&mut self.project, &self.open_file, commands);
        self.overlay = outcome.overlay.clone();
        outcome
    }

    /// Start an interaction against the metadata measured right now.
    pub fn begin_interaction(&mut self, metadata: ElementMetadataMap) -> InteractionSession {
        self.interaction_base = self.project.text_file(&self.open_file).cloned();
        InteractionSession::new(metadata)
    }

    /// Run one frame of the interaction. Returns the commands the chosen
    /// strategy produced, already applied; empty when no strategy fits.
    pub fn update_interaction(
        &mut self,
        session: &InteractionSession,
        interaction: &InteractionState,
        selected: &[ElementPath],
        scale: f64,
    ) -> Vec<CanvasCommand> {
        self.restore_interaction_base();
        let canvas = CanvasState {
            selected_elements: selected,
            project_contents: &self.project,
            open_file: &self.open_file,
            scale,
        };
        let commands = match pick_strategy(&self.strategies, &canvas, interaction, session) {
            Some(strategy) => strategy.apply(&canvas, interaction, session),
            None => Vec::new(),
        };
        self.apply_commands(&commands);
        commands
    }

    /// Finish the interaction: keep its permanent edits, drop the overlay
    /// and print the code.
    pub fn end_interaction(&mut self) {
        self.interaction_base = None;
        self.overlay = CanvasOverlay::default();
        self.flush_to_text();
    }

    /// Abandon the interaction and put the tree back.
    pub fn cancel_interaction(&mut self) {
        self.restore_interaction_base();
        self.interaction_base = None;
        self.overlay = CanvasOverlay::default();
    }

    fn restore_interaction_base(&mut self) {
        if let Some(base) = &self.interaction_base {
            self.project
                .insert(&self.open_file, ProjectFile::Text(base.clone()));
        }
    }

    /// Reprint the open file when its tree is ahead of its code.
    pub fn flush_to_text(&mut self) {
        let options = &self.print_options;
        let Some(file) = self.project.text_file_mut(&self.open_file) else {
            return;
        };
        if file.revisions_state != RevisionsState::ParsedAhead {
            return;
        }
        if let ParsedTextFile::Success(success) = &file.parsed {
            file.code = print_code(&PrintableFile::from(success), options);
            file.last_parse_success = Some(success.clone());
            debug!("reprinted {} ({} bytes)", self.open_file, file.code.len());
        }
        file.revisions_state = RevisionsState::BothMatch;
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Current code of the open file (synced).
    pub fn current_text(&mut self) -> &str {
        self.flush_to_text();
        self.project
            .text_file(&self.open_file)
            .map_or("", |f| f.code.as_str())
    }

    /// The open file's tree: the current parse, or the last good one while
    /// the code is broken.
    pub fn parsed(&self) -> Option<&ParseSuccess> {
        let file = self.project.text_file(&self.open_file)?;
        file.parsed.success().or(file.last_parse_success.as_ref())
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction_base.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uisync_core::uid::Uid;

    const APP: &str = "export const App = () => <div data-uid=\"root\" />\n";

    #[test]
    fn from_text_parses_open_file() {
        let engine = SyncEngine::from_text("/app.jsx", APP).expect("parses");
        assert_eq!(engine.open_file(), "/app.jsx");
        let parsed = engine.parsed().expect("parsed");
        assert!(parsed.find_element(Uid::intern("root")).is_some());
    }

    #[test]
    fn broken_text_keeps_last_tree() {
        let mut engine = SyncEngine::from_text("/app.jsx", APP).expect("parses");
        let errors = engine
            .set_text("export const App = () => <div>\n")
            .expect_err("unclosed element");
        assert!(!errors.is_empty());
        assert!(
            engine
                .parsed()
                .and_then(|p| p.find_element(Uid::intern("root")))
                .is_some()
        );
    }

    #[test]
    fn from_text_rejects_broken_code() {
        assert!(SyncEngine::from_text("/app.jsx", "const a = '\n").is_err());
    }

    #[test]
    fn current_text_is_unchanged_without_edits() {
        let mut engine = SyncEngine::from_text("/app.jsx", APP).expect("parses");
        assert_eq!(engine.current_text(), APP);
    }
}
