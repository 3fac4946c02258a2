//! Project contents: the file tree the editor works on.
//!
//! Paths are absolute and `/`-separated (`/src/app.jsx`). Directories are
//! explicit entries; adding a file creates its missing ancestors.

use crate::model::{JsxElement, ParseSuccess, ParsedTextFile, TopLevelElement, walk_top_level};
use crate::parser::{is_parseable_file, parse_code};
use crate::path::ElementPath;
use crate::uid::Uid;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Which side of a text file changed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RevisionsState {
    /// The tree was edited; the code has not been reprinted.
    ParsedAhead,
    /// The code was edited; the tree has not been reparsed.
    CodeAhead,
    #[default]
    BothMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFile {
    pub code: String,
    pub parsed: ParsedTextFile,
    /// The most recent successful parse, kept through failed ones so UIDs
    /// survive a temporarily broken file.
    pub last_parse_success: Option<ParseSuccess>,
    pub revisions_state: RevisionsState,
}

impl TextFile {
    /// A file whose code has not been parsed yet.
    pub fn unparsed(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            parsed: ParsedTextFile::Unparsed,
            last_parse_success: None,
            revisions_state: RevisionsState::CodeAhead,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectFile {
    Text(TextFile),
    Image { image_type: Option<String> },
    Asset,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectContents {
    files: BTreeMap<String, ProjectFile>,
}

impl ProjectContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file, creating missing parent directories.
    pub fn insert(&mut self, path: &str, file: ProjectFile) {
        let mut parent = parent_of(path);
        while let Some(dir) = parent {
            if dir == "/" || dir.is_empty() {
                break;
            }
            self.files
                .entry(dir.to_string())
                .or_insert(ProjectFile::Directory);
            parent = parent_of(dir);
        }
        self.files.insert(path.to_string(), file);
    }

    /// Remove a file, or a directory and everything under it.
    pub fn remove(&mut self, path: &str) -> Option<ProjectFile> {
        let removed = self.files.remove(path);
        if matches!(removed, Some(ProjectFile::Directory)) {
            let prefix = format!("{path}/");
            self.files.retain(|p, _| !p.starts_with(&prefix));
        }
        removed
    }

    pub fn get(&self, path: &str) -> Option<&ProjectFile> {
        self.files.get(path)
    }

    pub fn text_file(&self, path: &str) -> Option<&TextFile> {
        match self.files.get(path)? {
            ProjectFile::Text(file) => Some(file),
            _ => None,
        }
    }

    pub fn text_file_mut(&mut self, path: &str) -> Option<&mut TextFile> {
        match self.files.get_mut(path)? {
            ProjectFile::Text(file) => Some(file),
            _ => None,
        }
    }

    /// Every entry, in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProjectFile)> {
        self.files.iter().map(|(p, f)| (p.as_str(), f))
    }

    /// Direct children of a directory (`"/"` for the root).
    pub fn children_of<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.files
            .keys()
            .map(String::as_str)
            .filter(move |p| parent_of(p).map(|d| if d.is_empty() { "/" } else { d }) == Some(dir))
    }

    /// Element UIDs of every parsed file except `except`.
    pub fn uids_outside(&self, except: &str) -> HashSet<Uid> {
        let mut uids = HashSet::new();
        for (path, file) in &self.files {
            if path == except {
                continue;
            }
            if let ProjectFile::Text(TextFile {
                parsed: ParsedTextFile::Success(success),
                ..
            }) = file
            {
                uids.extend(success.all_uids());
            }
        }
        uids
    }

    /// Replace a text file's code; the tree is stale until [`Self::reparse`].
    pub fn update_code(&mut self, path: &str, code: impl Into<String>) {
        match self.text_file_mut(path) {
            Some(file) => {
                file.code = code.into();
                file.revisions_state = RevisionsState::CodeAhead;
            }
            None => self.insert(path, ProjectFile::Text(TextFile::unparsed(code))),
        }
    }

    /// Parse a text file's code, reusing UIDs from its last successful
    /// parse and avoiding UIDs used by other files.
    pub fn reparse(&mut self, path: &str) -> Option<&ParsedTextFile> {
        let existing = self.uids_outside(path);
        let file = self.text_file_mut(path)?;
        if !is_parseable_file(path) {
            file.parsed = ParsedTextFile::Unparsed;
            file.revisions_state = RevisionsState::BothMatch;
            return Some(&file.parsed);
        }
        let parsed = parse_code(path, &file.code, file.last_parse_success.as_ref(), &existing);
        match &parsed {
            ParsedTextFile::Success(success) => {
                debug!("reparsed {path}");
                file.last_parse_success = Some(success.clone());
            }
            ParsedTextFile::Failure(errors) => {
                warn!("{path} failed to parse: {} errors", errors.len());
            }
            ParsedTextFile::Unparsed => {}
        }
        file.parsed = parsed;
        file.revisions_state = RevisionsState::BothMatch;
        Some(&file.parsed)
    }

    /// The element a path points at, looked up in `open_file`.
    pub fn find_element(&self, open_file: &str, path: &ElementPath) -> Option<&JsxElement> {
        let success = self.text_file(open_file)?.parsed.success()?;
        success.find_element(path.last_uid()?)
    }

    pub fn find_element_mut(
        &mut self,
        open_file: &str,
        path: &ElementPath,
    ) -> Option<&mut JsxElement> {
        let uid = path.last_uid()?;
        let file = self.text_file_mut(open_file)?;
        let ParsedTextFile::Success(success) = &mut file.parsed else {
            return None;
        };
        success.find_element_mut(uid)
    }

    /// The file defining the element with `uid`, if any parsed file does.
    pub fn file_defining(&self, uid: Uid) -> Option<&str> {
        self.files.iter().find_map(|(path, file)| {
            let ProjectFile::Text(TextFile {
                parsed: ParsedTextFile::Success(success),
                ..
            }) = file
            else {
                return None;
            };
            let mut found = false;
            for element in &success.top_level_elements {
                walk_top_level(element, &mut |e| found |= e.uid == uid);
            }
            found.then_some(path.as_str())
        })
    }

    /// Components defined by a parsed file, by name.
    pub fn component_names(&self, path: &str) -> Vec<String> {
        let Some(success) = self.text_file(path).and_then(|f| f.parsed.success()) else {
            return Vec::new();
        };
        success
            .top_level_elements
            .iter()
            .filter_map(|e| match e {
                TopLevelElement::Component(c) => c.name.clone(),
                _ => None,
            })
            .collect()
    }
}

fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(dir, _)| dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn project() -> ProjectContents {
        let mut project = ProjectContents::new();
        project.update_code(
            "/src/app.jsx",
            "export const App = () => <div data-uid=\"app-root\"><span data-uid=\"label\" /></div>\n",
        );
        project.insert(
            "/assets/logo.png",
            ProjectFile::Image {
                image_type: Some("image/png".into()),
            },
        );
        project
    }

    #[test]
    fn insert_creates_directories() {
        let project = project();
        assert_eq!(project.get("/src"), Some(&ProjectFile::Directory));
        assert_eq!(project.get("/assets"), Some(&ProjectFile::Directory));
        let root: Vec<&str> = project.children_of("/").collect();
        assert_eq!(root, vec!["/assets", "/src"]);
        let src: Vec<&str> = project.children_of("/src").collect();
        assert_eq!(src, vec!["/src/app.jsx"]);
    }

    #[test]
    fn reparse_and_find_by_path() {
        let mut project = project();
        assert_eq!(
            project.text_file("/src/app.jsx").map(|f| f.revisions_state),
            Some(RevisionsState::CodeAhead)
        );
        assert!(matches!(
            project.reparse("/src/app.jsx"),
            Some(ParsedTextFile::Success(_))
        ));
        let path: ElementPath = "app-root/label".parse().expect("valid path");
        let label = project
            .find_element("/src/app.jsx", &path)
            .expect("label element");
        assert_eq!(label.name.base, "span");
        assert_eq!(project.file_defining(Uid::intern("label")), Some("/src/app.jsx"));
        assert_eq!(project.component_names("/src/app.jsx"), vec!["App".to_string()]);
    }

    #[test]
    fn failed_parse_keeps_last_success() {
        let mut project = project();
        project.reparse("/src/app.jsx");
        project.update_code("/src/app.jsx", "const App = () => <div>\n");
        assert!(matches!(
            project.reparse("/src/app.jsx"),
            Some(ParsedTextFile::Failure(_))
        ));
        let file = project.text_file("/src/app.jsx").expect("file");
        assert!(file.last_parse_success.is_some());
    }

    #[test]
    fn other_files_uids_are_collected() {
        let mut project = project();
        project.reparse("/src/app.jsx");
        project.update_code("/src/card.jsx", "const Card = () => <p />\n");
        project.reparse("/src/card.jsx");
        let outside = project.uids_outside("/src/card.jsx");
        assert!(outside.contains(&Uid::intern("app-root")));
        assert!(outside.contains(&Uid::intern("label")));
        assert_eq!(project.uids_outside("/src/app.jsx").len(), 1);
    }

    #[test]
    fn removing_a_directory_removes_its_files() {
        let mut project = project();
        project.remove("/src");
        assert!(project.get("/src/app.jsx").is_none());
        assert!(project.get("/assets/logo.png").is_some());
    }
}
