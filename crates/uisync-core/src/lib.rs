pub mod diagnostics;
pub mod format;
pub mod geom;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod path;
pub mod printer;
pub mod project;
pub mod uid;

pub use format::{FormatConfig, format_code};
pub use geom::*;
pub use metadata::{
    CssPosition, ElementInstanceMetadata, ElementMetadataMap, LayoutSystem, SpecialSizeMeasurements,
};
pub use model::*;
pub use parser::{is_parseable_file, parse_code, parse_code_fresh};
pub use path::{ElementPath, PathSegment};
pub use printer::{PrintOptions, PrintableFile, QuoteStyle, print_code, print_jsx};
pub use project::{ProjectContents, ProjectFile, RevisionsState, TextFile};
pub use uid::{UID_ATTRIBUTE, Uid, generate_consistent_uid};
