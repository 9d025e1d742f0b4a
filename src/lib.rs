pub mod annotate;
pub mod api;
pub mod config;
pub mod error;
pub mod layout;
pub mod links;
pub mod model;
pub mod scanner;
pub mod transpose;
pub mod wrap;

pub use annotate::{annotate, annotate_transposed, Annotator};
pub use api::{render, render_text, BlockPlacements, RenderedTab, WrappedBlock};
pub use config::EngineConfig;
pub use error::*;
pub use links::{find_links, Link};
pub use model::*;
pub use scanner::{chord_tags, find_next_chord_tag, ChordMatch, TagScanner, TagSyntax};
pub use transpose::{transpose, transpose_key_name, transpose_markup, try_transpose};
pub use wrap::{wrap_block, wrap_pair, LineWrapBreakPoint, LineWrapEngine};

