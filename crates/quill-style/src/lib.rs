//! CSS style engine: declarations, the selector graph, style sheets with
//! a resolved-style cache, sheet linking and `@import`.

pub mod cascade;
pub mod declaration;
pub mod error;
pub mod font;
pub mod graph;
pub mod html;
pub mod lookup;
pub mod parser;
pub mod property;
pub mod sheet;
pub mod value;

pub use declaration::Declaration;
pub use error::StyleError;
pub use font::index_of_size;
pub use html::DEFAULT_CSS;
pub use lookup::{AttributeLookup, ResolvedRef};
pub use parser::{CssParserCallback, RuleBuilder, parse};
pub use property::{CssProperty, ValueKind};
pub use sheet::{ResolvedId, ResolvedStyle, RuleId, Style, StyleSheet};
pub use value::{CssValue, LengthUnit, Rgba, parse_length, string_to_color};
