//! One module per subcommand; each is glue over the library stages.

pub mod cards;
pub mod cover;
pub mod frequency;
pub mod known_words;
pub mod translate;
pub mod unknowns;
