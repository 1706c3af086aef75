#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod compose;
pub mod composer;
pub mod config;
pub mod error;
pub mod prelude;
pub mod test_runner;

pub use composer::{
    ComposedArtifact,
    Composer,
    ComposerConfig,
    InjectionPolicy,
    PreludePolicy,
};
pub use error::{
    ComposeError,
    ConfigError,
    HexFormatError,
    TestRunError,
};
pub use prelude::{
    Prelude,
    decode_prelude,
    encode_hex,
};
