pub mod change_detector;
pub mod conflict_resolver;
pub mod duplicate_matcher;
pub mod merger;
pub mod settings_engine;
pub mod sync_engine;
pub mod url_normalizer;
pub mod validator;
