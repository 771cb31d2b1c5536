pub mod settings;

pub use settings::KeyTemplate;
