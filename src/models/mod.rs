pub mod profile;
pub mod settings;
pub mod view;

pub use profile::*;
pub use settings::*;
pub use view::*;
