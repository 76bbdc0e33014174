pub mod active_turrets;
pub mod cli;
pub mod frame_clock;
pub mod marker_cache;
pub mod marker_feed;
pub mod path_grid;
pub mod placement_registry;
pub mod play_area;
pub mod ratio_config;
pub mod score;
pub mod settings;

pub use active_turrets::*;
pub use cli::*;
pub use frame_clock::*;
pub use marker_cache::*;
pub use marker_feed::*;
pub use path_grid::*;
pub use placement_registry::*;
pub use play_area::*;
pub use ratio_config::*;
pub use score::*;
pub use settings::*;
