pub mod marker;
pub mod placement;
pub mod turret;
pub mod enemy;
pub mod combat;

pub use marker::*;
pub use placement::*;
pub use turret::*;
pub use enemy::*;
pub use combat::*;
