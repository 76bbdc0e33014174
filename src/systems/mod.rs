pub mod frame;
pub mod sync;
pub mod turret;
pub mod enemy;
pub mod combat;

pub use frame::*;
pub use sync::*;
pub use turret::*;
pub use enemy::*;
pub use combat::*;
