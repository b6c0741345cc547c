pub mod asset;
pub mod camera;
pub mod constants;
pub mod context;
pub mod error;
pub mod hit_test;
pub mod interaction;
pub mod ray;
pub mod scene;
pub mod spawner;

pub use asset::*;
pub use camera::*;
pub use constants::*;
pub use context::*;
pub use error::*;
pub use hit_test::*;
pub use interaction::*;
pub use ray::*;
pub use scene::*;
pub use spawner::*;
