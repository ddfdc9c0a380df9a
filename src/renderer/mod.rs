pub mod components;
pub mod normalize;
pub mod renderer;
pub mod renders;
pub mod traits;

pub use components::*;
pub use normalize::*;
pub use renderer::*;
pub use renders::*;
pub use traits::*;
