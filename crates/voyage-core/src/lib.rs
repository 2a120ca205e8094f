pub mod camera;
pub mod city;
pub mod constants;
pub mod content;
pub mod dispatcher;
pub mod env;
pub mod error;
pub mod geo;
pub mod store;
pub mod tour;

pub use camera::*;
pub use city::*;
pub use constants::*;
pub use content::*;
pub use dispatcher::*;
pub use env::*;
pub use error::*;
pub use geo::*;
pub use store::*;
pub use tour::*;
