// HTTP routes
pub mod boards;
pub mod catalog;
pub mod errors;
pub mod health;
pub mod imports;
pub mod palette;
pub mod stream;
pub mod suppliers;

pub use boards::*;
pub use catalog::*;
pub use health::*;
pub use imports::*;
pub use palette::*;
pub use stream::*;
pub use suppliers::*;
