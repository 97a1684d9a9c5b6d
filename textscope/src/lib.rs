pub mod analysis;
pub mod console;
pub mod shared;

pub mod prelude {
    pub use crate::analysis::prelude::*;
    pub use crate::console::prelude::*;
    pub use crate::shared::prelude::*;
}
