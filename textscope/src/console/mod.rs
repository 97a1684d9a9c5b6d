mod interactive;

pub mod prelude {
    pub use super::interactive::{InputHandler, MockInputHandler, QUIT_SENTINEL, interactive_loop};
}
