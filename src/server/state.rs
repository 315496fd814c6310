use crate::engine::Engine;

pub struct AppState {
    pub engine: Engine,
}
