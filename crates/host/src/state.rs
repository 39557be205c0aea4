use graphon_common::PlayerPosition;
use std::cell::Cell;

/// Read-only view of the player's position, owned elsewhere in the client.
pub trait PlayerState {
    fn position(&self) -> PlayerPosition;
}

/// Single-threaded shared player position.
#[derive(Debug, Default)]
pub struct SharedPlayerState {
    position: Cell<PlayerPosition>,
}

impl SharedPlayerState {
    pub fn new(position: PlayerPosition) -> Self {
        Self {
            position: Cell::new(position),
        }
    }

    pub fn set(&self, position: PlayerPosition) {
        self.position.set(position);
    }
}

impl PlayerState for SharedPlayerState {
    fn position(&self) -> PlayerPosition {
        self.position.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_visible_through_shared_reference() {
        let state = SharedPlayerState::default();
        assert_eq!(state.position(), PlayerPosition::default());

        let reader: &dyn PlayerState = &state;
        state.set(PlayerPosition::new(3.0, -4.0));
        assert_eq!(reader.position(), PlayerPosition::new(3.0, -4.0));
    }
}
