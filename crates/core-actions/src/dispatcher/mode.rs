//! Mode transitions (Navigation <-> Edit).

use super::DispatchResult;
use crate::ModeChange;
use core_state::{EditorState, Mode};

pub(crate) fn handle_mode_change(mc: ModeChange, state: &mut EditorState) -> DispatchResult {
    let target = match mc {
        ModeChange::EnterEdit => Mode::Edit,
        ModeChange::LeaveEdit => Mode::Navigation,
    };
    if state.mode == target {
        return DispatchResult::clean();
    }
    state.set_mode(target);
    tracing::debug!(target: "actions.dispatch", mode = target.display_name(), "mode_change");
    DispatchResult::dirty()
}
