use bevy::prelude::*;

use crate::sling::SlingAction;

/// Current pointer position in drag space. The window cursor has y
/// growing downward; the drag math expects y up, so the axis is
/// flipped here and nowhere else.
pub fn pointer_position(window: &Window) -> Option<Vec2> {
    window
        .cursor_position()
        .map(|cursor| Vec2::new(cursor.x, -cursor.y))
}

/// Sends [`SlingAction`] events for pointer button edges. Continuous
/// pointer movement is not an event; the drag system polls the cursor
/// itself each frame.
pub fn pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut actions: EventWriter<SlingAction>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    if buttons.just_pressed(MouseButton::Left) {
        if let Some(pointer) = pointer_position(window) {
            actions.send(SlingAction::Grab { pointer });
        }
    }
    if buttons.just_released(MouseButton::Left) {
        actions.send(SlingAction::Release);
    }
}
