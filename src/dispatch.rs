//! User actions and the copy policy that follows them
//!
//! Hotkeys, row clicks and settings edits all end up here. The controller
//! only moves; this module decides when a move is followed by a copy.

use tracing::{debug, trace};

use crate::clipboard::ClipboardSink;
use crate::config::{ConfigPatch, DisplayPreferences};
use crate::error::Result;
use crate::hotkeys::HotkeyCommand;
use crate::sequence::{CopyOutcome, SequenceController, SequenceState};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PrevRecord,
    NextRecord,
    PrevField,
    NextField,
    Advance,
    /// Same as `Advance`, gated on the quick-advance preference
    QuickAdvance,
    SelectRecord(usize),
    SelectField(usize),
    ResetSequence,
    ApplySettings(ConfigPatch),
}

impl From<HotkeyCommand> for Action {
    fn from(command: HotkeyCommand) -> Self {
        match command {
            HotkeyCommand::PrevRecord => Action::PrevRecord,
            HotkeyCommand::NextRecord => Action::NextRecord,
            HotkeyCommand::PrevField => Action::PrevField,
            HotkeyCommand::NextField => Action::NextField,
            HotkeyCommand::Advance => Action::Advance,
            HotkeyCommand::QuickAdvance => Action::QuickAdvance,
        }
    }
}

/// Run `action` against the controller.
///
/// Returns the copy outcome when a copy was attempted, `None` when the action
/// did not copy (no movement, reset, or nothing loaded). Settings apply even
/// with nothing loaded.
pub fn dispatch(
    controller: &mut SequenceController,
    clipboard: &mut dyn ClipboardSink,
    prefs: &DisplayPreferences,
    action: Action,
) -> Result<Option<CopyOutcome>> {
    if let Action::ApplySettings(patch) = action {
        debug!(?patch, "Applying settings");
        controller.update_configuration(patch);
        if controller.is_empty() {
            return Ok(None);
        }
        return Ok(Some(controller.copy_current_value(clipboard).0));
    }
    if controller.is_empty() {
        trace!(?action, "Ignoring action, no records loaded");
        return Ok(None);
    }
    debug!(?action, "Dispatching action");

    let before = controller.state();

    let outcome = match action {
        Action::PrevRecord => {
            controller.step_record_backward();
            copy_if_moved(controller, before, clipboard)
        }
        Action::NextRecord => {
            controller.step_record_forward();
            copy_if_moved(controller, before, clipboard)
        }
        Action::PrevField => {
            controller.step_field_backward();
            copy_if_moved(controller, before, clipboard)
        }
        Action::NextField => {
            controller.step_field_forward();
            copy_if_moved(controller, before, clipboard)
        }
        Action::QuickAdvance if !prefs.quick_advance => {
            debug!("Quick advance disabled, ignoring");
            None
        }
        Action::Advance | Action::QuickAdvance => {
            controller.advance_copy_sequence();
            Some(controller.copy_current_value(clipboard).0)
        }
        Action::SelectRecord(index) => Some(controller.set_record_index(index, clipboard)?.0),
        Action::SelectField(index) => Some(controller.set_field_index(index, clipboard)?.0),
        Action::ResetSequence => {
            controller.reset_field_sequence();
            None
        }
        Action::ApplySettings(_) => None,
    };
    Ok(outcome)
}

fn copy_if_moved(
    controller: &SequenceController,
    before: SequenceState,
    clipboard: &mut dyn ClipboardSink,
) -> Option<CopyOutcome> {
    (controller.state() != before).then(|| controller.copy_current_value(clipboard).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::RecordingClipboard;
    use crate::config::{ArrayPath, SessionConfig};
    use crate::error::LoadError;
    use crate::record::Record;
    use serde_json::json;

    fn setup(count: usize, copy: &[&str]) -> (SequenceController, RecordingClipboard, DisplayPreferences) {
        let records = (0..count)
            .map(|i| Record::new(json!({"a": format!("a{i}"), "b": format!("b{i}")})))
            .collect();
        let config = SessionConfig::new(
            ArrayPath::default(),
            Vec::new(),
            copy.iter().map(|f| f.to_string()).collect(),
        );
        (
            SequenceController::new(records, config),
            RecordingClipboard::default(),
            DisplayPreferences::default(),
        )
    }

    #[test]
    fn test_step_copies_only_when_moved() {
        let (mut controller, mut clipboard, prefs) = setup(2, &["a"]);
        let outcome = dispatch(&mut controller, &mut clipboard, &prefs, Action::PrevRecord).unwrap();
        assert_eq!(outcome, None);
        assert!(clipboard.writes.is_empty());

        dispatch(&mut controller, &mut clipboard, &prefs, Action::NextRecord).unwrap();
        assert_eq!(clipboard.writes, vec!["a1"]);

        let outcome = dispatch(&mut controller, &mut clipboard, &prefs, Action::NextRecord).unwrap();
        assert_eq!(outcome, None);
        assert_eq!(clipboard.writes.len(), 1);
    }

    #[test]
    fn test_field_steps_copy() {
        let (mut controller, mut clipboard, prefs) = setup(2, &["a", "b"]);
        dispatch(&mut controller, &mut clipboard, &prefs, Action::NextField).unwrap();
        dispatch(&mut controller, &mut clipboard, &prefs, Action::NextField).unwrap();
        dispatch(&mut controller, &mut clipboard, &prefs, Action::PrevField).unwrap();
        assert_eq!(clipboard.writes, vec!["b0", "a1", "b0"]);
    }

    #[test]
    fn test_advance_always_copies() {
        let (mut controller, mut clipboard, prefs) = setup(1, &["a"]);
        let outcome = dispatch(&mut controller, &mut clipboard, &prefs, Action::Advance).unwrap();
        assert_eq!(outcome, Some(CopyOutcome::Copied("a0".to_string())));
        assert_eq!(controller.state().record_index, 0);
    }

    #[test]
    fn test_quick_advance_respects_preference() {
        let (mut controller, mut clipboard, mut prefs) = setup(3, &["a"]);
        dispatch(&mut controller, &mut clipboard, &prefs, Action::QuickAdvance).unwrap();
        assert_eq!(controller.state().record_index, 1);

        prefs.quick_advance = false;
        let outcome = dispatch(&mut controller, &mut clipboard, &prefs, Action::QuickAdvance).unwrap();
        assert_eq!(outcome, None);
        assert_eq!(controller.state().record_index, 1);
        assert_eq!(clipboard.writes, vec!["a1"]);
    }

    #[test]
    fn test_select_record_out_of_range_is_an_error() {
        let (mut controller, mut clipboard, prefs) = setup(2, &["a"]);
        let result = dispatch(&mut controller, &mut clipboard, &prefs, Action::SelectRecord(5));
        assert!(matches!(result, Err(LoadError::IndexOutOfRange { index: 5, total: 2 })));

        dispatch(&mut controller, &mut clipboard, &prefs, Action::SelectRecord(1)).unwrap();
        assert_eq!(clipboard.last(), Some("a1"));
    }

    #[test]
    fn test_select_field_copies() {
        let (mut controller, mut clipboard, prefs) = setup(1, &["a", "b"]);
        dispatch(&mut controller, &mut clipboard, &prefs, Action::SelectField(1)).unwrap();
        assert_eq!(clipboard.last(), Some("b0"));
    }

    #[test]
    fn test_reset_does_not_copy() {
        let (mut controller, mut clipboard, prefs) = setup(1, &["a", "b"]);
        controller.step_field_forward();
        let outcome = dispatch(&mut controller, &mut clipboard, &prefs, Action::ResetSequence).unwrap();
        assert_eq!(outcome, None);
        assert_eq!(controller.state().field_index, 0);
        assert!(clipboard.writes.is_empty());
    }

    #[test]
    fn test_apply_settings_copies_from_first_field() {
        let (mut controller, mut clipboard, prefs) = setup(1, &["a", "b"]);
        controller.step_field_forward();
        let patch = ConfigPatch {
            copy_fields: Some(vec!["b".to_string()]),
            ..Default::default()
        };
        dispatch(&mut controller, &mut clipboard, &prefs, Action::ApplySettings(patch)).unwrap();
        assert_eq!(controller.state().field_index, 0);
        assert_eq!(clipboard.last(), Some("b0"));
    }

    #[test]
    fn test_everything_is_noop_without_records() {
        let (mut controller, mut clipboard, prefs) = setup(0, &["a"]);
        for action in [
            Action::Advance,
            Action::NextRecord,
            Action::SelectRecord(0),
            Action::SelectField(0),
            Action::ResetSequence,
        ] {
            assert_eq!(dispatch(&mut controller, &mut clipboard, &prefs, action).unwrap(), None);
        }
        assert!(clipboard.writes.is_empty());
    }

    #[test]
    fn test_apply_settings_lands_without_records() {
        let (mut controller, mut clipboard, prefs) = setup(0, &["a"]);
        let patch = ConfigPatch {
            auto_advance: Some(true),
            copy_fields: Some(vec!["b".to_string()]),
            ..Default::default()
        };
        let outcome = dispatch(&mut controller, &mut clipboard, &prefs, Action::ApplySettings(patch)).unwrap();
        assert_eq!(outcome, None);
        assert!(controller.config().auto_advance);
        assert_eq!(controller.config().copy_fields(), vec!["b".to_string()]);
        assert!(clipboard.writes.is_empty());
    }

    #[test]
    fn test_hotkey_commands_map_to_actions() {
        assert_eq!(Action::from(HotkeyCommand::Advance), Action::Advance);
        assert_eq!(Action::from(HotkeyCommand::QuickAdvance), Action::QuickAdvance);
        assert_eq!(Action::from(HotkeyCommand::PrevField), Action::PrevField);
    }
}
