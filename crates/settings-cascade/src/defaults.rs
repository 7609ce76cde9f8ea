use wirebind_core_types::{ActionKind, HttpMethod, RequestData, Selector};

use crate::model::Settings;

/// Canonical global defaults; the base of every cascade.
pub fn default_settings() -> Settings {
    Settings {
        event: "click".to_string(),
        // Empty means automatic resolution: element link target, else the
        // nearest enclosing form's action.
        url: String::new(),
        data: RequestData::None,
        method: HttpMethod::Post,
        confirm_needed: false,
        confirm_only: false,
        confirm_message: "Are you sure?".to_string(),
        smart_confirm: true,
        smart_confirm_message: ": are you sure?".to_string(),
        before_item: Selector::default(),
        before_html: String::new(),
        before_action: ActionKind::None,
        success_item: Selector::default(),
        success_action: ActionKind::Alert,
        error_item: Selector::default(),
        error_action: ActionKind::Alert,
        after_item: Selector::default(),
        after_action: ActionKind::None,
        after_html: String::new(),
    }
}
