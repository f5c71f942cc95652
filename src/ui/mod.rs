//! UI module for rendering the TUI

mod components;
mod confirmation;
mod forms;
mod layout;
mod notice;
mod review;
mod type_selection;

use crate::app::{App, Phase};
use crate::state::Screen;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (content_area, status_area) = layout::create_layout(frame.area());

    match &app.phase {
        Phase::Loading => notice::draw_loading(frame, content_area, app),
        Phase::Failed(message) => notice::draw_failed(frame, content_area, app, message),
        Phase::Locked(project) => notice::draw_locked(frame, content_area, app, project),
        Phase::Ready(session) => match session.screen() {
            Screen::TypeSelection => type_selection::draw(frame, content_area, app),
            Screen::Editing(_) => forms::draw_section(frame, content_area, app, session),
            Screen::Review => review::draw(frame, content_area, app, session),
            Screen::Confirmation => confirmation::draw(frame, content_area, app, session),
        },
    }

    layout::draw_status_bar(frame, status_area, app);

    // Errors overlay everything until dismissed
    if let Some(error) = app.current_error() {
        components::render_error_dialog(
            frame,
            &app.catalog.t("app.error"),
            error,
            &app.catalog.t("app.hints.dismiss"),
        );
    }
}
