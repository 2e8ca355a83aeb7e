use super::super::Model;
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Coalesces bursts of events: only the last one within `millis` fires `action`.
pub fn debounce<E: 'static>(millis: u32, action: impl Fn() + 'static) -> Callback<E> {
    let action = Rc::new(action);
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::default();

    Callback::from(move |_: E| {
        // Dropping a gloo timeout cancels it.
        let action = Rc::clone(&action);
        pending.replace(Some(Timeout::new(millis, move || action())));
    })
}

/// Takes the first file of a file input's change event and resets the input,
/// so picking the same file again still fires `change`.
pub fn selected_file(e: &Event) -> Option<GlooFile> {
    let input: HtmlInputElement = e.target_unchecked_into();
    let file = input.files().and_then(|files| files.item(0)).map(GlooFile::from);
    input.set_value("");
    file
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = model.session.error() {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg.to_string() }</p>
            </div>
        }
    } else {
        html! {}
    }
}
