use super::super::api::{BrowserFile, BrowserPlatform};
use super::super::{Model, Msg};
use gloo_file::File as GlooFile;
use gloo_storage::{LocalStorage, Storage};
use shared::{
    ApiError, DetectPurpose, DetectionTicket, Mode, Platform, SubmitStep, SwapTicket,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const THEME_KEY: &str = "faceswap.theme";

pub fn handle_set_mode(model: &mut Model, mode: Mode) -> bool {
    if model.session.mode() != mode {
        log::info!("Switching tab to {}", mode);
    }
    model.session.set_mode(mode);
    false
}

// Validation failures are stored on the session and rendered from there.
pub fn handle_source_selected(model: &mut Model, file: Option<GlooFile>) -> bool {
    if let Err(e) = model.session.set_source(file.map(BrowserFile::from)) {
        log::debug!("Source rejected: {}", e);
    }
    false
}

pub fn handle_target_selected(
    model: &mut Model,
    ctx: &Context<Model>,
    file: Option<GlooFile>,
) -> bool {
    match model.session.set_target(file.map(BrowserFile::from)) {
        Ok(Some(ticket)) => send_detection_request(model, ctx, ticket),
        Ok(None) => {}
        Err(e) => log::debug!("Target rejected: {}", e),
    }
    false
}

pub fn handle_detection_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    ticket: DetectionTicket<BrowserFile>,
    reply: Result<Vec<u8>, ApiError>,
) -> bool {
    let purpose = ticket.purpose();
    let outcome = model.session.finish_detection(ticket, reply);
    if purpose == DetectPurpose::Submit && outcome.can_proceed() {
        ctx.link().send_message(Msg::Submit);
    }
    false
}

pub fn handle_submit(model: &mut Model, ctx: &Context<Model>) -> bool {
    match model.session.begin_submit() {
        SubmitStep::Detect(ticket) => send_detection_request(model, ctx, ticket),
        SubmitStep::Swap(ticket) => send_swap_request(model, ctx, ticket),
        SubmitStep::Aborted => {}
    }
    false
}

pub fn handle_toggle_theme(model: &mut Model) -> bool {
    model.theme = if model.theme == "light" { "dark" } else { "light" }.to_string();
    apply_theme(&model.theme);

    if let Err(e) = LocalStorage::set(THEME_KEY, &model.theme) {
        log::warn!("Failed to persist theme: {}", e);
    }
    true
}

pub fn stored_theme() -> String {
    LocalStorage::get::<String>(THEME_KEY).unwrap_or_else(|_| "light".to_string())
}

pub fn apply_theme(theme: &str) {
    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        return;
    };

    let class_list = body.class_list();
    let applied = if theme == "dark" {
        class_list.add_1("dark-mode")
    } else {
        class_list.remove_1("dark-mode")
    };
    if let Err(e) = applied {
        log::warn!("Failed to apply theme: {:?}", e);
    }
}

fn platform(model: &Model) -> BrowserPlatform {
    model.session.platform().clone()
}

pub fn send_detection_request(
    model: &Model,
    ctx: &Context<Model>,
    ticket: DetectionTicket<BrowserFile>,
) {
    spawn_local({
        let link = ctx.link().clone();
        let platform = platform(model);

        async move {
            let reply = platform.post_form(ticket.endpoint(), ticket.form()).await;
            link.send_message(Msg::DetectionFinished(ticket, reply));
        }
    });
}

pub fn send_swap_request(model: &Model, ctx: &Context<Model>, ticket: SwapTicket<BrowserFile>) {
    spawn_local({
        let link = ctx.link().clone();
        let platform = platform(model);

        async move {
            let reply = platform.post_form(ticket.endpoint(), ticket.form()).await;
            link.send_message(Msg::SwapFinished(ticket, reply));
        }
    });
}
