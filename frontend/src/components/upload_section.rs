use super::super::{Model, Msg};
use super::utils::selected_file;
use shared::Mode;
use shared::config::format_megabytes;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum Slot {
    Source,
    Target,
}

impl Slot {
    fn message(self, file: Option<gloo_file::File>) -> Msg {
        match self {
            Slot::Source => Msg::SourceSelected(file),
            Slot::Target => Msg::TargetSelected(file),
        }
    }
}

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let session = &model.session;
    let mode = session.mode();
    let limits = &session.config().limits;

    html! {
        <div class="upload-section">
            { render_upload_box(
                ctx,
                Slot::Source,
                session.source().map(|asset| asset.preview_url().to_string()),
                mode,
                limits.source_max_bytes,
            ) }
            { render_upload_box(
                ctx,
                Slot::Target,
                session.target().map(|asset| asset.preview_url().to_string()),
                mode,
                limits.target_max(mode),
            ) }
        </div>
    }
}

fn render_upload_box(
    ctx: &Context<Model>,
    slot: Slot,
    preview: Option<String>,
    mode: Mode,
    limit: u64,
) -> Html {
    let link = ctx.link();
    let (title, input_id, accept) = match slot {
        Slot::Source => ("Source Face".to_string(), "source-input", "image/*"),
        Slot::Target => (format!("Target {}", mode.label()), "target-input", mode.accept()),
    };

    let handle_change = link.callback(move |e: Event| slot.message(selected_file(&e)));
    let handle_remove = link.callback(move |e: MouseEvent| {
        e.stop_propagation();
        slot.message(None)
    });

    let preview_html = match (&preview, slot, mode) {
        (None, _, _) => html! {
            <div class="upload-placeholder">
                <i class="fa-solid fa-cloud-arrow-up"></i>
                <p>{ format!("Click to upload ({} max)", format_megabytes(limit)) }</p>
            </div>
        },
        (Some(url), Slot::Target, Mode::Video) => html! {
            <video class="upload-preview" src={url.clone()} controls=true muted=true />
        },
        (Some(url), _, _) => html! {
            <img class="upload-preview" src={url.clone()} alt={title.clone()} />
        },
    };

    html! {
        <div class="upload-box">
            <h3>{ title.clone() }</h3>
            <input
                type="file"
                id={input_id}
                accept={accept}
                style="display: none;"
                onchange={handle_change}
            />
            <label for={input_id} class="upload-area">
                { preview_html }
            </label>
            {
                if preview.is_some() {
                    html! {
                        <button class="remove-btn" title="Remove this file" onclick={handle_remove}>
                            <i class="fa-solid fa-times" style="font-size: 10px;"></i>
                        </button>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
