mod api;
mod components;

use api::{BrowserFile, BrowserPlatform};
use components::face_picker::render_face_picker;
use components::handlers;
use components::header::render_header;
use components::mode_tabs::render_mode_tabs;
use components::results::render_result;
use components::theme_toggle::render_theme_toggle;
use components::upload_section::render_upload_section;
use components::utils::{debounce, render_error_message};
use gloo_file::File as GlooFile;
use shared::{
    ApiError, DetectionTicket, Mode, Session, SessionEvent, SubmitLabel, SwapConfig, SwapTicket,
};
use yew::prelude::*;

const REFERENCE_CONFIG: &str = include_str!("../../config/faceswap.yaml");

// Yew msg components
pub enum Msg {
    // File operations
    SetMode(Mode),
    SourceSelected(Option<GlooFile>),
    TargetSelected(Option<GlooFile>),

    // Detection and swap
    DetectionFinished(DetectionTicket<BrowserFile>, Result<Vec<u8>, ApiError>),
    SelectFace(usize),
    Submit,
    SwapFinished(SwapTicket<BrowserFile>, Result<Vec<u8>, ApiError>),

    // UI states
    SessionChanged(SessionEvent),
    ToggleTheme,
}

// Main component
pub struct Model {
    session: Session<BrowserPlatform>,
    theme: String,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = SwapConfig::from_yaml_str(REFERENCE_CONFIG).unwrap_or_else(|e| {
            log::error!("Falling back to built-in swap config: {}", e);
            SwapConfig::default()
        });

        let mut session = Session::new(BrowserPlatform, config);
        let link = ctx.link().clone();
        session.subscribe(move |event| link.send_message(Msg::SessionChanged(event.clone())));

        let theme = handlers::stored_theme();
        handlers::apply_theme(&theme);

        Self { session, theme }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetMode(mode) => handlers::handle_set_mode(self, mode),
            Msg::SourceSelected(file) => handlers::handle_source_selected(self, file),
            Msg::TargetSelected(file) => handlers::handle_target_selected(self, ctx, file),

            Msg::DetectionFinished(ticket, reply) => {
                handlers::handle_detection_finished(self, ctx, ticket, reply)
            }
            Msg::SelectFace(index) => {
                self.session.select_face(index);
                false
            }
            Msg::Submit => handlers::handle_submit(self, ctx),
            Msg::SwapFinished(ticket, reply) => {
                self.session.finish_swap(ticket, reply);
                false
            }

            Msg::SessionChanged(event) => {
                log::debug!("Session event: {:?}", event);
                true
            }
            Msg::ToggleTheme => handlers::handle_toggle_theme(self),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }
                <div class="top-right">
                    { render_theme_toggle(&self.theme, ctx.link()) }
                </div>

                <main class="main-content">
                { render_mode_tabs(self, ctx) }
                { render_upload_section(self, ctx) }
                { render_face_picker(self, ctx) }
                { self.render_submit_button(ctx) }
                { render_error_message(self) }
                { render_result(self) }
                </main>

                <footer class="app-footer">
                    <p>{"FaceSwap is intended for educational and entertainment purposes only. Only upload images you have permission to use."}</p>
                </footer>
            </div>
        }
    }
}

impl Model {
    fn render_submit_button(&self, ctx: &Context<Self>) -> Html {
        let label = self.session.submit_label();
        let link = ctx.link().clone();

        html! {
            <div class="button-container">
                <button
                    class="analyze-btn submit-btn"
                    disabled={!self.session.can_submit()}
                    onclick={debounce(300, move || link.send_message(Msg::Submit))}
                >
                    {
                        if label == SubmitLabel::Processing {
                            html! { <i class="fa-solid fa-spinner fa-spin"></i> }
                        } else {
                            html! { <i class="fa-solid fa-wand-magic-sparkles"></i> }
                        }
                    }
                    { format!(" {}", label) }
                </button>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
