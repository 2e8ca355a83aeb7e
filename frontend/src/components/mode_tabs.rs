use super::super::{Model, Msg};
use shared::Mode;
use yew::prelude::*;

pub fn render_mode_tabs(model: &Model, ctx: &Context<Model>) -> Html {
    let active = model.session.mode();

    html! {
        <div class="mode-tabs">
            { for [Mode::Image, Mode::Video].into_iter().map(|mode| {
                let icon = match mode {
                    Mode::Image => "fa-image",
                    Mode::Video => "fa-video",
                };
                html! {
                    <button
                        class={classes!("tab-btn", (mode == active).then_some("active"))}
                        onclick={ctx.link().callback(move |_| Msg::SetMode(mode))}
                    >
                        <i class={classes!("fa-solid", icon)}></i>
                        { format!(" {} Swap", mode.label()) }
                    </button>
                }
            }) }
        </div>
    }
}
