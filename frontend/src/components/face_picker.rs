use super::super::{Model, Msg};
use yew::prelude::*;

pub fn render_face_picker(model: &Model, ctx: &Context<Model>) -> Html {
    let faces = model.session.faces();
    if faces.len() < 2 {
        return html! {};
    }

    let selected = model.session.selected_face();
    let link = ctx.link();

    html! {
        <div class="face-selection">
            <h3>{ format!("Select a Face to Replace ({} faces detected)", faces.len()) }</h3>
            <div class="face-grid">
                { for faces.iter().map(|face| {
                    let index = face.index;
                    html! {
                        <div
                            key={index.to_string()}
                            class={classes!("face-box", (selected == Some(index)).then_some("selected"))}
                            onclick={link.callback(move |_| Msg::SelectFace(index))}
                        >
                            <img src={face.data_url()} alt={face.label()} />
                            <div class="face-label">{ face.label() }</div>
                        </div>
                    }
                }) }
            </div>
        </div>
    }
}
