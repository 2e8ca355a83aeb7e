use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-masks-theater"></i> {" FaceSwap"}</h1>
            <p class="subtitle">{"Swap faces in photos and videos: upload a source face and a target"}</p>
        </header>
    }
}
